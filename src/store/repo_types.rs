use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::{credential::Credential, model::User};
use crate::recipes::model::Recipe;
use crate::validation::ValidationError;

/// User record in the database.
#[derive(Debug, FromRow)]
pub(super) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String, // Argon2 PHC string
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = ValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let credential = Credential::from_phc(row.password_hash)?;
        Ok(User::from_parts(
            row.id,
            row.username,
            credential,
            row.image_url,
            row.bio,
        ))
    }
}

/// Recipe record in the database.
#[derive(Debug, FromRow)]
pub(super) struct RecipeRow {
    pub id: Uuid,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: i32,
    pub user_id: Uuid,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe::from_parts(
            row.id,
            row.title,
            row.instructions,
            row.minutes_to_complete,
            row.user_id,
        )
    }
}
