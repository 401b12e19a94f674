use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{debug, warn};
use uuid::Uuid;

use super::repo_types::{RecipeRow, UserRow};
use super::{Store, StoreError};
use crate::auth::model::{NewUser, User};
use crate::recipes::model::{NewRecipe, Recipe};

pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("apply schema migrations")?;
        Ok(Self { db })
    }
}

/// Maps constraint violations onto domain errors. Only `users.username`
/// carries a unique constraint and only `recipes.user_id` a foreign key.
fn classify(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateUsername;
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::MissingOwner;
        }
    }
    StoreError::Backend(e.into())
}

fn into_user(row: UserRow) -> Result<User, StoreError> {
    let id = row.id;
    User::try_from(row).map_err(|e| {
        warn!(user_id = %id, error = %e, "stored user failed validation");
        StoreError::Backend(anyhow::anyhow!("corrupt user row {id}: {e}"))
    })
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tx = self.db.begin().await.map_err(classify)?;
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, password_hash, image_url, bio)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, password_hash, image_url, bio
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(user.credential.phc())
        .bind(&user.image_url)
        .bind(&user.bio)
        .fetch_one(&mut *tx)
        .await
        .map_err(classify)?;
        tx.commit().await.map_err(classify)?;
        debug!(user_id = %row.id, "user row inserted");
        into_user(row)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT id, username, password_hash, image_url, bio FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(classify)?;
        row.map(into_user).transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, image_url, bio
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .map_err(classify)?;
        row.map(into_user).transpose()
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.db.begin().await.map_err(classify)?;
        let recipes = sqlx::query(r#"DELETE FROM recipes WHERE user_id = $1"#)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(classify)?;
        let users = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(classify)?;
        tx.commit().await.map_err(classify)?;
        debug!(
            user_id = %id,
            recipes = recipes.rows_affected(),
            "user deleted with recipes"
        );
        Ok(users.rows_affected() > 0)
    }

    async fn list_recipes(&self, user_id: Uuid) -> Result<Vec<Recipe>, StoreError> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, title, instructions, minutes_to_complete, user_id
            FROM recipes
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(classify)?;
        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    async fn create_recipe(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let mut tx = self.db.begin().await.map_err(classify)?;
        let row = sqlx::query_as::<_, RecipeRow>(
            r#"
            INSERT INTO recipes (id, title, instructions, minutes_to_complete, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, instructions, minutes_to_complete, user_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&recipe.title)
        .bind(&recipe.instructions)
        .bind(recipe.minutes_to_complete)
        .bind(recipe.user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(classify)?;
        tx.commit().await.map_err(classify)?;
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTRUCTIONS: &str =
        "Sear the chicken, deglaze with white wine, then braise covered for forty minutes.";

    /// Connects to `TEST_DATABASE_URL`; these tests are skipped without it.
    async fn test_store() -> Option<PgStore> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        Some(PgStore::connect(&url, 2).await.expect("connect test database"))
    }

    fn unique_name() -> String {
        format!("user-{}", Uuid::new_v4())
    }

    fn new_user(name: &str) -> NewUser {
        NewUser::new(name, "secret1", None, None).expect("valid user")
    }

    #[test]
    fn non_constraint_errors_are_backend_failures() {
        assert!(matches!(
            classify(sqlx::Error::RowNotFound),
            StoreError::Backend(_)
        ));
        assert!(matches!(
            classify(sqlx::Error::PoolTimedOut),
            StoreError::Backend(_)
        ));
    }

    #[tokio::test]
    async fn duplicate_username_maps_to_domain_error() {
        let Some(store) = test_store().await else {
            return;
        };
        let name = unique_name();
        store.create_user(new_user(&name)).await.expect("first insert");

        let err = store.create_user(new_user(&name)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername));

        let found = store.find_user_by_username(&name).await.unwrap().expect("row");
        assert!(found.authenticate("secret1"));
    }

    #[tokio::test]
    async fn recipe_for_missing_owner_maps_to_domain_error() {
        let Some(store) = test_store().await else {
            return;
        };
        let recipe = NewRecipe::new("Stew", INSTRUCTIONS, Some(40), Uuid::new_v4()).unwrap();
        let err = store.create_recipe(recipe).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingOwner));
    }

    #[tokio::test]
    async fn delete_user_cascades_to_recipes() {
        let Some(store) = test_store().await else {
            return;
        };
        let user = store.create_user(new_user(&unique_name())).await.unwrap();
        for title in ["Stew", "Roast"] {
            let recipe = NewRecipe::new(title, INSTRUCTIONS, Some(40), user.id).unwrap();
            store.create_recipe(recipe).await.unwrap();
        }
        let titles: Vec<String> = store
            .list_recipes(user.id)
            .await
            .unwrap()
            .iter()
            .map(|r| r.title().to_string())
            .collect();
        assert_eq!(titles, ["Stew", "Roast"]);

        assert!(store.delete_user(user.id).await.unwrap());
        assert!(store.find_user(user.id).await.unwrap().is_none());
        assert!(store.list_recipes(user.id).await.unwrap().is_empty());
        assert!(!store.delete_user(user.id).await.unwrap());
    }
}
