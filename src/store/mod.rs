use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::model::{NewUser, User};
use crate::recipes::model::{NewRecipe, Recipe};

mod memory;
mod postgres;
mod repo_types;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already taken")]
    DuplicateUsername,
    #[error("owning user does not exist")]
    MissingOwner,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Users and their recipes. Every write is all-or-nothing.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    /// Removes the user and every recipe it owns. Returns false if absent.
    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError>;
    /// Recipes owned by `user_id`, oldest first.
    async fn list_recipes(&self, user_id: Uuid) -> Result<Vec<Recipe>, StoreError>;
    async fn create_recipe(&self, recipe: NewRecipe) -> Result<Recipe, StoreError>;
}
