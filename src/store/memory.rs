use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::auth::model::{NewUser, User};
use crate::recipes::model::{NewRecipe, Recipe};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    recipes: Vec<Recipe>, // insertion order
}

/// Process-local store. Each write holds the write lock for its whole
/// check-then-insert, which gives the same all-or-nothing outcome as a
/// database transaction.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username() == user.username())
        {
            return Err(StoreError::DuplicateUsername);
        }
        let user = user.into_user(Uuid::new_v4());
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username() == username)
            .cloned())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.recipes.retain(|r| r.user_id != id);
        Ok(true)
    }

    async fn list_recipes(&self, user_id: Uuid) -> Result<Vec<Recipe>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .recipes
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_recipe(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&recipe.user_id) {
            return Err(StoreError::MissingOwner);
        }
        let recipe = recipe.into_recipe(Uuid::new_v4());
        tables.recipes.push(recipe.clone());
        Ok(recipe)
    }
}
