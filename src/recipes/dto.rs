use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::Recipe;
use crate::auth::PublicUser;

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    /// Kept raw so a string or float is reported as a validation error.
    #[serde(default)]
    pub minutes_to_complete: Option<Value>,
}

impl CreateRecipeRequest {
    /// `None` unless the client sent a JSON integer.
    pub fn minutes(&self) -> Option<i64> {
        self.minutes_to_complete.as_ref().and_then(Value::as_i64)
    }
}

/// Recipe with its owner embedded (the owner's recipes are not).
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub user: PublicUser,
}
