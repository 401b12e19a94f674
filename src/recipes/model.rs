use serde::Serialize;
use uuid::Uuid;

use crate::validation::{
    validate_instructions, validate_minutes, validate_title, ValidationError,
};

/// Validated recipe data, not yet persisted.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub(crate) title: String,
    pub(crate) instructions: String,
    pub(crate) minutes_to_complete: i32,
    pub(crate) user_id: Uuid,
}

impl NewRecipe {
    /// Checks title, instructions, then minutes. `minutes_to_complete` is
    /// `None` when the client sent something other than an integer.
    pub fn new(
        title: &str,
        instructions: &str,
        minutes_to_complete: Option<i64>,
        user_id: Uuid,
    ) -> Result<Self, ValidationError> {
        validate_title(title)?;
        validate_instructions(instructions)?;
        let minutes_to_complete = validate_minutes(minutes_to_complete)?;
        Ok(Self {
            title: title.to_string(),
            instructions: instructions.to_string(),
            minutes_to_complete,
            user_id,
        })
    }

    pub(crate) fn into_recipe(self, id: Uuid) -> Recipe {
        Recipe {
            id,
            title: self.title,
            instructions: self.instructions,
            minutes_to_complete: self.minutes_to_complete,
            user_id: self.user_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub id: Uuid,
    title: String,
    instructions: String,
    minutes_to_complete: i32,
    pub user_id: Uuid,
}

impl Recipe {
    pub(crate) fn from_parts(
        id: Uuid,
        title: String,
        instructions: String,
        minutes_to_complete: i32,
        user_id: Uuid,
    ) -> Self {
        Self {
            id,
            title,
            instructions,
            minutes_to_complete,
            user_id,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn minutes_to_complete(&self) -> i32 {
        self.minutes_to_complete
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
        validate_title(title)?;
        self.title = title.to_string();
        Ok(())
    }

    pub fn set_instructions(&mut self, instructions: &str) -> Result<(), ValidationError> {
        validate_instructions(instructions)?;
        self.instructions = instructions.to_string();
        Ok(())
    }

    pub fn set_minutes_to_complete(&mut self, minutes: i64) -> Result<(), ValidationError> {
        self.minutes_to_complete = validate_minutes(Some(minutes))?;
        Ok(())
    }
}
