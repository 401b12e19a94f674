use thiserror::Error;

pub const MIN_INSTRUCTIONS_LEN: usize = 50;

/// Field-level rejection raised before anything reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Username is required")]
    UsernameRequired,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password hash is required")]
    PasswordHashRequired,
    #[error("Title is required")]
    TitleRequired,
    #[error("Instructions must be at least 50 characters long")]
    InstructionsTooShort,
    #[error("Minutes to complete must be a positive integer")]
    InvalidMinutes,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if is_blank(username) {
        return Err(ValidationError::UsernameRequired);
    }
    Ok(())
}

/// Not trimmed; only emptiness is rejected.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if is_blank(title) {
        return Err(ValidationError::TitleRequired);
    }
    Ok(())
}

pub fn validate_instructions(instructions: &str) -> Result<(), ValidationError> {
    if instructions.trim().chars().count() < MIN_INSTRUCTIONS_LEN {
        return Err(ValidationError::InstructionsTooShort);
    }
    Ok(())
}

/// `None` stands for "was not an integer" (absent, string, float, bool...).
pub fn validate_minutes(minutes: Option<i64>) -> Result<i32, ValidationError> {
    match minutes {
        Some(m) if m > 0 => i32::try_from(m).map_err(|_| ValidationError::InvalidMinutes),
        _ => Err(ValidationError::InvalidMinutes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_usernames_are_rejected() {
        for name in ["", " ", "\t\n  "] {
            assert_eq!(
                validate_username(name),
                Err(ValidationError::UsernameRequired)
            );
        }
        assert!(validate_username(" ana ").is_ok());
    }

    #[test]
    fn password_only_needs_to_be_present() {
        assert_eq!(validate_password(""), Err(ValidationError::PasswordRequired));
        assert!(validate_password(" ").is_ok());
    }

    #[test]
    fn title_rejects_whitespace() {
        assert_eq!(validate_title("   "), Err(ValidationError::TitleRequired));
        assert!(validate_title("Soup").is_ok());
    }

    #[test]
    fn instructions_length_boundary_is_fifty_trimmed_chars() {
        let forty_nine = "a".repeat(49);
        let fifty = "a".repeat(50);
        assert_eq!(
            validate_instructions(&forty_nine),
            Err(ValidationError::InstructionsTooShort)
        );
        assert!(validate_instructions(&fifty).is_ok());

        let padded = format!("   {forty_nine}   ");
        assert_eq!(
            validate_instructions(&padded),
            Err(ValidationError::InstructionsTooShort)
        );
    }

    #[test]
    fn instructions_count_characters_not_bytes() {
        let accented = "é".repeat(49);
        assert!(accented.len() >= 50);
        assert_eq!(
            validate_instructions(&accented),
            Err(ValidationError::InstructionsTooShort)
        );
    }

    #[test]
    fn minutes_must_be_strictly_positive() {
        assert_eq!(validate_minutes(Some(0)), Err(ValidationError::InvalidMinutes));
        assert_eq!(validate_minutes(Some(-5)), Err(ValidationError::InvalidMinutes));
        assert_eq!(validate_minutes(None), Err(ValidationError::InvalidMinutes));
        assert_eq!(validate_minutes(Some(1)), Ok(1));
    }

    #[test]
    fn minutes_beyond_i32_are_rejected() {
        assert_eq!(
            validate_minutes(Some(i64::from(i32::MAX) + 1)),
            Err(ValidationError::InvalidMinutes)
        );
        assert_eq!(validate_minutes(Some(i64::from(i32::MAX))), Ok(i32::MAX));
    }

    #[test]
    fn messages_match_the_api_contract() {
        assert_eq!(
            ValidationError::InstructionsTooShort.to_string(),
            "Instructions must be at least 50 characters long"
        );
        assert_eq!(
            ValidationError::InvalidMinutes.to_string(),
            "Minutes to complete must be a positive integer"
        );
    }
}
