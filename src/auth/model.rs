use uuid::Uuid;

use super::credential::{Credential, CredentialError};
use crate::validation::{validate_username, ValidationError};

/// Validated signup data, not yet persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub(crate) username: String,
    pub(crate) credential: Credential,
    pub(crate) image_url: Option<String>,
    pub(crate) bio: Option<String>,
}

impl NewUser {
    /// Validates the username, then hashes the password.
    pub fn new(
        username: &str,
        password: &str,
        image_url: Option<String>,
        bio: Option<String>,
    ) -> Result<Self, CredentialError> {
        validate_username(username)?;
        let credential = Credential::new(password)?;
        Ok(Self {
            username: username.to_string(),
            credential,
            image_url,
            bio,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn into_user(self, id: Uuid) -> User {
        User {
            id,
            username: self.username,
            credential: self.credential,
            image_url: self.image_url,
            bio: self.bio,
        }
    }
}

/// Persisted user. Not `Serialize`: clients get `PublicUser`.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    username: String,
    credential: Credential,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl User {
    pub(crate) fn from_parts(
        id: Uuid,
        username: String,
        credential: Credential,
        image_url: Option<String>,
        bio: Option<String>,
    ) -> Self {
        Self {
            id,
            username,
            credential,
            image_url,
            bio,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: &str) -> Result<(), ValidationError> {
        validate_username(username)?;
        self.username = username.to_string();
        Ok(())
    }

    pub fn set_password(&mut self, plain: &str) -> Result<(), CredentialError> {
        self.credential.set(plain)
    }

    pub fn authenticate(&self, candidate: &str) -> bool {
        self.credential.verify(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> User {
        NewUser::new("ana", "secret1", None, Some("cooks".into()))
            .expect("valid user")
            .into_user(Uuid::new_v4())
    }

    #[test]
    fn blank_username_fails_before_hashing() {
        let err = NewUser::new("   ", "secret1", None, None).unwrap_err();
        assert!(matches!(
            err,
            CredentialError::Invalid(ValidationError::UsernameRequired)
        ));
    }

    #[test]
    fn missing_password_fails() {
        let err = NewUser::new("ana", "", None, None).unwrap_err();
        assert!(matches!(
            err,
            CredentialError::Invalid(ValidationError::PasswordRequired)
        ));
    }

    #[test]
    fn authenticate_tracks_latest_password() {
        let mut user = ana();
        assert!(user.authenticate("secret1"));
        user.set_password("secret2").expect("rehash");
        assert!(user.authenticate("secret2"));
        assert!(!user.authenticate("secret1"));
    }

    #[test]
    fn set_username_validates_and_keeps_old_value_on_error() {
        let mut user = ana();
        assert_eq!(
            user.set_username(" "),
            Err(ValidationError::UsernameRequired)
        );
        assert_eq!(user.username(), "ana");
        user.set_username("ana2").expect("valid");
        assert_eq!(user.username(), "ana2");
    }

    #[test]
    fn set_password_leaves_other_fields_alone() {
        let mut user = ana();
        let before = (user.id, user.username().to_string(), user.bio.clone());
        user.set_password("another").expect("rehash");
        assert_eq!(before, (user.id, user.username().to_string(), user.bio.clone()));
    }
}
