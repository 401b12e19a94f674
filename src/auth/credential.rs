use std::fmt;
use std::sync::OnceLock;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

use crate::validation::{validate_password, ValidationError};

/// Throwaway hash for logins naming an unknown user.
static DECOY: OnceLock<Option<Credential>> = OnceLock::new();

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Write-only Argon2 password hash. It can be replaced and checked against,
/// never read back.
#[derive(Clone)]
pub struct Credential {
    phc: String,
}

impl Credential {
    pub fn new(plain: &str) -> Result<Self, CredentialError> {
        Ok(Self {
            phc: hash_password(plain)?,
        })
    }

    /// Replaces the stored hash. On error the previous hash is kept.
    pub fn set(&mut self, plain: &str) -> Result<(), CredentialError> {
        self.phc = hash_password(plain)?;
        Ok(())
    }

    /// Argon2 compares digests in constant time.
    pub fn verify(&self, candidate: &str) -> bool {
        let parsed = match PasswordHash::new(&self.phc) {
            Ok(p) => p,
            Err(e) => {
                error!(error = %e, "argon2 parse hash error");
                return false;
            }
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }

    /// Runs one full Argon2 verification against a fixed decoy hash and
    /// always returns false, so an unknown account costs as much as a wrong
    /// password.
    pub fn verify_decoy(candidate: &str) -> bool {
        let decoy = DECOY.get_or_init(|| match Credential::new("recipebox-decoy") {
            Ok(c) => Some(c),
            Err(e) => {
                error!(error = %e, "decoy credential unavailable");
                None
            }
        });
        if let Some(decoy) = decoy {
            let _ = decoy.verify(candidate);
        }
        false
    }

    /// Rehydrates a hash loaded from storage.
    pub(crate) fn from_phc(phc: String) -> Result<Self, ValidationError> {
        if phc.trim().is_empty() {
            return Err(ValidationError::PasswordHashRequired);
        }
        Ok(Self { phc })
    }

    /// PHC string for the persistence layer only.
    pub(crate) fn phc(&self) -> &str {
        &self.phc
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

fn hash_password(plain: &str) -> Result<String, CredentialError> {
    validate_password(plain)?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            CredentialError::Hash(e.to_string())
        })?
        .to_string();
    Ok(hash)
}
