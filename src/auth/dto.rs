use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::User;

/// Request body for signup. Missing fields are validated, not rejected by serde.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username().to_string(),
            image_url: user.image_url.clone(),
            bio: user.bio.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::model::NewUser;

    #[test]
    fn public_user_never_carries_the_hash() {
        let user = NewUser::new("ana", "secret1", Some("http://img".into()), None)
            .unwrap()
            .into_user(Uuid::new_v4());

        let json = serde_json::to_value(PublicUser::from(&user)).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 4);
        for key in ["id", "username", "image_url", "bio"] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert!(!json.to_string().contains("argon2"));
        assert_eq!(json["bio"], serde_json::Value::Null);
    }
}
