use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ApiError;

pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Who the current request acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(Uuid),
}

/// Server-side session bound to the request cookie, plus its decoded state.
pub struct CurrentSession {
    session: Session,
    state: SessionState,
}

impl CurrentSession {
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Anonymous/Authenticated(old) -> Authenticated(user_id). The session id
    /// is rotated so a pre-login cookie cannot be reused.
    pub async fn authenticate(&mut self, user_id: Uuid) -> Result<(), ApiError> {
        self.session.cycle_id().await.map_err(ApiError::internal)?;
        self.session
            .insert(SESSION_USER_ID_KEY, user_id)
            .await
            .map_err(ApiError::internal)?;
        self.state = SessionState::Authenticated(user_id);
        debug!(%user_id, "session authenticated");
        Ok(())
    }

    /// Any state -> Anonymous. Session data is dropped from the store.
    pub async fn end(&mut self) -> Result<(), ApiError> {
        self.session.flush().await.map_err(ApiError::internal)?;
        self.state = SessionState::Anonymous;
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::internal(anyhow::anyhow!(msg)))?;

        let state = match session.get::<Uuid>(SESSION_USER_ID_KEY).await {
            Ok(Some(user_id)) => SessionState::Authenticated(user_id),
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                warn!(error = %e, "unreadable session; treating as anonymous");
                SessionState::Anonymous
            }
        };

        Ok(Self { session, state })
    }
}

/// Requires an authenticated session, yielding the user id.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match CurrentSession::from_request_parts(parts, state).await?.state() {
            SessionState::Authenticated(user_id) => Ok(AuthUser(user_id)),
            SessionState::Anonymous => {
                debug!("anonymous request to protected route");
                Err(ApiError::Unauthorized)
            }
        }
    }
}
