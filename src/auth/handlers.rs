use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        credential::Credential,
        dto::{LoginRequest, PublicUser, SignupRequest},
        model::NewUser,
        session::{CurrentSession, SessionState},
    },
    error::ApiError,
    state::AppState,
    store::Store,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/check_session", get(check_session))
        .route("/logout", delete(logout))
}

#[instrument(skip(state, session, payload))]
pub async fn signup(
    State(state): State<AppState>,
    mut session: CurrentSession,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let Json(payload) = payload?;

    let new_user = NewUser::new(
        payload.username.as_deref().unwrap_or_default(),
        payload.password.as_deref().unwrap_or_default(),
        payload.image_url,
        payload.bio,
    )
    .map_err(|e| {
        warn!(error = %e, "signup rejected");
        ApiError::from(e)
    })?;

    let user = state.store.create_user(new_user).await.map_err(|e| {
        warn!(error = %e, "create user failed");
        ApiError::from(e)
    })?;
    if let Err(e) = session.authenticate(user.id).await {
        discard_user(state.store.as_ref(), user.id).await;
        return Err(e);
    }

    info!(user_id = %user.id, username = %user.username(), "user signed up");
    Ok((StatusCode::CREATED, Json(PublicUser::from(&user))))
}

/// Undoes a signup whose session could not be established.
pub(crate) async fn discard_user(store: &dyn Store, user_id: Uuid) {
    match store.delete_user(user_id).await {
        Ok(_) => warn!(%user_id, "signup rolled back after session failure"),
        Err(e) => error!(error = %e, %user_id, "failed to roll back signup"),
    }
}

#[instrument(skip(state, session, payload))]
pub async fn login(
    State(state): State<AppState>,
    mut session: CurrentSession,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<PublicUser>, ApiError> {
    let Json(payload) = payload?;
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        warn!("login without username or password");
        return Err(ApiError::InvalidCredentials);
    };

    let user = match state.store.find_user_by_username(&username).await? {
        Some(u) => u,
        None => {
            Credential::verify_decoy(&password);
            warn!(%username, "login unknown username");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !user.authenticate(&password) {
        warn!(%username, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    session.authenticate(user.id).await?;
    info!(user_id = %user.id, %username, "user logged in");
    Ok(Json(PublicUser::from(&user)))
}

/// 401 here carries an empty object, not an `errors` list.
#[instrument(skip(state, session))]
pub async fn check_session(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Response, ApiError> {
    let unauthorized = || (StatusCode::UNAUTHORIZED, Json(json!({}))).into_response();

    let SessionState::Authenticated(user_id) = session.state() else {
        return Ok(unauthorized());
    };

    match state.store.find_user(user_id).await? {
        Some(user) => Ok(Json(PublicUser::from(&user)).into_response()),
        None => {
            warn!(%user_id, "session references missing user");
            Ok(unauthorized())
        }
    }
}

#[instrument(skip(session))]
pub async fn logout(mut session: CurrentSession) -> Result<StatusCode, ApiError> {
    if let SessionState::Authenticated(user_id) = session.state() {
        info!(%user_id, "user logged out");
    }
    session.end().await?;
    Ok(StatusCode::NO_CONTENT)
}
