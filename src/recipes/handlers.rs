use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{session::AuthUser, PublicUser},
    error::ApiError,
    state::AppState,
};

use super::dto::{CreateRecipeRequest, RecipeResponse};
use super::model::NewRecipe;

pub fn recipe_routes() -> Router<AppState> {
    Router::new().route("/recipes", get(list_recipes).post(create_recipe))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let user = state.store.find_user(user_id).await?.ok_or_else(|| {
        warn!(%user_id, "session references missing user");
        ApiError::NotFound("User not found")
    })?;
    let owner = PublicUser::from(&user);

    let recipes = state.store.list_recipes(user_id).await.map_err(|e| {
        error!(error = %e, %user_id, "list recipes failed");
        ApiError::from(e)
    })?;
    let items = recipes
        .into_iter()
        .map(|recipe| RecipeResponse {
            recipe,
            user: owner.clone(),
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateRecipeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let Json(payload) = payload?;

    let new_recipe = NewRecipe::new(
        payload.title.as_deref().unwrap_or_default(),
        payload.instructions.as_deref().unwrap_or_default(),
        payload.minutes(),
        user_id,
    )
    .map_err(|e| {
        warn!(error = %e, %user_id, "recipe rejected");
        ApiError::from(e)
    })?;

    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    let recipe = state.store.create_recipe(new_recipe).await.map_err(|e| {
        error!(error = %e, %user_id, "create recipe failed");
        ApiError::from(e)
    })?;

    info!(recipe_id = %recipe.id, %user_id, "recipe created");
    Ok((
        StatusCode::CREATED,
        Json(RecipeResponse {
            recipe,
            user: PublicUser::from(&user),
        }),
    ))
}
