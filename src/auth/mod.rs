use crate::state::AppState;
use axum::Router;

pub mod credential;
mod dto;
pub mod handlers;
pub mod model;
pub mod session;

pub use dto::PublicUser;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
