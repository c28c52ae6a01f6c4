use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod error;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod repo_types;
mod services;
mod validation;

pub use repo::{PgUserStore, UserStore};

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
