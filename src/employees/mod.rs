use crate::state::AppState;
use axum::Router;

pub mod handlers;
#[cfg(test)]
pub(crate) mod memory;
pub mod model;
mod query;
pub mod service;
pub mod validation;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::employee_routes())
}
