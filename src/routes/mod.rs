use crate::state::State;
use std::sync::Arc;

pub mod admin;
mod format;

pub use format::Format;

pub fn app(state: Arc<State>) -> axum::Router {
    axum::Router::new()
        .nest(crate::blog::ADMIN_ROUTE, admin::route())
        .with_state(state)
}
