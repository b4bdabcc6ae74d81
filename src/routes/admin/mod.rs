use crate::state::NestedRouter;
use axum::routing::get;

mod edit;
mod list;

pub fn route() -> NestedRouter {
    axum::Router::new()
        .route("/", get(list::get))
        .route("/:slug", get(edit::get).post(edit::post))
}
