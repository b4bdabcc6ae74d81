use crate::blog::{Post, GLOBAL_MESSAGE_KEY};
use crate::error::Error;
use crate::routes::Format;
use crate::state::SharedState;
use crate::views::{AdminListTemplate, NavLink};
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(super) struct AdminListing {
    posts: Vec<Post>,
    message: Option<String>,
}

pub(super) async fn get(
    State(state): SharedState,
    format: Format,
    cookies: CookieJar,
) -> Response {
    let mut session = state.get_session(&cookies).await;
    let message = session.get(GLOBAL_MESSAGE_KEY);

    let posts = match state.posts.get_posts().await {
        Ok(it) => it,
        // the session is left alone so the message survives for a retry
        Err(err) => return Error::from(err).respond(format),
    };

    tracing::debug!(session = %session.id(), posts = posts.len(), "rendering post admin");

    let body = match format {
        Format::Json => Json(AdminListing { posts, message }).into_response(),
        Format::Html => match crate::views::render(AdminListTemplate {
            nav: NavLink::for_posts(&posts),
            message,
        }) {
            Ok(page) => page.into_response(),
            Err(err) => return err.respond(format),
        },
    };

    let set_cookie = state.commit_session(session).await;
    ([(SET_COOKIE, set_cookie)], body).into_response()
}
