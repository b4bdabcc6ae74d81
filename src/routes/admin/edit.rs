use crate::blog::{editor_path, Post, PostSlug, ADMIN_ROUTE, GLOBAL_MESSAGE_KEY, UPDATED_MESSAGE};
use crate::error::Error;
use crate::form::{ActionErrors, EditForm};
use crate::routes::Format;
use crate::state::{SharedState, State as AppState};
use crate::views::{AdminEditTemplate, EditorFields, NavLink};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(super) struct EditorData {
    post: Post,
}

pub(super) async fn get(
    State(state): SharedState,
    format: Format,
    Path(slug): Path<PostSlug>,
) -> Response {
    show_post(&state, format, slug)
        .await
        .unwrap_or_else(|err| err.respond(format))
}

async fn show_post(state: &AppState, format: Format, slug: PostSlug) -> Result<Response, Error> {
    let Some(post) = state.posts.get_post(&slug).await? else {
        return Err(Error::PostNotFound(slug));
    };

    match format {
        Format::Json => Ok(Json(EditorData { post }).into_response()),
        Format::Html => {
            let fields = EditorFields {
                action: editor_path(&slug),
                title: post.title,
                slug: post.slug,
                markdown: post.markdown,
            };
            Ok(render_editor(state, fields, ActionErrors::default())
                .await?
                .into_response())
        }
    }
}

pub(super) async fn post(
    State(state): SharedState,
    format: Format,
    cookies: CookieJar,
    Path(slug): Path<PostSlug>,
    body: Bytes,
) -> Response {
    // parsed by hand so a missing content type or a repeated field still
    // reaches validation
    let form = EditForm::from_urlencoded(&body);
    let update = match form.clone().validate() {
        Ok(it) => it,
        Err(errors) => {
            tracing::debug!(%slug, ?errors, "rejected post edit");
            return reject_edit(&state, format, &slug, form, errors).await;
        }
    };

    if let Err(err) = state.posts.update_post(update).await {
        tracing::error!(%slug, "error updating post: {err}");
        return reject_edit(&state, format, &slug, form, ActionErrors::update_failed()).await;
    }

    let mut session = state.get_session(&cookies).await;
    session.flash(GLOBAL_MESSAGE_KEY, UPDATED_MESSAGE);
    tracing::debug!(%slug, session = %session.id(), "flashed update message");
    let set_cookie = state.commit_session(session).await;

    ([(SET_COOKIE, set_cookie)], Redirect::to(ADMIN_ROUTE)).into_response()
}

/// The errors as data, or the editor page again with the submitted values and
/// the errors inline. Both are successful responses.
async fn reject_edit(
    state: &AppState,
    format: Format,
    slug: &str,
    form: EditForm,
    errors: ActionErrors,
) -> Response {
    match format {
        Format::Json => Json(errors).into_response(),
        Format::Html => {
            let fields = EditorFields {
                action: editor_path(slug),
                title: form.title.unwrap_or_default(),
                slug: form.slug.unwrap_or_default(),
                markdown: form.markdown.unwrap_or_default(),
            };
            match render_editor(state, fields, errors).await {
                Ok(page) => page.into_response(),
                Err(err) => err.respond(format),
            }
        }
    }
}

async fn render_editor(
    state: &AppState,
    fields: EditorFields,
    errors: ActionErrors,
) -> Result<axum::response::Html<String>, Error> {
    let posts = state.posts.get_posts().await?;
    let preview = crate::views::render_markdown(fields.markdown.clone()).await?;

    crate::views::render(AdminEditTemplate {
        nav: NavLink::for_posts(&posts),
        message: None,
        fields,
        errors,
        preview,
    })
}
