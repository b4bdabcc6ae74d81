use crate::blog::PostSlug;
use crate::routes::Format;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("post {0:?} not found")]
    PostNotFound(PostSlug),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("error rendering template: {0}")]
    Render(#[from] askama::Error),
    #[error("markdown task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::PostNotFound(_) => StatusCode::NOT_FOUND,
            Error::Store(_) | Error::Render(_) | Error::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Error::PostNotFound(_) => "Post not found",
            _ => "Internal server error",
        }
    }

    /// Logs the error and turns it into a response in the format the client
    /// asked for. Only the public message reaches the client.
    pub fn respond(self, format: Format) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::info!("{self}");
        }

        match (format, &self) {
            (Format::Json, _) => (
                status,
                Json(serde_json::json!({ "error": self.public_message() })),
            )
                .into_response(),
            (Format::Html, Error::PostNotFound(slug)) => {
                match crate::views::render(crate::views::NotFoundTemplate { slug: slug.clone() }) {
                    Ok(page) => (status, page).into_response(),
                    Err(err) => {
                        tracing::error!("{err}");
                        (status, self.public_message()).into_response()
                    }
                }
            }
            (Format::Html, _) => (status, self.public_message()).into_response(),
        }
    }
}
