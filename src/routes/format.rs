use axum::extract::FromRequestParts;
use axum::http::header::ACCEPT;
use axum::http::request::Parts;

/// How a handler should answer: a rendered page for browsers, or the raw
/// data for clients that ask for `application/json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
}

impl Format {
    /// The first of `text/html` and `application/json` listed in `accept`
    /// wins; anything else is answered with HTML.
    pub fn from_accept(accept: Option<&str>) -> Format {
        let Some(accept) = accept else {
            return Format::Html;
        };

        for media_range in accept.split(',') {
            let media_type = media_range.split(';').next().unwrap_or_default().trim();
            if media_type.eq_ignore_ascii_case("application/json") {
                return Format::Json;
            }
            if media_type.eq_ignore_ascii_case("text/html") {
                return Format::Html;
            }
        }

        Format::Html
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Format {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = parts
            .headers
            .get(ACCEPT)
            .and_then(|value| value.to_str().ok());

        Ok(Format::from_accept(accept))
    }
}
