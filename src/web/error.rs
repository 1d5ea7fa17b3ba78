//! Error responses for HTTP handlers.

use crate::errors::Error;
use crate::web::views;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// Handler error. Logged in full, rendered as a generic 500 page.
#[derive(Debug)]
pub struct WebError(pub Error);

/// Convenience type alias for handler return values.
pub type WebResult<T> = Result<T, WebError>;

impl<E> From<E> for WebError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(views::render_error_page()),
        )
            .into_response()
    }
}
