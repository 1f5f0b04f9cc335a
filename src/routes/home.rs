use askama::Template;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::AppResult;
use crate::extractors::MaybeUser;

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub username: String,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// GET / and /home — landing page, same for anonymous and signed-in users
pub async fn index(maybe_user: MaybeUser) -> AppResult<Response> {
    let username = maybe_user
        .0
        .map(|u| u.username)
        .unwrap_or_default();

    Ok(Html(HomeTemplate { username }).into_response())
}
