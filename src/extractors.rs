use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};

use crate::auth::session;
use crate::error::AppError;
use crate::state::AppState;

/// Represents the currently authenticated user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Rejection for guarded pages: a 303 to the login page carrying the
/// originally requested path so login can bounce the user back.
pub struct LoginRedirect {
    next: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&format!("/login?next={}", encode_query_value(&self.next))).into_response()
    }
}

/// Percent-encode the bytes that would terminate or split a query value.
/// Everything else in a request path is already query-safe.
fn encode_query_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        match b {
            b'%' | b'&' | b'#' | b'?' | b'=' | b'+' | b' ' => {
                out.push_str(&format!("%{:02X}", b));
            }
            _ => out.push(b as char),
        }
    }
    out
}

/// Extractor that requires an authenticated session.
/// Redirects to /login when no live session is found.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let next = parts.uri.path().to_string();
        lookup_user(parts, state)
            .map_err(|e| e.into_response())?
            .ok_or_else(|| LoginRedirect { next }.into_response())
    }
}

/// Optional user extractor — returns None instead of redirecting when
/// not authenticated.
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(lookup_user(parts, state)?))
    }
}

fn lookup_user(parts: &Parts, state: &AppState) -> Result<Option<CurrentUser>, AppError> {
    let Some(token) = cookie_value(parts, &state.config.auth.cookie_name) else {
        return Ok(None);
    };

    let conn = state.db.get()?;
    let user = session::resolve_session(&conn, token)?;
    Ok(user.map(|u| CurrentUser {
        id: u.id,
        username: u.username,
    }))
}

pub fn cookie_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val)
            } else {
                None
            }
        })
}
