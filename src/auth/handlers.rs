use askama::Template;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::auth::{password, session};
use crate::db::{self, users};
use crate::error::AppResult;
use crate::extractors::{cookie_value, MaybeUser};
use crate::forms::{FieldError, LoginForm, RegisterForm};
use crate::routes::home::Html;
use crate::routes::notice_text;
use crate::state::AppState;

// -- Templates --

#[derive(Template)]
#[template(path = "pages/register.html")]
pub struct RegisterTemplate {
    pub errors: Vec<FieldError>,
    pub username: String,
    pub email: String,
}

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub errors: Vec<FieldError>,
    pub failure: String,
    pub notice: String,
    pub email: String,
    pub next: String,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub notice: Option<String>,
    pub next: Option<String>,
}

// -- Cookie helpers --

fn session_cookie(name: &str, token: &str, max_age_hours: u64) -> String {
    let max_age_secs = max_age_hours * 3600;
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        name, token, max_age_secs
    )
}

fn clear_session_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", name)
}

/// Post-login redirect targets must be site-local paths. Anything else
/// (absolute URLs, protocol-relative "//host") falls back to home.
fn safe_next(next: &str) -> &str {
    if next.starts_with('/') && !next.starts_with("//") {
        next
    } else {
        "/home"
    }
}

// -- Register --

/// GET /register — render the registration form
pub async fn register_page(maybe_user: MaybeUser) -> AppResult<Response> {
    if maybe_user.0.is_some() {
        return Ok(Redirect::to("/home").into_response());
    }

    Ok(Html(RegisterTemplate {
        errors: Vec::new(),
        username: String::new(),
        email: String::new(),
    })
    .into_response())
}

/// POST /register — validate, create the user, redirect to login
pub async fn register_submit(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    if maybe_user.0.is_some() {
        return Ok(Redirect::to("/home").into_response());
    }

    let conn = state.db.get()?;
    let mut errors = form.validate(&conn)?;

    if errors.is_empty() {
        let hash = password::hash_password(&form.password, state.config.auth.bcrypt_cost)?;
        match users::create_user(&conn, &form.username, &form.email, &hash) {
            Ok(id) => {
                tracing::info!("Registered user {} ({})", form.username, id);
                return Ok(Redirect::to("/login?notice=registered").into_response());
            }
            // A concurrent registration can win the uniqueness race between
            // the pre-check and the insert; report it like the pre-check would.
            Err(e) if db::is_unique_violation(&e) => {
                let mut conflicts = unique_violation_errors(&conn, &form)?;
                if conflicts.is_empty() {
                    // Constraint failure we can't attribute to either field
                    return Err(e.into());
                }
                errors.append(&mut conflicts);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Html(RegisterTemplate {
        errors,
        username: form.username,
        email: form.email,
    })
    .into_response())
}

/// After an insert lost the uniqueness race, re-run the lookups so the
/// error lands on whichever field actually collided.
fn unique_violation_errors(
    conn: &rusqlite::Connection,
    form: &RegisterForm,
) -> rusqlite::Result<Vec<FieldError>> {
    let mut errors = Vec::new();
    if users::username_exists(conn, &form.username)? {
        errors.push(FieldError {
            field: "username",
            message: "That username is taken. Please choose a different one.".to_string(),
        });
    }
    if users::email_exists(conn, &form.email)? {
        errors.push(FieldError {
            field: "email",
            message: "That email is taken. Please choose a different one.".to_string(),
        });
    }
    Ok(errors)
}

// -- Login --

/// GET /login — render the login form
pub async fn login_page(
    maybe_user: MaybeUser,
    Query(query): Query<LoginQuery>,
) -> AppResult<Response> {
    if maybe_user.0.is_some() {
        return Ok(Redirect::to("/home").into_response());
    }

    Ok(Html(LoginTemplate {
        errors: Vec::new(),
        failure: String::new(),
        notice: notice_text(query.notice.as_deref()),
        email: String::new(),
        next: query.next.unwrap_or_default(),
    })
    .into_response())
}

/// POST /login — verify credentials and establish a session
pub async fn login_submit(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if maybe_user.0.is_some() {
        return Ok(Redirect::to("/home").into_response());
    }

    let next = form.next.clone().unwrap_or_default();
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Html(LoginTemplate {
            errors,
            failure: String::new(),
            notice: String::new(),
            email: form.email,
            next,
        })
        .into_response());
    }

    let conn = state.db.get()?;
    let user = users::find_by_email(&conn, &form.email)?;

    // One generic notice for both unknown email and wrong password,
    // so the response does not reveal which emails are registered.
    let Some(user) = user.filter(|u| password::verify_password(&form.password, &u.password_hash))
    else {
        return Ok(Html(LoginTemplate {
            errors: Vec::new(),
            failure: "Login unsuccessful. Please check email and password.".to_string(),
            notice: String::new(),
            email: form.email,
            next,
        })
        .into_response());
    };

    let token = session::create_session(&conn, user.id, state.config.auth.session_hours)?;
    tracing::info!("User {} logged in", user.username);

    let target = if next.is_empty() {
        "/home"
    } else {
        safe_next(&next)
    };

    Ok((
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, target.to_string()),
            (
                header::SET_COOKIE,
                session_cookie(
                    &state.config.auth.cookie_name,
                    &token,
                    state.config.auth.session_hours,
                ),
            ),
        ],
        "",
    )
        .into_response())
}

// -- Logout --

/// GET /logout — delete the session and redirect home
pub async fn logout(
    State(state): State<AppState>,
    request: axum::http::Request<axum::body::Body>,
) -> AppResult<Response> {
    let (parts, _body) = request.into_parts();

    if let Some(token) = cookie_value(&parts, &state.config.auth.cookie_name) {
        let conn = state.db.get()?;
        session::delete_session(&conn, token)?;
    }

    Ok((
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/".to_string()),
            (
                header::SET_COOKIE,
                clear_session_cookie(&state.config.auth.cookie_name),
            ),
        ],
        "",
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn register_form(username: &str, email: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            email: email.to_string(),
            password: "pw123456".to_string(),
            confirm_password: "pw123456".to_string(),
        }
    }

    // Simulates the lost race: another registration landed between the
    // pre-check and the insert.
    #[test]
    fn race_lost_on_email_reports_the_email_field() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        users::create_user(&conn, "alice", "a@x.com", "h").unwrap();

        let errors =
            unique_violation_errors(&conn, &register_form("bob", "a@x.com")).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn race_lost_on_username_reports_the_username_field() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        users::create_user(&conn, "alice", "a@x.com", "h").unwrap();

        let errors =
            unique_violation_errors(&conn, &register_form("alice", "b@x.com")).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "username");
    }

    #[test]
    fn race_lost_on_both_fields_reports_both() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        users::create_user(&conn, "alice", "a@x.com", "h").unwrap();

        let errors =
            unique_violation_errors(&conn, &register_form("alice", "a@x.com")).unwrap();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "email"]);
    }

    #[test]
    fn safe_next_accepts_local_paths() {
        assert_eq!(safe_next("/photos"), "/photos");
        assert_eq!(safe_next("/upload"), "/upload");
    }

    #[test]
    fn safe_next_rejects_external_targets() {
        assert_eq!(safe_next("https://evil.example"), "/home");
        assert_eq!(safe_next("//evil.example"), "/home");
        assert_eq!(safe_next("photos"), "/home");
    }

    #[test]
    fn session_cookie_sets_expected_attributes() {
        let cookie = session_cookie("glimpse_session", "tok", 2);
        assert!(cookie.starts_with("glimpse_session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=7200"));
    }

    #[test]
    fn clear_session_cookie_zeroes_max_age() {
        let cookie = clear_session_cookie("glimpse_session");
        assert!(cookie.starts_with("glimpse_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
