use askama::Template;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::db::models::User;
use crate::db::users;
use crate::error::AppResult;
use crate::routes::home::Html;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/users.html")]
struct UsersTemplate {
    users: Vec<User>,
}

/// GET /user_list — all registered users, no auth required
async fn user_list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let conn = state.db.get()?;
    let users = users::list_users(&conn)?;
    Ok(Html(UsersTemplate { users }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/user_list", get(user_list))
}
