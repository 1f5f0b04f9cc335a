use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Form;
use axum::Router;
use serde::Deserialize;

use crate::db::models::InboxMessage;
use crate::db::{messages, photos};
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::forms::{FieldError, MessageForm};
use crate::routes::home::Html;
use crate::routes::notice_text;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/messages.html")]
struct InboxTemplate {
    messages: Vec<InboxMessage>,
    notice: String,
}

#[derive(Template)]
#[template(path = "pages/send_message.html")]
struct SendMessageTemplate {
    errors: Vec<FieldError>,
    photo_id: i64,
    photo_description: String,
}

#[derive(Template)]
#[template(path = "pages/reply.html")]
struct ReplyTemplate {
    errors: Vec<FieldError>,
    message_id: i64,
    original_content: String,
}

#[derive(Deserialize)]
struct NoticeQuery {
    notice: Option<String>,
}

/// GET /messages — the signed-in user's inbox
async fn inbox(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<NoticeQuery>,
) -> AppResult<impl IntoResponse> {
    let conn = state.db.get()?;
    let messages = messages::inbox(&conn, user.id)?;
    Ok(Html(InboxTemplate {
        messages,
        notice: notice_text(query.notice.as_deref()),
    }))
}

/// GET /message/{photo_id} — render the send form for a photo
async fn send_page(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(photo_id): Path<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let photo = photos::find_photo(&conn, photo_id)?.ok_or(AppError::NotFound)?;

    Ok(Html(SendMessageTemplate {
        errors: Vec::new(),
        photo_id: photo.id,
        photo_description: photo.description,
    })
    .into_response())
}

/// POST /message/{photo_id} — message the photo's owner
async fn send_submit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(photo_id): Path<i64>,
    Form(form): Form<MessageForm>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let photo = photos::find_photo(&conn, photo_id)?.ok_or(AppError::NotFound)?;

    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Html(SendMessageTemplate {
            errors,
            photo_id: photo.id,
            photo_description: photo.description,
        })
        .into_response());
    }

    messages::create_message(&conn, &form.content, user.id, photo.user_id)?;
    tracing::info!(
        "User {} sent a message about photo {}",
        user.username,
        photo.id
    );

    Ok(Redirect::to("/photos?notice=sent").into_response())
}

/// GET /reply/{message_id} — render the reply form for a received message
async fn reply_page(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(message_id): Path<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let original = messages::find_message(&conn, message_id)?.ok_or(AppError::NotFound)?;

    Ok(Html(ReplyTemplate {
        errors: Vec::new(),
        message_id: original.id,
        original_content: original.content,
    })
    .into_response())
}

/// POST /reply/{message_id} — reply to the original sender
async fn reply_submit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(message_id): Path<i64>,
    Form(form): Form<MessageForm>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let original = messages::find_message(&conn, message_id)?.ok_or(AppError::NotFound)?;

    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Html(ReplyTemplate {
            errors,
            message_id: original.id,
            original_content: original.content,
        })
        .into_response());
    }

    messages::create_message(&conn, &form.content, user.id, original.sender_id)?;
    tracing::info!(
        "User {} replied to message {}",
        user.username,
        original.id
    );

    Ok(Redirect::to("/messages?notice=sent").into_response())
}

/// POST /delete_message/{message_id} — recipients may delete their own
/// messages; anyone else gets 403
async fn delete_message(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(message_id): Path<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let message = messages::find_message(&conn, message_id)?.ok_or(AppError::NotFound)?;

    if message.recipient_id != user.id {
        return Err(AppError::Forbidden);
    }

    messages::delete_message(&conn, message.id)?;
    tracing::info!("User {} deleted message {}", user.username, message.id);

    Ok(Redirect::to("/messages?notice=deleted").into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", get(inbox).post(inbox))
        .route("/message/{photo_id}", get(send_page).post(send_submit))
        .route("/reply/{message_id}", get(reply_page).post(reply_submit))
        .route("/delete_message/{message_id}", post(delete_message))
}
