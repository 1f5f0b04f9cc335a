use askama::Template;
use axum::extract::{Multipart, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::db::models::PhotoListing;
use crate::db::photos;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::forms::{FieldError, UploadForm};
use crate::routes::home::Html;
use crate::routes::notice_text;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/photos.html")]
struct PhotosTemplate {
    photos: Vec<PhotoListing>,
    notice: String,
}

#[derive(Template)]
#[template(path = "pages/upload.html")]
struct UploadTemplate {
    errors: Vec<FieldError>,
}

#[derive(Deserialize)]
struct NoticeQuery {
    notice: Option<String>,
}

#[derive(Deserialize)]
struct SearchQuery {
    keyword: Option<String>,
}

/// GET /photos — all photos with their owners; signed-in users only
async fn photo_list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<NoticeQuery>,
) -> AppResult<impl IntoResponse> {
    let conn = state.db.get()?;
    let photos = photos::list_photos(&conn)?;
    Ok(Html(PhotosTemplate {
        photos,
        notice: notice_text(query.notice.as_deref()),
    }))
}

/// GET /search?keyword= — keyword substring search, open to anyone.
/// An empty or missing keyword lists every photo.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<impl IntoResponse> {
    let conn = state.db.get()?;
    let keyword = query.keyword.unwrap_or_default();
    let photos = photos::search_photos(&conn, &keyword)?;
    Ok(Html(PhotosTemplate {
        photos,
        notice: String::new(),
    }))
}

/// GET /upload — render the upload form
async fn upload_page(_user: CurrentUser) -> AppResult<impl IntoResponse> {
    Ok(Html(UploadTemplate { errors: Vec::new() }))
}

/// POST /upload — validate the multipart form and record the photo.
/// Only the client-supplied filename is stored; the image bytes are
/// drained and discarded.
async fn upload_submit(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "description" => {
                form.description = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid field: {}", e)))?;
            }
            "keywords" => {
                form.keywords = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid field: {}", e)))?;
            }
            "image" => {
                form.image = field.file_name().unwrap_or_default().to_string();
                let _ = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid field: {}", e)))?;
            }
            _ => {}
        }
    }

    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Html(UploadTemplate { errors }).into_response());
    }

    let conn = state.db.get()?;
    let id = photos::create_photo(&conn, &form.description, &form.keywords, &form.image, user.id)?;
    tracing::info!("User {} uploaded photo {}", user.username, id);

    Ok(Redirect::to("/photos?notice=uploaded").into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/photos", get(photo_list))
        .route("/search", get(search))
        .route("/upload", get(upload_page).post(upload_submit))
}
