pub mod auth;
pub mod home;
pub mod messages;
pub mod photos;
pub mod users;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/home", get(home::index))
        .merge(auth::router())
        .merge(users::router())
        .merge(photos::router())
        .merge(messages::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Map a redirect `notice` code to its user-facing text. Unknown codes
/// render as no notice at all.
pub fn notice_text(code: Option<&str>) -> String {
    match code {
        Some("registered") => "Your account has been created! You are now able to log in.",
        Some("uploaded") => "Your photo has been uploaded!",
        Some("sent") => "Your message has been sent!",
        Some("deleted") => "Message deleted successfully.",
        _ => "",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_notice_codes_have_text() {
        for code in ["registered", "uploaded", "sent", "deleted"] {
            assert!(!notice_text(Some(code)).is_empty());
        }
    }

    #[test]
    fn unknown_or_absent_codes_render_nothing() {
        assert_eq!(notice_text(None), "");
        assert_eq!(notice_text(Some("bogus")), "");
    }
}
