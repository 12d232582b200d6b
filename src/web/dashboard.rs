//! Dashboard page handler

use axum::{response::Html, Extension};

use teleclaude_core::auth::Session;

use super::pages;

/// `GET /`: dashboard shell for the signed-in user
pub async fn index(Extension(session): Extension<Session>) -> Html<String> {
    Html(pages::dashboard_page(&session))
}
