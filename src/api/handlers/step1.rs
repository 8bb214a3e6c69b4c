use super::render;
use crate::views::{Templates, View};
use axum::{extract::Extension, response::Html};
use std::sync::Arc;
use tracing::instrument;

/// Ask for the phone number.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Entry form", content_type = "text/html", body = String)
    ),
    tag = "verify"
)]
#[instrument(skip_all)]
pub async fn step1(Extension(templates): Extension<Arc<Templates>>) -> Html<String> {
    render(&templates, &View::Step1 { error: None })
}
