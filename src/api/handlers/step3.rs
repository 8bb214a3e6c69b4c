use super::{render, SharedVerifyClient};
use crate::{
    verify::VerificationId,
    views::{Templates, View},
};
use axum::{
    extract::{rejection::FormRejection, Extension},
    response::Html,
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Debug, Default)]
pub struct Step3Form {
    /// Verification id returned by step 2, passed through untouched.
    #[serde(default)]
    pub id: String,
    /// Code typed by the visitor.
    #[serde(default)]
    pub token: String,
}

/// Check the code the visitor entered.
///
/// Any provider failure re-renders the code form with the same id and the error.
#[utoipa::path(
    post,
    path = "/step3",
    request_body(content = Step3Form, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Confirmation, or code form with an error", content_type = "text/html", body = String)
    ),
    tag = "verify"
)]
#[instrument(skip_all)]
pub async fn step3(
    Extension(client): Extension<SharedVerifyClient>,
    Extension(templates): Extension<Arc<Templates>>,
    form: Result<Form<Step3Form>, FormRejection>,
) -> Html<String> {
    let form = form.map_or_else(
        |rejection| {
            debug!("form rejected, using defaults: {}", rejection);
            Step3Form::default()
        },
        |Form(form)| form,
    );

    let id = VerificationId::new(form.id);

    let view = match client.check(&id, &form.token).await {
        Ok(()) => {
            debug!("verification {} succeeded", id);
            View::Step3
        }
        Err(err) => {
            warn!(kind = err.kind(), "Failed to check verification: {}", err.message());
            View::Step2 {
                id: id.into_inner(),
                error: Some(err.to_string()),
            }
        }
    };

    render(&templates, &view)
}
