use super::{render, FlowConfig, SharedVerifyClient};
use crate::{
    verify::VerificationRequest,
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
pub struct Step2Form {
    /// Phone number, forwarded to the provider as-is.
    #[serde(default)]
    pub number: String,
}

/// Start a verification and show the code form.
///
/// Any provider failure re-renders the entry form with the error.
#[utoipa::path(
    post,
    path = "/step2",
    request_body(content = Step2Form, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Code form, or entry form with an error", content_type = "text/html", body = String)
    ),
    tag = "verify"
)]
#[instrument(skip_all)]
pub async fn step2(
    Extension(client): Extension<SharedVerifyClient>,
    Extension(templates): Extension<Arc<Templates>>,
    Extension(config): Extension<Arc<FlowConfig>>,
    form: Result<Form<Step2Form>, FormRejection>,
) -> Html<String> {
    // An unreadable body is treated as an empty form.
    let form = form.map_or_else(
        |rejection| {
            debug!("form rejected, using defaults: {}", rejection);
            Step2Form::default()
        },
        |Form(form)| form,
    );

    let request = VerificationRequest::new(form.number, config.template())
        .with_originator(config.originator().map(str::to_string));

    let view = match client.create(&request).await {
        Ok(id) => {
            debug!("verification created: {}", id);
            View::Step2 {
                id: id.into_inner(),
                error: None,
            }
        }
        Err(err) => {
            warn!(kind = err.kind(), "Failed to create verification: {}", err.message());
            View::Step1 {
                error: Some(err.to_string()),
            }
        }
    };

    render(&templates, &view)
}
