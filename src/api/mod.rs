use crate::{
    api::handlers::{health, step1, step2, step3, FlowConfig, SharedVerifyClient},
    views::Templates,
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::step1::step1,
        handlers::step2::step2,
        handlers::step3::step3,
        handlers::health::health,
    ),
    components(schemas(
        handlers::step2::Step2Form,
        handlers::step3::Step3Form,
        handlers::health::Health,
    )),
    tags(
        (name = "verify", description = "Phone number verification flow"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Build the application router with its collaborators attached.
pub fn router(
    client: SharedVerifyClient,
    templates: Arc<Templates>,
    config: Arc<FlowConfig>,
) -> Router {
    Router::new()
        .route("/", get(step1))
        .route("/step2", post(step2))
        .route("/step3", post(step3))
        .route("/health", get(health).options(health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(client))
                .layer(Extension(templates))
                .layer(Extension(config)),
        )
}

/// Serve the router on `[::]:port` until the process is stopped.
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails
pub async fn new(
    port: u16,
    client: SharedVerifyClient,
    templates: Arc<Templates>,
    config: Arc<FlowConfig>,
) -> Result<()> {
    let app = router(client, templates, config);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, request_id)
}
