pub mod health;
pub use self::health::health;

pub mod step1;
pub use self::step1::step1;

pub mod step2;
pub use self::step2::step2;

pub mod step3;
pub use self::step3::step3;

// common types for the handlers
use crate::{
    verify::{VerifyClient, DEFAULT_TEMPLATE},
    views::{Templates, View},
};
use axum::response::Html;
use std::sync::Arc;
use tracing::debug;

pub type SharedVerifyClient = Arc<dyn VerifyClient>;

/// Settings applied to every verification request built by `step2`.
#[derive(Clone, Debug)]
pub struct FlowConfig {
    template: String,
    originator: Option<String>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE.to_string())
    }
}

impl FlowConfig {
    #[must_use]
    pub fn new(template: String) -> Self {
        Self {
            template,
            originator: None,
        }
    }

    #[must_use]
    pub fn with_originator(mut self, originator: Option<String>) -> Self {
        self.originator = originator;
        self
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn originator(&self) -> Option<&str> {
        self.originator.as_deref()
    }
}

fn render(templates: &Templates, view: &View) -> Html<String> {
    debug!("rendering view: {}", view.name());
    Html(templates.render(view))
}
