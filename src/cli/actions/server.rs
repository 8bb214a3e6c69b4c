use crate::{
    api::{self, handlers::FlowConfig},
    verify::MessageBird,
    views::Templates,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub api_key: SecretString,
    pub endpoint: Url,
    pub template: String,
    pub originator: Option<String>,
}

/// Execute the server action.
///
/// Collaborators are built here, once, and injected into the router.
/// # Errors
/// Returns an error if the MessageBird client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let client = MessageBird::new(args.api_key, args.endpoint)
        .context("Failed to build MessageBird client")?;
    let templates = Templates::default();
    let config = FlowConfig::new(args.template).with_originator(args.originator);

    api::new(
        args.port,
        Arc::new(client),
        Arc::new(templates),
        Arc::new(config),
    )
    .await
}

fn log_startup_args(args: &Args) {
    let entries = startup_entries(args);
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    let mut message = format!("{}\n\nStartup configuration:", banner());
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn startup_entries(args: &Args) -> [(&'static str, String); 5] {
    [
        ("listen", format!("tcp:{}", args.port)),
        ("messagebird_endpoint", args.endpoint.to_string()),
        ("messagebird_api_key", redact_key(args.api_key.expose_secret())),
        ("template", args.template.clone()),
        (
            "originator",
            args.originator
                .clone()
                .unwrap_or_else(|| "default".to_string()),
        ),
    ]
}

// Keep the key mode prefix ("live_"/"test_") visible, hide the rest.
fn redact_key(key: &str) -> String {
    match key.split_once('_') {
        Some((mode, _)) if matches!(mode, "live" | "test") => format!("{mode}_REDACTED"),
        _ if key.is_empty() => "unset".to_string(),
        _ => "REDACTED".to_string(),
    }
}

fn banner() -> String {
    BANNER.replace(
        "{VERSION}",
        &format!(
            " - {} - {}",
            env!("CARGO_PKG_VERSION"),
            short_commit(crate::GIT_COMMIT_HASH)
        ),
    )
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}

const BANNER: &str = r"
  +---------+
  | 1  2  3 |
  | 4  5  6 |   V E R I F Y F L O W {VERSION}
  | 7  8  9 |
  +---------+";
