use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::{Context, Result};
use std::path::Path;

/// Map verbosity count to tracing level
const fn get_verbosity_level(verbosity: u8) -> Option<tracing::Level> {
    match verbosity {
        0 => None,
        1 => Some(tracing::Level::WARN),
        2 => Some(tracing::Level::INFO),
        3 => Some(tracing::Level::DEBUG),
        _ => Some(tracing::Level::TRACE),
    }
}

/// Load `.env` from the working directory; a missing file is not an error.
fn load_dotenv() -> Result<()> {
    load_dotenv_from(Path::new(".env"))
}

/// Variables already present in the environment are never overridden.
fn load_dotenv_from(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err).with_context(|| format!("Failed to load {}", path.display())),
    }
}

/// Main entry point for the CLI - builds and returns the Action
///
/// # Errors
///
/// Returns an error if `.env` loading, telemetry initialization, or action dispatch fails
pub fn start() -> Result<Action> {
    // 1. Environment from .env, real variables win
    load_dotenv()?;

    // 2. Parse command-line arguments
    let matches = commands::new().get_matches();

    // 3. Initialize telemetry
    let verbosity_level = get_verbosity_level(
        matches
            .get_one::<u8>(commands::logging::ARG_VERBOSITY)
            .copied()
            .unwrap_or(0),
    );
    telemetry::init(verbosity_level)?;

    // 4. Dispatch
    let action = dispatch::handler(&matches)?;

    Ok(action)
}
