use crate::cli::{
    actions::{server::Args, Action},
    commands::{messagebird, ARG_PORT},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use url::Url;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let api_key = matches
        .get_one::<String>(messagebird::ARG_API_KEY)
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --messagebird-api-key")?;

    let endpoint = matches
        .get_one::<Url>(messagebird::ARG_ENDPOINT)
        .cloned()
        .context("missing required argument: --messagebird-endpoint")?;

    let template = matches
        .get_one::<String>(messagebird::ARG_TEMPLATE)
        .cloned()
        .context("missing required argument: --template")?;

    let originator = matches
        .get_one::<String>(messagebird::ARG_ORIGINATOR)
        .cloned();

    Ok(Action::Server(Args {
        port,
        api_key,
        endpoint,
        template,
        originator,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    #[test]
    fn handler_builds_server_action() -> Result<()> {
        let matches = temp_env::with_vars_unset(
            [
                "VERIFYFLOW_PORT",
                "VERIFYFLOW_MESSAGEBIRD_ENDPOINT",
                "VERIFYFLOW_TEMPLATE",
                "VERIFYFLOW_ORIGINATOR",
            ],
            || {
                commands::new().try_get_matches_from(vec![
                    "verifyflow",
                    "--port",
                    "9090",
                    "--messagebird-api-key",
                    "live_key",
                    "--originator",
                    "Verifyflow",
                ])
            },
        )?;

        let Action::Server(args) = handler(&matches)?;
        assert_eq!(args.port, 9090);
        assert_eq!(args.api_key.expose_secret(), "live_key");
        assert_eq!(args.endpoint.as_str(), "https://rest.messagebird.com/");
        assert_eq!(args.template, "Your verification code is %token.");
        assert_eq!(args.originator.as_deref(), Some("Verifyflow"));
        Ok(())
    }
}
