pub mod logging;
pub mod messagebird;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("verifyflow")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("VERIFYFLOW_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = messagebird::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    const ENV_VARS: [&str; 6] = [
        "VERIFYFLOW_PORT",
        "MESSAGEBIRD_API_KEY",
        "VERIFYFLOW_MESSAGEBIRD_ENDPOINT",
        "VERIFYFLOW_TEMPLATE",
        "VERIFYFLOW_ORIGINATOR",
        "VERIFYFLOW_LOG_LEVEL",
    ];

    // Run `f` with every variable the command reads unset.
    fn with_clean_env<F: FnOnce()>(f: F) {
        temp_env::with_vars_unset(ENV_VARS, f);
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "verifyflow");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        with_clean_env(|| {
            let matches = new().get_matches_from(vec![
                "verifyflow",
                "--messagebird-api-key",
                "live_key",
            ]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
            assert_eq!(
                matches
                    .get_one::<Url>(messagebird::ARG_ENDPOINT)
                    .map(Url::as_str),
                Some("https://rest.messagebird.com/")
            );
            assert_eq!(
                matches
                    .get_one::<String>(messagebird::ARG_TEMPLATE)
                    .map(String::as_str),
                Some("Your verification code is %token.")
            );
            assert_eq!(
                matches.get_one::<String>(messagebird::ARG_ORIGINATOR),
                None
            );
            assert_eq!(
                matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                Some(0)
            );
        });
    }

    #[test]
    fn test_check_args() {
        with_clean_env(|| {
            let matches = new().get_matches_from(vec![
                "verifyflow",
                "--port",
                "3000",
                "--messagebird-api-key",
                "live_key",
                "--messagebird-endpoint",
                "http://localhost:9999/mb",
                "--template",
                "Code: %token",
                "--originator",
                "Verifyflow",
            ]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(3000));
            assert_eq!(
                matches.get_one::<String>(messagebird::ARG_API_KEY).cloned(),
                Some("live_key".to_string())
            );
            assert_eq!(
                matches
                    .get_one::<Url>(messagebird::ARG_ENDPOINT)
                    .map(Url::as_str),
                Some("http://localhost:9999/mb")
            );
            assert_eq!(
                matches.get_one::<String>(messagebird::ARG_TEMPLATE).cloned(),
                Some("Code: %token".to_string())
            );
            assert_eq!(
                matches
                    .get_one::<String>(messagebird::ARG_ORIGINATOR)
                    .cloned(),
                Some("Verifyflow".to_string())
            );
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("VERIFYFLOW_PORT", Some("443")),
                ("MESSAGEBIRD_API_KEY", Some("env_key")),
                ("VERIFYFLOW_MESSAGEBIRD_ENDPOINT", None),
                ("VERIFYFLOW_TEMPLATE", Some("%token is your code")),
                ("VERIFYFLOW_ORIGINATOR", Some("31970")),
                ("VERIFYFLOW_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["verifyflow"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(messagebird::ARG_API_KEY).cloned(),
                    Some("env_key".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(messagebird::ARG_TEMPLATE).cloned(),
                    Some("%token is your code".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>(messagebird::ARG_ORIGINATOR)
                        .cloned(),
                    Some("31970".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_api_key_is_required() {
        with_clean_env(|| {
            let result = new().try_get_matches_from(vec!["verifyflow"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_template_requires_placeholder() {
        with_clean_env(|| {
            let result = new().try_get_matches_from(vec![
                "verifyflow",
                "--messagebird-api-key",
                "live_key",
                "--template",
                "Your code is ready",
            ]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_endpoint_must_be_http() {
        with_clean_env(|| {
            for endpoint in ["ftp://rest.messagebird.com", "not a url", "mailto:x@y.z"] {
                let result = new().try_get_matches_from(vec![
                    "verifyflow",
                    "--messagebird-api-key",
                    "live_key",
                    "--messagebird-endpoint",
                    endpoint,
                ]);
                assert!(result.is_err(), "{endpoint} should be rejected");
            }
        });
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..8 {
            with_clean_env(|| {
                let mut args = vec![
                    "verifyflow".to_string(),
                    "--messagebird-api-key".to_string(),
                    "live_key".to_string(),
                ];

                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(u8::try_from(index).unwrap_or(u8::MAX))
                );
            });
        }
    }
}
