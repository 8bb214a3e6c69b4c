use crate::verify::{messagebird::DEFAULT_ENDPOINT, DEFAULT_TEMPLATE, TOKEN_PLACEHOLDER};
use clap::{builder::ValueParser, Arg, Command};
use url::Url;

pub const ARG_API_KEY: &str = "messagebird-api-key";
pub const ARG_ENDPOINT: &str = "messagebird-endpoint";
pub const ARG_TEMPLATE: &str = "template";
pub const ARG_ORIGINATOR: &str = "originator";

#[must_use]
pub fn validator_endpoint() -> ValueParser {
    ValueParser::from(move |endpoint: &str| -> std::result::Result<Url, String> {
        let url = Url::parse(endpoint).map_err(|e| format!("invalid URL: {e}"))?;
        if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() {
            Ok(url)
        } else {
            Err(format!("unsupported endpoint: {endpoint}"))
        }
    })
}

#[must_use]
pub fn validator_template() -> ValueParser {
    ValueParser::from(move |template: &str| -> std::result::Result<String, String> {
        if template.contains(TOKEN_PLACEHOLDER) {
            Ok(template.to_string())
        } else {
            Err(format!("template must contain {TOKEN_PLACEHOLDER}"))
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_KEY)
                .long(ARG_API_KEY)
                .help("MessageBird API access key")
                .env("MESSAGEBIRD_API_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_ENDPOINT)
                .long(ARG_ENDPOINT)
                .help("MessageBird REST API base URL")
                .default_value(DEFAULT_ENDPOINT)
                .env("VERIFYFLOW_MESSAGEBIRD_ENDPOINT")
                .value_parser(validator_endpoint()),
        )
        .arg(
            Arg::new(ARG_TEMPLATE)
                .long(ARG_TEMPLATE)
                .help("Message sent to the recipient, %token is replaced with the code")
                .default_value(DEFAULT_TEMPLATE)
                .env("VERIFYFLOW_TEMPLATE")
                .value_parser(validator_template()),
        )
        .arg(
            Arg::new(ARG_ORIGINATOR)
                .long(ARG_ORIGINATOR)
                .help("Sender of the verification message (phone number or alphanumeric)")
                .env("VERIFYFLOW_ORIGINATOR"),
        )
}
