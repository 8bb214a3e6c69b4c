//! MessageBird Verify REST client.
//!
//! - `create`: `POST {endpoint}/verify` with urlencoded `recipient`, `template`
//!   and optional `originator`.
//! - `check`: `GET {endpoint}/verify/{id}?token={token}`.
//!
//! Requests authenticate with `Authorization: AccessKey <key>`. Error bodies
//! look like `{"errors":[{"code":21,"description":"...","parameter":"recipient"}]}`
//! and are mapped onto [`VerifyError`] variants by [`classify`].

use super::{VerificationId, VerificationRequest, VerifyClient, VerifyError, VerifyFuture};
use crate::APP_USER_AGENT;
use anyhow::{anyhow, Result};
use reqwest::{
    header::{ACCEPT, AUTHORIZATION},
    Client, Response, StatusCode,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://rest.messagebird.com";

// Provider error codes with a dedicated category.
const CODE_REQUEST_NOT_ALLOWED: i64 = 2;
const CODE_NOT_FOUND: i64 = 20;
const CODE_NOT_ENOUGH_BALANCE: i64 = 25;

#[derive(Debug, Deserialize)]
struct VerifyResource {
    id: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrors {
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameter: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MessageBird {
    client: Client,
    endpoint: Url,
    access_key: SecretString,
}

impl MessageBird {
    /// Build a client for `endpoint` (usually [`DEFAULT_ENDPOINT`]).
    ///
    /// # Errors
    /// Returns an error if the endpoint is not an http(s) base URL or the HTTP
    /// client cannot be built.
    pub fn new(access_key: SecretString, endpoint: Url) -> Result<Self> {
        if !matches!(endpoint.scheme(), "http" | "https") || endpoint.cannot_be_a_base() {
            return Err(anyhow!(
                "Error parsing URL: unsupported endpoint {}",
                endpoint
            ));
        }

        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            client,
            endpoint,
            access_key,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url(&self, segments: &[&str]) -> Result<Url, VerifyError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| VerifyError::Unknown(format!("invalid endpoint {}", self.endpoint)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorization(&self) -> String {
        format!("AccessKey {}", self.access_key.expose_secret())
    }

    #[instrument(skip_all)]
    async fn create_verification(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationId, VerifyError> {
        let url = self.url(&["verify"])?;

        let mut params = vec![
            ("recipient", request.recipient.as_str()),
            ("template", request.template.as_str()),
        ];
        if let Some(originator) = request.originator.as_deref() {
            params.push(("originator", originator));
        }

        debug!("create verification: {}", url);

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, self.authorization())
            .header(ACCEPT, "application/json")
            .form(&params)
            .send()
            .await
            .map_err(network_error)?;

        let resource: VerifyResource = read_resource(response).await?;

        debug!(
            "verification {} created, status: {}",
            resource.id,
            resource.status.as_deref().unwrap_or("unknown")
        );

        Ok(VerificationId::from(resource.id))
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn check_verification(&self, id: &VerificationId, token: &str) -> Result<(), VerifyError> {
        // Empty and dot segments would address the collection instead of one verification.
        if matches!(id.as_str(), "" | "." | "..") {
            return Err(VerifyError::NotFound(
                "No verification id provided".to_string(),
            ));
        }

        let url = self.url(&["verify", id.as_str()])?;

        debug!("check verification: {}", url);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, self.authorization())
            .header(ACCEPT, "application/json")
            .query(&[("token", token)])
            .send()
            .await
            .map_err(network_error)?;

        let resource: VerifyResource = read_resource(response).await?;

        debug!(
            "verification {} checked, status: {}",
            resource.id,
            resource.status.as_deref().unwrap_or("unknown")
        );

        Ok(())
    }
}

impl VerifyClient for MessageBird {
    fn create<'a>(&'a self, request: &'a VerificationRequest) -> VerifyFuture<'a, VerificationId> {
        Box::pin(self.create_verification(request))
    }

    fn check<'a>(&'a self, id: &'a VerificationId, token: &'a str) -> VerifyFuture<'a, ()> {
        Box::pin(self.check_verification(id, token))
    }
}

fn network_error(err: reqwest::Error) -> VerifyError {
    VerifyError::Network(err.to_string())
}

async fn read_resource(response: Response) -> Result<VerifyResource, VerifyError> {
    let status = response.status();
    let body = response.text().await.map_err(network_error)?;

    if !status.is_success() {
        return Err(classify(status, &body));
    }

    serde_json::from_str(&body).map_err(|err| {
        debug!("undecodable response body: {}", err);
        VerifyError::Server("Got an invalid JSON response from the server.".to_string())
    })
}

/// Map a non-success response onto a [`VerifyError`].
///
/// Provider error codes win over the parameter name, which wins over the HTTP
/// status.
#[must_use]
pub fn classify(status: StatusCode, body: &str) -> VerifyError {
    let errors = serde_json::from_str::<ApiErrors>(body)
        .map(|parsed| parsed.errors)
        .unwrap_or_default();

    let message = errors
        .iter()
        .filter_map(|err| err.description.as_deref())
        .map(str::trim)
        .filter(|description| !description.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let message = if message.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        message
    };

    if let Some(first) = errors.first() {
        match first.code {
            CODE_REQUEST_NOT_ALLOWED => return VerifyError::Authentication(message),
            CODE_NOT_ENOUGH_BALANCE => return VerifyError::Balance(message),
            CODE_NOT_FOUND => return VerifyError::NotFound(message),
            _ => {}
        }

        match first.parameter.as_deref() {
            Some("recipient") => return VerifyError::InvalidRecipient(message),
            Some("token") => return VerifyError::InvalidToken(message),
            _ => {}
        }
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => VerifyError::Authentication(message),
        StatusCode::NOT_FOUND => VerifyError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => VerifyError::RateLimited(message),
        status if status.is_server_error() => VerifyError::Server(message),
        _ => VerifyError::Unknown(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> Result<MessageBird> {
        MessageBird::new(SecretString::from("test_key"), Url::parse(endpoint)?)
    }

    #[test]
    fn classify_invalid_recipient() {
        let body = r#"{"errors":[{"code":21,"description":"The value is not a valid msisdn","parameter":"recipient"}]}"#;
        assert_eq!(
            classify(StatusCode::UNPROCESSABLE_ENTITY, body),
            VerifyError::InvalidRecipient("The value is not a valid msisdn".to_string())
        );
    }

    #[test]
    fn classify_invalid_token() {
        let body = r#"{"errors":[{"code":10,"description":"The token is invalid.","parameter":"token"}]}"#;
        let err = classify(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(err.to_string(), "InvalidToken: The token is invalid.");
    }

    #[test]
    fn classify_codes_win_over_parameters() {
        let body = r#"{"errors":[{"code":2,"description":"Request not allowed (incorrect access_key)","parameter":"access_key"}]}"#;
        assert!(matches!(
            classify(StatusCode::UNAUTHORIZED, body),
            VerifyError::Authentication(_)
        ));

        let body = r#"{"errors":[{"code":25,"description":"Not enough balance","parameter":"recipient"}]}"#;
        assert!(matches!(
            classify(StatusCode::PAYMENT_REQUIRED, body),
            VerifyError::Balance(_)
        ));

        let body = r#"{"errors":[{"code":20,"description":"verify not found","parameter":null}]}"#;
        assert_eq!(
            classify(StatusCode::NOT_FOUND, body),
            VerifyError::NotFound("verify not found".to_string())
        );
    }

    #[test]
    fn classify_joins_descriptions() {
        let body = r#"{"errors":[{"code":9,"description":"first"},{"code":9,"description":" second "}]}"#;
        assert_eq!(
            classify(StatusCode::BAD_REQUEST, body),
            VerifyError::Unknown("first second".to_string())
        );
    }

    #[test]
    fn classify_falls_back_to_status() {
        assert_eq!(
            classify(StatusCode::TOO_MANY_REQUESTS, ""),
            VerifyError::RateLimited("HTTP 429".to_string())
        );
        assert_eq!(
            classify(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            VerifyError::Server("HTTP 502".to_string())
        );
        assert_eq!(
            classify(StatusCode::FORBIDDEN, "{}"),
            VerifyError::Authentication("HTTP 403".to_string())
        );
        assert_eq!(
            classify(StatusCode::IM_A_TEAPOT, r#"{"errors":[]}"#),
            VerifyError::Unknown("HTTP 418".to_string())
        );
    }

    #[test]
    fn new_rejects_unsupported_endpoints() {
        assert!(client("ftp://rest.messagebird.com").is_err());
        assert!(client("mailto:team@verifyflow.dev").is_err());
        assert!(client(DEFAULT_ENDPOINT).is_ok());
    }

    #[test]
    fn url_appends_escaped_segments() -> Result<()> {
        let mb = client("https://proxy.test/messagebird/")?;
        let url = mb.url(&["verify", "abc/../def"])?;
        assert_eq!(
            url.as_str(),
            "https://proxy.test/messagebird/verify/abc%2F..%2Fdef"
        );

        // dot segments are dropped by the url crate, check() guards against them
        assert_eq!(
            mb.url(&["verify", ".."])?.as_str(),
            "https://proxy.test/messagebird/verify"
        );

        let mb = client(DEFAULT_ENDPOINT)?;
        assert_eq!(
            mb.url(&["verify"])?.as_str(),
            "https://rest.messagebird.com/verify"
        );
        Ok(())
    }

    #[test]
    fn debug_redacts_access_key() -> Result<()> {
        let mb = client(DEFAULT_ENDPOINT)?;
        assert!(!format!("{mb:?}").contains("test_key"));
        Ok(())
    }

    #[tokio::test]
    async fn check_rejects_unaddressable_id_without_calling_out() -> Result<()> {
        // Unroutable endpoint: a real request would surface as NetworkError.
        let mb = client("http://127.0.0.1:9")?;
        for id in ["", ".", ".."] {
            let err = mb
                .check(&VerificationId::new(id), "123456")
                .await
                .err()
                .ok_or_else(|| anyhow!("expected an error for {id:?}"))?;
            assert!(matches!(err, VerifyError::NotFound(_)), "{id:?}: {err}");
        }
        Ok(())
    }
}
