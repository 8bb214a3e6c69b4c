//! Remote verification client abstractions.
//!
//! A verification starts with [`VerifyClient::create`], which asks the provider
//! to send a one-time code to a recipient and returns an opaque
//! [`VerificationId`]. [`VerifyClient::check`] later submits the code the
//! visitor typed for that id. Both calls either succeed or fail with a
//! [`VerifyError`]; the provider owns every rule about what is valid.

pub mod messagebird;

use serde::{Deserialize, Serialize};
use std::{fmt, future::Future, pin::Pin};
use thiserror::Error;

pub use self::messagebird::MessageBird;

/// Placeholder the provider replaces with the generated code.
pub const TOKEN_PLACEHOLDER: &str = "%token";

pub const DEFAULT_TEMPLATE: &str = "Your verification code is %token.";

/// Boxed future returned by [`VerifyClient`] methods.
pub type VerifyFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, VerifyError>> + Send + 'a>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRequest {
    pub recipient: String,
    pub template: String,
    pub originator: Option<String>,
}

impl VerificationRequest {
    #[must_use]
    pub fn new(recipient: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            template: template.into(),
            originator: None,
        }
    }

    #[must_use]
    pub fn with_originator(mut self, originator: Option<String>) -> Self {
        self.originator = originator;
        self
    }
}

/// Identifier of one in-progress verification, exactly as the provider returned it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationId(String);

impl VerificationId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for VerificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for VerificationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Failure of a remote verification call.
///
/// `Display` renders `"<Category>: <message>"`, the string shown to visitors.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum VerifyError {
    #[error("NetworkError: {0}")]
    Network(String),
    #[error("InvalidRecipient: {0}")]
    InvalidRecipient(String),
    #[error("InvalidToken: {0}")]
    InvalidToken(String),
    #[error("NotFound: {0}")]
    NotFound(String),
    #[error("AuthenticationError: {0}")]
    Authentication(String),
    #[error("BalanceError: {0}")]
    Balance(String),
    #[error("RateLimited: {0}")]
    RateLimited(String),
    #[error("ServerError: {0}")]
    Server(String),
    #[error("RequestError: {0}")]
    Unknown(String),
}

impl VerifyError {
    /// Category name used as the prefix of the display string.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "NetworkError",
            Self::InvalidRecipient(_) => "InvalidRecipient",
            Self::InvalidToken(_) => "InvalidToken",
            Self::NotFound(_) => "NotFound",
            Self::Authentication(_) => "AuthenticationError",
            Self::Balance(_) => "BalanceError",
            Self::RateLimited(_) => "RateLimited",
            Self::Server(_) => "ServerError",
            Self::Unknown(_) => "RequestError",
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Network(message)
            | Self::InvalidRecipient(message)
            | Self::InvalidToken(message)
            | Self::NotFound(message)
            | Self::Authentication(message)
            | Self::Balance(message)
            | Self::RateLimited(message)
            | Self::Server(message)
            | Self::Unknown(message) => message,
        }
    }
}

/// Remote verification service.
pub trait VerifyClient: Send + Sync {
    /// Ask the provider to send a code to `request.recipient`.
    fn create<'a>(&'a self, request: &'a VerificationRequest) -> VerifyFuture<'a, VerificationId>;

    /// Submit `token` for the verification identified by `id`.
    fn check<'a>(&'a self, id: &'a VerificationId, token: &'a str) -> VerifyFuture<'a, ()>;
}
