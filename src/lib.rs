//! # Verifyflow (Phone Number Verification)
//!
//! `verifyflow` serves a three step HTML flow that proves a visitor controls a
//! phone number:
//!
//! 1. `GET /` asks for the number.
//! 2. `POST /step2` asks the provider to send a one-time code and shows a form
//!    carrying the returned verification id.
//! 3. `POST /step3` asks the provider whether the entered code matches.
//!
//! Code generation, delivery and rate limiting belong to the provider
//! (MessageBird Verify). Nothing is stored locally: the verification id
//! round-trips through a hidden form field.
//!
//! ## Collaborators
//!
//! The remote client ([`verify::VerifyClient`]) and the view renderer
//! ([`views::Templates`]) are built once by the `server` action and handed to
//! the router as `Extension`s. Handlers never reach for globals, which keeps
//! them testable with a fake client.
//!
//! ## Errors
//!
//! Remote failures are a tagged [`verify::VerifyError`]. Handlers render every
//! variant the same way, as `"<Category>: <message>"` on the form the visitor
//! came from, with a `200 OK` status.

pub mod api;
pub mod cli;
pub mod verify;
pub mod views;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
