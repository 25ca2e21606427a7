//! Protocol session layer for ACME (Automatic Certificate Management Environment) clients.
//!
//! It follows [RFC 8555](https://datatracker.ietf.org/doc/html/rfc8555) and covers the parts of
//! the protocol every request depends on:
//!
//! - resolving the server's [directory](api::Directory) of endpoints, once per session;
//! - keeping the single-use anti-replay nonce every signed request must carry;
//! - turning responses into an [`Envelope`] (location, links, typed payload) or a typed [`Error`].
//!
//! Building and signing request payloads is left to the caller. A signer asks the session for the
//! target endpoint and a nonce, produces a JWS, and posts it through the session.
//!
//! # Usage
//!
//! ```no_run
//! use acme_session::{DirectoryUrl, ResourceKind, Session};
//!
//! # async fn run() -> Result<(), acme_session::Error> {
//! let session = Session::new(DirectoryUrl::LetsEncryptStaging)?;
//!
//! let url = session.resource_endpoint(ResourceKind::NewAccount).await?;
//! let nonce = session.consume_nonce().await?;
//!
//! # let signed_jws = serde_json::json!({ "nonce": nonce });
//! let account = session.post::<serde_json::Value, _>(url, &signed_jws).await?;
//! println!("account URL: {:?}", account.location());
//! # Ok(())
//! # }
//! ```
//!
//! # Nonces
//!
//! Every response may carry a fresh nonce, which replaces the one the session holds. A nonce is
//! handed out exactly once; when none is held, the session fetches one from the newNonce
//! endpoint. Requests are never retried: when the server answers with a
//! [bad nonce](Error::is_bad_nonce) problem, re-sign with a new nonce and resubmit.
//!
//! ## Use Staging For Development!
//!
//! Especially take care to use the Let's Encrypt staging environment for development where the rate
//! limits are more relaxed. See [`DirectoryUrl::LetsEncryptStaging`].

#![deny(rust_2018_idioms, nonstandard_style, future_incompatible)]

mod dir;
mod envelope;
mod error;
mod link;
mod nonce;
mod session;
mod trans;

pub mod api;

#[cfg(test)]
mod test;

pub use crate::{
    dir::{DirectoryUrl, ResourceKind},
    envelope::{is_json_content_type, Envelope},
    error::{Error, Result},
    link::{parse_link, Link},
    session::{Session, SessionBuilder},
    trans::{HttpClient, HttpRequest, HttpResponse, JOSE_JSON},
};
