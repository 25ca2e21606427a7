//! JSON API payloads.
//!
//! Only the documents the session layer itself decodes live here. Resource bodies (accounts,
//! orders, authorizations) are left to the caller as generic deserialization targets.

use std::fmt;

use serde::{Deserialize, Serialize};

mod directory;
mod identifier;

pub use self::{
    directory::{Directory, DirectoryMeta},
    identifier::Identifier,
};

/// Problem document as defined in [RFC 7807] and used by [RFC 8555 §6.7].
///
/// [RFC 7807]: https://datatracker.ietf.org/doc/html/rfc7807
/// [RFC 8555 §6.7]: https://datatracker.ietf.org/doc/html/rfc8555#section-6.7
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Defaults to `about:blank` when the server omits it, as RFC 7807 §4.2 prescribes.
    #[serde(rename = "type", default = "about_blank")]
    pub _type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subproblems: Option<Vec<Subproblem>>,
}

impl Problem {
    /// Returns true if problem type is "badNonce".
    pub fn is_bad_nonce(&self) -> bool {
        self._type == "urn:ietf:params:acme:error:badNonce" || self._type == "badNonce"
    }
}

/// Server detail is shown verbatim; the type only stands in when no detail was sent.
impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => f.write_str(detail),
            None => f.write_str(&self._type),
        }
    }
}

impl std::error::Error for Problem {}

fn about_blank() -> String {
    "about:blank".to_owned()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subproblem {
    #[serde(rename = "type", default = "about_blank")]
    pub _type: String,
    pub detail: Option<String>,
    pub identifier: Option<Identifier>,
}
