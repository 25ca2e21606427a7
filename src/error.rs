use reqwest::StatusCode;

use crate::{api::Problem, dir::ResourceKind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced by the session layer.
///
/// Variants separate what went wrong on the wire from what the server reported and from what the
/// client itself detected, so callers can decide whether resubmitting makes sense.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP client could not complete the exchange.
    #[error("transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// Non-success status without a structured problem body.
    #[error("request to {url} failed with status {status}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// Structured problem document returned by the server.
    #[error(transparent)]
    Problem(#[from] Problem),

    /// The directory does not advertise an endpoint for this resource kind.
    #[error("directory has no endpoint for {0}")]
    MissingEndpoint(ResourceKind),

    #[error("unknown resource kind: {0:?}")]
    UnknownResourceKind(String),

    #[error("response is missing mandatory {0} header")]
    MissingHeader(&'static str),

    #[error("response carries {0} replay-nonce headers, expected one")]
    DuplicateNonce(usize),

    #[error("{name} header is not valid visible ASCII")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: reqwest::header::ToStrError,
    },

    #[error("malformed link header: {0:?}")]
    LinkFormat(String),

    #[error("could not decode JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// The per-request deadline elapsed before the server answered.
    #[error("request to {url} timed out")]
    Timeout { url: String },
}

impl Error {
    /// Returns the server problem document, if this is a protocol error.
    pub fn problem(&self) -> Option<&Problem> {
        match self {
            Error::Problem(problem) => Some(problem),
            _ => None,
        }
    }

    /// Returns true if the server rejected the request's nonce.
    ///
    /// Re-signing with a fresh nonce and resubmitting once is the expected reaction.
    pub fn is_bad_nonce(&self) -> bool {
        self.problem().is_some_and(Problem::is_bad_nonce)
    }

    /// HTTP status associated with this error, when there is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Problem(problem) => problem
                .status
                .and_then(|status| StatusCode::from_u16(status).ok()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}
