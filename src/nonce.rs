//! Anti-replay nonce handling.
//!
//! See [RFC 8555 §6.5](https://datatracker.ietf.org/doc/html/rfc8555#section-6.5).

use std::future::Future;

use parking_lot::Mutex;
use reqwest::header::HeaderMap;

use crate::error::{Error, Result};

pub(crate) const REPLAY_NONCE: &str = "replay-nonce";

/// Holds at most one unused nonce.
///
/// Hand-out and replacement go through the same lock, so a nonce handed to one caller can never
/// be handed to another, and a nonce recorded from a response is never lost to a concurrent take.
#[derive(Debug, Default)]
pub(crate) struct NonceSlot {
    slot: Mutex<Option<String>>,
}

impl NonceSlot {
    /// Stores the nonce from the latest response, replacing any older one.
    pub fn record(&self, nonce: String) {
        log::trace!("Recording new nonce");
        *self.slot.lock() = Some(nonce);
    }

    fn take(&self) -> Option<String> {
        self.slot.lock().take()
    }

    pub fn clear(&self) {
        self.slot.lock().take();
    }

    #[cfg(test)]
    pub fn peek(&self) -> Option<String> {
        self.slot.lock().clone()
    }

    /// Takes the held nonce, fetching a new one whenever the slot is seen empty.
    ///
    /// Each empty observation runs `fetch` exactly once and records its result before the slot is
    /// examined again. The lock is never held across the fetch.
    pub async fn consume<F, Fut>(&self, mut fetch: F) -> Result<String>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        loop {
            if let Some(nonce) = self.take() {
                log::trace!("Use previous nonce");
                return Ok(nonce);
            }

            log::debug!("Request new nonce");
            let nonce = fetch().await?;
            self.record(nonce);
        }
    }
}

/// Reads the Replay-Nonce header, if present.
///
/// More than one instance of the header is a protocol violation.
pub(crate) fn extract_nonce(headers: &HeaderMap) -> Result<Option<String>> {
    let mut values = headers.get_all(REPLAY_NONCE).iter();

    let Some(value) = values.next() else {
        return Ok(None);
    };

    let extra = values.count();
    if extra > 0 {
        return Err(Error::DuplicateNonce(extra + 1));
    }

    // TODO: reject values that are not base64url, see RFC 8555 §6.5.1
    let nonce = value.to_str().map_err(|source| Error::InvalidHeader {
        name: REPLAY_NONCE,
        source,
    })?;

    Ok(Some(nonce.to_owned()))
}
