//! Turning raw responses into typed results.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, LINK};
use serde::de::DeserializeOwned;

use crate::{
    api::Problem,
    error::{Error, Result},
    link::parse_link,
    nonce::{extract_nonce, NonceSlot},
    trans::HttpResponse,
};

/// Processed result of one exchange with the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<T> {
    location: Option<String>,
    links: HashMap<String, Vec<String>>,
    payload: Option<T>,
}

impl<T> Envelope<T> {
    /// Value of the `Location` header, e.g. the URL of a newly created resource.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// All link targets for `rel`, in the order the headers arrived.
    pub fn links(&self, rel: &str) -> &[String] {
        self.links.get(rel).map(Vec::as_slice).unwrap_or_default()
    }

    /// First link target for `rel`.
    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links(rel).first().map(String::as_str)
    }

    /// Every relation and its targets.
    pub fn all_links(&self) -> &HashMap<String, Vec<String>> {
        &self.links
    }

    /// Decoded body. Absent when the response was not JSON.
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<T> {
        self.payload
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            location: self.location,
            links: self.links,
            payload: self.payload.map(f),
        }
    }
}

/// True for `application/json` and any `application/<subtype>+json`.
///
/// Parameters such as `charset` are ignored and the comparison is ASCII case-insensitive.
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.strip_prefix("application/") {
        Some("json") => true,
        Some(subtype) => subtype
            .strip_suffix("+json")
            .is_some_and(|prefix| !prefix.is_empty() && !prefix.contains('/')),
        None => false,
    }
}

/// Processes a response: location, nonce, links, then body according to content type and status.
///
/// The nonce is recorded before anything can fail on the body, so a follow-up request can be
/// signed even when this one was rejected.
pub(crate) fn process<T: DeserializeOwned>(
    url: &str,
    res: HttpResponse,
    nonces: &NonceSlot,
) -> Result<Envelope<T>> {
    let location = header_str(&res.headers, "location")?;

    if let Some(nonce) = extract_nonce(&res.headers)? {
        nonces.record(nonce);
    }

    let links = collect_links(&res.headers)?;

    let is_json = res.content_type().is_some_and(is_json_content_type);
    let success = res.status.is_success();

    let payload = match (is_json, success) {
        (true, true) => Some(serde_json::from_slice::<T>(&res.body)?),

        (true, false) => {
            let Ok(problem) = serde_json::from_slice::<Problem>(&res.body) else {
                return Err(Error::Status {
                    url: url.to_owned(),
                    status: res.status,
                    body: res.body_text(),
                });
            };

            let problem = Problem {
                status: problem.status.or(Some(res.status.as_u16())),
                ..problem
            };

            log::debug!("Problem from {url}: {problem:?}");
            return Err(problem.into());
        }

        (false, true) => None,

        (false, false) => {
            return Err(Error::Status {
                url: url.to_owned(),
                status: res.status,
                body: res.body_text(),
            });
        }
    };

    Ok(Envelope {
        location,
        links,
        payload,
    })
}

fn header_str(headers: &HeaderMap, name: &'static str) -> Result<Option<String>> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(str::to_owned)
                .map_err(|source| Error::InvalidHeader { name, source })
        })
        .transpose()
}

fn collect_links(headers: &HeaderMap) -> Result<HashMap<String, Vec<String>>> {
    let mut links = HashMap::<String, Vec<String>>::new();

    for value in headers.get_all(LINK) {
        let value = value
            .to_str()
            .map_err(|source| Error::InvalidHeader { name: "link", source })?;

        let link = parse_link(value)?;
        links.entry(link.rel).or_default().push(link.uri);
    }

    Ok(links)
}
