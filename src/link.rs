//! `Link` response header parsing, see [RFC 8288].
//!
//! Each header instance is taken to carry exactly one link. Multiple links folded into a single
//! header line with top-level commas are not split.
//!
//! [RFC 8288]: https://datatracker.ietf.org/doc/html/rfc8288

use reqwest::Url;

use crate::error::{Error, Result};

/// One relation link: `<uri>; rel="relation"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub rel: String,
    pub uri: String,
}

/// Parses a single `Link` header value.
///
/// Parameters other than `rel` are ignored. The `rel=` prefix is matched case-insensitively and
/// surrounding quotes are stripped from its value.
pub fn parse_link(value: &str) -> Result<Link> {
    let malformed = || Error::LinkFormat(value.to_owned());

    // The target may itself contain ';', so it is cut out before parameters are split.
    let (uri, params) = value
        .trim()
        .strip_prefix('<')
        .and_then(|rest| rest.split_once('>'))
        .ok_or_else(malformed)?;

    let uri = uri.trim();
    if Url::parse(uri).is_err() {
        return Err(malformed());
    }

    let params = params.trim_start().strip_prefix(';').ok_or_else(malformed)?;

    let rel = params
        .split(';')
        .map(str::trim)
        .find_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("rel")
                .then(|| value.trim().trim_matches('"'))
        })
        .filter(|rel| !rel.is_empty())
        .ok_or_else(malformed)?;

    log::trace!("Parsed link {rel} -> {uri}");

    Ok(Link {
        rel: rel.to_owned(),
        uri: uri.to_owned(),
    })
}
