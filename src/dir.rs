use std::{fmt, str::FromStr};

use crate::error::Error;

const LETSENCRYPT_URL: &str = "https://acme-v02.api.letsencrypt.org/directory";
const LETSENCRYPT_STAGING_URL: &str = "https://acme-staging-v02.api.letsencrypt.org/directory";
const GOOGLE_URL: &str = "https://dv.acme-v02.api.pki.goog/directory";
const GOOGLE_STAGING_URL: &str = "https://dv.acme-v02.test-api.pki.goog/directory";
const ZEROSSL_URL: &str = "https://acme.zerossl.com/v2/DV90";
const BUYPASS_URL: &str = "https://api.buypass.com/acme/directory";
const BUYPASS_STAGING_URL: &str = "https://api.test4.buypass.no/acme/directory";

/// Enumeration of known ACME API directories.
#[derive(Debug, Clone)]
pub enum DirectoryUrl<'a> {
    /// The main Let's Encrypt directory.
    ///
    /// Not appropriate for testing / development.
    LetsEncrypt,

    /// The staging Let's Encrypt directory.
    ///
    /// Use for testing and development. Doesn't issue "valid" certificates. The root signing
    /// certificate is not supposed to be in any trust chains.
    LetsEncryptStaging,

    /// Google Trust Services production directory.
    ///
    /// Requires external account binding.
    Google,

    /// Google Trust Services staging directory.
    GoogleStaging,

    /// ZeroSSL directory. Requires external account binding.
    ZeroSsl,

    /// The main Buypass Go SSL directory.
    Buypass,

    /// The staging Buypass Go SSL directory.
    BuypassStaging,

    /// Provide an arbitrary director URL to connect to.
    Other(&'a str),
}

impl<'a> DirectoryUrl<'a> {
    pub fn to_url(&self) -> &str {
        match self {
            DirectoryUrl::LetsEncrypt => LETSENCRYPT_URL,
            DirectoryUrl::LetsEncryptStaging => LETSENCRYPT_STAGING_URL,
            DirectoryUrl::Google => GOOGLE_URL,
            DirectoryUrl::GoogleStaging => GOOGLE_STAGING_URL,
            DirectoryUrl::ZeroSsl => ZEROSSL_URL,
            DirectoryUrl::Buypass => BUYPASS_URL,
            DirectoryUrl::BuypassStaging => BUYPASS_STAGING_URL,
            DirectoryUrl::Other(url) => url,
        }
    }
}

/// Resource kinds a directory can advertise an endpoint for.
///
/// See [RFC 8555 §7.1.1](https://datatracker.ietf.org/doc/html/rfc8555#section-7.1.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    NewNonce,
    NewAccount,
    NewOrder,
    NewAuthz,
    RevokeCert,
    KeyChange,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::NewNonce,
        ResourceKind::NewAccount,
        ResourceKind::NewOrder,
        ResourceKind::NewAuthz,
        ResourceKind::RevokeCert,
        ResourceKind::KeyChange,
    ];

    /// Key of this resource in the directory document.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::NewNonce => "newNonce",
            ResourceKind::NewAccount => "newAccount",
            ResourceKind::NewOrder => "newOrder",
            ResourceKind::NewAuthz => "newAuthz",
            ResourceKind::RevokeCert => "revokeCert",
            ResourceKind::KeyChange => "keyChange",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownResourceKind(s.to_owned()))
    }
}
