use serde::{Deserialize, Serialize};

use crate::dir::ResourceKind;

/// Directory object for ACME client self-configuration.
///
/// See [RFC 8555 §7.1.1].
///
/// Every endpoint is optional at the decoding level; a missing endpoint only becomes an error when
/// a caller asks for it (see [`Session::resource_endpoint()`]). Unknown keys are ignored.
///
/// # Example JSON
///
/// ```json
/// {
///   "newNonce": "https://example.com/acme/new-nonce",
///   "newAccount": "https://example.com/acme/new-account",
///   "newOrder": "https://example.com/acme/new-order",
///   "newAuthz": "https://example.com/acme/new-authz",
///   "revokeCert": "https://example.com/acme/revoke-cert",
///   "keyChange": "https://example.com/acme/key-change",
///   "meta": {
///     "termsOfService": "https://example.com/acme/terms/2017-5-30",
///     "website": "https://www.example.com/",
///     "caaIdentities": ["example.com"],
///     "externalAccountRequired": false
///   }
/// }
/// ```
///
/// [RFC 8555 §7.1.1]: https://datatracker.ietf.org/doc/html/rfc8555#section-7.1.1
/// [`Session::resource_endpoint()`]: crate::Session::resource_endpoint()
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    /// URL for new nonce requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_nonce: Option<String>,

    /// URL for new account requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_account: Option<String>,

    /// URL for new order requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_order: Option<String>,

    /// URL for new authorization requests.
    ///
    /// If the ACME server does not implement [pre-authorization], it MUST omit the `newAuthz` field
    /// of the directory.
    ///
    /// [pre-authorization]: https://datatracker.ietf.org/doc/html/rfc8555#section-7.4.1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_authz: Option<String>,

    /// URL for certificate revocation requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoke_cert: Option<String>,

    /// URL for key change requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_change: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<DirectoryMeta>,
}

impl Directory {
    /// Endpoint advertised for `kind`, if any.
    pub fn endpoint(&self, kind: ResourceKind) -> Option<&str> {
        let url = match kind {
            ResourceKind::NewNonce => &self.new_nonce,
            ResourceKind::NewAccount => &self.new_account,
            ResourceKind::NewOrder => &self.new_order,
            ResourceKind::NewAuthz => &self.new_authz,
            ResourceKind::RevokeCert => &self.revoke_cert,
            ResourceKind::KeyChange => &self.key_change,
        };

        url.as_deref()
    }

    /// URL of the current terms of service, if the server publishes one.
    pub fn terms_of_service(&self) -> Option<&str> {
        self.meta.as_ref()?.terms_of_service.as_deref()
    }
}

/// <https://datatracker.ietf.org/doc/html/rfc8555#section-9.7.6>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryMeta {
    /// URL identifying the current terms of service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,

    /// URL locating a website providing more information about the ACME server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// The hostnames that the ACME server recognizes as referring to itself for the purposes of
    /// Certification Authority Authorization (CAA) record validation as defined in [RFC 6844].
    ///
    /// [RFC 6844]: https://datatracker.ietf.org/doc/html/rfc6844
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caa_identities: Option<Vec<String>>,

    /// If true, then the CA requires that all newAccount requests include an
    /// `externalAccountBinding` field associating the new account with an external account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_account_required: Option<bool>,
}

impl DirectoryMeta {
    pub fn external_account_required(&self) -> bool {
        self.external_account_required.unwrap_or(false)
    }
}
