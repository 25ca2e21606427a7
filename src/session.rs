use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::OnceCell;

use crate::{
    api,
    dir::{DirectoryUrl, ResourceKind},
    envelope::{process, Envelope},
    error::{Error, Result},
    nonce::{extract_nonce, NonceSlot, REPLAY_NONCE},
    trans::{HttpClient, HttpRequest, HttpResponse},
};

/// Configures and creates a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    directory_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SessionBuilder {
    pub fn new(url: DirectoryUrl<'_>) -> Self {
        SessionBuilder {
            directory_url: url.to_url().to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Deadline applied to every single request. Unbounded by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `User-Agent` sent by the client [`build()`](Self::build) creates.
    ///
    /// Has no effect on clients passed to [`build_with_client()`](Self::build_with_client).
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Creates a session over a fresh [`reqwest::Client`].
    pub fn build(self) -> Result<Session> {
        let user_agent = self.user_agent.clone().unwrap_or_else(|| {
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_owned()
        });

        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(self.build_with_client(client))
    }

    /// Creates a session over the given HTTP client.
    pub fn build_with_client<C: HttpClient>(self, client: C) -> Session<C> {
        Session {
            client,
            directory_url: self.directory_url,
            timeout: self.timeout,
            directory: OnceCell::new(),
            nonces: NonceSlot::default(),
        }
    }
}

/// Protocol session with one ACME server.
///
/// Owns the server's directory, resolved lazily on first need and cached afterwards, and the
/// single unused nonce slot. Share it behind an `Arc` to use it from several tasks.
///
/// Payload signing happens outside the session: a signer asks for the target endpoint with
/// [`resource_endpoint()`] and a nonce with [`consume_nonce()`], builds the signed message, and
/// hands it to [`post()`].
///
/// No request is ever retried. On a [bad nonce](Error::is_bad_nonce) error, re-sign with a fresh
/// nonce and resubmit.
///
/// [`resource_endpoint()`]: Session::resource_endpoint()
/// [`consume_nonce()`]: Session::consume_nonce()
/// [`post()`]: Session::post()
#[derive(Debug)]
pub struct Session<C = reqwest::Client> {
    client: C,
    directory_url: String,
    timeout: Option<Duration>,
    directory: OnceCell<api::Directory>,
    nonces: NonceSlot,
}

impl Session {
    /// Creates a session with default settings against `url`.
    pub fn new(url: DirectoryUrl<'_>) -> Result<Session> {
        SessionBuilder::new(url).build()
    }

    pub fn builder(url: DirectoryUrl<'_>) -> SessionBuilder {
        SessionBuilder::new(url)
    }
}

impl<C: HttpClient> Session<C> {
    /// The HTTP client requests go through.
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn directory_url(&self) -> &str {
        &self.directory_url
    }

    /// Resolves the directory, fetching it only on first use.
    ///
    /// Concurrent first calls share a single fetch. A failed fetch is not cached; the next call
    /// tries again.
    pub async fn directory(&self) -> Result<&api::Directory> {
        self.directory
            .get_or_try_init(|| self.fetch_directory())
            .await
    }

    async fn fetch_directory(&self) -> Result<api::Directory> {
        log::debug!("Fetching directory: {}", self.directory_url);

        let res = self.send(HttpRequest::get(&self.directory_url)).await?;

        if !res.status.is_success() {
            return Err(Error::Status {
                url: self.directory_url.clone(),
                status: res.status,
                body: res.body_text(),
            });
        }

        if let Some(nonce) = extract_nonce(&res.headers)? {
            self.nonces.record(nonce);
        }

        Ok(serde_json::from_slice(&res.body)?)
    }

    /// Endpoint the directory advertises for `kind`.
    pub async fn resource_endpoint(&self, kind: ResourceKind) -> Result<&str> {
        self.directory()
            .await?
            .endpoint(kind)
            .ok_or(Error::MissingEndpoint(kind))
    }

    /// Terms of service URL from the directory metadata, if published.
    pub async fn terms_of_service(&self) -> Result<Option<&str>> {
        Ok(self.directory().await?.terms_of_service())
    }

    /// Hands out a nonce for exactly one signed request.
    ///
    /// Uses the nonce left by the latest response when there is one, otherwise asks the server's
    /// newNonce endpoint for a fresh one.
    pub async fn consume_nonce(&self) -> Result<String> {
        self.nonces.consume(|| self.fetch_nonce()).await
    }

    async fn fetch_nonce(&self) -> Result<String> {
        let url = self.resource_endpoint(ResourceKind::NewNonce).await?;

        let res = self.send(HttpRequest::head(url)).await?;

        if !res.status.is_success() {
            return Err(Error::Status {
                url: url.to_owned(),
                status: res.status,
                body: res.body_text(),
            });
        }

        extract_nonce(&res.headers)?.ok_or(Error::MissingHeader(REPLAY_NONCE))
    }

    /// Plain GET of `url`, e.g. a certificate chain or an alternate link.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<Envelope<T>> {
        let res = self.send(HttpRequest::get(url)).await?;
        process(url, res, &self.nonces)
    }

    /// POSTs an already signed message to `url`.
    ///
    /// `payload` is serialized as-is and sent as `application/jose+json`.
    pub async fn post<T, P>(&self, url: &str, payload: &P) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = serde_json::to_string(payload)?;

        let res = self.send(HttpRequest::post_jose(url, body)).await?;
        process(url, res, &self.nonces)
    }

    /// Forgets the cached directory and any held nonce.
    pub fn reset(&mut self) {
        log::debug!("Resetting session for {}", self.directory_url);

        self.directory.take();
        self.nonces.clear();
    }

    async fn send(&self, req: HttpRequest) -> Result<HttpResponse> {
        log::debug!("Call endpoint: {} {}", req.method, req.url);

        let Some(timeout) = self.timeout else {
            return self.client.send_request(req).await;
        };

        let url = req.url.clone();
        tokio::time::timeout(timeout, self.client.send_request(req))
            .await
            .map_err(|_| Error::Timeout { url })?
    }
}
