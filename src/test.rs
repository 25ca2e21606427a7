#![allow(clippy::trivial_regex)]

use std::{
    collections::VecDeque,
    convert::Infallible,
    future::{ready, Future},
    net::TcpListener,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, OnceLock,
    },
};

use actix_http::{HttpService, Method, Request, Response, StatusCode};
use actix_server::{Server, ServerHandle};
use actix_web::body::MessageBody;
use parking_lot::Mutex;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::{
    error::{Error, Result},
    trans::{HttpClient, HttpRequest, HttpResponse},
};

static RE_URL: OnceLock<Regex> = OnceLock::new();

fn re_url() -> &'static Regex {
    RE_URL.get_or_init(|| Regex::new("<URL>").unwrap())
}

pub struct TestServer {
    pub url: String,
    pub dir_url: String,
    directory_hits: Arc<AtomicUsize>,
    handle: ServerHandle,
}

impl TestServer {
    /// Number of times the directory document was served.
    pub fn directory_hits(&self) -> usize {
        self.directory_hits.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        drop(self.handle.stop(false));
    }
}

fn get_directory(url: &str) -> Response<impl MessageBody> {
    const BODY: &str = r#"{
    "keyChange": "<URL>/acme/key-change",
    "newAccount": "<URL>/acme/new-acct",
    "newNonce": "<URL>/acme/new-nonce",
    "newOrder": "<URL>/acme/new-order",
    "revokeCert": "<URL>/acme/revoke-cert",
    "meta": {
        "termsOfService": "<URL>/terms",
        "caaIdentities": [
        "testdir.org"
        ]
    }
    }"#;

    Response::build(StatusCode::OK)
        .insert_header(("Content-Type", "application/json"))
        .insert_header(("Replay-Nonce", "directory-nonce"))
        .body(re_url().replace_all(BODY, url).into_owned())
}

fn head_new_nonce(seq: usize) -> Response<impl MessageBody> {
    Response::build(StatusCode::NO_CONTENT)
        .insert_header((
            "Replay-Nonce",
            format!("8_uBBV3N2DBRJczhoiB46ugJKUkUHxGzVe6xIMpj{seq}"),
        ))
        .finish()
}

fn post_new_acct(url: &str) -> Response<impl MessageBody> {
    const BODY: &str = r#"{
    "contact": [
        "mailto:foo@bar.com"
    ],
    "initialIp": "90.171.37.12",
    "createdAt": "2018-12-31T17:15:40.399104457Z",
    "status": "valid"
    }"#;

    let location = format!("{url}/acme/acct/7728515");
    let index = format!("<{url}/directory>;rel=\"index\"");

    Response::build(StatusCode::CREATED)
        .insert_header(("Content-Type", "application/json"))
        .insert_header(("Replay-Nonce", "new-acct-nonce"))
        .insert_header(("Location", location))
        .insert_header(("Link", index))
        .body(BODY)
}

fn post_bad_nonce() -> Response<impl MessageBody> {
    const BODY: &str = r#"{
    "type": "urn:ietf:params:acme:error:badNonce",
    "detail": "JWS has an invalid anti-replay nonce",
    "status": 400
    }"#;

    Response::build(StatusCode::BAD_REQUEST)
        .insert_header(("Content-Type", "application/problem+json"))
        .insert_header(("Replay-Nonce", "after-bad-nonce"))
        .body(BODY)
}

fn get_certificate(url: &str) -> Response<impl MessageBody> {
    let up = format!("<{url}/acme/issuer-cert>; rel=\"up\"");
    let alternate = format!("<{url}/acme/cert/fae41c070f967713109028/1>; rel=\"alternate\"");

    let mut res = Response::build(StatusCode::OK)
        .insert_header(("Content-Type", "application/pem-certificate-chain"))
        .insert_header(("Link", up))
        .body("CERT HERE");

    res.headers_mut().append(
        actix_http::header::LINK,
        actix_http::header::HeaderValue::from_str(&alternate).unwrap(),
    );

    res
}

fn route_request(
    req: Request,
    url: &str,
    directory_hits: &AtomicUsize,
    nonces: &AtomicUsize,
) -> Response<impl MessageBody> {
    match (req.method(), req.path()) {
        (&Method::GET, "/directory") => {
            directory_hits.fetch_add(1, Ordering::SeqCst);
            get_directory(url).map_into_boxed_body()
        }

        (&Method::HEAD, "/acme/new-nonce") => {
            let seq = nonces.fetch_add(1, Ordering::SeqCst);
            head_new_nonce(seq).map_into_boxed_body()
        }

        (&Method::POST, "/acme/new-acct") => post_new_acct(url).map_into_boxed_body(),
        (&Method::POST, "/acme/new-order") => post_bad_nonce().map_into_boxed_body(),

        (&Method::GET, "/acme/cert/fae41c070f967713109028") => {
            get_certificate(url).map_into_boxed_body()
        }

        (_, _) => Response::build(StatusCode::NOT_FOUND)
            .finish()
            .map_into_boxed_body(),
    }
}

pub fn with_directory_server() -> TestServer {
    let lst = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = lst.local_addr().unwrap().port();

    let url = format!("http://127.0.0.1:{port}");
    let dir_url = format!("{url}/directory");

    let directory_hits = Arc::new(AtomicUsize::new(0));
    let nonces = Arc::new(AtomicUsize::new(0));

    let server = {
        let url = url.clone();
        let directory_hits = Arc::clone(&directory_hits);

        Server::build()
            .listen("acme", lst, move || {
                let url = url.clone();
                let directory_hits = Arc::clone(&directory_hits);
                let nonces = Arc::clone(&nonces);

                HttpService::build()
                    .finish(move |req| {
                        ready(Ok::<_, Infallible>(route_request(
                            req,
                            &url,
                            &directory_hits,
                            &nonces,
                        )))
                    })
                    .tcp()
            })
            .unwrap()
            .workers(1)
            .run()
    };

    let handle = server.handle();

    tokio::spawn(server);

    TestServer {
        url,
        dir_url,
        directory_hits,
        handle,
    }
}

/// In-memory [`HttpClient`] answering from a script and recording every request.
#[derive(Debug, Default)]
pub struct MockClient {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    pub fn push(&self, status: u16, headers: &[(&'static str, &str)], body: &str) -> &Self {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }

        self.responses.lock().push_back(HttpResponse {
            status: reqwest::StatusCode::from_u16(status).unwrap(),
            headers: map,
            body: body.as_bytes().to_vec(),
        });

        self
    }

    /// Scripts a directory document advertising all six endpoints under `https://example.test`.
    pub fn push_directory(&self, headers: &[(&'static str, &str)]) -> &Self {
        const BODY: &str = r#"{
            "newNonce": "https://example.test/acme/new-nonce",
            "newAccount": "https://example.test/acme/new-acct",
            "newOrder": "https://example.test/acme/new-order",
            "newAuthz": "https://example.test/acme/new-authz",
            "revokeCert": "https://example.test/acme/revoke-cert",
            "keyChange": "https://example.test/acme/key-change",
            "meta": { "termsOfService": "https://example.test/terms" }
        }"#;

        let mut all = vec![("content-type", "application/json")];
        all.extend_from_slice(headers);
        self.push(200, &all, BODY)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

impl HttpClient for MockClient {
    fn send_request(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse>> + Send {
        self.requests.lock().push(req);
        let res = self.responses.lock().pop_front();

        async move { res.ok_or_else(|| Error::Transport("no scripted response left".into())) }
    }
}

#[tokio::test]
pub async fn test_make_directory() {
    let server = with_directory_server();
    let res = reqwest::get(&server.dir_url).await.unwrap();
    assert!(res.status().is_success());
    assert_eq!(server.directory_hits(), 1);
}
