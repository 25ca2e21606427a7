use std::time::Duration;

use acme_session::{DirectoryUrl, ResourceKind, Session};

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Use `DirectoryUrl::LetsEncrypt` for production uses.
    let session = Session::builder(DirectoryUrl::LetsEncryptStaging)
        .timeout(Duration::from_secs(30))
        .build()?;

    log::info!("fetching directory from {}", session.directory_url());

    for kind in ResourceKind::ALL {
        match session.resource_endpoint(kind).await {
            Ok(url) => log::info!("{kind}: {url}"),

            Err(err) => {
                let report = error_reporter::Report::new(&err);
                log::warn!("{report}");
            }
        }
    }

    if let Some(tos) = session.terms_of_service().await? {
        log::info!("terms of service: {tos}");
    }

    // the directory response usually primes the first nonce
    let first = session.consume_nonce().await?;
    let second = session.consume_nonce().await?;
    log::info!("nonces: {first}, {second}");

    Ok(())
}
