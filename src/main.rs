mod errors;
mod payment_request;
mod server;
mod settings;
#[cfg(test)]
mod test_support;
mod yookassa;

use crate::server::PaymentGatewayService;
use anyhow::{Context, Result};
use axum_server::tls_rustls::RustlsConfig;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Configuration is read once; anything missing stops us before binding.
    let cfg = match settings::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Error: cannot read config. Reason: {}", e);
            return Err(e.into());
        }
    };

    let addr = cfg.bind_addr()?;
    let svc = PaymentGatewayService::try_new(&cfg).context("building YooKassa client")?;
    let app = server::router(Arc::new(svc));

    tracing::info!(locale = %cfg.yookassa.locale, "YooKassa gateway started");

    match cfg.tls_paths() {
        Some((cert, key)) => {
            // reqwest and axum-server may both pull rustls providers in; pin one.
            let _ = rustls::crypto::ring::default_provider().install_default();
            let tls = RustlsConfig::from_pem_file(cert, key)
                .await
                .with_context(|| format!("loading TLS material from {cert} and {key}"))?;
            tracing::info!(addr = %addr, cert = %cert, key = %key, "Starting TLS-enabled HTTP server");
            axum_server::bind_rustls(addr, tls)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            tracing::info!(addr = %addr, "Starting plaintext HTTP server");
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
