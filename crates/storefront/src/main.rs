//! Shoe Store storefront - catalog, cart and checkout over HTTP.
//!
//! Serves the JSON storefront API on port 3000 by default. Carts and
//! checkout progress live in in-memory sessions; placed orders are appended
//! to the order log file (`STOREFRONT_ORDER_LOG_PATH`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::borrow::Cow;

use axum::{ServiceExt, extract::Request};
use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use shoe_store_storefront::{app, config::StorefrontConfig, state::AppState};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "shoe_store_storefront=info,tower_http=debug";

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Sentry must be up before the subscriber so its layer has a client
    let _sentry_guard = config.sentry_dsn.as_deref().map(|dsn| init_sentry(dsn, &config));
    init_tracing();

    if let Some(environment) = &config.sentry_environment {
        tracing::info!(environment, "Sentry initialized");
    }
    tracing::info!(
        order_log = %config.order_log_path.display(),
        secure_cookies = config.is_secure(),
        "Starting storefront"
    );

    let addr = config.socket_addr();
    // `/cart/` and `/cart` reach the same handler
    let service = NormalizePathLayer::trim_trailing_slash().layer(app(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!("storefront listening on {addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Start the Sentry client. The returned guard flushes events on drop.
fn init_sentry(dsn: &str, config: &StorefrontConfig) -> sentry::ClientInitGuard {
    sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config.sentry_environment.clone().map(Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ))
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// Errors become Sentry events; warnings and info become breadcrumbs.
///
/// Failed order writes are already reported through `AppError`, so the
/// warning logged alongside them stays a breadcrumb.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> EventFilter {
    match *metadata.level() {
        Level::ERROR => EventFilter::Event,
        Level::WARN | Level::INFO => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    }
}

/// Resolve on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.expect("Failed to install Ctrl+C handler"),
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");

    tracing::info!("Shutdown signal received, draining connections");
}
