//! Finanças is a backend for tracking personal income and expenses.
//!
//! This library provides a JSON REST API for logging in, recording
//! transactions, organising them into categories, and exporting monthly
//! summaries and CSV reports. All data lives in a single SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod category;
mod db;
mod endpoints;
mod error;
mod log_in;
mod logging;
mod password;
mod report;
mod routing;
mod schema;
mod timezone;
mod transaction;
pub mod user;

pub use app_state::AppState;
pub use db::{DbPool, create_pool};
pub use error::Error;
pub use logging::logging_middleware;
pub use password::PasswordDigest;
pub use routing::build_router;
pub use schema::migrate as initialize_db;
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
