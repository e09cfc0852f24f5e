//! CLI subcommands.
//!
//! Commands write their output to the `Write` they are given so tests can
//! capture it.

pub mod catalog;
pub mod orders;

use shoe_store_storefront::db::RepositoryError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The order log could not be read.
    #[error("Order log error: {0}")]
    Repository(#[from] RepositoryError),

    /// No order with this identifier exists in the log.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Encoding output failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
