//! Order persistence for the storefront.
//!
//! # Order log
//!
//! Committed orders live in a single append-only log: a JSON array of
//! [`Order`] records. The log is read and written whole; appending means
//! read, push, write back. Nothing in the storefront edits or deletes an
//! order once it is written.
//!
//! - [`orders::JsonFileOrderLog`] - durable log in a JSON file
//! - [`orders::MemoryOrderLog`] - in-process log for tests and tooling

pub mod orders;

use std::path::PathBuf;

use thiserror::Error;

use crate::models::Order;

pub use orders::{JsonFileOrderLog, MemoryOrderLog};

/// Errors from order log operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading or writing the backing file failed.
    #[error("order log I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored log could not be parsed or the orders could not be encoded.
    #[error("order log serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The log's lock was poisoned by a panic during a previous write.
    #[error("order log lock poisoned")]
    LockPoisoned,

    /// The stored data is not a valid order log.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Durable, ordered store of committed orders.
///
/// Implementations must make [`OrderLog::append`] atomic with respect to
/// other appends on the same log.
pub trait OrderLog: Send + Sync {
    /// Read every order in commit order. A log that does not exist yet is empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the log cannot be read or parsed.
    fn load(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Replace the whole log with `orders`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the log cannot be written.
    fn store(&self, orders: &[Order]) -> Result<(), RepositoryError>;

    /// Append one order and return the new number of orders in the log.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the log cannot be read or written.
    fn append(&self, order: &Order) -> Result<usize, RepositoryError> {
        let mut orders = self.load()?;
        orders.push(order.clone());
        self.store(&orders)?;
        Ok(orders.len())
    }

    /// Find an order by its identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the log cannot be read.
    fn find(&self, id: &str) -> Result<Option<Order>, RepositoryError> {
        Ok(self
            .load()?
            .into_iter()
            .find(|order| order.id.as_str() == id))
    }
}

impl<T: OrderLog + ?Sized> OrderLog for &T {
    fn load(&self) -> Result<Vec<Order>, RepositoryError> {
        (**self).load()
    }

    fn store(&self, orders: &[Order]) -> Result<(), RepositoryError> {
        (**self).store(orders)
    }

    fn append(&self, order: &Order) -> Result<usize, RepositoryError> {
        (**self).append(order)
    }

    fn find(&self, id: &str) -> Result<Option<Order>, RepositoryError> {
        (**self).find(id)
    }
}

impl<T: OrderLog + ?Sized> OrderLog for std::sync::Arc<T> {
    fn load(&self) -> Result<Vec<Order>, RepositoryError> {
        (**self).load()
    }

    fn store(&self, orders: &[Order]) -> Result<(), RepositoryError> {
        (**self).store(orders)
    }

    fn append(&self, order: &Order) -> Result<usize, RepositoryError> {
        (**self).append(order)
    }

    fn find(&self, id: &str) -> Result<Option<Order>, RepositoryError> {
        (**self).find(id)
    }
}
