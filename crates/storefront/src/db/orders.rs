//! Order log implementations.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, instrument};

use super::{OrderLog, RepositoryError};
use crate::models::Order;

/// Order log stored as a JSON array in a single file.
///
/// Writes go to a temporary sibling file that is then renamed over the log,
/// so a crash mid-write leaves the previous log intact. Appends are
/// serialized by an internal lock held across the whole read-append-write.
#[derive(Debug)]
pub struct JsonFileOrderLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileOrderLog {
    /// Create a log backed by the file at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RepositoryError {
        RepositoryError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            RepositoryError::DataCorruption(format!("{}: {e}", self.path.display()))
        })
    }

    fn write_orders(&self, orders: &[Order]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_vec(orders)?;
        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&temp, &self.path).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), orders = orders.len(), "Wrote order log");
        Ok(())
    }
}

impl OrderLog for JsonFileOrderLog {
    fn load(&self) -> Result<Vec<Order>, RepositoryError> {
        self.read_orders()
    }

    fn store(&self, orders: &[Order]) -> Result<(), RepositoryError> {
        let _guard = self.lock.lock().map_err(|_| RepositoryError::LockPoisoned)?;
        self.write_orders(orders)
    }

    #[instrument(skip(self, order), fields(order_id = %order.id, path = %self.path.display()))]
    fn append(&self, order: &Order) -> Result<usize, RepositoryError> {
        let _guard = self.lock.lock().map_err(|_| RepositoryError::LockPoisoned)?;
        let mut orders = self.read_orders()?;
        orders.push(order.clone());
        self.write_orders(&orders)?;
        Ok(orders.len())
    }
}

/// Order log kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryOrderLog {
    orders: Mutex<Vec<Order>>,
}

impl MemoryOrderLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.lock().map_or(0, |orders| orders.len())
    }

    /// Returns true if no orders have been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderLog for MemoryOrderLog {
    fn load(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = self
            .orders
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(orders.clone())
    }

    fn store(&self, orders: &[Order]) -> Result<(), RepositoryError> {
        let mut current = self
            .orders
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *current = orders.to_vec();
        Ok(())
    }

    fn append(&self, order: &Order) -> Result<usize, RepositoryError> {
        let mut orders = self
            .orders
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        orders.push(order.clone());
        Ok(orders.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use shoe_store_core::{Email, OrderNumber, OrderStatus, Phone, Price, ProductId};

    use super::*;
    use crate::catalog::Catalog;
    use crate::models::{CustomerInfo, LineItem};

    fn temp_log_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("shoe-store-{}", uuid::Uuid::new_v4()))
            .join("shoeOrders.json")
    }

    fn order(quantity: u32) -> Order {
        let product = Catalog::builtin().get(ProductId::new(1)).unwrap();
        let now = Utc::now();
        Order {
            id: OrderNumber::generate(now),
            items: vec![LineItem {
                product: Arc::clone(&product),
                size: "9".to_string(),
                quantity,
            }],
            customer_info: CustomerInfo {
                full_name: "Jane Doe".to_string(),
                email: Email::parse("jane@example.com").unwrap(),
                phone: Phone::parse("5551234567").unwrap(),
                address: "1 Main St".to_string(),
            },
            total: product.price * quantity,
            order_date: now,
            status: OrderStatus::Confirmed,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let log = JsonFileOrderLog::new(temp_log_path());
        assert!(log.load().unwrap().is_empty());
    }

    #[test]
    fn test_blank_file_is_empty() {
        let path = temp_log_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "  \n").unwrap();

        let log = JsonFileOrderLog::new(&path);
        assert!(log.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let log = JsonFileOrderLog::new(temp_log_path());
        let first = order(1);
        let second = order(2);

        assert_eq!(log.append(&first).unwrap(), 1);
        assert_eq!(log.append(&second).unwrap(), 2);

        let orders = log.load().unwrap();
        assert_eq!(orders, vec![first, second]);
    }

    #[test]
    fn test_file_is_json_array() {
        let log = JsonFileOrderLog::new(temp_log_path());
        log.append(&order(3)).unwrap();

        let raw = fs::read_to_string(log.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["status"], "confirmed");
        assert_eq!(records[0]["total"].as_f64(), Some(387.0));
        assert!(records[0]["orderDate"].is_string());
        assert!(records[0]["customerInfo"]["phone"].is_string());
    }

    #[test]
    fn test_corrupt_log_is_not_overwritten() {
        let path = temp_log_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let log = JsonFileOrderLog::new(&path);
        assert!(matches!(
            log.append(&order(1)),
            Err(RepositoryError::DataCorruption(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[test]
    fn test_find() {
        let log = JsonFileOrderLog::new(temp_log_path());
        let placed = order(1);
        log.append(&placed).unwrap();

        assert_eq!(log.find(placed.id.as_str()).unwrap(), Some(placed));
        assert_eq!(log.find("ORD-0-00000000").unwrap(), None);
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let log = Arc::new(JsonFileOrderLog::new(temp_log_path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || log.append(&order(1)).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(log.load().unwrap().len(), 8);
    }

    #[test]
    fn test_memory_log() {
        let log = MemoryOrderLog::new();
        assert!(log.is_empty());

        log.append(&order(1)).unwrap();
        log.append(&order(2)).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.load().unwrap()[1].items[0].quantity, 2);

        log.store(&[]).unwrap();
        assert!(log.is_empty());
    }
}
