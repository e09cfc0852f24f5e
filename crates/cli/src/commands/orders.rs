//! Order log inspection.

use std::io::Write;

use shoe_store_storefront::db::OrderLog;
use shoe_store_storefront::models::Order;

use super::CliError;

/// Write one summary line per order, oldest first.
pub fn list(out: &mut impl Write, log: &impl OrderLog) -> Result<(), CliError> {
    let orders = log.load()?;
    tracing::debug!(count = orders.len(), "Loaded order log");

    for order in &orders {
        writeln!(out, "{}", summarize(order))?;
    }
    writeln!(out, "{} order(s)", orders.len())?;

    Ok(())
}

/// Write the order with identifier `id` as pretty-printed JSON.
///
/// # Errors
///
/// Returns `CliError::OrderNotFound` if the log has no such order.
pub fn show(out: &mut impl Write, log: &impl OrderLog, id: &str) -> Result<(), CliError> {
    let order = log
        .find(id)?
        .ok_or_else(|| CliError::OrderNotFound(id.to_owned()))?;

    serde_json::to_writer_pretty(&mut *out, &order)?;
    writeln!(out)?;

    Ok(())
}

fn summarize(order: &Order) -> String {
    format!(
        "{}  {}  {:<9}  {:>3} item(s)  ${:>8}  {}",
        order.id,
        order.order_date.format("%Y-%m-%d %H:%M"),
        order.status.as_str(),
        order.total_items(),
        order.total.to_string(),
        order.customer_info.email
    )
}
