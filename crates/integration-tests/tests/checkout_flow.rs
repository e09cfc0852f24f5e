//! End-to-end checkout against a file-backed order log.
//!
//! Exercises the cart and checkout services the way the storefront wires
//! them, without going through HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::fs;
use std::sync::Arc;

use shoe_store_core::{OrderStatus, Price, ProductId};
use shoe_store_integration_tests::temp_log_path;
use shoe_store_storefront::catalog::Catalog;
use shoe_store_storefront::db::{JsonFileOrderLog, OrderLog, RepositoryError};
use shoe_store_storefront::services::{
    CartStore, CheckoutError, CheckoutField, CheckoutForm, CheckoutProcessor, CheckoutSession,
};

fn valid_form() -> CheckoutForm {
    CheckoutForm {
        full_name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: "555-123-4567".to_string(),
        address: "1 Main St, Springfield".to_string(),
    }
}

fn processor() -> CheckoutProcessor<Arc<JsonFileOrderLog>> {
    CheckoutProcessor::new(Arc::new(JsonFileOrderLog::new(temp_log_path())))
}

#[test]
fn test_runner_scenario() {
    let catalog = Catalog::builtin();
    let runner = catalog.get(ProductId::new(1)).unwrap();
    let mut cart = CartStore::new();

    cart.add_item(Arc::clone(&runner), "9", 1).unwrap();
    cart.add_item(Arc::clone(&runner), "9", 2).unwrap();

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.items()[0].quantity, 3);
    assert_eq!(cart.total_price(), Price::from_whole(387));

    cart.update_quantity(runner.id, "9", 0);
    assert!(cart.is_empty());
    assert_eq!(cart.total_price(), Price::ZERO);
}

#[test]
fn test_successful_checkout_appends_one_order_and_clears_cart() {
    let catalog = Catalog::builtin();
    let processor = processor();
    let mut cart = CartStore::new();
    cart.add_item(catalog.get(ProductId::new(2)).unwrap(), "10", 2)
        .unwrap();
    cart.add_item(catalog.get(ProductId::new(5)).unwrap(), "8", 3)
        .unwrap();
    let expected_total = cart.total_price();
    assert_eq!(cart.total_items(), 5);

    let mut checkout = CheckoutSession::new();
    checkout.update_form(valid_form());
    let order = checkout.submit(&processor, &mut cart).unwrap().clone();

    assert!(cart.is_empty());
    assert!(checkout.errors().is_empty());
    assert_eq!(order.total, expected_total);
    assert_eq!(order.status, OrderStatus::Confirmed);

    let logged = processor.log().load().unwrap();
    assert_eq!(logged, vec![order]);
}

#[test]
fn test_invalid_form_commits_nothing() {
    let catalog = Catalog::builtin();
    let processor = processor();
    let mut cart = CartStore::new();
    cart.add_item(catalog.get(ProductId::new(1)).unwrap(), "9", 1)
        .unwrap();
    let before = cart.clone();

    let mut checkout = CheckoutSession::new();
    let result = checkout.submit(&processor, &mut cart);

    assert!(matches!(result, Err(CheckoutError::Validation(ref e)) if e.len() == 4));
    assert_eq!(cart, before);
    assert!(!checkout.is_confirmed());
    assert!(!processor.log().path().exists());
}

#[test]
fn test_fixing_a_field_clears_only_its_error() {
    let processor = processor();
    let mut cart = CartStore::new();
    let mut checkout = CheckoutSession::new();

    let mut form = valid_form();
    form.email = "bademail".to_string();
    form.phone = "12".to_string();
    checkout.update_form(form);
    assert!(checkout.submit(&processor, &mut cart).is_err());
    assert_eq!(checkout.errors().len(), 2);

    checkout.update_field(CheckoutField::Email, "jane@example.com");
    assert_eq!(checkout.errors().len(), 1);
    assert!(checkout.errors().get(CheckoutField::Email).is_none());
    assert!(checkout.errors().get(CheckoutField::Phone).is_some());
}

#[test]
fn test_orders_accumulate_in_commit_order_with_distinct_ids() {
    let catalog = Catalog::builtin();
    let processor = processor();
    let customer = valid_form().validate().unwrap();

    let mut ids = Vec::new();
    for id in 1..=6 {
        let mut cart = CartStore::new();
        cart.add_item(catalog.get(ProductId::new(id)).unwrap(), "11", 1)
            .unwrap();
        ids.push(processor.commit(&mut cart, customer.clone()).unwrap().id);
    }

    let logged: Vec<_> = processor
        .log()
        .load()
        .unwrap()
        .into_iter()
        .map(|order| order.id)
        .collect();
    assert_eq!(logged, ids);

    let mut unique = ids.clone();
    unique.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn test_order_is_a_snapshot_of_the_cart() {
    let catalog = Catalog::builtin();
    let processor = processor();
    let mut cart = CartStore::new();
    let trek = catalog.get(ProductId::new(5)).unwrap();
    cart.add_item(Arc::clone(&trek), "12", 1).unwrap();

    let order = processor
        .commit(&mut cart, valid_form().validate().unwrap())
        .unwrap();

    // Shopping continues in the same cart after checkout
    cart.add_item(Arc::clone(&trek), "12", 4).unwrap();

    let logged = processor.log().find(order.id.as_str()).unwrap().unwrap();
    assert_eq!(logged.items[0].quantity, 1);
    assert_eq!(logged.total, trek.price);
}

#[test]
fn test_orders_survive_reopening_the_log() {
    let path = temp_log_path();
    let catalog = Catalog::builtin();
    let customer = valid_form().validate().unwrap();

    let placed = {
        let processor = CheckoutProcessor::new(JsonFileOrderLog::new(&path));
        let mut cart = CartStore::new();
        cart.add_item(catalog.get(ProductId::new(4)).unwrap(), "7", 1)
            .unwrap();
        processor.commit(&mut cart, customer).unwrap()
    };

    let reopened = JsonFileOrderLog::new(&path);
    assert_eq!(reopened.load().unwrap(), vec![placed]);
}

#[test]
fn test_log_file_format() {
    let catalog = Catalog::builtin();
    let processor = processor();
    let mut cart = CartStore::new();
    cart.add_item(catalog.get(ProductId::new(1)).unwrap(), "9", 3)
        .unwrap();
    processor
        .commit(&mut cart, valid_form().validate().unwrap())
        .unwrap();

    let raw = fs::read_to_string(processor.log().path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &json.as_array().unwrap()[0];

    assert!(record["id"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(record["total"].as_f64(), Some(387.0));
    assert_eq!(record["status"], "confirmed");
    assert_eq!(record["items"][0]["size"], "9");
    assert_eq!(record["items"][0]["product"]["name"], "Classic Runner");
    assert_eq!(record["customerInfo"]["email"], "jane@example.com");
    assert!(record["orderDate"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_corrupt_log_fails_checkout_and_keeps_cart() {
    let path = temp_log_path();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "[{\"id\": ").unwrap();

    let catalog = Catalog::builtin();
    let processor = CheckoutProcessor::new(JsonFileOrderLog::new(&path));
    let mut cart = CartStore::new();
    cart.add_item(catalog.get(ProductId::new(6)).unwrap(), "10", 2)
        .unwrap();
    let before = cart.clone();

    let mut checkout = CheckoutSession::new();
    checkout.update_form(valid_form());
    let result = checkout.submit(&processor, &mut cart);

    assert!(matches!(
        result,
        Err(CheckoutError::Persistence(RepositoryError::DataCorruption(_)))
    ));
    assert_eq!(cart, before);
    assert!(!checkout.is_confirmed());
    assert_eq!(fs::read_to_string(&path).unwrap(), "[{\"id\": ");
}
