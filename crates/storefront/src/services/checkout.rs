//! Checkout: customer form validation and order commit.
//!
//! # Flow
//!
//! ```text
//! Form ──submit (valid)──▶ Confirmation
//!  ▲  └─submit (invalid)─┘      │
//!  └──────────reset─────────────┘
//! ```
//!
//! [`CheckoutSession`] holds the per-visitor form, field errors and receipt.
//! [`CheckoutProcessor`] does the work that matters: it turns a valid form
//! and the current cart into an [`Order`], appends it to the order log and
//! only then clears the cart.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use shoe_store_core::{Email, EmailError, OrderNumber, OrderStatus, Phone, PhoneError};

use crate::db::{OrderLog, RepositoryError};
use crate::models::{CustomerInfo, Order};
use crate::services::cart::CartStore;

pub const FULL_NAME_REQUIRED: &str = "Full name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const PHONE_REQUIRED: &str = "Phone number is required";
pub const PHONE_INVALID: &str = "Please enter a valid phone number";
pub const ADDRESS_REQUIRED: &str = "Address is required";

/// A field of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutField {
    FullName,
    Email,
    Phone,
    Address,
}

impl CheckoutField {
    /// Every field, in form order.
    pub const ALL: [Self; 4] = [Self::FullName, Self::Email, Self::Phone, Self::Address];
}

/// Raw customer input as typed into the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl CheckoutForm {
    /// Current value of `field`.
    #[must_use]
    pub fn get(&self, field: CheckoutField) -> &str {
        match field {
            CheckoutField::FullName => &self.full_name,
            CheckoutField::Email => &self.email,
            CheckoutField::Phone => &self.phone,
            CheckoutField::Address => &self.address,
        }
    }

    /// Replace the value of `field`.
    pub fn set(&mut self, field: CheckoutField, value: impl Into<String>) {
        let slot = match field {
            CheckoutField::FullName => &mut self.full_name,
            CheckoutField::Email => &mut self.email,
            CheckoutField::Phone => &mut self.phone,
            CheckoutField::Address => &mut self.address,
        };
        *slot = value.into();
    }

    /// Check every field and build the customer record.
    ///
    /// All fields are checked on every call, so the returned errors cover
    /// every invalid field at once.
    ///
    /// # Errors
    ///
    /// Returns the per-field errors if any field is invalid.
    pub fn validate(&self) -> Result<CustomerInfo, CheckoutErrors> {
        let mut errors = CheckoutErrors::default();

        if self.full_name.trim().is_empty() {
            errors.full_name = Some(FULL_NAME_REQUIRED.to_string());
        }

        let email = Email::parse(&self.email)
            .map_err(|e| {
                let message = match e {
                    EmailError::Empty => EMAIL_REQUIRED,
                    _ => EMAIL_INVALID,
                };
                errors.email = Some(message.to_string());
            })
            .ok();

        let phone = Phone::parse(&self.phone)
            .map_err(|e| {
                let message = match e {
                    PhoneError::Empty => PHONE_REQUIRED,
                    _ => PHONE_INVALID,
                };
                errors.phone = Some(message.to_string());
            })
            .ok();

        if self.address.trim().is_empty() {
            errors.address = Some(ADDRESS_REQUIRED.to_string());
        }

        match (email, phone) {
            (Some(email), Some(phone)) if errors.is_empty() => Ok(CustomerInfo {
                full_name: self.full_name.clone(),
                email,
                phone,
                address: self.address.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// Per-field validation messages. A field without a message is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl CheckoutErrors {
    /// Message for `field`, if it is invalid.
    #[must_use]
    pub fn get(&self, field: CheckoutField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Forget the message for `field`.
    pub fn clear(&mut self, field: CheckoutField) {
        match field {
            CheckoutField::FullName => self.full_name = None,
            CheckoutField::Email => self.email = None,
            CheckoutField::Phone => self.phone = None,
            CheckoutField::Address => self.address = None,
        }
    }

    /// Number of invalid fields.
    #[must_use]
    pub fn len(&self) -> usize {
        CheckoutField::ALL
            .iter()
            .filter(|field| self.slot(**field).is_some())
            .count()
    }

    /// Returns true if no field is invalid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invalid fields with their messages, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (CheckoutField, &str)> {
        CheckoutField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|message| (field, message)))
    }

    const fn slot(&self, field: CheckoutField) -> &Option<String> {
        match field {
            CheckoutField::FullName => &self.full_name,
            CheckoutField::Email => &self.email,
            CheckoutField::Phone => &self.phone,
            CheckoutField::Address => &self.address,
        }
    }
}

/// Errors from placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more form fields are invalid. Nothing was committed.
    #[error("checkout form has {} invalid field(s)", .0.len())]
    Validation(CheckoutErrors),

    /// The cart has no items. Nothing was committed.
    #[error("cannot place an order with an empty cart")]
    EmptyCart,

    /// The order could not be written to the order log. The cart is unchanged.
    #[error("failed to record order: {0}")]
    Persistence(#[from] RepositoryError),

    /// This checkout already produced an order; reset it before ordering again.
    #[error("order already placed for this checkout")]
    AlreadyConfirmed,
}

/// Commits carts to an order log.
#[derive(Debug, Clone)]
pub struct CheckoutProcessor<L> {
    log: L,
}

impl<L: OrderLog> CheckoutProcessor<L> {
    /// Create a processor writing to `log`.
    pub const fn new(log: L) -> Self {
        Self { log }
    }

    /// The order log this processor writes to.
    pub const fn log(&self) -> &L {
        &self.log
    }

    /// Validate `form` and commit the cart as a confirmed order.
    ///
    /// # Errors
    ///
    /// See [`CheckoutProcessor::commit`]; additionally returns
    /// [`CheckoutError::Validation`] if the form is invalid.
    pub fn place_order(
        &self,
        cart: &mut CartStore,
        form: &CheckoutForm,
    ) -> Result<Order, CheckoutError> {
        let customer = form.validate().map_err(CheckoutError::Validation)?;
        self.commit(cart, customer)
    }

    /// Snapshot the cart into a confirmed order, append it to the log and
    /// clear the cart.
    ///
    /// The cart is cleared only after the log write succeeds.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] if the cart has no items
    /// - [`CheckoutError::Persistence`] if the order log cannot be updated
    #[instrument(skip(self, cart, customer), fields(items = cart.len()))]
    pub fn commit(
        &self,
        cart: &mut CartStore,
        customer: CustomerInfo,
    ) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order_date = Utc::now();
        let order = Order {
            id: OrderNumber::generate(order_date),
            items: cart.items().to_vec(),
            customer_info: customer,
            total: cart.total_price(),
            order_date,
            status: OrderStatus::Confirmed,
        };

        let logged = self.log.append(&order).map_err(|e| {
            warn!(order_id = %order.id, error = %e, "Failed to record order");
            e
        })?;
        cart.clear();

        info!(
            order_id = %order.id,
            total = %order.total,
            quantity = order.total_items(),
            orders_in_log = logged,
            "Order placed"
        );

        Ok(order)
    }
}

/// Where a visitor is in the checkout flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum CheckoutStep {
    /// Collecting customer details.
    #[default]
    Form,
    /// Order placed; `order` is the receipt.
    Confirmation { order: Order },
}

/// One visitor's checkout: form input, field errors and, once placed, the receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    #[serde(flatten)]
    step: CheckoutStep,
    form: CheckoutForm,
    errors: CheckoutErrors,
}

impl CheckoutSession {
    /// Start a checkout with an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn step(&self) -> &CheckoutStep {
        &self.step
    }

    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    #[must_use]
    pub const fn errors(&self) -> &CheckoutErrors {
        &self.errors
    }

    /// The placed order, once the checkout is confirmed.
    #[must_use]
    pub const fn receipt(&self) -> Option<&Order> {
        match &self.step {
            CheckoutStep::Form => None,
            CheckoutStep::Confirmation { order } => Some(order),
        }
    }

    /// Returns true once an order has been placed.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self.step, CheckoutStep::Confirmation { .. })
    }

    /// Edit one field. Its error, if any, is cleared; other errors stay.
    pub fn update_field(&mut self, field: CheckoutField, value: impl Into<String>) {
        self.form.set(field, value);
        self.errors.clear(field);
    }

    /// Replace the whole form, keeping errors only for fields whose value
    /// did not change.
    pub fn update_form(&mut self, form: CheckoutForm) {
        for field in CheckoutField::ALL {
            if form.get(field) != self.form.get(field) {
                self.errors.clear(field);
            }
        }
        self.form = form;
    }

    /// Submit the form and, if valid, place the order.
    ///
    /// On success the session moves to [`CheckoutStep::Confirmation`]. On any
    /// failure it stays in [`CheckoutStep::Form`]; validation failures are
    /// also recorded in [`CheckoutSession::errors`].
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::AlreadyConfirmed`] if an order was already placed
    /// - anything [`CheckoutProcessor::place_order`] returns
    pub fn submit<L: OrderLog>(
        &mut self,
        processor: &CheckoutProcessor<L>,
        cart: &mut CartStore,
    ) -> Result<&Order, CheckoutError> {
        if self.is_confirmed() {
            return Err(CheckoutError::AlreadyConfirmed);
        }

        match processor.place_order(cart, &self.form) {
            Ok(order) => {
                self.errors = CheckoutErrors::default();
                self.step = CheckoutStep::Confirmation { order };
                self.receipt().ok_or(CheckoutError::AlreadyConfirmed)
            }
            Err(CheckoutError::Validation(errors)) => {
                self.errors = errors.clone();
                Err(CheckoutError::Validation(errors))
            }
            Err(e) => {
                self.errors = CheckoutErrors::default();
                Err(e)
            }
        }
    }

    /// Return to an empty form with no errors and no receipt.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
