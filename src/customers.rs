//! Customers
//!
//! Checkout contact details, their field-level validation, and the saved copy
//! used to prefill the next checkout.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{CUSTOMER_INFO_KEY, Storage, read_json, write_json};

#[expect(clippy::expect_used, reason = "the pattern is a literal covered by tests")]
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("valid phone pattern"));

/// Contact details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Full name
    pub name: String,

    /// Delivery address
    pub address: String,

    /// Contact phone number
    pub phone: String,
}

impl CustomerInfo {
    /// Create customer details from their fields.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }

    /// Check every field, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::Required(CustomerField::Name));
        }

        if self.address.trim().is_empty() {
            errors.push(FieldError::Required(CustomerField::Address));
        }

        if self.phone.trim().is_empty() {
            errors.push(FieldError::Required(CustomerField::Phone));
        } else if !is_valid_phone(&self.phone) {
            errors.push(FieldError::InvalidPhone);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }
}

/// Whether `phone` is an optionally `+`-prefixed number of up to 16 digits,
/// ignoring spaces, dashes and parentheses.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '-' | '(' | ')')))
        .collect();

    PHONE_PATTERN.is_match(&compact)
}

/// A customer form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerField {
    /// `name`
    Name,

    /// `phone`
    Phone,

    /// `address`
    Address,
}

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "Name",
            Self::Phone => "Phone number",
            Self::Address => "Address",
        })
    }
}

/// A single field failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field is blank.
    #[error("{0} is required")]
    Required(CustomerField),

    /// The phone number is not in an accepted format.
    #[error("Please enter a valid phone number")]
    InvalidPhone,
}

impl FieldError {
    /// The field this failure belongs to.
    pub fn field(&self) -> CustomerField {
        match self {
            Self::Required(field) => *field,
            Self::InvalidPhone => CustomerField::Phone,
        }
    }
}

/// All field failures from one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid customer details: {}", summary(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Every failure, in form order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The failure for `field`, if that field failed.
    pub fn field(&self, field: CustomerField) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field() == field)
    }
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The saved customer details used to prefill checkout.
///
/// Failures are logged and read as "nothing saved".
#[derive(Debug)]
pub struct CustomerStore<S> {
    storage: S,
}

impl<S: Storage> CustomerStore<S> {
    /// Wrap `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Save `info` for the next checkout.
    pub fn save(&self, info: &CustomerInfo) {
        match write_json(&self.storage, CUSTOMER_INFO_KEY, info) {
            Ok(()) => debug!(key = CUSTOMER_INFO_KEY, "saved customer details"),
            Err(source) => {
                warn!(key = CUSTOMER_INFO_KEY, error = %source, "failed to save customer details");
            }
        }
    }

    /// The saved details, if any.
    pub fn load(&self) -> Option<CustomerInfo> {
        read_json(&self.storage, CUSTOMER_INFO_KEY).unwrap_or_else(|source| {
            warn!(key = CUSTOMER_INFO_KEY, error = %source, "failed to load customer details");

            None
        })
    }

    /// Forget the saved details.
    pub fn clear(&self) {
        if let Err(source) = self.storage.remove(CUSTOMER_INFO_KEY) {
            warn!(key = CUSTOMER_INFO_KEY, error = %source, "failed to clear customer details");
        }
    }

    /// Whether a non-empty value is saved.
    pub fn exists(&self) -> bool {
        match self.storage.get(CUSTOMER_INFO_KEY) {
            Ok(value) => value.is_some_and(|raw| !raw.is_empty()),
            Err(source) => {
                warn!(key = CUSTOMER_INFO_KEY, error = %source, "failed to check customer details");

                false
            }
        }
    }
}
