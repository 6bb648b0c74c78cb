//! Error taxonomy for the storefront core.
//!
//! Every failure crossing the library boundary is one of the variants below;
//! raw persistence errors never escape unwrapped. The enclosing request
//! layer maps these onto user-visible responses (`NotFound` to a 404 page,
//! `Validation` to per-field form redisplay, and so on).

use core::fmt;

use thiserror::Error;

use orchard_core::ProductId;

use crate::db::RepositoryError;

/// Storefront error taxonomy.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced product or order does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Order placement was attempted with zero items in the cart.
    ///
    /// Recoverable: the caller redirects back with a message, nothing was
    /// written.
    #[error("cart is empty")]
    EmptyCart,

    /// Shipping details failed field-level validation. No state was mutated.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The order materialization transaction failed and was rolled back.
    ///
    /// The cart is left untouched so the user can retry.
    #[error("order creation failed: {0}")]
    OrderCreation(#[source] OrderCreationError),

    /// Persistence failure outside the order transaction.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),
}

/// Why order materialization rolled back.
#[derive(Debug, Error)]
pub enum OrderCreationError {
    /// A product referenced by a cart line was deleted concurrently.
    #[error("product {0} no longer exists")]
    ProductVanished(ProductId),

    /// The underlying order/items transaction failed.
    #[error(transparent)]
    Repository(RepositoryError),
}

/// One failed field of a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name, e.g. `"email"`.
    pub field: &'static str,
    pub message: String,
}

/// Per-field validation failures, in form field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The messages recorded for a given field.
    pub fn for_field(&self, field: &str) -> impl Iterator<Item = &str> {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl Default for ValidationErrors {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Result type alias for [`StoreError`].
pub type Result<T> = core::result::Result<T, StoreError>;
