//! Checkout: shipping validation and order materialization.
//!
//! [`place_order`] converts a non-empty cart into a persisted order plus
//! line items, in one transaction, then clears the cart. Any failure inside
//! the transaction rolls back fully and leaves the cart untouched so the
//! user can retry.

use rust_decimal::Decimal;
use tracing::instrument;

use orchard_core::{Email, OrderId, PaymentMethod, UserId};

use crate::cart::Cart;
use crate::catalog::CatalogStore;
use crate::db::RepositoryError;
use crate::error::{OrderCreationError, StoreError, ValidationErrors};
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem};

/// Order persistence interface.
///
/// [`crate::db::orders::OrderRepository`] is the `PostgreSQL`
/// implementation; tests use an in-memory one with fault injection.
pub trait OrderStore {
    /// Create an order and all of its items atomically.
    ///
    /// Implementations must guarantee that a failure partway never leaves a
    /// partial order visible.
    fn create_with_items(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
    ) -> impl Future<Output = Result<Order, RepositoryError>> + Send;

    /// Point lookup by order identity.
    fn get(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<Order>, RepositoryError>> + Send;

    /// Items of one order, in creation order.
    fn items(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Vec<OrderItem>, RepositoryError>> + Send;

    /// A user's order history, newest first.
    fn list_for_user(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<Order>, RepositoryError>> + Send;
}

/// Raw shipping details as submitted by the checkout form.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ShippingForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub payment_method: String,
    pub notes: String,
}

/// Validated shipping details.
#[derive(Debug, Clone)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

const REQUIRED_MESSAGE: &str = "this field is required";

impl ShippingForm {
    /// Validate field-by-field into [`ShippingDetails`].
    ///
    /// # Errors
    ///
    /// Returns every failed field at once: required fields must be
    /// non-empty after trimming, the email must parse, and the payment
    /// method must be one of the enumerated set.
    pub fn validate(&self) -> Result<ShippingDetails, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let required = |errors: &mut ValidationErrors, field, value: &str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                errors.push(field, REQUIRED_MESSAGE);
            }
            trimmed.to_owned()
        };

        let first_name = required(&mut errors, "first_name", &self.first_name);
        let last_name = required(&mut errors, "last_name", &self.last_name);
        let address = required(&mut errors, "address", &self.address);
        let postal_code = required(&mut errors, "postal_code", &self.postal_code);
        let city = required(&mut errors, "city", &self.city);
        let country = required(&mut errors, "country", &self.country);

        let email = match Email::parse(self.email.trim()) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.push("email", e.to_string());
                None
            }
        };

        let payment_method = match self.payment_method.parse::<PaymentMethod>() {
            Ok(method) => Some(method),
            Err(_) => {
                errors.push("payment_method", "select a valid payment method");
                None
            }
        };

        let notes = self.notes.trim();
        match (email, payment_method) {
            (Some(email), Some(payment_method)) if errors.is_empty() => Ok(ShippingDetails {
                first_name,
                last_name,
                email,
                address,
                postal_code,
                city,
                country,
                payment_method,
                notes: (!notes.is_empty()).then(|| notes.to_owned()),
            }),
            _ => Err(errors),
        }
    }
}

/// Materialize `cart` into a persisted order for `user`.
///
/// Every cart line is resolved strictly against the live catalog; one order
/// item is created per line with the cart-snapshot (add-time, base-currency)
/// unit price and the stored quantity. The order's `total_amount` is not
/// recomputed from the items here; it persists as zero. No stock decrement
/// is performed.
///
/// On success the cart is cleared. On any failure the cart is untouched.
///
/// # Errors
///
/// - [`StoreError::EmptyCart`] when the cart has zero items; nothing is
///   written.
/// - [`StoreError::Validation`] when the shipping form fails field checks.
/// - [`StoreError::OrderCreation`] when a referenced product has vanished
///   or the transaction fails; the whole operation rolls back.
/// - [`StoreError::Database`] for catalog lookup failures.
#[instrument(skip(catalog, orders, cart, form), fields(user = %user, items = cart.item_count()))]
pub async fn place_order<C, O>(
    catalog: &C,
    orders: &O,
    cart: &mut Cart,
    form: &ShippingForm,
    user: UserId,
) -> Result<Order, StoreError>
where
    C: CatalogStore,
    O: OrderStore,
{
    if cart.item_count() == 0 {
        return Err(StoreError::EmptyCart);
    }

    let details = form.validate()?;

    let mut items = Vec::with_capacity(cart.lines().len());
    for line in cart.lines() {
        let product = catalog
            .get_product(line.product_id)
            .await?
            .ok_or(StoreError::OrderCreation(
                OrderCreationError::ProductVanished(line.product_id),
            ))?;
        debug_assert_eq!(product.id, line.product_id);

        items.push(NewOrderItem {
            product_id: line.product_id,
            price: line.unit_price,
            quantity: line.quantity,
        });
    }

    let new_order = NewOrder {
        user_id: user,
        first_name: details.first_name,
        last_name: details.last_name,
        email: details.email,
        address: details.address,
        postal_code: details.postal_code,
        city: details.city,
        country: details.country,
        payment_method: details.payment_method,
        notes: details.notes,
        total_amount: Decimal::ZERO,
    };

    let order = orders
        .create_with_items(&new_order, &items)
        .await
        .map_err(|e| StoreError::OrderCreation(OrderCreationError::Repository(e)))?;

    tracing::info!(order = %order.id, "order placed");
    cart.clear();
    Ok(order)
}
