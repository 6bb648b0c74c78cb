//! Order models.
//!
//! An [`Order`] is created exactly once from a non-empty cart, together with
//! its [`OrderItem`] rows, inside a single transaction. Items are immutable
//! after creation; the order itself is mutated only by fulfillment status
//! transitions, which live outside this crate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orchard_core::{Email, OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId};

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid: bool,
    pub status: OrderStatus,
    /// Stored total. Checkout persists this as written in [`NewOrder`],
    /// which defaults to zero; see [`items_total`] for the computed sum.
    pub total_amount: Decimal,
}

/// One line of a persisted order.
///
/// `price` is the unit price captured from the cart at checkout, independent
/// of later product price changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderItem {
    /// Cost of this line: `price * quantity`.
    #[must_use]
    pub fn cost(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Sum of line costs for a set of order items.
#[must_use]
pub fn items_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::cost).sum()
}

/// Data for creating an order row.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    /// Persisted as-is. Checkout leaves this at zero rather than summing
    /// the items, matching the historical behavior of the order flow.
    pub total_amount: Decimal,
}

/// Data for creating one order item row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub price: Decimal,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: &str, quantity: u32) -> OrderItem {
        OrderItem {
            id: OrderItemId::new(1),
            order_id: OrderId::new(1),
            product_id: ProductId::new(1),
            price: price.parse().unwrap(),
            quantity,
        }
    }

    #[test]
    fn item_cost_is_price_times_quantity() {
        assert_eq!(item("19.99", 3).cost(), "59.97".parse::<Decimal>().unwrap());
    }

    #[test]
    fn items_total_sums_line_costs_exactly() {
        let items = [item("10.00", 2), item("5.00", 1)];
        assert_eq!(items_total(&items), "25.00".parse::<Decimal>().unwrap());
    }
}
