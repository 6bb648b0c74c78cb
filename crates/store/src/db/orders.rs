//! Order repository: transactional order materialization and lookup.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use orchard_core::{Email, OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId};

use super::RepositoryError;
use crate::checkout::OrderStore;
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem};

const ORDER_COLUMNS: &str = "id, user_id, first_name, last_name, email, address, postal_code, \
                             city, country, payment_method, notes, created_at, paid, status, \
                             total_amount";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    first_name: String,
    last_name: String,
    email: String,
    address: String,
    postal_code: String,
    city: String,
    country: String,
    payment_method: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    paid: bool,
    status: String,
    total_amount: Decimal,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in order {}: {e}", self.id))
        })?;
        let payment_method: PaymentMethod = self.payment_method.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", self.id))
        })?;
        let status: OrderStatus = self.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", self.id))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            first_name: self.first_name,
            last_name: self.last_name,
            email,
            address: self.address,
            postal_code: self.postal_code,
            city: self.city,
            country: self.country,
            payment_method,
            notes: self.notes,
            created_at: self.created_at,
            paid: self.paid,
            status,
            total_amount: self.total_amount,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    price: Decimal,
    quantity: i32,
}

impl OrderItemRow {
    fn into_item(self) -> Result<OrderItem, RepositoryError> {
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative quantity {} in order item {}",
                self.quantity, self.id
            ))
        })?;
        Ok(OrderItem {
            id: OrderItemId::new(self.id),
            order_id: OrderId::new(self.order_id),
            product_id: ProductId::new(self.product_id),
            price: self.price,
            quantity,
        })
    }
}

/// Repository for order persistence.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl OrderStore for OrderRepository<'_> {
    /// Create an order and all of its items in one transaction.
    ///
    /// A failure at any point, including a vanished product breaking the
    /// foreign key on an item, rolls the whole order back.
    #[instrument(skip(self, order, items), fields(user = %order.user_id, items = items.len()))]
    async fn create_with_items(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: OrderRow = sqlx::query_as(&format!(
            "INSERT INTO orders (user_id, first_name, last_name, email, address, postal_code, \
                                 city, country, payment_method, notes, total_amount) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order.user_id.as_i32())
        .bind(&order.first_name)
        .bind(&order.last_name)
        .bind(order.email.as_str())
        .bind(&order.address)
        .bind(&order.postal_code)
        .bind(&order.city)
        .bind(&order.country)
        .bind(order.payment_method.as_str())
        .bind(order.notes.as_deref())
        .bind(order.total_amount)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                "INSERT INTO order_item (order_id, product_id, price, quantity) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(row.id)
            .bind(item.product_id.as_i32())
            .bind(item.price)
            .bind(i64::from(item.quantity))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        row.into_order()
    }

    #[instrument(skip(self))]
    async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        row.map(OrderRow::into_order).transpose()
    }

    #[instrument(skip(self))]
    async fn items(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows: Vec<OrderItemRow> = sqlx::query_as(
            "SELECT id, order_id, product_id, price, quantity \
             FROM order_item WHERE order_id = $1 ORDER BY id",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderItemRow::into_item).collect()
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }
}
