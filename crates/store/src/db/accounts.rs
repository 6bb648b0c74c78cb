//! Account repository: addresses and wishlist entries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use orchard_core::{AddressId, ProductId, UserId};

use super::RepositoryError;
use crate::accounts::AccountStore;
use crate::models::{Address, NewAddress, WishlistEntry};

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: i32,
    user_id: i32,
    street: String,
    city: String,
    postal_code: String,
    country: String,
    is_default: bool,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId::new(row.id),
            user_id: UserId::new(row.user_id),
            street: row.street,
            city: row.city,
            postal_code: row.postal_code,
            country: row.country,
            is_default: row.is_default,
        }
    }
}

#[derive(sqlx::FromRow)]
struct WishlistRow {
    user_id: i32,
    product_id: i32,
    added_at: DateTime<Utc>,
}

/// Repository for user addresses and wishlists.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl AccountStore for AccountRepository<'_> {
    #[instrument(skip(self))]
    async fn list_addresses(&self, user: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows: Vec<AddressRow> = sqlx::query_as(
            "SELECT id, user_id, street, city, postal_code, country, is_default \
             FROM address WHERE user_id = $1 ORDER BY is_default DESC, id",
        )
        .bind(user.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Address::from).collect())
    }

    #[instrument(skip(self, address))]
    async fn add_address(
        &self,
        user: UserId,
        address: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if address.is_default {
            sqlx::query("UPDATE address SET is_default = FALSE WHERE user_id = $1 AND is_default")
                .bind(user.as_i32())
                .execute(&mut *tx)
                .await?;
        }

        let row: AddressRow = sqlx::query_as(
            "INSERT INTO address (user_id, street, city, postal_code, country, is_default) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, user_id, street, city, postal_code, country, is_default",
        )
        .bind(user.as_i32())
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.postal_code)
        .bind(&address.country)
        .bind(address.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn default_address(&self, user: UserId) -> Result<Option<Address>, RepositoryError> {
        let row: Option<AddressRow> = sqlx::query_as(
            "SELECT id, user_id, street, city, postal_code, country, is_default \
             FROM address WHERE user_id = $1 AND is_default",
        )
        .bind(user.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Address::from))
    }

    /// Unset the prior default and set the new one in a single transaction,
    /// so at most one default is ever visible.
    #[instrument(skip(self))]
    async fn set_default_address(
        &self,
        user: UserId,
        address: AddressId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE address SET is_default = FALSE WHERE user_id = $1 AND is_default")
            .bind(user.as_i32())
            .execute(&mut *tx)
            .await?;

        let updated =
            sqlx::query("UPDATE address SET is_default = TRUE WHERE id = $1 AND user_id = $2")
                .bind(address.as_i32())
                .bind(user.as_i32())
                .execute(&mut *tx)
                .await?;

        if updated.rows_affected() == 0 {
            // Address missing or owned by someone else; nothing is changed.
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_wishlist(&self, user: UserId, product: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO wishlist (user_id, product_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, product_id) DO NOTHING",
        )
        .bind(user.as_i32())
        .bind(product.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn remove_wishlist(
        &self,
        user: UserId,
        product: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM wishlist WHERE user_id = $1 AND product_id = $2")
            .bind(user.as_i32())
            .bind(product.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_wishlist(&self, user: UserId) -> Result<Vec<WishlistEntry>, RepositoryError> {
        let rows: Vec<WishlistRow> = sqlx::query_as(
            "SELECT user_id, product_id, added_at \
             FROM wishlist WHERE user_id = $1 ORDER BY added_at DESC",
        )
        .bind(user.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| WishlistEntry {
                user_id: UserId::new(r.user_id),
                product_id: ProductId::new(r.product_id),
                added_at: r.added_at,
            })
            .collect())
    }
}
