//! Product repository: the `PostgreSQL` catalog store.
//!
//! Queries use the runtime `query_as` API with explicit row structs; rows
//! that violate the catalog invariants (negative stock or price) are
//! rejected as data corruption rather than silently passed through.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use orchard_core::{CategoryId, ProductId, SubCategoryId};

use super::RepositoryError;
use crate::catalog::{CatalogStore, MAX_SUGGESTIONS, Page, SearchQuery, SortOrder};
use crate::models::{Category, Product, SubCategory};

const PRODUCT_COLUMNS: &str = "id, name, slug, category_id, description, price, image, \
                               is_featured, stock, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    slug: String,
    category_id: i32,
    description: String,
    price: Decimal,
    image: Option<String>,
    is_featured: bool,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        let stock = u32::try_from(self.stock).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative stock {} for product {}",
                self.stock, self.id
            ))
        })?;
        if self.price.is_sign_negative() {
            return Err(RepositoryError::DataCorruption(format!(
                "negative price {} for product {}",
                self.price, self.id
            )));
        }
        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            slug: self.slug,
            category_id: CategoryId::new(self.category_id),
            description: self.description,
            price: self.price,
            image: self.image,
            is_featured: self.is_featured,
            stock,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    slug: String,
    icon: String,
}

#[derive(sqlx::FromRow)]
struct SubCategoryRow {
    id: i32,
    category_id: i32,
    name: String,
    slug: String,
    icon: Option<String>,
}

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl CatalogStore for ProductRepository<'_> {
    #[instrument(skip(self))]
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    #[instrument(skip(self))]
    async fn list_featured(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE is_featured ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    #[instrument(skip(self, query))]
    async fn search(&self, query: &SearchQuery) -> Result<Page<Product>, RepositoryError> {
        const FILTER: &str = "($1::text IS NULL OR name ILIKE '%' || $1 || '%') \
                              AND ($2::int4 IS NULL OR category_id = $2) \
                              AND ($3::numeric IS NULL OR price >= $3) \
                              AND ($4::numeric IS NULL OR price <= $4)";

        let order_by = match query.sort {
            SortOrder::Newest => "created_at DESC",
            SortOrder::PriceAsc => "price ASC",
            SortOrder::PriceDesc => "price DESC",
        };

        let (total,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM product WHERE {FILTER}"))
                .bind(query.text.as_deref())
                .bind(query.category.map(|c| c.as_i32()))
                .bind(query.min_price)
                .bind(query.max_price)
                .fetch_one(self.pool)
                .await?;

        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE {FILTER} \
             ORDER BY {order_by} LIMIT $5 OFFSET $6"
        ))
        .bind(query.text.as_deref())
        .bind(query.category.map(|c| c.as_i32()))
        .bind(query.min_price)
        .bind(query.max_price)
        .bind(i64::from(query.limit()))
        .bind(i64::from(query.offset()))
        .fetch_all(self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(ProductRow::into_product)
            .collect::<Result<_, _>>()?;

        Ok(Page {
            items,
            total: u64::try_from(total).unwrap_or(0),
            page: query.page.max(1),
            per_page: query.limit(),
        })
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT id, name, slug, icon FROM category ORDER BY name")
                .fetch_all(self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|r| Category {
                id: CategoryId::new(r.id),
                name: r.name,
                slug: r.slug,
                icon: r.icon,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_subcategories(
        &self,
        category: CategoryId,
    ) -> Result<Vec<SubCategory>, RepositoryError> {
        let rows: Vec<SubCategoryRow> = sqlx::query_as(
            "SELECT id, category_id, name, slug, icon FROM subcategory \
             WHERE category_id = $1 ORDER BY name",
        )
        .bind(category.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SubCategory {
                id: SubCategoryId::new(r.id),
                category_id: CategoryId::new(r.category_id),
                name: r.name,
                slug: r.slug,
                icon: r.icon,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn suggest_names(&self, term: &str) -> Result<Vec<String>, RepositoryError> {
        // Trigram similarity via pg_trgm; the extension and the gin index
        // on product.name are created by the migrations.
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM product WHERE similarity(name, $1) >= 0.3 \
             ORDER BY similarity(name, $1) DESC, name LIMIT $2",
        )
        .bind(term)
        .bind(i64::from(MAX_SUGGESTIONS))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}
