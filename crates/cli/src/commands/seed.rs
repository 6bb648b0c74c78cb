//! Seed the database with demo catalog data.
//!
//! Inserts a couple of categories with subcategories and a small set of
//! products so a fresh database has something to browse. Idempotent: rows
//! are keyed by slug and re-running the command updates them in place.
//!
//! # Usage
//!
//! ```bash
//! orchard-cli seed
//! ```

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use orchard_store::config::StoreConfig;
use orchard_store::db;

struct SeedProduct {
    name: &'static str,
    slug: &'static str,
    category_slug: &'static str,
    price: &'static str,
    stock: i32,
    is_featured: bool,
}

const CATEGORIES: &[(&str, &str, &str)] = &[
    ("Electronics", "electronics", "fa-bolt"),
    ("Books", "books", "fa-book"),
    ("Home & Garden", "home-garden", "fa-house"),
];

// (parent category slug, name, slug)
const SUBCATEGORIES: &[(&str, &str, &str)] = &[
    ("electronics", "Audio", "audio"),
    ("electronics", "Peripherals", "peripherals"),
    ("books", "Fiction", "fiction"),
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Wireless Headphones",
        slug: "wireless-headphones",
        category_slug: "electronics",
        price: "1299.00",
        stock: 25,
        is_featured: true,
    },
    SeedProduct {
        name: "Mechanical Keyboard",
        slug: "mechanical-keyboard",
        category_slug: "electronics",
        price: "1850.50",
        stock: 12,
        is_featured: false,
    },
    SeedProduct {
        name: "Science Fiction Anthology",
        slug: "science-fiction-anthology",
        category_slug: "books",
        price: "240.00",
        stock: 40,
        is_featured: true,
    },
    SeedProduct {
        name: "Ceramic Plant Pot",
        slug: "ceramic-plant-pot",
        category_slug: "home-garden",
        price: "95.00",
        stock: 0,
        is_featured: false,
    },
];

/// Seed categories and products.
///
/// # Errors
///
/// Returns an error if the environment is incomplete or a database
/// operation fails.
pub async fn catalog() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = StoreConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;

    info!("Seeding categories...");
    for (name, slug, icon) in CATEGORIES {
        upsert_category(&pool, name, slug, icon).await?;
    }

    info!("Seeding subcategories...");
    for (category_slug, name, slug) in SUBCATEGORIES {
        upsert_subcategory(&pool, category_slug, name, slug).await?;
    }

    info!("Seeding products...");
    for product in PRODUCTS {
        upsert_product(&pool, product).await?;
    }

    info!(
        categories = CATEGORIES.len(),
        subcategories = SUBCATEGORIES.len(),
        products = PRODUCTS.len(),
        "Seeding complete!"
    );
    Ok(())
}

async fn upsert_category(
    pool: &PgPool,
    name: &str,
    slug: &str,
    icon: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO category (name, slug, icon) VALUES ($1, $2, $3) \
         ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name, icon = EXCLUDED.icon",
    )
    .bind(name)
    .bind(slug)
    .bind(icon)
    .execute(pool)
    .await?;
    Ok(())
}

async fn upsert_subcategory(
    pool: &PgPool,
    category_slug: &str,
    name: &str,
    slug: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO subcategory (category_id, name, slug) \
         SELECT c.id, $2, $3 FROM category c WHERE c.slug = $1 \
         ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name",
    )
    .bind(category_slug)
    .bind(name)
    .bind(slug)
    .execute(pool)
    .await?;
    Ok(())
}

async fn upsert_product(
    pool: &PgPool,
    product: &SeedProduct,
) -> Result<(), Box<dyn std::error::Error>> {
    let price: Decimal = product.price.parse()?;

    sqlx::query(
        "INSERT INTO product (name, slug, category_id, description, price, stock, is_featured) \
         SELECT $1, $2, c.id, '', $4, $5, $6 FROM category c WHERE c.slug = $3 \
         ON CONFLICT (slug) DO UPDATE \
         SET price = EXCLUDED.price, stock = EXCLUDED.stock, \
             is_featured = EXCLUDED.is_featured, updated_at = now()",
    )
    .bind(product.name)
    .bind(product.slug)
    .bind(product.category_slug)
    .bind(price)
    .bind(product.stock)
    .bind(product.is_featured)
    .execute(pool)
    .await?;
    Ok(())
}
