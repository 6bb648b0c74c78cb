//! Catalog read interface.
//!
//! The cart and checkout core only ever calls [`CatalogStore::get_product`];
//! the listing and search operations exist for the surrounding browse pages.
//! [`crate::db::products::ProductRepository`] is the `PostgreSQL`
//! implementation; tests use an in-memory one.

use rust_decimal::Decimal;

use orchard_core::{CategoryId, ProductId};

use crate::db::RepositoryError;
use crate::models::{Category, Product, SubCategory};

/// Maximum number of "did you mean" suggestions offered for an empty search.
pub const MAX_SUGGESTIONS: u32 = 5;

/// Sort order for catalog search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Most recently added first.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

/// A catalog search request: substring match plus optional filters.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against product names.
    pub text: Option<String>,
    pub category: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

impl SearchQuery {
    pub const DEFAULT_PER_PAGE: u32 = 12;

    /// Query offset derived from `page` and `per_page`.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        let page = if self.page == 0 { 1 } else { self.page };
        (page - 1) * self.limit()
    }

    /// Page size, defaulting when unset.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        if self.per_page == 0 {
            Self::DEFAULT_PER_PAGE
        } else {
            self.per_page
        }
    }
}

/// One page of results.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total matching rows across all pages.
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Number of pages needed for `total` rows.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            0
        } else {
            self.total.div_ceil(self.per_page as u64)
        }
    }
}

/// Read-only product and category lookup.
pub trait CatalogStore {
    /// Point lookup by product identity.
    fn get_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, RepositoryError>> + Send;

    /// Products flagged for the home page.
    fn list_featured(&self) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;

    /// Substring search with filters, sorting, and offset pagination.
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Page<Product>, RepositoryError>> + Send;

    /// All categories, for navigation.
    fn list_categories(&self)
    -> impl Future<Output = Result<Vec<Category>, RepositoryError>> + Send;

    /// Subcategories of one category, for the category detail page.
    fn list_subcategories(
        &self,
        category: CategoryId,
    ) -> impl Future<Output = Result<Vec<SubCategory>, RepositoryError>> + Send;

    /// Product names close to `term`, best match first, at most
    /// [`MAX_SUGGESTIONS`]. Backs the "did you mean" fallback on searches
    /// that match nothing.
    fn suggest_names(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<String>, RepositoryError>> + Send;
}

/// A search outcome: the result page, plus close-name suggestions when a
/// text query matched nothing.
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub page: Page<Product>,
    /// "Did you mean" product names; empty unless the page is empty.
    pub did_you_mean: Vec<String>,
}

/// Run a search, falling back to fuzzy name suggestions when a non-empty
/// text query matches no products.
///
/// # Errors
///
/// Returns [`RepositoryError`] if the search or the suggestion lookup fails.
pub async fn search_with_suggestions<C: CatalogStore>(
    catalog: &C,
    query: &SearchQuery,
) -> Result<SearchResults, RepositoryError> {
    let page = catalog.search(query).await?;
    let did_you_mean = match query.text.as_deref() {
        Some(term) if page.total == 0 && !term.is_empty() => catalog.suggest_names(term).await?,
        _ => Vec::new(),
    };
    Ok(SearchResults { page, did_you_mean })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryCatalog, product};

    #[test]
    fn offset_is_zero_based_from_one_based_page() {
        let query = SearchQuery {
            page: 3,
            per_page: 10,
            ..SearchQuery::default()
        };
        assert_eq!(query.offset(), 20);
    }

    #[test]
    fn page_zero_is_treated_as_first_page() {
        let query = SearchQuery::default();
        assert_eq!(query.offset(), 0);
        assert_eq!(query.limit(), SearchQuery::DEFAULT_PER_PAGE);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::<()> {
            items: Vec::new(),
            total: 21,
            page: 1,
            per_page: 10,
        };
        assert_eq!(page.total_pages(), 3);
    }

    #[tokio::test]
    async fn empty_search_falls_back_to_name_suggestions() {
        let mut apple = product(1, "10.00", 5);
        apple.name = "Apple".to_owned();
        let catalog = MemoryCatalog::with_products(vec![apple]);

        // "aple" is not a substring of any name, but is one edit away.
        let query = SearchQuery {
            text: Some("aple".to_owned()),
            ..SearchQuery::default()
        };
        let results = search_with_suggestions(&catalog, &query).await.unwrap();
        assert!(results.page.items.is_empty());
        assert_eq!(results.did_you_mean, vec!["Apple".to_owned()]);
    }

    #[tokio::test]
    async fn no_suggestions_when_the_search_matches() {
        let mut apple = product(1, "10.00", 5);
        apple.name = "Apple".to_owned();
        let catalog = MemoryCatalog::with_products(vec![apple]);

        let query = SearchQuery {
            text: Some("app".to_owned()),
            ..SearchQuery::default()
        };
        let results = search_with_suggestions(&catalog, &query).await.unwrap();
        assert_eq!(results.page.items.len(), 1);
        assert!(results.did_you_mean.is_empty());
    }

    #[tokio::test]
    async fn no_suggestions_without_a_text_query() {
        let catalog = MemoryCatalog::with_products(Vec::new());
        let results = search_with_suggestions(&catalog, &SearchQuery::default())
            .await
            .unwrap();
        assert!(results.page.items.is_empty());
        assert!(results.did_you_mean.is_empty());
    }

    #[tokio::test]
    async fn subcategories_are_scoped_to_their_category() {
        use orchard_core::SubCategoryId;

        let laptops = SubCategory {
            id: SubCategoryId::new(1),
            category_id: CategoryId::new(1),
            name: "Laptops".to_owned(),
            slug: "laptops".to_owned(),
            icon: None,
        };
        let fiction = SubCategory {
            id: SubCategoryId::new(2),
            category_id: CategoryId::new(2),
            name: "Fiction".to_owned(),
            slug: "fiction".to_owned(),
            icon: Some("fa-book-open".to_owned()),
        };
        let catalog = MemoryCatalog::with_products(Vec::new())
            .with_subcategories(vec![laptops.clone(), fiction]);

        let listed = catalog.list_subcategories(CategoryId::new(1)).await.unwrap();
        assert_eq!(listed, vec![laptops]);
        assert!(
            catalog
                .list_subcategories(CategoryId::new(9))
                .await
                .unwrap()
                .is_empty()
        );
    }
}
