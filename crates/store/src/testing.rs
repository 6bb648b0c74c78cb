//! In-memory store implementations for tests.
//!
//! These mirror the transactional guarantees of the `PostgreSQL`
//! repositories: `MemoryOrders` applies order + items all-or-nothing, with
//! optional fault injection partway through the item batch.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use orchard_core::{
    AddressId, CategoryId, OrderId, OrderItemId, OrderStatus, ProductId, UserId,
};

use crate::accounts::AccountStore;
use crate::catalog::{CatalogStore, MAX_SUGGESTIONS, Page, SearchQuery};
use crate::checkout::OrderStore;
use crate::db::RepositoryError;
use crate::models::{
    Address, Category, NewAddress, NewOrder, NewOrderItem, Order, OrderItem, Product,
    SubCategory, WishlistEntry,
};

/// Product fixture with the given id, base-currency price, and stock.
pub fn product(id: i32, price: &str, stock: u32) -> Product {
    let now = Utc::now();
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        slug: format!("product-{id}"),
        category_id: CategoryId::new(1),
        description: String::new(),
        price: price.parse().expect("test price must be a decimal"),
        image: None,
        is_featured: false,
        stock,
        created_at: now,
        updated_at: now,
    }
}

/// In-memory catalog.
#[derive(Default)]
pub struct MemoryCatalog {
    products: HashMap<ProductId, Product>,
    categories: Vec<Category>,
    subcategories: Vec<SubCategory>,
}

impl MemoryCatalog {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_subcategories(mut self, subcategories: Vec<SubCategory>) -> Self {
        self.subcategories = subcategories;
        self
    }
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let next = (prev + cost).min(row[j] + 1).min(row[j + 1] + 1);
            prev = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}

impl CatalogStore for MemoryCatalog {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.get(&id).cloned())
    }

    async fn list_featured(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .products
            .values()
            .filter(|p| p.is_featured)
            .cloned()
            .collect())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Page<Product>, RepositoryError> {
        let needle = query.text.as_deref().unwrap_or("").to_lowercase();
        let mut matches: Vec<_> = self
            .products
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .filter(|p| query.category.is_none_or(|c| p.category_id == c))
            .filter(|p| query.min_price.is_none_or(|min| p.price >= min))
            .filter(|p| query.max_price.is_none_or(|max| p.price <= max))
            .cloned()
            .collect();
        matches.sort_by_key(|p| p.id.as_i32());

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .collect();
        Ok(Page {
            items,
            total,
            page: query.page.max(1),
            per_page: query.limit(),
        })
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self.categories.clone())
    }

    async fn list_subcategories(
        &self,
        category: CategoryId,
    ) -> Result<Vec<SubCategory>, RepositoryError> {
        Ok(self
            .subcategories
            .iter()
            .filter(|s| s.category_id == category)
            .cloned()
            .collect())
    }

    async fn suggest_names(&self, term: &str) -> Result<Vec<String>, RepositoryError> {
        let term = term.to_lowercase();
        let mut scored: Vec<(usize, &str)> = self
            .products
            .values()
            .map(|p| (edit_distance(&term, &p.name.to_lowercase()), p.name.as_str()))
            // Close enough when at most 40% of the longer string differs.
            .filter(|&(dist, name)| dist * 5 <= term.len().max(name.len()) * 2)
            .collect();
        scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
        Ok(scored
            .into_iter()
            .take(MAX_SUGGESTIONS as usize)
            .map(|(_, name)| name.to_owned())
            .collect())
    }
}

/// In-memory order store with all-or-nothing semantics and fault injection.
#[derive(Default)]
pub struct MemoryOrders {
    state: Mutex<OrdersState>,
    /// Fail after persisting this many items of a batch, simulating a
    /// mid-transaction fault.
    fail_after_items: Option<usize>,
}

#[derive(Default)]
struct OrdersState {
    orders: Vec<Order>,
    items: Vec<OrderItem>,
    next_order_id: i32,
    next_item_id: i32,
}

impl MemoryOrders {
    pub fn failing_after_items(n: usize) -> Self {
        Self {
            fail_after_items: Some(n),
            ..Self::default()
        }
    }

    /// Number of visible (committed) orders.
    pub fn order_count(&self) -> usize {
        self.state.lock().expect("orders state poisoned").orders.len()
    }
}

impl OrderStore for MemoryOrders {
    async fn create_with_items(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
    ) -> Result<Order, RepositoryError> {
        let mut state = self.state.lock().expect("orders state poisoned");

        // Stage everything; commit only if the whole batch succeeds.
        state.next_order_id += 1;
        let order_id = OrderId::new(state.next_order_id);
        let created = Order {
            id: order_id,
            user_id: order.user_id,
            first_name: order.first_name.clone(),
            last_name: order.last_name.clone(),
            email: order.email.clone(),
            address: order.address.clone(),
            postal_code: order.postal_code.clone(),
            city: order.city.clone(),
            country: order.country.clone(),
            payment_method: order.payment_method,
            notes: order.notes.clone(),
            created_at: Utc::now(),
            paid: false,
            status: OrderStatus::Processing,
            total_amount: order.total_amount,
        };

        let mut staged = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            if self.fail_after_items == Some(i) {
                // Rolled back: nothing from this call becomes visible.
                state.next_order_id -= 1;
                return Err(RepositoryError::Conflict(
                    "simulated transaction failure".to_owned(),
                ));
            }
            state.next_item_id += 1;
            staged.push(OrderItem {
                id: OrderItemId::new(state.next_item_id),
                order_id,
                product_id: item.product_id,
                price: item.price,
                quantity: item.quantity,
            });
        }

        state.orders.push(created.clone());
        state.items.extend(staged);
        Ok(created)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let state = self.state.lock().expect("orders state poisoned");
        Ok(state.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn items(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let state = self.state.lock().expect("orders state poisoned");
        Ok(state
            .items
            .iter()
            .filter(|i| i.order_id == id)
            .cloned()
            .collect())
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<Order>, RepositoryError> {
        let state = self.state.lock().expect("orders state poisoned");
        let mut orders: Vec<_> = state
            .orders
            .iter()
            .filter(|o| o.user_id == user)
            .cloned()
            .collect();
        orders.reverse();
        Ok(orders)
    }
}

/// In-memory account store.
#[derive(Default)]
pub struct MemoryAccounts {
    state: Mutex<AccountsState>,
}

#[derive(Default)]
struct AccountsState {
    addresses: Vec<Address>,
    wishlist: Vec<WishlistEntry>,
    next_address_id: i32,
}

impl AccountStore for MemoryAccounts {
    async fn list_addresses(&self, user: UserId) -> Result<Vec<Address>, RepositoryError> {
        let state = self.state.lock().expect("accounts state poisoned");
        let mut addresses: Vec<_> = state
            .addresses
            .iter()
            .filter(|a| a.user_id == user)
            .cloned()
            .collect();
        addresses.sort_by_key(|a| !a.is_default);
        Ok(addresses)
    }

    async fn add_address(
        &self,
        user: UserId,
        address: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        let mut state = self.state.lock().expect("accounts state poisoned");
        if address.is_default {
            for existing in state.addresses.iter_mut().filter(|a| a.user_id == user) {
                existing.is_default = false;
            }
        }
        state.next_address_id += 1;
        let created = Address {
            id: AddressId::new(state.next_address_id),
            user_id: user,
            street: address.street.clone(),
            city: address.city.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
            is_default: address.is_default,
        };
        state.addresses.push(created.clone());
        Ok(created)
    }

    async fn default_address(&self, user: UserId) -> Result<Option<Address>, RepositoryError> {
        let state = self.state.lock().expect("accounts state poisoned");
        Ok(state
            .addresses
            .iter()
            .find(|a| a.user_id == user && a.is_default)
            .cloned())
    }

    async fn set_default_address(
        &self,
        user: UserId,
        address: AddressId,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("accounts state poisoned");
        if !state
            .addresses
            .iter()
            .any(|a| a.id == address && a.user_id == user)
        {
            return Err(RepositoryError::NotFound);
        }
        for existing in state.addresses.iter_mut().filter(|a| a.user_id == user) {
            existing.is_default = existing.id == address;
        }
        Ok(())
    }

    async fn add_wishlist(&self, user: UserId, product: ProductId) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().expect("accounts state poisoned");
        if state
            .wishlist
            .iter()
            .any(|e| e.user_id == user && e.product_id == product)
        {
            return Ok(false);
        }
        state.wishlist.push(WishlistEntry {
            user_id: user,
            product_id: product,
            added_at: Utc::now(),
        });
        Ok(true)
    }

    async fn remove_wishlist(
        &self,
        user: UserId,
        product: ProductId,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("accounts state poisoned");
        state
            .wishlist
            .retain(|e| !(e.user_id == user && e.product_id == product));
        Ok(())
    }

    async fn list_wishlist(&self, user: UserId) -> Result<Vec<WishlistEntry>, RepositoryError> {
        let state = self.state.lock().expect("accounts state poisoned");
        let mut entries: Vec<_> = state
            .wishlist
            .iter()
            .filter(|e| e.user_id == user)
            .cloned()
            .collect();
        entries.reverse();
        Ok(entries)
    }
}
