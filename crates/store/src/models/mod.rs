//! Domain models for the storefront.

pub mod account;
pub mod order;
pub mod product;

pub use account::{Address, NewAddress, WishlistEntry};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
pub use product::{Category, Product, SubCategory};
