//! Orchard Store library.
//!
//! The storefront core: a session-scoped shopping cart, the checkout flow
//! that materializes carts into persisted orders, and the catalog and
//! account stores the cart depends on.
//!
//! The cart is an explicit load-mutate-save value. The enclosing request
//! layer loads it from session storage (see [`cart::session`]), mutates it
//! through [`cart::Cart`], and writes it back when it is dirty. Order
//! placement goes through [`checkout::place_order`], which is generic over
//! the [`catalog::CatalogStore`] and [`checkout::OrderStore`] traits; the
//! [`db`] module provides the `PostgreSQL` implementations.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod models;

#[cfg(test)]
pub(crate) mod testing;
