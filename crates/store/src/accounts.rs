//! Account store interface: addresses and wishlists.
//!
//! User-scoped collections consumed by the cart and order flows, e.g.
//! default address selection at checkout.
//! [`crate::db::accounts::AccountRepository`] is the `PostgreSQL`
//! implementation.

use orchard_core::{AddressId, ProductId, UserId};

use crate::db::RepositoryError;
use crate::models::{Address, NewAddress, WishlistEntry};

/// User-scoped addresses and wishlist.
pub trait AccountStore {
    /// All addresses of a user, default first.
    fn list_addresses(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<Address>, RepositoryError>> + Send;

    /// Create an address. If it is marked default, any prior default is
    /// unset in the same operation.
    fn add_address(
        &self,
        user: UserId,
        address: &NewAddress,
    ) -> impl Future<Output = Result<Address, RepositoryError>> + Send;

    /// The user's default shipping address, if any.
    fn default_address(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Option<Address>, RepositoryError>> + Send;

    /// Make `address` the user's default, atomically unsetting any prior
    /// default. At most one address per user is default at any time.
    ///
    /// Fails with [`RepositoryError::NotFound`] if the address does not
    /// belong to the user.
    fn set_default_address(
        &self,
        user: UserId,
        address: AddressId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Add a product to the wishlist. Idempotent: returns `false` when the
    /// entry already existed.
    fn add_wishlist(
        &self,
        user: UserId,
        product: ProductId,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Remove a product from the wishlist. No-op if absent.
    fn remove_wishlist(
        &self,
        user: UserId,
        product: ProductId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// The user's wishlist, newest first.
    fn list_wishlist(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<WishlistEntry>, RepositoryError>> + Send;
}
