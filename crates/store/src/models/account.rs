//! Account models: addresses and wishlist entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orchard_core::{AddressId, ProductId, UserId};

/// A user shipping address.
///
/// At most one address per user may have `is_default` set; the account store
/// flips defaults atomically to preserve that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    pub is_default: bool,
}

/// Data for creating an address row.
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
}

/// One product on a user's wishlist.
///
/// The (user, product) pair is unique; adding twice is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub added_at: DateTime<Utc>,
}
