//! Session wire format for the cart.
//!
//! The cart is stored under the session key [`CART_KEY`] as a mapping from
//! stringified product identity to `{quantity, price}`, with the price kept
//! as a decimal string. The selected display currency lives under its own
//! key, [`CURRENCY_KEY`], defaulting to the base currency.
//!
//! ```json
//! { "3": { "quantity": 2, "price": "20.00" }, "7": { "quantity": 1, "price": "50.00" } }
//! ```

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use orchard_core::{Currency, ProductId};

use super::{Cart, CartLine};

/// Session key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Session key holding the selected display currency code.
pub const CURRENCY_KEY: &str = "currency";

/// One stored cart line on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLine {
    pub quantity: u32,
    /// Decimal-as-string, e.g. `"20.00"`.
    pub price: String,
}

/// A stored session payload could not be decoded into a cart.
#[derive(Debug, Error)]
pub enum SessionCodecError {
    #[error("invalid product id in session cart: {0}")]
    BadProductId(String),
    #[error("invalid price in session cart for product {product}: {price}")]
    BadPrice { product: String, price: String },
}

/// The cart as it appears in session storage: insertion-ordered entries
/// keyed by stringified product id.
///
/// Serializes as a JSON object; deserialization preserves document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartRecord(pub Vec<(String, StoredLine)>);

impl CartRecord {
    /// Snapshot a cart into its wire form.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        Self(
            cart.lines()
                .iter()
                .map(|line| {
                    (
                        line.product_id.to_string(),
                        StoredLine {
                            quantity: line.quantity,
                            price: line.unit_price.to_string(),
                        },
                    )
                })
                .collect(),
        )
    }

    /// Rebuild a cart from its wire form. The result is clean (not dirty).
    ///
    /// # Errors
    ///
    /// Returns [`SessionCodecError`] if a key is not an integer product id
    /// or a price string is not a decimal.
    pub fn into_cart(self, currency: Currency) -> Result<Cart, SessionCodecError> {
        let mut lines = Vec::with_capacity(self.0.len());
        for (key, stored) in self.0 {
            let id: i32 = key
                .parse()
                .map_err(|_| SessionCodecError::BadProductId(key.clone()))?;
            let unit_price = stored
                .price
                .parse()
                .map_err(|_| SessionCodecError::BadPrice {
                    product: key,
                    price: stored.price.clone(),
                })?;
            lines.push(CartLine {
                product_id: ProductId::new(id),
                quantity: stored.quantity,
                unit_price,
            });
        }
        Ok(Cart {
            lines,
            currency,
            dirty: false,
        })
    }
}

impl Serialize for CartRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, line) in &self.0 {
            map.serialize_entry(key, line)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CartRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = CartRecord;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a map of product id to stored cart line")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, StoredLine>()? {
                    entries.push(entry);
                }
                Ok(CartRecord(entries))
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Parse a stored currency code, falling back to the base currency for a
/// missing or unknown value, exactly as the display path treats unknown
/// codes as rate 1.
#[must_use]
pub fn currency_or_default(code: Option<&str>) -> Currency {
    code.and_then(|c| c.parse::<Currency>().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::product;

    #[test]
    fn serializes_as_an_object_keyed_by_product_id() {
        let mut cart = Cart::new();
        cart.add(&product(3, "20.00", 10), 2, false);
        cart.add(&product(7, "50.00", 10), 1, false);

        let json = serde_json::to_string(&CartRecord::from_cart(&cart)).unwrap();
        assert_eq!(
            json,
            r#"{"3":{"quantity":2,"price":"20.00"},"7":{"quantity":1,"price":"50.00"}}"#
        );
    }

    #[test]
    fn round_trip_preserves_lines_and_prices_exactly() {
        let mut cart = Cart::new();
        cart.add(&product(3, "20.00", 10), 2, false);
        cart.add(&product(7, "50.00", 10), 1, false);
        cart.set_currency(Currency::Eur);

        let json = serde_json::to_string(&CartRecord::from_cart(&cart)).unwrap();
        let record: CartRecord = serde_json::from_str(&json).unwrap();
        let loaded = record.into_cart(Currency::Eur).unwrap();

        assert_eq!(loaded.lines(), cart.lines());
        assert_eq!(loaded.currency(), Currency::Eur);
        assert!(!loaded.is_dirty());
    }

    #[test]
    fn rejects_malformed_payloads() {
        let record = CartRecord(vec![(
            "abc".to_owned(),
            StoredLine {
                quantity: 1,
                price: "1.00".to_owned(),
            },
        )]);
        assert!(matches!(
            record.into_cart(Currency::Mdl),
            Err(SessionCodecError::BadProductId(_))
        ));

        let record = CartRecord(vec![(
            "1".to_owned(),
            StoredLine {
                quantity: 1,
                price: "not-a-price".to_owned(),
            },
        )]);
        assert!(matches!(
            record.into_cart(Currency::Mdl),
            Err(SessionCodecError::BadPrice { .. })
        ));
    }

    #[test]
    fn unknown_currency_falls_back_to_base() {
        assert_eq!(currency_or_default(None), Currency::Mdl);
        assert_eq!(currency_or_default(Some("USD")), Currency::Usd);
        assert_eq!(currency_or_default(Some("XYZ")), Currency::Mdl);
    }
}
