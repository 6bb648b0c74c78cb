//! Session-scoped shopping cart.
//!
//! A [`Cart`] is an explicit value with a load-mutate-save contract: the
//! request layer loads it from session storage, mutates it here, and writes
//! it back when [`Cart::is_dirty`] reports a change. Nothing in this module
//! touches the session itself; the wire format lives in [`session`].
//!
//! Quantities are clamped against live stock on [`Cart::add`]. Over-quantity
//! requests are silently capped, never rejected. [`Cart::update`] does
//! **not** clamp (see [`CLAMP_ON_UPDATE`]).

pub mod session;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orchard_core::{Currency, ProductId};

use crate::catalog::CatalogStore;
use crate::db::RepositoryError;
use crate::models::Product;

/// Whether [`Cart::update`] clamps against stock the way [`Cart::add`] does.
///
/// The historical behavior clamps on add but sets unconditionally on update.
/// The asymmetry is kept as-is behind this flag until stakeholders confirm
/// which side is intended.
pub const CLAMP_ON_UPDATE: bool = false;

/// One product/quantity pairing held in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price in the base currency, captured when the product was first
    /// added. Not re-read on later adds of the same product.
    pub unit_price: Decimal,
}

impl CartLine {
    /// Stored-price subtotal for this line.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A cart line resolved against the live catalog for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLine {
    pub product: Product,
    pub quantity: u32,
    /// Unit price projected into the cart's display currency.
    pub unit_price: Decimal,
    /// `unit_price * quantity`, in the display currency.
    pub line_total: Decimal,
}

/// A session-scoped cart: insertion-ordered lines plus a display currency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: Currency,
    dirty: bool,
}

impl Cart {
    /// An empty cart in the base currency.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty cart with the given display currency.
    #[must_use]
    pub fn with_currency(currency: Currency) -> Self {
        Self {
            currency,
            ..Self::default()
        }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Display currency for resolved lines.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Switch the display currency. Stored prices are unaffected.
    pub fn set_currency(&mut self, currency: Currency) {
        if self.currency != currency {
            self.currency = currency;
            self.dirty = true;
        }
    }

    /// Whether the cart has unsaved mutations.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after the session layer has persisted the cart.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Add `quantity` units of `product` to the cart.
    ///
    /// The requested quantity is clamped to `product.stock`. On the first
    /// add of a product the line snapshots the product's current price.
    /// With `replace` the line quantity is set to the clamped value;
    /// otherwise it accumulates and is re-clamped to stock. Over-quantity
    /// requests are capped silently, never an error.
    pub fn add(&mut self, product: &Product, quantity: u32, replace: bool) {
        let clamped = quantity.min(product.stock);

        let i = match self.position(product.id) {
            Some(i) => i,
            None => {
                self.lines.push(CartLine {
                    product_id: product.id,
                    quantity: 0,
                    unit_price: product.price,
                });
                self.lines.len() - 1
            }
        };
        let line = &mut self.lines[i];

        if replace {
            line.quantity = clamped;
        } else {
            // An unclamped update can leave the line near u32::MAX, so the
            // accumulation must not overflow before the re-clamp below.
            line.quantity = line.quantity.saturating_add(clamped);
            if line.quantity > product.stock {
                line.quantity = product.stock;
            }
        }
        self.dirty = true;
    }

    /// Set the quantity of an existing line. No-op if the product is not in
    /// the cart.
    ///
    /// Unlike [`Cart::add`] this does not clamp against stock; see
    /// [`CLAMP_ON_UPDATE`].
    pub fn update(&mut self, product_id: ProductId, quantity: u32) {
        if let Some(i) = self.position(product_id) {
            self.lines[i].quantity = quantity;
            self.dirty = true;
        }
    }

    /// Remove a product's line. No-op (not an error) if absent.
    pub fn remove(&mut self, product_id: ProductId) {
        if let Some(i) = self.position(product_id) {
            self.lines.remove(i);
            self.dirty = true;
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.dirty = true;
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Total of all subtotals in the stored (base-currency) price basis.
    ///
    /// Never currency-converted; order creation uses this basis.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Stored-price subtotal for one product, zero if absent.
    #[must_use]
    pub fn line_total(&self, product_id: ProductId) -> Decimal {
        self.position(product_id)
            .map_or(Decimal::ZERO, |i| self.lines[i].subtotal())
    }

    /// Resolve lines against the live catalog for display.
    ///
    /// Recomputed fresh on every call from the current cart state and
    /// current product rows; nothing is cached. Per-line prices are
    /// projected into the cart's display currency. Lines whose product has
    /// vanished from the catalog are skipped here; the checkout path
    /// resolves strictly instead.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if a catalog lookup fails.
    pub async fn resolve<C: CatalogStore>(
        &self,
        catalog: &C,
    ) -> Result<Vec<ResolvedLine>, RepositoryError> {
        let rate = self.currency.rate();
        let mut resolved = Vec::with_capacity(self.lines.len());

        for line in &self.lines {
            let Some(product) = catalog.get_product(line.product_id).await? else {
                continue;
            };
            let unit_price = line.unit_price * rate;
            resolved.push(ResolvedLine {
                quantity: line.quantity,
                unit_price,
                line_total: unit_price * Decimal::from(line.quantity),
                product,
            });
        }

        Ok(resolved)
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }
}
