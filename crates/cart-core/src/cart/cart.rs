//! Cart and cart entry types.
//!
//! A [`Cart`] never mutates in place. Each transition borrows the current
//! cart and returns a new one, so a rejected transition leaves the original
//! untouched by construction.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogProduct, Stock};
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// One product's row in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartEntry {
    /// Product identifier, unique within a cart.
    pub id: ProductId,
    /// Product title (copied from the catalog when added).
    pub title: String,
    /// Unit price (copied from the catalog when added).
    pub price: Money,
    /// Image URL (copied from the catalog when added).
    pub image: String,
    /// Quantity, always at least 1.
    pub amount: i64,
}

impl CartEntry {
    /// Build an entry from catalog attributes.
    pub fn from_product(product: CatalogProduct, amount: i64) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount,
        }
    }

    /// Unit price times amount. `None` on overflow.
    pub fn subtotal(&self) -> Option<Money> {
        self.price.try_multiply(self.amount)
    }
}

/// An ordered sequence of cart entries.
///
/// Serializes as a plain JSON array, in cart order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from entries, checking the cart invariants.
    pub fn from_entries(entries: Vec<CartEntry>) -> Result<Self, CartError> {
        let cart = Self { entries };
        cart.validate()?;
        Ok(cart)
    }

    /// Decode a persisted cart.
    ///
    /// Malformed text and decoded carts that break an invariant are both
    /// reported as [`CartError::CorruptState`].
    pub fn from_json(text: &str) -> Result<Self, CartError> {
        let cart: Cart =
            serde_json::from_str(text).map_err(|e| CartError::CorruptState(e.to_string()))?;
        cart.validate()?;
        Ok(cart)
    }

    /// Encode for persistence.
    pub fn to_json(&self) -> Result<String, CartError> {
        serde_json::to_string(self).map_err(|e| CartError::Store(cart_store::StoreError::StoreError(e.to_string())))
    }

    fn validate(&self) -> Result<(), CartError> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in &self.entries {
            if entry.amount < 1 {
                return Err(CartError::CorruptState(format!(
                    "entry {} has amount {}",
                    entry.id, entry.amount
                )));
            }
            if !seen.insert(&entry.id) {
                return Err(CartError::CorruptState(format!(
                    "duplicate entry for {}",
                    entry.id
                )));
            }
        }
        Ok(())
    }

    /// Entries in cart order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Get the entry for a product.
    pub fn get(&self, id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get total item count (sum of amounts).
    pub fn item_count(&self) -> i64 {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Amount in cart per product, for badging catalog listings.
    pub fn amounts(&self) -> BTreeMap<ProductId, i64> {
        self.entries
            .iter()
            .map(|e| (e.id.clone(), e.amount))
            .collect()
    }

    /// Sum of entry subtotals.
    ///
    /// Returns `None` if an entry is priced in another currency or the sum
    /// overflows.
    pub fn total(&self, currency: Currency) -> Option<Money> {
        let subtotals = self
            .entries
            .iter()
            .map(CartEntry::subtotal)
            .collect::<Option<Vec<_>>>()?;
        Money::try_sum(subtotals.iter(), currency)
    }

    /// Cart with one more unit of `product`.
    ///
    /// An existing entry keeps its position and takes the freshly fetched
    /// catalog attributes; a new product is appended at amount 1. The target
    /// amount is checked against `stock` before anything is built.
    pub fn with_added(&self, product: CatalogProduct, stock: Stock) -> Result<Cart, CartError> {
        let position = self.position(&product.id);
        let requested = match position {
            Some(i) => self.entries[i].amount.checked_add(1),
            None => Some(1),
        };

        let requested = match requested {
            Some(n) if stock.can_fulfill(n) => n,
            _ => {
                return Err(CartError::OutOfStock {
                    product_id: product.id,
                    requested: requested.unwrap_or(i64::MAX),
                    available: stock.amount,
                })
            }
        };

        let mut entries = self.entries.clone();
        let entry = CartEntry::from_product(product, requested);
        match position {
            Some(i) => entries[i] = entry,
            None => entries.push(entry),
        }
        Ok(Cart { entries })
    }

    /// Cart without the entry for `id`.
    pub fn without(&self, id: &ProductId) -> Result<Cart, CartError> {
        let position = self
            .position(id)
            .ok_or_else(|| CartError::NotFound(id.clone()))?;

        let mut entries = self.entries.clone();
        entries.remove(position);
        Ok(Cart { entries })
    }

    /// Cart with the entry for `id` set to exactly `amount`.
    ///
    /// A non-positive `amount` returns the cart unchanged; this transition
    /// never removes an entry.
    pub fn with_amount(
        &self,
        id: &ProductId,
        amount: i64,
        stock: Stock,
    ) -> Result<Cart, CartError> {
        if amount < 1 {
            return Ok(self.clone());
        }

        let position = self
            .position(id)
            .ok_or_else(|| CartError::NotFound(id.clone()))?;

        if !stock.can_fulfill(amount) {
            return Err(CartError::OutOfStock {
                product_id: id.clone(),
                requested: amount,
                available: stock.amount,
            });
        }

        let mut entries = self.entries.clone();
        entries[position].amount = amount;
        Ok(Cart { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, cents: i64) -> CatalogProduct {
        CatalogProduct {
            id: ProductId::from(id),
            title: format!("Product {id}"),
            price: Money::new(cents, Currency::USD),
            image: format!("https://img.example/{id}.jpg"),
        }
    }

    fn cart_of(entries: &[(u64, i64)]) -> Cart {
        let entries = entries
            .iter()
            .map(|&(id, amount)| CartEntry::from_product(product(id, 1000), amount))
            .collect();
        Cart::from_entries(entries).unwrap()
    }

    #[test]
    fn test_add_new_product_appends() {
        let cart = cart_of(&[(1, 2)]);
        let next = cart.with_added(product(2, 500), Stock::new(5)).unwrap();

        assert_eq!(next.len(), 2);
        assert_eq!(next.entries()[1].id, ProductId::from(2u64));
        assert_eq!(next.entries()[1].amount, 1);
    }

    #[test]
    fn test_add_existing_product_keeps_position() {
        let cart = cart_of(&[(1, 2), (2, 1)]);
        let next = cart.with_added(product(1, 1200), Stock::new(5)).unwrap();

        assert_eq!(next.entries()[0].id, ProductId::from(1u64));
        assert_eq!(next.entries()[0].amount, 3);
        assert_eq!(next.entries()[0].price.amount_cents, 1200);
        assert_eq!(next.entries()[1].id, ProductId::from(2u64));
    }

    #[test]
    fn test_add_beyond_stock_rejected() {
        let cart = cart_of(&[(1, 4)]);
        let err = cart.with_added(product(1, 1000), Stock::new(4)).unwrap_err();

        assert!(matches!(
            err,
            CartError::OutOfStock {
                requested: 5,
                available: 4,
                ..
            }
        ));
        assert_eq!(cart, cart_of(&[(1, 4)]));
    }

    #[test]
    fn test_add_with_zero_stock_rejected() {
        let err = Cart::new()
            .with_added(product(1, 1000), Stock::new(0))
            .unwrap_err();
        assert!(err.is_out_of_stock());
    }

    #[test]
    fn test_without() {
        let cart = cart_of(&[(1, 2), (2, 1), (3, 1)]);
        let next = cart.without(&ProductId::from(2u64)).unwrap();

        let ids: Vec<&str> = next.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_without_missing() {
        let err = cart_of(&[(1, 1)]).without(&ProductId::from(9u64)).unwrap_err();
        assert!(matches!(err, CartError::NotFound(_)));
    }

    #[test]
    fn test_with_amount_sets_absolute_value() {
        let cart = cart_of(&[(3, 2)]);
        let next = cart
            .with_amount(&ProductId::from(3u64), 7, Stock::new(10))
            .unwrap();
        assert_eq!(next.entries()[0].amount, 7);
    }

    #[test]
    fn test_with_amount_beyond_stock() {
        let cart = cart_of(&[(3, 2)]);
        let err = cart
            .with_amount(&ProductId::from(3u64), 11, Stock::new(10))
            .unwrap_err();
        assert!(err.is_out_of_stock());
    }

    #[test]
    fn test_with_amount_non_positive_is_unchanged() {
        let cart = cart_of(&[(3, 2)]);
        for amount in [0, -4] {
            let next = cart
                .with_amount(&ProductId::from(3u64), amount, Stock::new(10))
                .unwrap();
            assert_eq!(next, cart);
        }
    }

    #[test]
    fn test_with_amount_missing() {
        let err = Cart::new()
            .with_amount(&ProductId::from(3u64), 1, Stock::new(10))
            .unwrap_err();
        assert!(matches!(err, CartError::NotFound(_)));
    }

    #[test]
    fn test_from_json_rejects_zero_amount() {
        let text = concat!(
            r#"[{"id":"1","title":"A","price":{"amount_cents":100,"currency":"USD"},"#,
            r#""image":"","amount":0}]"#
        );
        assert!(matches!(
            Cart::from_json(text),
            Err(CartError::CorruptState(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_duplicates() {
        let entry = concat!(
            r#"{"id":"1","title":"A","price":{"amount_cents":100,"currency":"USD"},"#,
            r#""image":"","amount":1}"#
        );
        let text = format!("[{entry},{entry}]");
        assert!(matches!(
            Cart::from_json(&text),
            Err(CartError::CorruptState(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Cart::from_json("{\"not\":\"a cart\"}"),
            Err(CartError::CorruptState(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let cart = cart_of(&[(1, 2), (2, 1)]);
        let text = cart.to_json().unwrap();
        assert!(text.starts_with('['));
        assert_eq!(Cart::from_json(&text).unwrap(), cart);
    }

    #[test]
    fn test_totals_and_amounts() {
        let cart = cart_of(&[(1, 2), (2, 3)]);

        assert_eq!(cart.item_count(), 5);
        assert_eq!(
            cart.total(Currency::USD),
            Some(Money::new(5000, Currency::USD))
        );
        assert_eq!(cart.total(Currency::EUR), None);
        assert_eq!(cart.amounts().get(&ProductId::from(2u64)), Some(&3));
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert_eq!(
            Cart::new().total(Currency::BRL),
            Some(Money::zero(Currency::BRL))
        );
    }
}
