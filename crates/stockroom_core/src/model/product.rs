//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical record managed by the inventory core.
//! - Provide the explicit field-by-field equality used for no-op detection.
//!
//! # Invariants
//! - `id` is `0` until the store assigns an identifier on insert.
//! - `code_value` is globally unique among persisted products.
//! - Field constraints (non-empty name/code, quantity >= 1, price >= 1, valid
//!   expiration date) are enforced by the service layer, not here.

use serde::{Deserialize, Serialize};

/// Store-assigned identifier for a persisted product.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Valid identifiers are `>= 1`; `0` marks a not-yet-persisted record.
pub type ProductId = i64;

/// Canonical product record.
///
/// `expiration` is kept as the wire text (`YYYY-MM-DD`): the value carries no
/// timezone semantics and is only ever validated, never computed with, so the
/// stored representation stays byte-stable across round trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier. `0` until persisted.
    #[serde(default)]
    pub id: ProductId,
    /// Display name. Must be non-empty after trimming.
    pub name: String,
    /// Units on hand. Must be >= 1.
    pub quantity: i64,
    /// Business-unique product code, distinct from `id`.
    pub code_value: String,
    /// Whether the product is visible in the published catalog.
    #[serde(default)]
    pub is_published: bool,
    /// Expiration date in `YYYY-MM-DD` form.
    pub expiration: String,
    /// Unit price. Must be >= 1.
    pub price: f64,
}

impl Product {
    /// Creates an unpersisted product (`id = 0`).
    ///
    /// The constructor does not validate field constraints; validation is the
    /// service layer's job so that error precedence stays in one place.
    pub fn new(
        name: impl Into<String>,
        quantity: i64,
        code_value: impl Into<String>,
        is_published: bool,
        expiration: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            quantity,
            code_value: code_value.into(),
            is_published,
            expiration: expiration.into(),
            price,
        }
    }

    /// Returns whether the store has assigned this record an identifier.
    pub fn is_persisted(&self) -> bool {
        self.id >= 1
    }
}

/// Record equality is defined field by field over every persisted attribute.
///
/// This comparison decides whether an update is a no-op, so it is written out
/// explicitly: a field added to `Product` must be added here deliberately, or
/// no-op detection silently ignores it.
impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.quantity == other.quantity
            && self.code_value == other.code_value
            && self.is_published == other.is_published
            && self.expiration == other.expiration
            && self.price == other.price
    }
}
