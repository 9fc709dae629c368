//! Product inventory domain model.
//!
//! # Responsibility
//! - Define the canonical product record used by core business logic.
//! - Own the explicit record-equality contract backing no-op update detection.
//!
//! # Invariants
//! - Every persisted product is identified by a store-assigned `ProductId`.
//! - Deletion is physical; there is no tombstone state.

pub mod product;
