//! Core use-case services.
//!
//! # Responsibility
//! - Enforce business invariants before repository calls.
//! - Keep transport layers decoupled from storage details.

pub mod product_service;
