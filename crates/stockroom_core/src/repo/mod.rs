//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the product persistence contract used by the service layer.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Repositories carry no business rules; validation lives in the service.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod product_repo;
