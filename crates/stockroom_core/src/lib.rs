//! Core domain logic for Stockroom.
//! This crate is the single source of truth for product business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::product::{Product, ProductId};
pub use repo::product_repo::{
    ProductRepository, RepoError, RepoResult, SqliteProductRepository,
};
pub use service::product_service::{
    ProductService, ServiceError, ServiceResult, UpdateOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
