//! Product validation-and-consistency service.
//!
//! # Responsibility
//! - Gatekeep external input before it reaches the persistence layer.
//! - Enforce field invariants and cross-record code-value uniqueness.
//! - Remap repository `NotFound` into the domain-level not-found error.
//!
//! # Invariants
//! - Validation order is fixed: identifier, name, quantity, code value,
//!   expiration, price, then uniqueness. First failure wins.
//! - Uniqueness is checked strictly before any mutation; a rejected check
//!   never leaves partial state behind.
//! - Repository `NotFound` never leaks past this layer.

use crate::model::product::{Product, ProductId};
use crate::repo::product_repo::{ProductRepository, RepoError};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

const EXPIRATION_FORMAT: &str = "%Y-%m-%d";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Business-rule and storage errors surfaced to callers above the service.
///
/// Variants carry enough context (identifier, offending value) for logging
/// without string matching; callers compare by variant, not by message.
#[derive(Debug)]
pub enum ServiceError {
    /// Identifier is zero or negative.
    InvalidId(ProductId),
    /// Name is empty after trimming.
    InvalidName,
    /// Quantity is below 1.
    InvalidQuantity(i64),
    /// Code value is empty after trimming.
    InvalidCodeValue,
    /// Expiration is blank or not a valid `YYYY-MM-DD` calendar date.
    InvalidExpiration(String),
    /// Price is below 1.
    InvalidPrice(f64),
    /// Another product already carries this code value.
    DuplicateCodeValue(String),
    /// No product exists under this identifier.
    NotFound(ProductId),
    /// Opaque storage failure, passed through unchanged.
    Storage(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(id) => write!(f, "invalid product identifier: {id}"),
            Self::InvalidName => write!(f, "invalid product name: must not be blank"),
            Self::InvalidQuantity(quantity) => {
                write!(f, "invalid product quantity: {quantity} (must be >= 1)")
            }
            Self::InvalidCodeValue => write!(f, "invalid product code value: must not be blank"),
            Self::InvalidExpiration(value) => {
                write!(f, "invalid product expiration `{value}`: expected YYYY-MM-DD")
            }
            Self::InvalidPrice(price) => {
                write!(f, "invalid product price: {price} (must be >= 1)")
            }
            Self::DuplicateCodeValue(code_value) => {
                write!(f, "product code value `{code_value}` already exists")
            }
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

/// Outcome of a successful update call.
///
/// `Unchanged` means the submitted record already matched the stored record
/// field by field and no write was issued; boundaries can map it to a
/// distinct status instead of reporting a write that never happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    Unchanged,
}

/// Validation-and-consistency service over a product repository.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns all products. Pure passthrough, no validation.
    pub fn get_all(&self) -> ServiceResult<Vec<Product>> {
        self.repo.get_all().map_err(ServiceError::Storage)
    }

    /// Returns one product by identifier.
    ///
    /// Identifier validity is checked before existence, so `id < 1` yields
    /// `InvalidId` even when no storage is reachable.
    pub fn get_by_id(&self, id: ProductId) -> ServiceResult<Product> {
        if id < 1 {
            return Err(ServiceError::InvalidId(id));
        }

        match self.repo.get_by_id(id) {
            Ok(product) => Ok(product),
            Err(RepoError::NotFound(id)) => Err(ServiceError::NotFound(id)),
            Err(err) => Err(ServiceError::Storage(err)),
        }
    }

    /// Validates and persists a new product, returning it with the assigned
    /// identifier.
    ///
    /// # Contract
    /// - Field checks run in fixed order and stop at the first failure.
    /// - The code-value existence check runs strictly before the insert; a
    ///   duplicate is rejected without touching storage.
    /// - An insert that still hits the schema unique index (two concurrent
    ///   creates passing the check) is reported as `DuplicateCodeValue`, not
    ///   as an opaque storage failure.
    pub fn create(&self, mut product: Product) -> ServiceResult<Product> {
        validate_fields(&product)?;

        if self
            .repo
            .exists(&product.code_value)
            .map_err(ServiceError::Storage)?
        {
            return Err(ServiceError::DuplicateCodeValue(product.code_value));
        }

        match self.repo.create(&product) {
            Ok(id) => {
                product.id = id;
                info!(
                    "event=product_create module=service status=ok id={} code_value={}",
                    product.id, product.code_value
                );
                Ok(product)
            }
            Err(err) if err.is_unique_violation() => {
                Err(ServiceError::DuplicateCodeValue(product.code_value))
            }
            Err(err) => Err(ServiceError::Storage(err)),
        }
    }

    /// Validates and applies a full-record replacement.
    ///
    /// # Contract
    /// - Same field checks as [`create`](Self::create), preceded by an
    ///   identifier check.
    /// - A payload identical to the stored record returns
    ///   `UpdateOutcome::Unchanged` without issuing a write.
    /// - The uniqueness check excludes the record's own identifier, so a
    ///   product keeps its code value across updates.
    pub fn update(&self, product: &Product) -> ServiceResult<UpdateOutcome> {
        if product.id < 1 {
            return Err(ServiceError::InvalidId(product.id));
        }
        validate_fields(product)?;

        let current = match self.repo.get_by_id(product.id) {
            Ok(current) => current,
            Err(RepoError::NotFound(id)) => return Err(ServiceError::NotFound(id)),
            Err(err) => return Err(ServiceError::Storage(err)),
        };

        if current == *product {
            info!(
                "event=product_update module=service status=unchanged id={}",
                product.id
            );
            return Ok(UpdateOutcome::Unchanged);
        }

        if self
            .repo
            .exists_with_different_id(product.id, &product.code_value)
            .map_err(ServiceError::Storage)?
        {
            return Err(ServiceError::DuplicateCodeValue(product.code_value.clone()));
        }

        match self.repo.update(product) {
            Ok(()) => {
                info!(
                    "event=product_update module=service status=ok id={}",
                    product.id
                );
                Ok(UpdateOutcome::Updated)
            }
            Err(RepoError::NotFound(id)) => Err(ServiceError::NotFound(id)),
            Err(err) if err.is_unique_violation() => {
                Err(ServiceError::DuplicateCodeValue(product.code_value.clone()))
            }
            Err(err) => Err(ServiceError::Storage(err)),
        }
    }

    /// Physically deletes one product by identifier.
    pub fn delete(&self, id: ProductId) -> ServiceResult<()> {
        if id < 1 {
            return Err(ServiceError::InvalidId(id));
        }

        match self.repo.delete(id) {
            Ok(()) => {
                info!("event=product_delete module=service status=ok id={id}");
                Ok(())
            }
            Err(RepoError::NotFound(id)) => Err(ServiceError::NotFound(id)),
            Err(err) => Err(ServiceError::Storage(err)),
        }
    }
}

/// Ordered field validation shared by create and update.
///
/// Stops at the first failing check so error precedence stays deterministic.
fn validate_fields(product: &Product) -> ServiceResult<()> {
    if product.name.trim().is_empty() {
        return Err(ServiceError::InvalidName);
    }
    if product.quantity < 1 {
        return Err(ServiceError::InvalidQuantity(product.quantity));
    }
    if product.code_value.trim().is_empty() {
        return Err(ServiceError::InvalidCodeValue);
    }
    if product.expiration.trim().is_empty() || !is_valid_expiration(&product.expiration) {
        return Err(ServiceError::InvalidExpiration(product.expiration.clone()));
    }
    // Negated comparison so NaN fails the check too.
    if !(product.price >= 1.0) {
        return Err(ServiceError::InvalidPrice(product.price));
    }
    Ok(())
}

/// Accepts exactly `YYYY-MM-DD` naming a real calendar date.
///
/// The length guard pins the zero-padded wire shape; `NaiveDate` parsing
/// rejects impossible dates like month 13 or February 30.
fn is_valid_expiration(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, EXPIRATION_FORMAT).is_ok()
}

#[cfg(test)]
mod tests {
    use super::is_valid_expiration;

    #[test]
    fn expiration_accepts_strict_iso_dates() {
        assert!(is_valid_expiration("2025-12-31"));
        assert!(is_valid_expiration("2024-02-29"));
    }

    #[test]
    fn expiration_rejects_malformed_or_impossible_dates() {
        assert!(!is_valid_expiration("2025-13-01"));
        assert!(!is_valid_expiration("2025-02-30"));
        assert!(!is_valid_expiration("2025-1-01"));
        assert!(!is_valid_expiration("31-12-2025"));
        assert!(!is_valid_expiration("2025/12/31"));
        assert!(!is_valid_expiration(""));
    }
}
