//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and existence-check APIs over `products` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every statement is parameterized; caller data never lands in SQL text.
//! - Zero rows returned/affected by a single-record statement surfaces as
//!   `RepoError::NotFound`, never as a silent success.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::product::{Product, ProductId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    quantity,
    code_value,
    is_published,
    expiration,
    price
FROM products";

const PRODUCT_COLUMNS: [&str; 7] = [
    "id",
    "name",
    "quantity",
    "code_value",
    "is_published",
    "expiration",
    "price",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for product persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ProductId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl RepoError {
    /// Returns whether this error is a SQLite unique-constraint rejection.
    ///
    /// The service layer uses this to classify a lost check-then-insert race
    /// on `code_value` as a duplicate rather than an opaque storage failure.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _))) => {
                err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            }
            _ => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for product persistence.
///
/// Implementations own the store connection and nothing else: uniqueness
/// policy, field validation and not-found remapping live in the service.
pub trait ProductRepository {
    /// Returns all products in store natural order; empty when none exist.
    fn get_all(&self) -> RepoResult<Vec<Product>>;
    /// Returns one product by identifier, or `NotFound` when no row matches.
    fn get_by_id(&self, id: ProductId) -> RepoResult<Product>;
    /// Inserts one product and returns the store-assigned identifier.
    fn create(&self, product: &Product) -> RepoResult<ProductId>;
    /// Replaces the full record by identifier; `NotFound` when no row changed.
    fn update(&self, product: &Product) -> RepoResult<()>;
    /// Physically deletes one product; `NotFound` when no row changed.
    fn delete(&self, id: ProductId) -> RepoResult<()>;
    /// Returns whether any product carries the given code value.
    fn exists(&self, code_value: &str) -> RepoResult<bool>;
    /// Returns whether a product other than `id` carries the given code value.
    fn exists_with_different_id(&self, id: ProductId, code_value: &str) -> RepoResult<bool>;
}

/// SQLite-backed product repository.
#[derive(Debug)]
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn get_all(&self) -> RepoResult<Vec<Product>> {
        let mut stmt = self.conn.prepare(&format!("{PRODUCT_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }

    fn get_by_id(&self, id: ProductId) -> RepoResult<Product> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => parse_product_row(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn create(&self, product: &Product) -> RepoResult<ProductId> {
        self.conn.execute(
            "INSERT INTO products (
                name,
                quantity,
                code_value,
                is_published,
                expiration,
                price
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                product.name.as_str(),
                product.quantity,
                product.code_value.as_str(),
                bool_to_int(product.is_published),
                product.expiration.as_str(),
                product.price,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, product: &Product) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE products
             SET
                name = ?1,
                quantity = ?2,
                code_value = ?3,
                is_published = ?4,
                expiration = ?5,
                price = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?7;",
            params![
                product.name.as_str(),
                product.quantity,
                product.code_value.as_str(),
                bool_to_int(product.is_published),
                product.expiration.as_str(),
                product.price,
                product.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(product.id));
        }

        Ok(())
    }

    fn delete(&self, id: ProductId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", params![id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn exists(&self, code_value: &str) -> RepoResult<bool> {
        let found: i64 = self.conn.query_row(
            "SELECT EXISTS (
                SELECT 1 FROM products WHERE code_value = ?1
            );",
            params![code_value],
            |row| row.get(0),
        )?;

        Ok(found != 0)
    }

    fn exists_with_different_id(&self, id: ProductId, code_value: &str) -> RepoResult<bool> {
        let found: i64 = self.conn.query_row(
            "SELECT EXISTS (
                SELECT 1 FROM products WHERE code_value = ?1 AND id != ?2
            );",
            params![code_value, id],
            |row| row.get(0),
        )?;

        Ok(found != 0)
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let id: ProductId = row.get("id")?;
    if id < 1 {
        return Err(RepoError::InvalidData(format!(
            "invalid identifier `{id}` in products.id"
        )));
    }

    let is_published = match row.get::<_, i64>("is_published")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_published value `{other}` in products.is_published"
            )));
        }
    };

    Ok(Product {
        id,
        name: row.get("name")?,
        quantity: row.get("quantity")?,
        code_value: row.get("code_value")?,
        is_published,
        expiration: row.get("expiration")?,
        price: row.get("price")?,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "products")? {
        return Err(RepoError::MissingRequiredTable("products"));
    }

    for column in PRODUCT_COLUMNS {
        if !column_exists(conn, "products", column)? {
            return Err(RepoError::InvalidData(format!(
                "products table is missing required column `{column}`"
            )));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
    )?;
    let mut rows = stmt.query(params![table])?;
    Ok(rows.next()?.is_some())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;

    while let Some(row) = rows.next()? {
        let name: String = row.get("name")?;
        if name == column {
            return Ok(true);
        }
    }

    Ok(false)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
