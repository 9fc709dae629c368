use rusqlite::Connection;
use stockroom_core::db::open_db_in_memory;
use stockroom_core::{Product, ProductRepository, RepoError, SqliteProductRepository};

fn sample(code_value: &str) -> Product {
    Product::new("Widget", 5, code_value, true, "2025-12-31", 9.99)
}

#[test]
fn create_assigns_identifier_and_get_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let product = sample("W-1");
    let id = repo.create(&product).unwrap();
    assert!(id >= 1);

    let loaded = repo.get_by_id(id).unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.name, "Widget");
    assert_eq!(loaded.quantity, 5);
    assert_eq!(loaded.code_value, "W-1");
    assert!(loaded.is_published);
    assert_eq!(loaded.expiration, "2025-12-31");
    assert_eq!(loaded.price, 9.99);
}

#[test]
fn get_all_returns_empty_when_no_rows_exist() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn get_all_returns_every_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    repo.create(&sample("W-1")).unwrap();
    repo.create(&sample("W-2")).unwrap();

    let products = repo.get_all().unwrap();
    assert_eq!(products.len(), 2);
}

#[test]
fn get_by_id_not_found_for_missing_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let err = repo.get_by_id(42).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(42)));
}

#[test]
fn update_replaces_full_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let mut product = sample("W-1");
    product.id = repo.create(&product).unwrap();

    product.name = "Widget Mk2".to_string();
    product.quantity = 8;
    product.is_published = false;
    product.price = 19.99;
    repo.update(&product).unwrap();

    let loaded = repo.get_by_id(product.id).unwrap();
    assert_eq!(loaded, product);
}

#[test]
fn update_not_found_when_zero_rows_affected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let mut product = sample("W-1");
    product.id = 42;
    let err = repo.update(&product).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(42)));
}

#[test]
fn delete_removes_row_and_reports_not_found_afterwards() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let id = repo.create(&sample("W-1")).unwrap();
    repo.delete(id).unwrap();

    let err = repo.delete(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
    assert!(matches!(repo.get_by_id(id).unwrap_err(), RepoError::NotFound(_)));
}

#[test]
fn exists_checks_code_value_unscoped() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    repo.create(&sample("W-1")).unwrap();

    assert!(repo.exists("W-1").unwrap());
    assert!(!repo.exists("W-2").unwrap());
}

#[test]
fn exists_with_different_id_excludes_own_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let first_id = repo.create(&sample("W-1")).unwrap();
    let second_id = repo.create(&sample("W-2")).unwrap();

    // Own row does not count as a conflict.
    assert!(!repo.exists_with_different_id(first_id, "W-1").unwrap());
    // Another row holding the code does.
    assert!(repo.exists_with_different_id(second_id, "W-1").unwrap());
    // Unknown codes conflict with nothing.
    assert!(!repo.exists_with_different_id(first_id, "W-3").unwrap());
}

#[test]
fn create_surfaces_unique_violation_as_classifiable_db_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    repo.create(&sample("W-1")).unwrap();
    let err = repo.create(&sample("W-1")).unwrap_err();

    assert!(err.is_unique_violation());
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteProductRepository::try_new(&conn).unwrap_err();
    assert!(matches!(err, RepoError::MissingRequiredTable("products")));
}

#[test]
fn read_path_rejects_corrupt_is_published_value() {
    let conn = open_db_in_memory().unwrap();

    conn.execute(
        "INSERT INTO products (name, quantity, code_value, is_published, expiration, price)
         VALUES ('broken', 1, 'B-1', 7, '2025-12-31', 1.0);",
        [],
    )
    .unwrap();

    let repo = SqliteProductRepository::try_new(&conn).unwrap();
    let err = repo.get_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
