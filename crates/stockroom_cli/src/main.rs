//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `stockroom_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use stockroom_core::db::open_db_in_memory;
use stockroom_core::{ProductService, SqliteProductRepository};

fn main() {
    println!("stockroom_core version={}", stockroom_core::core_version());

    // Minimal end-to-end probe: migrated in-memory store, empty catalog.
    match open_db_in_memory() {
        Ok(conn) => match SqliteProductRepository::try_new(&conn) {
            Ok(repo) => {
                let service = ProductService::new(repo);
                match service.get_all() {
                    Ok(products) => println!("stockroom_core products={}", products.len()),
                    Err(err) => eprintln!("stockroom_core probe failed: {err}"),
                }
            }
            Err(err) => eprintln!("stockroom_core repository not ready: {err}"),
        },
        Err(err) => eprintln!("stockroom_core db open failed: {err}"),
    }
}
