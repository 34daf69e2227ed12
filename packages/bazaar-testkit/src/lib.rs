//! Test support: scratch Postgres databases, listing fixtures and an in-memory listing store.

mod database;
mod error;
mod fixture;
mod memory;

pub use database::{TestDatabase, with_test_db};
pub use error::{Error, Result};
pub use fixture::{FIXTURE_NOW, ListingFixture, insert_listing};
pub use memory::MemoryStore;

use std::env;

/// Base DSN for Postgres-backed tests, if configured.
pub fn env_dsn() -> Option<String> {
	env::var("BAZAAR_PG_DSN").ok()
}
