//! SQLite storage implementation for Stockfeed.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `stockfeed-core` and contains:
//! - Database connection pooling and the single-writer actor
//! - Embedded Diesel migrations
//! - The price record repository
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//!
//! ```text
//!   core (domain)
//!         │
//!         ▼
//!   storage-sqlite (this crate)
//!         │
//!         ▼
//!     SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod prices;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use prices::PriceRecordRepository;

// Re-export from stockfeed-core for convenience
pub use stockfeed_core::errors::{DatabaseError, Error, Result};
