//! Persistence module
//!
//! SQLite storage for credentials and the request history.

pub mod connection;
mod credential_store;
mod error;
pub mod migrations;
mod request_store;

pub use connection::{ConnectionPool, DatabaseError, PooledConn, create_pool};
pub use credential_store::SqliteCredentialStore;
pub use request_store::SqliteRequestStore;
