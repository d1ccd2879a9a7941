//! Shared HTTP application state.
//!
//! # Responsibility
//! - Hold the single SQLite connection behind a mutex for handler access.
//!
//! # Invariants
//! - Handlers never hold the connection lock across an await point.

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// State shared by all request handlers.
pub struct AppState {
    /// SQLite connection; rusqlite connections are not Sync, so access is
    /// serialized through this lock.
    pub db: Mutex<Connection>,
}

impl AppState {
    /// Wraps an opened connection for router-wide sharing.
    pub fn new(conn: Connection) -> Arc<Self> {
        Arc::new(Self {
            db: Mutex::new(conn),
        })
    }
}
