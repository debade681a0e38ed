use sqlx::SqlitePool;

use crate::config::Config;
use crate::identity::IdentityHasher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    /// Salted SHA-256 hasher that turns a client IP into the opaque
    /// identity the vote/like ledger is keyed on.
    pub hasher: IdentityHasher,
}
