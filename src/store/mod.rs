//! Store Module
//!
//! Data-access seam used by the sweeper, plus the SQLite implementation.

mod identifier;
mod sqlite;


use async_trait::async_trait;

use crate::error::Result;

pub use identifier::{Identifier, SweepTarget};
pub use sqlite::SqliteSessionStore;

// == Public Constants ==
/// Maximum allowed identifier length in bytes
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Expiration column used when none is configured
pub const DEFAULT_EXPIRY_COLUMN: &str = "expires_on";

// == Session Store Trait ==
/// Data-access collaborator capable of deleting expired rows.
///
/// Implementations must evaluate "now" on the data store side so that no
/// client clock is trusted.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Deletes every row of `target` whose expiry is earlier than the
    /// store's current time. Returns the number of rows removed.
    async fn delete_expired(&self, target: &SweepTarget) -> Result<u64>;
}
