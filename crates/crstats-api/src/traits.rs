//! The statistics-service capability used by command handlers.

use crate::query::PlayerQuery;
use async_trait::async_trait;
use crstats_common::Result;

/// A source of raw player statistics documents.
///
/// Implementations return the undecoded response body; decoding and field
/// extraction happen in the caller so that a malformed body can be told apart from
/// an unreachable service.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// Fetches the response body for a player lookup.
    async fn fetch_player(&self, query: &PlayerQuery) -> Result<String>;
}
