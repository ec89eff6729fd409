// Remote lookup service client
// Talks HTTP to the record endpoint and downloads cry payloads

pub mod client;
pub mod models;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::LookupError;
use crate::lookup::LookupQuery;
use models::PokemonRecord;

pub use client::ApiClient;

/// Operations the lookup session needs from the remote service.
///
/// Implemented by [`ApiClient`] for real traffic and by stubs in tests, so
/// session behavior can be exercised without a network.
#[async_trait]
pub trait RecordSource {
    /// Fetches the record for one creature name.
    async fn fetch_record(&self, query: &LookupQuery) -> Result<PokemonRecord, LookupError>;

    /// Downloads the raw audio payload behind a cry URL.
    async fn fetch_cue(&self, url: &str) -> Result<Bytes, LookupError>;
}
