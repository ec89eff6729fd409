// HTTP client for the lookup endpoint
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::api::models::{ApiErrorBody, PokemonRecord};
use crate::api::RecordSource;
use crate::deeplink::QUERY_PARAM;
use crate::error::LookupError;
use crate::lookup::LookupQuery;

/// Client for the remote record service.
///
/// Stateless beyond the connection pool; safe to call repeatedly. Requests
/// carry no timeout, so an unanswered lookup stays pending until it resolves.
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Builds the lookup URL with the creature name as a query parameter.
    fn lookup_url(&self, query: &LookupQuery) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair(QUERY_PARAM, query.as_str());
        url
    }
}

#[async_trait]
impl RecordSource for ApiClient {
    async fn fetch_record(&self, query: &LookupQuery) -> Result<PokemonRecord, LookupError> {
        let url = self.lookup_url(query);
        debug!(%url, "looking up record");

        let response = self.http.get(url).send().await.map_err(|err| {
            warn!("lookup request failed: {err}");
            LookupError::Transport
        })?;

        let status = response.status();
        if !status.is_success() {
            // The service reports failures as {"msg": "..."}; anything else
            // counts as a transport problem.
            return Err(match response.json::<ApiErrorBody>().await {
                Ok(body) => LookupError::Reported(body.msg),
                Err(err) => {
                    warn!(%status, "unreadable error body: {err}");
                    LookupError::Transport
                }
            });
        }

        response.json::<PokemonRecord>().await.map_err(|err| {
            warn!("malformed record body: {err}");
            LookupError::Transport
        })
    }

    async fn fetch_cue(&self, url: &str) -> Result<Bytes, LookupError> {
        debug!(url, "downloading cry audio");

        let response = self.http.get(url).send().await.map_err(|err| {
            warn!("cry download failed: {err}");
            LookupError::Transport
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "cry download rejected");
            return Err(LookupError::Transport);
        }

        response.bytes().await.map_err(|err| {
            warn!("cry payload unreadable: {err}");
            LookupError::Transport
        })
    }
}
