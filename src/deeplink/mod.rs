// Deep-link address state
// The address is process-wide state: read once at startup, written on submit

use tracing::debug;
use url::Url;

use crate::lookup::LookupQuery;

/// Query parameter carrying the creature name, both on the wire and in the
/// shareable address.
pub const QUERY_PARAM: &str = "pokemon_name";

/// The session's visible address and its history stack.
///
/// Nothing else mutates the address. The initial query is readable exactly
/// once; every user-submitted lookup pushes exactly one new entry with the
/// query encoded as [`QUERY_PARAM`].
pub struct AddressBar {
    entries: Vec<Url>,
    initial_read: bool,
}

impl AddressBar {
    /// Starts a session at the given address.
    pub fn at(initial: Url) -> Self {
        Self {
            entries: vec![initial],
            initial_read: false,
        }
    }

    /// Builds the starting address from a launch argument.
    ///
    /// Accepts a full URL, a bare `?pokemon_name=...` query string, or a
    /// plain creature name; the latter two are resolved against `base`.
    pub fn from_launch_arg(arg: &str, base: &Url) -> Self {
        if let Ok(url) = Url::parse(arg) {
            return Self::at(url);
        }

        let mut url = base.clone();
        if let Some(query) = arg.strip_prefix('?') {
            url.set_query(Some(query));
        } else {
            url.query_pairs_mut().clear().append_pair(QUERY_PARAM, arg);
        }
        Self::at(url)
    }

    /// Extracts the deep-linked query from the starting address.
    ///
    /// Readable exactly once; later calls return `None` so a restored query
    /// cannot re-trigger lookups mid-session. A missing or blank parameter
    /// also yields `None`.
    pub fn initial_query(&mut self) -> Option<LookupQuery> {
        if self.initial_read {
            return None;
        }
        self.initial_read = true;

        let raw = self
            .current()
            .query_pairs()
            .find(|(key, _)| key == QUERY_PARAM)
            .map(|(_, value)| value.into_owned())?;
        LookupQuery::parse(&raw).ok()
    }

    /// Rewrites the address to encode the query, pushing one history entry.
    pub fn publish(&mut self, query: &LookupQuery) {
        let mut next = self.current().clone();
        next.query_pairs_mut()
            .clear()
            .append_pair(QUERY_PARAM, query.as_str());
        debug!(address = %next, "address published");
        self.entries.push(next);
    }

    pub fn current(&self) -> &Url {
        // entries starts non-empty and only ever grows
        self.entries.last().expect("address history is never empty")
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }
}
