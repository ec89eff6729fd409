// Lookup lifecycle
// Orchestrates query validation, the async fetch, the address bar and the
// cue player around one idle -> loading -> (success | failure) cycle

use std::fmt;

use tracing::{debug, warn};

use crate::api::models::PokemonRecord;
use crate::api::RecordSource;
use crate::audio::{CuePlayer, CueSource};
use crate::deeplink::AddressBar;
use crate::error::LookupError;

/// A validated creature name: trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery(String);

impl LookupQuery {
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LookupError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LookupQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the presentation layer renders. Replaced wholesale on every
/// transition, never mutated in place.
#[derive(Debug, Clone)]
pub enum LookupState {
    Idle,
    Loading,
    Success(PokemonRecord),
    Failure(String),
}

/// Handle for a dispatched lookup, returned by the submit operations and
/// consumed by [`LookupSession::resolve`].
#[derive(Debug)]
pub struct PendingLookup {
    seq: u64,
    query: LookupQuery,
}

impl PendingLookup {
    pub fn query(&self) -> &LookupQuery {
        &self.query
    }
}

/// One lookup session: the state machine plus the resources it coordinates.
///
/// The machine cycles for the life of the session; there is no terminal
/// state and a failed lookup always accepts further submissions. Each
/// dispatched lookup gets a monotonically increasing sequence number and a
/// resolution only applies while it is still the newest issued, so a slow
/// response can never overwrite the outcome of a later submission.
pub struct LookupSession<S> {
    source: S,
    player: CuePlayer,
    address: AddressBar,
    state: LookupState,
    issued: u64,
}

impl<S: RecordSource> LookupSession<S> {
    pub fn new(source: S, player: CuePlayer, address: AddressBar) -> Self {
        Self {
            source,
            player,
            address,
            state: LookupState::Idle,
            issued: 0,
        }
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn player(&self) -> &CuePlayer {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut CuePlayer {
        &mut self.player
    }

    pub fn address(&self) -> &AddressBar {
        &self.address
    }

    /// Dispatches a user-submitted lookup.
    ///
    /// Blank input is suppressed locally: no transition, no address change,
    /// `None` returned. A valid query is published to the address bar and
    /// moves the machine to `Loading`, clearing any previous error.
    pub fn submit(&mut self, raw: &str) -> Option<PendingLookup> {
        let query = match LookupQuery::parse(raw) {
            Ok(query) => query,
            Err(_) => {
                debug!("ignoring blank lookup input");
                return None;
            }
        };

        self.address.publish(&query);
        Some(self.begin(query))
    }

    /// Dispatches the deep-linked lookup from the starting address, if any.
    ///
    /// Runs the same transition as [`submit`](Self::submit) but does not
    /// publish: restoring a link must not grow the history it came from.
    pub fn submit_initial(&mut self) -> Option<PendingLookup> {
        let query = self.address.initial_query()?;
        debug!(%query, "restoring deep-linked lookup");
        Some(self.begin(query))
    }

    fn begin(&mut self, query: LookupQuery) -> PendingLookup {
        self.issued += 1;
        self.state = LookupState::Loading;
        PendingLookup {
            seq: self.issued,
            query,
        }
    }

    /// Awaits the fetch for a dispatched lookup and applies its outcome.
    ///
    /// A resolution that is no longer the newest issued is discarded
    /// without touching state, record or audio. On success the cry is
    /// loaded eagerly and the player rebound; on failure the player is left
    /// as it was.
    pub async fn resolve(&mut self, pending: PendingLookup) {
        let outcome = self.source.fetch_record(&pending.query).await;

        if pending.seq != self.issued {
            debug!(
                seq = pending.seq,
                newest = self.issued,
                "discarding stale lookup resolution"
            );
            return;
        }

        match outcome {
            Ok(record) => {
                self.bind_cue(record.cries.clone()).await;
                self.state = LookupState::Success(record);
            }
            Err(err) => {
                self.state = LookupState::Failure(err.to_string());
            }
        }
    }

    /// Downloads the cry behind a successful record and rebinds the player.
    ///
    /// A record without a cry, or one whose cry fails to download, leaves
    /// the handle unbound; the lookup itself still succeeds.
    async fn bind_cue(&mut self, cry_url: Option<String>) {
        match cry_url {
            Some(url) => match self.source.fetch_cue(&url).await {
                Ok(bytes) => self.player.rebind(Some(CueSource::new(url, bytes))),
                Err(err) => {
                    warn!("failed to load cry audio: {err}");
                    self.player.rebind(None);
                }
            },
            None => self.player.rebind(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::StatBlock;
    use async_trait::async_trait;
    use bytes::Bytes;
    use url::Url;

    struct StubSource {
        record: Result<PokemonRecord, LookupError>,
        cue: Result<Bytes, LookupError>,
    }

    impl StubSource {
        fn ok(record: PokemonRecord) -> Self {
            Self {
                record: Ok(record),
                cue: Ok(Bytes::from_static(b"OggS")),
            }
        }

        fn err(err: LookupError) -> Self {
            Self {
                record: Err(err),
                cue: Ok(Bytes::from_static(b"OggS")),
            }
        }
    }

    #[async_trait]
    impl RecordSource for StubSource {
        async fn fetch_record(
            &self,
            _query: &LookupQuery,
        ) -> Result<PokemonRecord, LookupError> {
            self.record.clone()
        }

        async fn fetch_cue(&self, _url: &str) -> Result<Bytes, LookupError> {
            self.cue.clone()
        }
    }

    fn pikachu() -> PokemonRecord {
        PokemonRecord {
            name: Some("pikachu".to_string()),
            height: Some(4),
            weight: Some(60),
            types: Some(vec!["electric".to_string()]),
            abilities: Some(vec!["static".to_string()]),
            stats: StatBlock {
                attack: Some(55),
                hp: Some(35),
                ..Default::default()
            },
            sprites: vec!["http://img.example/pikachu.png".to_string()],
            cries: Some("http://cries.example/pikachu.ogg".to_string()),
        }
    }

    fn session(source: StubSource) -> LookupSession<StubSource> {
        let address = AddressBar::at(Url::parse("http://localhost:8000/").unwrap());
        LookupSession::new(source, CuePlayer::new(), address)
    }

    #[test]
    fn test_submit_moves_to_loading() {
        let mut session = session(StubSource::ok(pikachu()));
        let pending = session.submit("pikachu").unwrap();
        assert_eq!(pending.query().as_str(), "pikachu");
        assert!(matches!(session.state(), LookupState::Loading));
    }

    #[test]
    fn test_submit_trims_input() {
        let mut session = session(StubSource::ok(pikachu()));
        let pending = session.submit("  pikachu  ").unwrap();
        assert_eq!(pending.query().as_str(), "pikachu");
        assert_eq!(
            session.address().current().as_str(),
            "http://localhost:8000/?pokemon_name=pikachu"
        );
    }

    #[test]
    fn test_blank_submit_is_a_noop() {
        let mut session = session(StubSource::ok(pikachu()));
        assert!(session.submit("   ").is_none());
        assert!(matches!(session.state(), LookupState::Idle));
        assert_eq!(session.address().history_len(), 1);
    }

    #[test]
    fn test_submit_publishes_one_history_entry() {
        let mut session = session(StubSource::ok(pikachu()));
        session.submit("pikachu").unwrap();
        assert_eq!(session.address().history_len(), 2);
    }

    #[tokio::test]
    async fn test_successful_lookup_binds_cry() {
        let mut session = session(StubSource::ok(pikachu()));
        let pending = session.submit("pikachu").unwrap();
        session.resolve(pending).await;

        match session.state() {
            LookupState::Success(record) => {
                assert_eq!(record.stats.hp, Some(35));
                assert_eq!(record.name.as_deref(), Some("pikachu"));
            }
            other => panic!("expected success, got {other:?}"),
        }
        assert_eq!(
            session.player().current_url(),
            Some("http://cries.example/pikachu.ogg")
        );
        assert!(!session.player().is_playing());
    }

    #[tokio::test]
    async fn test_record_without_cry_unbinds_player() {
        let mut record = pikachu();
        record.cries = None;
        let mut session = session(StubSource::ok(record));

        session
            .player_mut()
            .rebind(Some(CueSource::new("http://old", Bytes::from_static(b"x"))));

        let pending = session.submit("ditto").unwrap();
        session.resolve(pending).await;

        assert!(matches!(session.state(), LookupState::Success(_)));
        assert!(!session.player().has_cue());
    }

    #[tokio::test]
    async fn test_cue_download_failure_still_succeeds() {
        let mut source = StubSource::ok(pikachu());
        source.cue = Err(LookupError::Transport);
        let mut session = session(source);

        let pending = session.submit("pikachu").unwrap();
        session.resolve(pending).await;

        assert!(matches!(session.state(), LookupState::Success(_)));
        assert!(!session.player().has_cue());
    }

    #[tokio::test]
    async fn test_reported_error_becomes_failure_verbatim() {
        let mut session = session(StubSource::err(LookupError::Reported(
            "Pokemon not found".to_string(),
        )));

        let bound = CueSource::new("http://cries.example/old.ogg", Bytes::from_static(b"x"));
        session.player_mut().rebind(Some(bound));

        let pending = session.submit("not-a-real-creature").unwrap();
        session.resolve(pending).await;

        match session.state() {
            LookupState::Failure(msg) => assert_eq!(msg, "Pokemon not found"),
            other => panic!("expected failure, got {other:?}"),
        }
        // A failed lookup leaves the audio handle exactly as it was.
        assert_eq!(
            session.player().current_url(),
            Some("http://cries.example/old.ogg")
        );
    }

    #[tokio::test]
    async fn test_transport_error_uses_generic_message() {
        let mut session = session(StubSource::err(LookupError::Transport));
        let pending = session.submit("pikachu").unwrap();
        session.resolve(pending).await;

        match session.state() {
            LookupState::Failure(msg) => assert_eq!(msg, "Erro ao acessar a API"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stale_resolution_is_discarded() {
        let mut session = session(StubSource::ok(pikachu()));
        let first = session.submit("pikachu").unwrap();
        let second = session.submit("charmander").unwrap();

        session.resolve(first).await;
        assert!(
            matches!(session.state(), LookupState::Loading),
            "stale resolution must not change state"
        );

        session.resolve(second).await;
        assert!(matches!(session.state(), LookupState::Success(_)));
    }

    #[tokio::test]
    async fn test_resubmit_after_failure_clears_error() {
        let mut session = session(StubSource::err(LookupError::Transport));
        let pending = session.submit("pikachu").unwrap();
        session.resolve(pending).await;
        assert!(matches!(session.state(), LookupState::Failure(_)));

        session.submit("pikachu").unwrap();
        assert!(matches!(session.state(), LookupState::Loading));
    }

    #[tokio::test]
    async fn test_deep_link_dispatches_without_publishing() {
        let address =
            AddressBar::at(Url::parse("http://localhost:8000/?pokemon_name=charmander").unwrap());
        let mut session =
            LookupSession::new(StubSource::ok(pikachu()), CuePlayer::new(), address);

        let pending = session.submit_initial().unwrap();
        assert_eq!(pending.query().as_str(), "charmander");
        assert!(matches!(session.state(), LookupState::Loading));
        assert_eq!(session.address().history_len(), 1);

        session.resolve(pending).await;
        assert!(matches!(session.state(), LookupState::Success(_)));
    }

    #[test]
    fn test_deep_link_absent_is_noop() {
        let mut session = session(StubSource::ok(pikachu()));
        assert!(session.submit_initial().is_none());
        assert!(matches!(session.state(), LookupState::Idle));
    }
}
