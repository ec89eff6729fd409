// Lookup error taxonomy
use thiserror::Error;

/// Errors a single lookup cycle can surface.
///
/// `Reported` carries the service's own failure message and displays it
/// verbatim. `Transport` covers everything the service never got to answer
/// (network failures, unreadable bodies) behind one fixed user-facing
/// message; the underlying cause is logged where it happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Query was empty after trimming; rejected before dispatch.
    #[error("empty lookup query")]
    EmptyQuery,

    /// The service answered with a structured failure body.
    #[error("{0}")]
    Reported(String),

    /// The service was unreachable or its payload could not be read.
    #[error("Erro ao acessar a API")]
    Transport,
}
