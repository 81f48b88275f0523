use serde_json::Value;
use thiserror::Error;

/// Failures surfaced by the delivery client and mapper.
///
/// "No results" is not represented here: an empty enumeration or an unknown
/// slug is a valid outcome, reported through the operations' return types.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The endpoint could not be reached, the response was not JSON, or the
    /// HTTP status signalled failure. Never retried.
    #[error("delivery API request failed")]
    Transport(#[from] reqwest::Error),

    /// The endpoint accepted the request but reported query-level errors.
    /// The raw payload is logged before this is raised.
    #[error("delivery API reported {} query error(s)", errors.len())]
    RemoteQuery { errors: Vec<Value> },

    /// The response decoded as JSON but did not match the expected shape
    /// for the query that produced it.
    #[error("delivery API response did not match the expected shape")]
    SchemaMismatch(#[source] serde_json::Error),

    /// More than one property matched a slug that must be unique. Signals a
    /// remote-data invariant violation; no local recovery is attempted.
    #[error("{count} properties returned for slug `{slug}`, expected at most one")]
    DataIntegrity { slug: String, count: usize },
}
