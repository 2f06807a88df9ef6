use thiserror::Error;

/// Failures surfaced to the caller of any fetch or parse operation.
///
/// The portal has no protocol-level expiry signal, so `SessionExpired` is
/// derived from response content. An empty result set is *not* an error:
/// extractors return `Ok` with an empty sequence when the portal explicitly
/// reports no matching data.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The forwarded session cookie is no longer accepted by the portal.
    /// The caller should obtain a fresh cookie; retrying with the same one
    /// will keep failing.
    #[error("session cookie expired or rejected by the portal")]
    SessionExpired,

    /// Network failure, request timeout, or a non-200 status unrelated to
    /// session content.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Zero records without the portal's no-data marker, or an expected
    /// structural element missing. Usually means the upstream markup has
    /// changed and the positional constants need revisiting.
    #[error("unexpected upstream markup: {0}")]
    ParseFailure(&'static str),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::UpstreamUnavailable(err.to_string())
    }
}
