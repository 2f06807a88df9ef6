use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::FetchError;

/// Root of every portal endpoint path.
pub const BASE_URL: &str = "http://zhjw.qfnu.edu.cn";

// The portal re-renders its login page (titled "用户登录") inline when the
// session cookie is stale, usually still with a 200 status. This marker is
// the only expiry signal it gives.
const LOGIN_MARKER: &str = "用户登录";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// Bounded so an unresponsive upstream cannot hang a request indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Outbound client for one forwarded session cookie.
///
/// Every response passes the validity check before its body is handed to an
/// extractor, so extractors can assume authenticated content. The cookie is
/// forwarded verbatim and never inspected. No retries, no backoff: a failed
/// attempt surfaces immediately as a typed error.
pub struct SessionClient {
    http: Client,
    cookie: String,
}

impl SessionClient {
    pub fn new(cookie: impl Into<String>) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(SessionClient {
            http,
            cookie: cookie.into(),
        })
    }

    /// POST an urlencoded form to `path` and return the validated body.
    /// `.form()` sets the `application/x-www-form-urlencoded` content type.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<String, FetchError> {
        let response = self
            .http
            .post(format!("{}{}", BASE_URL, path))
            .header("Cookie", &self.cookie)
            .header("User-Agent", USER_AGENT)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        check_response(status, &body)?;
        Ok(body)
    }

    /// GET `path` and return the validated body.
    pub async fn get(&self, path: &str) -> Result<String, FetchError> {
        let response = self
            .http
            .get(format!("{}{}", BASE_URL, path))
            .header("Cookie", &self.cookie)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        check_response(status, &body)?;
        Ok(body)
    }
}

/// Uniform post-response check, run before any extractor sees the body.
///
/// The login marker is checked first: an expired session can come back as a
/// 200 page or as a redirect target, and either way it must classify as
/// `SessionExpired` rather than a generic upstream failure.
fn check_response(status: StatusCode, body: &str) -> Result<(), FetchError> {
    if body.contains(LOGIN_MARKER) {
        return Err(FetchError::SessionExpired);
    }
    if status != StatusCode::OK {
        return Err(FetchError::UpstreamUnavailable(format!(
            "status {}",
            status
        )));
    }
    Ok(())
}
