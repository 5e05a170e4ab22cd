use std::error::Error as _;
use std::time::Instant;

use hyper::ext::ReasonPhrase;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, InvalidHeaderValue};
use reqwest::redirect::Policy;
use tracing::{info, instrument, warn};

use crate::configuration::{ProbeMethod, ProbeSettings};
use crate::domain::{ProbeResult, TargetUrl};
use crate::error::CheckError;

const UNKNOWN_STATUS_TEXT: &str = "Unknown Status";

#[derive(Debug, thiserror::Error)]
pub enum ProberBuildError {
    #[error("invalid Accept header: {0}")]
    Header(#[from] InvalidHeaderValue),

    #[error("failed to create client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Sends one request per check with a client configured once at startup.
///
/// The client is shared by every request handler; it is never mutated after
/// construction, only its connection pool changes.
#[derive(Debug, Clone)]
pub struct StatusProber {
    client: reqwest::Client,
    method: ProbeMethod,
    follow_redirects: bool,
}

impl StatusProber {
    pub fn new(settings: &ProbeSettings) -> Result<Self, ProberBuildError> {
        let redirect = if settings.follow_redirects {
            Policy::limited(settings.max_redirects)
        } else {
            Policy::none()
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_str(&settings.accept)?);

        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .redirect(redirect)
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            method: settings.method,
            follow_redirects: settings.follow_redirects,
        })
    }

    pub fn method(&self) -> ProbeMethod {
        self.method
    }

    pub fn follows_redirects(&self) -> bool {
        self.follow_redirects
    }

    /// Probes `target` and reports the remote status with its reason phrase.
    ///
    /// Any remote status, 4xx and 5xx included, is a successful probe. Only
    /// failing to get a response at all is an error.
    #[instrument(level = "info", skip_all, fields(url = %target, method = %self.method))]
    pub async fn probe(&self, target: &TargetUrl) -> Result<ProbeResult, CheckError> {
        let started = Instant::now();
        let response = self
            .client
            .request(self.method.as_method(), target.url().clone())
            .send()
            .await
            .map_err(|e| {
                let message = describe(&e);
                warn!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    timeout = e.is_timeout(),
                    error = %message,
                    "probe failed"
                );
                if e.is_timeout() {
                    CheckError::TransportTimeout(message)
                } else {
                    CheckError::Transport(message)
                }
            })?;

        // The body is never read; dropping the response releases the connection.
        let status = response.status();
        info!(
            status = status.as_u16(),
            final_url = %response.url(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "probe completed"
        );

        // hyper only records the phrase when it differs from the canonical one.
        let reason = response
            .extensions()
            .get::<ReasonPhrase>()
            .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| UNKNOWN_STATUS_TEXT.to_string());

        Ok(ProbeResult::new(status.as_u16(), reason))
    }
}

/// Flattens the error and its source chain into one line. The top-level
/// `reqwest` message only names the URL; the cause sits further down.
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
