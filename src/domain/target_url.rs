use std::fmt;

use url::Url;

use crate::error::CheckError;

const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];

/// An absolute `http(s)` URL that a probe may be sent to.
///
/// Construction only checks that the input is well formed. Whether the URL
/// points back at this service is decided by [`RequestValidator`].
///
/// [`RequestValidator`]: crate::domain::RequestValidator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl {
    url: Url,
}

impl TargetUrl {
    /// Parses a user supplied URL.
    ///
    /// # Arguments
    ///
    /// * `raw` - The URL exactly as submitted, surrounding whitespace allowed.
    ///
    /// # Returns
    ///
    /// Returns `Ok(TargetUrl)` for an absolute URL with an `http` or `https`
    /// scheme and a host, or `Err(CheckError::InvalidInput)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use statusac::domain::TargetUrl;
    ///
    /// let target = TargetUrl::new("https://example.com/docs").unwrap();
    /// assert_eq!(target.as_str(), "https://example.com/docs");
    /// ```
    pub fn new(raw: &str) -> Result<Self, CheckError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CheckError::InvalidInput("URL is required".to_string()));
        }

        let url = Url::parse(raw)
            .map_err(|e| CheckError::InvalidInput(format!("Invalid URL format: {e}")))?;

        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(CheckError::InvalidInput(format!(
                "Invalid URL format: unsupported scheme `{}`",
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(CheckError::InvalidInput(
                "Invalid URL format: missing host".to_string(),
            ));
        }

        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The explicit port, or the scheme's default when none was given.
    pub fn effective_port(&self) -> Option<u16> {
        self.url.port_or_known_default()
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
