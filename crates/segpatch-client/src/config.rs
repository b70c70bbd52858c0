//! Client configuration
//!
//! [`PatchClientConfig`] names the backend and the account/org/project/
//! environment scope every PATCH is issued against. It loads from TOML:
//!
//! ```toml
//! base_url = "https://app.harness.io/gateway"
//! account = "acc"
//! org = "default"
//! project = "checkout"
//! environment = "production"
//! api_key = "..."
//! timeout_secs = 30
//! ```

use reqwest::Url;
use segpatch_core::Identifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "https://app.harness.io/gateway";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Patch client configuration
///
/// `Debug` output redacts `api_key`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchClientConfig {
    /// Backend base URL, without trailing path
    pub base_url: String,
    /// Account identifier
    pub account: String,
    /// Organization identifier
    pub org: String,
    /// Project identifier
    pub project: String,
    /// Environment identifier
    pub environment: String,
    /// API key sent as `x-api-key`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PatchClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With account/org/project/environment scope
    #[must_use]
    pub fn with_scope(
        mut self,
        account: impl Into<String>,
        org: impl Into<String>,
        project: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        self.account = account.into();
        self.org = org.into();
        self.project = project.into();
        self.environment = environment.into();
        self
    }

    /// With API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded client config");
        Self::from_toml_str(&raw)
    }

    /// Check required fields
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_base_url()?;
        for (field, value) in [
            ("account", &self.account),
            ("org", &self.org),
            ("project", &self.project),
            ("environment", &self.environment),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(field, "must not be empty"));
            }
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("timeout_secs", "must be positive"));
        }
        Ok(())
    }

    /// Scope query parameters, in request order
    #[must_use]
    pub fn scope_query(&self) -> [(&'static str, &str); 4] {
        [
            ("accountIdentifier", self.account.as_str()),
            ("orgIdentifier", self.org.as_str()),
            ("projectIdentifier", self.project.as_str()),
            ("environmentIdentifier", self.environment.as_str()),
        ]
    }

    /// PATCH endpoint of a segment
    ///
    /// The id is appended as a single percent-encoded path segment, so `/`
    /// and `?` stay inside it.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for a bad base URL and
    /// [`ConfigError::InvalidSegment`] for an empty, `.` or `..` id.
    pub fn segment_url(&self, segment: &Identifier) -> Result<Url, ConfigError> {
        if matches!(segment.as_str(), "" | "." | "..") {
            return Err(ConfigError::InvalidSegment(segment.clone()));
        }
        let mut url = self.parsed_base_url()?;
        url.path_segments_mut()
            .map_err(|()| ConfigError::invalid("base_url", "must be an http(s) URL"))?
            .pop_if_empty()
            .extend(["cf", "admin", "segments", segment.as_str()]);
        Ok(url)
    }

    fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|_| ConfigError::invalid("base_url", "must be an http(s) URL"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid("base_url", "must be an http(s) URL"));
        }
        Ok(url)
    }
}

impl fmt::Debug for PatchClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchClientConfig")
            .field("base_url", &self.base_url)
            .field("account", &self.account)
            .field("org", &self.org)
            .field("project", &self.project)
            .field("environment", &self.environment)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for PatchClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            account: String::new(),
            org: String::new(),
            project: String::new(),
            environment: String::new(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Field failed validation
    #[error("invalid config field '{field}': {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// Reason
        reason: &'static str,
    },

    /// Segment id cannot name a URL path segment
    #[error("segment identifier '{0}' cannot be used in a URL path")]
    InvalidSegment(Identifier),
}

impl ConfigError {
    #[inline]
    fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}
