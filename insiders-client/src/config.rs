//! Client configuration

use std::str::FromStr;

use shared::models::SchemaKind;

use crate::ClientError;

/// Default backend (production deployment)
pub const DEFAULT_BASE_URL: &str = "https://beveragekingbackend-production.up.railway.app/api";

/// Backend revision the client talks to
///
/// Revisions differ in sign-up field names and in record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendProfile {
    /// `cus_name` / `mobile` sign-up, fixed records
    Legacy,
    /// `name` / `phone` / `isEmployee` sign-up, fixed records
    #[default]
    Fixed,
    /// Schema-less records under `dynamicFields`
    Dynamic,
}

impl BackendProfile {
    /// Record shape this revision returns
    pub fn schema(self) -> SchemaKind {
        match self {
            Self::Legacy | Self::Fixed => SchemaKind::Fixed,
            Self::Dynamic => SchemaKind::Dynamic,
        }
    }
}

impl FromStr for BackendProfile {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "fixed" => Ok(Self::Fixed),
            "dynamic" => Ok(Self::Dynamic),
            other => Err(ClientError::Config(format!("unknown backend profile: {other}"))),
        }
    }
}

/// Body encoding for the login endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthEncoding {
    /// `application/x-www-form-urlencoded`
    #[default]
    Form,
    /// `application/json`
    Json,
}

impl FromStr for AuthEncoding {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "form" => Ok(Self::Form),
            "json" => Ok(Self::Json),
            other => Err(ClientError::Config(format!("unknown auth encoding: {other}"))),
        }
    }
}

/// Client configuration for connecting to the backend
///
/// # Environment
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | INSIDERS_API_BASE_URL | production URL | Base URL, endpoint paths are appended |
/// | INSIDERS_TIMEOUT_SECS | 30 | Per-request timeout |
/// | INSIDERS_BACKEND_PROFILE | fixed | legacy / fixed / dynamic |
/// | INSIDERS_AUTH_ENCODING | form | form / json |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Backend revision
    pub profile: BackendProfile,

    /// Login body encoding
    pub auth_encoding: AuthEncoding,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            profile: BackendProfile::default(),
            auth_encoding: AuthEncoding::default(),
        }
    }

    /// Load from environment variables, falling back to defaults.
    ///
    /// Unparsable profile / encoding values are a config error rather than
    /// a silent default.
    pub fn from_env() -> Result<Self, ClientError> {
        let mut config = Self::new(
            std::env::var("INSIDERS_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
        );
        config.timeout = std::env::var("INSIDERS_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(30);
        if let Ok(profile) = std::env::var("INSIDERS_BACKEND_PROFILE") {
            config.profile = profile.parse()?;
        }
        if let Ok(encoding) = std::env::var("INSIDERS_AUTH_ENCODING") {
            config.auth_encoding = encoding.parse()?;
        }
        Ok(config)
    }

    /// Set the backend revision
    pub fn with_profile(mut self, profile: BackendProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the login body encoding
    pub fn with_auth_encoding(mut self, encoding: AuthEncoding) -> Self {
        self.auth_encoding = encoding;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parse() {
        assert_eq!("Legacy".parse::<BackendProfile>().unwrap(), BackendProfile::Legacy);
        assert_eq!(" dynamic ".parse::<BackendProfile>().unwrap(), BackendProfile::Dynamic);
        assert!("v2".parse::<BackendProfile>().is_err());
    }

    #[test]
    fn test_profile_schema() {
        assert_eq!(BackendProfile::Legacy.schema(), SchemaKind::Fixed);
        assert_eq!(BackendProfile::Dynamic.schema(), SchemaKind::Dynamic);
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://localhost:9000")
            .with_profile(BackendProfile::Legacy)
            .with_auth_encoding(AuthEncoding::Json)
            .with_timeout(5);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout, 5);
        assert_eq!(config.profile, BackendProfile::Legacy);
        assert_eq!(config.auth_encoding, AuthEncoding::Json);
        assert_eq!(ClientConfig::default().base_url, DEFAULT_BASE_URL);
    }
}
