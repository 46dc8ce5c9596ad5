//! Google Ads credentials and endpoints

use crate::error::{Error, Result};

pub const DEFAULT_ENDPOINT: &str = "https://googleads.googleapis.com";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_API_VERSION: &str = "v21";

/// Everything needed to build a [`GoogleAdsClient`](super::GoogleAdsClient)
#[derive(Clone)]
pub struct AdsConfig {
    pub developer_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub login_customer_id: Option<String>,
    pub api_version: String,
    pub endpoint: String,
    pub token_url: String,
}

// Secrets stay out of logs
impl std::fmt::Debug for AdsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdsConfig")
            .field("client_id", &self.client_id)
            .field("login_customer_id", &self.login_customer_id)
            .field("api_version", &self.api_version)
            .field("endpoint", &self.endpoint)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl AdsConfig {
    /// Build a config from the four required credentials, using the public
    /// Google endpoints
    pub fn new(
        developer_token: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            developer_token: developer_token.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            login_customer_id: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }

    /// Read credentials and endpoints from `GOOGLE_ADS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            get(key).ok_or_else(|| {
                Error::Config(format!("Missing required environment variable {}", key))
            })
        };

        let mut config = Self::new(
            required("GOOGLE_ADS_DEVELOPER_TOKEN")?,
            required("GOOGLE_ADS_CLIENT_ID")?,
            required("GOOGLE_ADS_CLIENT_SECRET")?,
            required("GOOGLE_ADS_REFRESH_TOKEN")?,
        );

        config.login_customer_id = get("GOOGLE_ADS_LOGIN_CUSTOMER_ID")
            .map(|id| id.chars().filter(char::is_ascii_digit).collect::<String>())
            .filter(|id| !id.is_empty());
        if let Some(version) = get("GOOGLE_ADS_API_VERSION") {
            config.api_version = version;
        }
        if let Some(endpoint) = get("GOOGLE_ADS_ENDPOINT") {
            config.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(token_url) = get("GOOGLE_ADS_TOKEN_URL") {
            config.token_url = token_url;
        }

        Ok(config)
    }

    /// Point both the API and the token endpoint at one base URL (mock servers)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.endpoint = base.to_string();
        self.token_url = format!("{}/token", base);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("GOOGLE_ADS_DEVELOPER_TOKEN", "dev-token"),
        ("GOOGLE_ADS_CLIENT_ID", "client-id"),
        ("GOOGLE_ADS_CLIENT_SECRET", "secret"),
        ("GOOGLE_ADS_REFRESH_TOKEN", "refresh"),
    ];

    #[test]
    fn test_from_lookup_defaults() {
        let config = AdsConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.developer_token, "dev-token");
        assert_eq!(config.refresh_token, "refresh");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert!(config.login_customer_id.is_none());
    }

    #[test]
    fn test_missing_credential_is_config_error() {
        let err = AdsConfig::from_lookup(lookup(&REQUIRED[..3])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("GOOGLE_ADS_REFRESH_TOKEN"));
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let mut vars = REQUIRED.to_vec();
        vars[0] = ("GOOGLE_ADS_DEVELOPER_TOKEN", "   ");
        let err = AdsConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_ADS_DEVELOPER_TOKEN"));
    }

    #[test]
    fn test_optional_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("GOOGLE_ADS_LOGIN_CUSTOMER_ID", "111-222-3333"));
        vars.push(("GOOGLE_ADS_API_VERSION", "v20"));
        vars.push(("GOOGLE_ADS_ENDPOINT", "http://localhost:9000/"));
        let config = AdsConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.login_customer_id.as_deref(), Some("1112223333"));
        assert_eq!(config.api_version, "v20");
        assert_eq!(config.endpoint, "http://localhost:9000");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AdsConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("refresh"));
        assert!(!rendered.contains("dev-token"));
    }
}
