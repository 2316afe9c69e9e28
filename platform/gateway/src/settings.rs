use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(String),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("API key contains characters not allowed in a header")]
    InvalidKey,
}

/// Connection settings for the hosted gateway.
///
/// `Debug` redacts the API key.
#[derive(Clone)]
pub struct GatewaySettings {
    pub url: Url,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GatewaySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GatewaySettings {
    pub fn new(url: Url, api_key: impl Into<String>) -> Self {
        Self {
            url,
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read `HR_GATEWAY_URL`, `HR_GATEWAY_KEY` and `HR_GATEWAY_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = env_required("HR_GATEWAY_URL")?;
        let url = Url::parse(raw_url.trim())
            .map_err(|err| ConfigError::InvalidUrl("HR_GATEWAY_URL".into(), err.to_string()))?;
        let api_key = env_required("HR_GATEWAY_KEY")?;
        let timeout_secs = std::env::var("HR_GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Ok(Self {
            url,
            api_key,
            timeout_secs,
        })
    }

    /// Base URL for a table, e.g. `https://x.supabase.co/rest/v1/employees`.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url.as_str().trim_end_matches('/'), table)
    }
}

fn env_required(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing(key.to_string()))
}
