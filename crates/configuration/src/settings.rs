use crate::error::ConfigError;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub trading: TradingConfig,
    pub auth: AuthConfig,
}

/// Bind address for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Connection parameters for the external market-data provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base query URL, e.g. "https://www.alphavantage.co/query".
    pub base_url: String,
    pub api_key: String,
    /// Upper bound on any single provider request. A hung quote call must
    /// never block a request indefinitely.
    pub timeout_secs: u64,
}

/// Parameters of the simulated-trading environment.
#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    /// Cash balance every portfolio starts with on first access.
    pub starting_cash: f64,
}

/// Session-token parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for session tokens.
    pub jwt_secret: String,
    /// Token lifetime in hours.
    pub token_ttl_hours: i64,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.api_key.is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.api_key must not be empty".to_string(),
            ));
        }
        if self.trading.starting_cash <= 0.0 {
            return Err(ConfigError::ValidationError(
                "trading.starting_cash must be positive".to_string(),
            ));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.jwt_secret must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
