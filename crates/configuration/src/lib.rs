use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AuthConfig, ProviderConfig, ServerConfig, Settings, TradingConfig};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, layers `PAPERDESK_`-prefixed environment variables on
/// top (e.g. `PAPERDESK_PROVIDER__API_KEY`), and deserializes the result into
/// our strongly-typed `Settings` struct.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml"))
        .add_source(config::Environment::with_prefix("PAPERDESK").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
