use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub offers: OffersConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Remote offers service connection settings
#[derive(Debug, Deserialize, Clone)]
pub struct OffersConfig {
    pub base_url: String,
    pub access_token: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegistrationConfig {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_timeout_seconds() -> u64 { 10 }
fn default_interval_seconds() -> u64 { 60 }
fn default_queue_capacity() -> usize { 256 }

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_seconds: default_interval_seconds() }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self { queue_capacity: default_queue_capacity() }
    }
}

impl OffersConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        // Later sources win: default, `RUN_MODE` file, `local` file, then
        // `SHELF__*` variables (`SHELF__OFFERS__ACCESS_TOKEN` sets `offers.access_token`).
        let config: Config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("SHELF").separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the offers worker cannot run with
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.refresh.interval_seconds == 0 {
            return Err(config::ConfigError::Message(
                "refresh.interval_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
