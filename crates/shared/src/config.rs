//! Core configuration management.
//!
//! The domain core needs exactly two facts to operate: a storage connection string and the
//! fixed USD→EUR rate. Everything else here (pool sizing, log filter) is operational and does
//! not change domain behavior.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// Configuration required to run the ledger core.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Postgres connection string.
    pub database_url: String,
    /// Fixed USD→EUR exchange rate used by the fixed-rate provider.
    #[serde(default = "default_rate")]
    pub usd_to_eur_rate: Decimal,
    /// Maximum number of pooled database connections.
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    /// `tracing_subscriber::EnvFilter` directive used when no `RUST_LOG` is set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_rate() -> Decimal {
    dec!(0.92)
}

fn default_max_connections() -> u32 {
    10
}

fn default_log_filter() -> String {
    "ledger_core=info,ledger_db=info,ledger_app=info".to_string()
}

impl CoreConfig {
    /// Loads configuration from a `.env` file (if present) and the environment.
    ///
    /// Environment variables are read with the `LEDGER` prefix and `__` as the nesting
    /// separator, e.g. `LEDGER__DATABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing or cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("LEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("LEDGER__DATABASE_URL", "postgres://localhost/ledger_test")]
    fn load_reads_required_field_from_environment(#[case] key: &str, #[case] value: &str) {
        temp_env::with_var(key, Some(value), || {
            let config = CoreConfig::load().unwrap();
            assert_eq!(config.database_url, "postgres://localhost/ledger_test");
            assert_eq!(config.usd_to_eur_rate, dec!(0.92));
        });
    }

    #[test]
    fn load_fails_without_database_url() {
        temp_env::with_var("LEDGER__DATABASE_URL", None::<&str>, || {
            assert!(CoreConfig::load().is_err());
        });
    }
}
