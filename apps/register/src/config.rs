//! # Application Configuration
//!
//! Settings read once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`KANTAN_*`)
//! 2. Defaults (this file)
//!
//! The tax rate here is only the default for a register with no saved
//! settings; once the cashier sets a rate it lives in the store.

use std::path::PathBuf;

use directories::ProjectDirs;
use kantan_core::validation::parse_tax_rate;
use kantan_core::{Money, Settings, TaxRate};
use tracing::warn;

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,

    /// Tax rate used when no settings are stored.
    pub default_tax_rate: TaxRate,

    /// Shown in the shell banner.
    pub store_name: String,
}

impl Default for AppConfig {
    /// ## Default Values
    /// - Database: platform data dir, `kantan.db`
    ///   (`~/.local/share/kantan-register/kantan.db` on Linux)
    /// - Tax: 10%
    /// - Store: "Kantan Register"
    fn default() -> Self {
        AppConfig {
            db_path: default_db_path(),
            default_tax_rate: TaxRate::default(),
            store_name: "Kantan Register".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// ## Environment Variables
    /// - `KANTAN_DB_PATH`: database file
    /// - `KANTAN_TAX_RATE`: default tax rate (`0.08`, `8`, `8%`)
    /// - `KANTAN_STORE_NAME`: display name
    pub fn from_env() -> Self {
        AppConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    ///
    /// An unparsable tax rate is logged and the default kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = lookup("KANTAN_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(store_name) = lookup("KANTAN_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(raw) = lookup("KANTAN_TAX_RATE") {
            match parse_tax_rate(&raw) {
                Ok(rate) => config.default_tax_rate = rate,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring KANTAN_TAX_RATE"),
            }
        }

        config
    }

    /// Settings for a register that has none stored yet.
    pub fn default_settings(&self) -> Settings {
        Settings {
            tax_rate: self.default_tax_rate,
        }
    }

    /// Formats a yen amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use kantan_register::config::AppConfig;
    ///
    /// assert_eq!(AppConfig::format_currency(1234), "¥1,234");
    /// ```
    pub fn format_currency(yen: i64) -> String {
        Money::from_yen(yen).to_string()
    }
}

/// Platform data directory, or the working directory when none exists.
fn default_db_path() -> PathBuf {
    match ProjectDirs::from("jp", "kantan", "kantan-register") {
        Some(dirs) => dirs.data_dir().join("kantan.db"),
        None => PathBuf::from("kantan.db"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.default_tax_rate.bps(), 1000);
        assert_eq!(config.store_name, "Kantan Register");
        assert!(config.db_path.ends_with("kantan.db"));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("KANTAN_DB_PATH", "/tmp/shop.db"),
            ("KANTAN_TAX_RATE", "8"),
            ("KANTAN_STORE_NAME", "Corner Cafe"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.default_settings().tax_rate.bps(), 800);
        assert_eq!(config.store_name, "Corner Cafe");
    }

    #[test]
    fn test_bad_tax_rate_keeps_default() {
        let config = AppConfig::from_lookup(lookup(&[("KANTAN_TAX_RATE", "lots")]));
        assert_eq!(config.default_tax_rate, TaxRate::default());
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(AppConfig::format_currency(0), "¥0");
        assert_eq!(AppConfig::format_currency(990), "¥990");
        assert_eq!(AppConfig::format_currency(-1500), "-¥1,500");
    }
}
