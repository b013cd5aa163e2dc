use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::auth::token::DEFAULT_TTL_MINUTES;
use crate::bridge::DEFAULT_SLOTS;

/// Process-wide configuration, loaded once on first access.
pub static CONFIG: LazyLock<Config> =
    LazyLock::new(|| Config::load().unwrap_or_else(|e| panic!("configuration error: {e}")));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    /// Token signing secret. Must be set to a nonempty, unpredictable value;
    /// there is deliberately no usable default.
    pub secret_key: String,
    pub token_ttl_minutes: i64,
    pub worker_slots: usize,
    pub stats_cache_secs: u64,
    pub loglevel: String,
    pub seed_username: Option<String>,
    pub seed_password: Option<String>,
    pub seed_full_name: Option<String>,
    pub seed_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:pricebook.sqlite".to_owned(),
            listen_addr: "0.0.0.0:8000".to_owned(),
            secret_key: String::new(),
            token_ttl_minutes: DEFAULT_TTL_MINUTES,
            worker_slots: DEFAULT_SLOTS,
            stats_cache_secs: 10,
            loglevel: "info".to_owned(),
            seed_username: None,
            seed_password: None,
            seed_full_name: None,
            seed_email: None,
        }
    }
}

impl Config {
    /// Defaults merged with `PRICEBOOK_`-prefixed environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        let cfg: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("PRICEBOOK_"))
            .extract()?;
        if cfg.secret_key.trim().is_empty() {
            return Err(figment::Error::from(
                "PRICEBOOK_SECRET_KEY must be set to a nonempty, unpredictable value".to_string(),
            ));
        }
        Ok(cfg)
    }
}
