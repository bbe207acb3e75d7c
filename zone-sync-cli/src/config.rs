//! TOML configuration with environment overrides

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use zone_sync_core::{DEFAULT_BULK_LIMIT, SyncSettings};
use zone_sync_core::services::DEFAULT_PAGE_SIZE;
use zone_sync_provider::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TOKEN_URL, MAX_PAGE_SIZE};

pub const ENV_CLIENT_ID: &str = "ZONE_SYNC_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "ZONE_SYNC_CLIENT_SECRET";
pub const ENV_STACK_ID: &str = "ZONE_SYNC_STACK_ID";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub sync: SyncConfig,
}

/// `[api]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub client_id: String,
    pub client_secret: String,
    pub stack_id: String,
    pub base_url: String,
    pub token_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            stack_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

/// `[sync]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub page_size: u32,
    pub bulk_limit: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            bulk_limit: DEFAULT_BULK_LIMIT,
        }
    }
}

impl AppConfig {
    /// Read the file (if any), apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                Self::parse(&text)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Replace credentials with non-empty values from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (key, field) in [
            (ENV_CLIENT_ID, &mut self.api.client_id),
            (ENV_CLIENT_SECRET, &mut self.api.client_secret),
            (ENV_STACK_ID, &mut self.api.stack_id),
        ] {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = value;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("api.client_id", &self.api.client_id),
            ("api.client_secret", &self.api.client_secret),
            ("api.stack_id", &self.api.stack_id),
        ] {
            if value.trim().is_empty() {
                bail!("{name} is required");
            }
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.sync.page_size) {
            bail!("sync.page_size must be between 1 and {MAX_PAGE_SIZE}");
        }
        if !(1..=DEFAULT_BULK_LIMIT).contains(&self.sync.bulk_limit) {
            bail!("sync.bulk_limit must be between 1 and {DEFAULT_BULK_LIMIT}");
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(
            self.api.client_id.clone(),
            self.api.client_secret.clone(),
            self.api.stack_id.clone(),
        );
        config.base_url.clone_from(&self.api.base_url);
        config.token_url.clone_from(&self.api.token_url);
        config.connect_timeout = Duration::from_secs(self.api.connect_timeout_secs);
        config.request_timeout = Duration::from_secs(self.api.request_timeout_secs);
        config
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            page_size: self.sync.page_size,
            bulk_limit: self.sync.bulk_limit,
        }
    }
}
