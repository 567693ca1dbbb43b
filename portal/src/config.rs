// parish-portal/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
  Sqlite,
  Memory,
}

impl FromStr for StorageBackend {
  type Err = AppError;

  fn from_str(raw: &str) -> Result<Self> {
    match raw.trim().to_ascii_lowercase().as_str() {
      "sqlite" => Ok(StorageBackend::Sqlite),
      "memory" => Ok(StorageBackend::Memory),
      other => Err(AppError::Config(format!("Invalid STORAGE_BACKEND '{}': expected sqlite or memory", other))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub storage_backend: StorageBackend,
  pub database_url: String,
  pub app_base_url: String,

  pub organization_name: String,
  pub member_id_prefix: String,

  // Hosted checkout widget
  pub checkout_public_key: String,
  pub registration_fee: u64,
  pub registration_currency: String,

  // Simulated confirmation waits
  pub bank_transfer_delay: Duration,
  pub ussd_delay: Duration,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      storage_backend: StorageBackend::Sqlite,
      database_url: "sqlite://parish_portal.db?mode=rwc".to_string(),
      app_base_url: "http://127.0.0.1:8080".to_string(),
      organization_name: "St. Gabriel Chaplaincy".to_string(),
      member_id_prefix: "SG".to_string(),
      checkout_public_key: String::new(),
      registration_fee: 1000,
      registration_currency: "NGN".to_string(),
      bank_transfer_delay: Duration::from_millis(2000),
      ussd_delay: Duration::from_millis(2500),
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // .env is optional
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source, falling back to defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();
    let text = |name: &str, fallback: String| lookup(name).filter(|v| !v.trim().is_empty()).unwrap_or(fallback);

    let server_host = text("SERVER_HOST", defaults.server_host);
    let server_port = parse_var::<u16>(&lookup, "SERVER_PORT")?.unwrap_or(defaults.server_port);
    let storage_backend = parse_var::<StorageBackend>(&lookup, "STORAGE_BACKEND")?.unwrap_or(defaults.storage_backend);
    let database_url = text("DATABASE_URL", defaults.database_url);
    let app_base_url = text("APP_BASE_URL", format!("http://{}:{}", server_host, server_port));

    let checkout_public_key = text("CHECKOUT_PUBLIC_KEY", defaults.checkout_public_key);
    if checkout_public_key.is_empty() {
      tracing::warn!("CHECKOUT_PUBLIC_KEY is not set; hosted checkout sessions will carry an empty key");
    }

    let config = Self {
      server_host,
      server_port,
      storage_backend,
      database_url,
      app_base_url,
      organization_name: text("ORGANIZATION_NAME", defaults.organization_name),
      member_id_prefix: text("MEMBER_ID_PREFIX", defaults.member_id_prefix),
      checkout_public_key,
      registration_fee: parse_var::<u64>(&lookup, "REGISTRATION_FEE")?.unwrap_or(defaults.registration_fee),
      registration_currency: text("REGISTRATION_CURRENCY", defaults.registration_currency),
      bank_transfer_delay: parse_var::<u64>(&lookup, "BANK_TRANSFER_DELAY_MS")?
        .map(Duration::from_millis)
        .unwrap_or(defaults.bank_transfer_delay),
      ussd_delay: parse_var::<u64>(&lookup, "USSD_DELAY_MS")?
        .map(Duration::from_millis)
        .unwrap_or(defaults.ussd_delay),
    };

    tracing::info!(
      backend = ?config.storage_backend,
      organization = %config.organization_name,
      "Application configuration loaded successfully."
    );
    Ok(config)
  }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match lookup(name).filter(|v| !v.trim().is_empty()) {
    None => Ok(None),
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map(Some)
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
  }
}
