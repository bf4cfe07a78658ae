// crm-server/src/config.rs

use crate::errors::{ApiError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  // Scheduled jobs
  pub jobs_enabled: bool,
  pub heartbeat_interval_secs: u64,
  pub report_interval_secs: u64,
  pub restock_interval_secs: u64,
  pub heartbeat_log_path: String,
  pub report_log_path: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| ApiError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| ApiError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    let jobs_enabled = get_env("JOBS_ENABLED")
      .unwrap_or_else(|_| "true".to_string())
      .parse::<bool>()
      .map_err(|e| ApiError::Config(format!("Invalid JOBS_ENABLED value: {}", e)))?;

    let parse_secs = |var_name: &str, default: &str| {
      env::var(var_name)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .map_err(|e| ApiError::Config(format!("Invalid {}: {}", var_name, e)))
    };
    let heartbeat_interval_secs = parse_secs("HEARTBEAT_INTERVAL_SECS", "300")?;
    let report_interval_secs = parse_secs("REPORT_INTERVAL_SECS", "3600")?;
    let restock_interval_secs = parse_secs("RESTOCK_INTERVAL_SECS", "43200")?;

    let heartbeat_log_path = get_env("HEARTBEAT_LOG_PATH").unwrap_or_else(|_| "/tmp/crm_heartbeat_log.txt".to_string());
    let report_log_path = get_env("REPORT_LOG_PATH").unwrap_or_else(|_| "/tmp/crm_report_log.txt".to_string());

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      jobs_enabled,
      heartbeat_interval_secs,
      report_interval_secs,
      restock_interval_secs,
      heartbeat_log_path,
      report_log_path,
    })
  }
}
