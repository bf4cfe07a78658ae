// crm-server/src/jobs.rs

//! Scheduled jobs, spawned once at startup: a heartbeat line, the activity
//! report, and the low-stock restock pass. The two log files keep the line
//! formats the operational tooling already reads.

use std::time::Duration;

use chrono::Utc;
use crm_core::Crm;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

use crate::state::AppState;

/// Spawns every enabled job onto the runtime. Called once from `main`.
pub fn spawn_all(state: &AppState) {
  let config = state.config.clone();

  tokio::spawn(heartbeat_loop(
    config.heartbeat_interval_secs,
    config.heartbeat_log_path.clone(),
  ));
  tokio::spawn(report_loop(
    state.crm.clone(),
    config.report_interval_secs,
    config.report_log_path.clone(),
  ));
  tokio::spawn(restock_loop(state.crm.clone(), config.restock_interval_secs));

  info!("Scheduled jobs spawned.");
}

async fn append_line(path: &str, line: &str) -> std::io::Result<()> {
  let mut file = OpenOptions::new().create(true).append(true).open(path).await?;
  file.write_all(line.as_bytes()).await?;
  file.write_all(b"\n").await
}

async fn heartbeat_loop(interval_secs: u64, path: String) {
  let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
  loop {
    ticker.tick().await;
    let line = format!("{} CRM is alive", Utc::now().format("%d/%m/%Y-%H:%M:%S"));
    if let Err(e) = append_line(&path, &line).await {
      warn!(error = %e, path = %path, "Failed to write heartbeat line.");
    }
  }
}

async fn report_loop(crm: Crm, interval_secs: u64, path: String) {
  let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
  loop {
    ticker.tick().await;
    match crm.activity_report().await {
      Ok(report) => {
        let line = format!(
          "{} - Report: {} customers, {} orders, {} revenue",
          Utc::now().format("%Y-%m-%d %H:%M:%S"),
          report.customers,
          report.orders,
          report.revenue
        );
        if let Err(e) = append_line(&path, &line).await {
          warn!(error = %e, path = %path, "Failed to write report line.");
        } else {
          info!(customers = report.customers, orders = report.orders, revenue = %report.revenue, "Activity report logged.");
        }
      }
      Err(e) => error!(error = %e, "Activity report job failed."),
    }
  }
}

async fn restock_loop(crm: Crm, interval_secs: u64) {
  let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
  loop {
    ticker.tick().await;
    match crm.restock_low_stock().await {
      Ok(restocked) => info!(count = restocked.updated.len(), message = %restocked.message, "Scheduled restock finished."),
      Err(e) => error!(error = %e, "Scheduled restock failed."),
    }
  }
}
