// crm-server/src/state.rs
use crate::config::AppConfig;
use crm_core::Crm;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub crm: Crm,
  pub config: Arc<AppConfig>, // Share loaded config
}
