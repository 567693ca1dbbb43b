// parish-portal/src/state.rs

use crate::config::AppConfig;
use crate::errors::{AppError, Result as AppResult};
use crate::pipelines;
use crate::services::admin::AdminService;
use crate::store::{self, MemberStore};
use parish_flow::FlowRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn MemberStore>,
  pub flows: Arc<FlowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires the store and config together and registers every flow.
  pub fn new(config: AppConfig, store: Arc<dyn MemberStore>) -> Self {
    let state = Self {
      store,
      flows: Arc::new(FlowRegistry::new()),
      config: Arc::new(config),
    };
    pipelines::register_all_flows(&state.flows, &state);
    state
  }

  /// Opens the configured store, then builds the state on top of it.
  pub async fn from_config(config: AppConfig) -> AppResult<Self> {
    let store = store::connect(&config).await?;
    Ok(Self::new(config, store))
  }

  pub fn admin(&self) -> AdminService {
    AdminService::new(self.store.clone())
  }
}
