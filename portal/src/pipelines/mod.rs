// parish-portal/src/pipelines/mod.rs

//! Flows the portal runs, and their registration.

use crate::errors::AppError;
use crate::state::AppState;
use parish_flow::FlowRegistry;

pub mod contexts;
pub mod factories;

pub mod enrolment_flow;
pub mod id_card_flow;

/// Registers every portal flow. Called once while building `AppState`.
pub fn register_all_flows(registry: &FlowRegistry<AppError>, app_state: &AppState) {
  tracing::info!("Registering portal flows...");
  enrolment_flow::register_enrolment_flow(registry, app_state);
  id_card_flow::register_id_card_flow(registry, app_state);
  tracing::info!(flows = ?registry.flow_names(), "All portal flows registered.");
}
