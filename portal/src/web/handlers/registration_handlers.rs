// parish-portal/src/web/handlers/registration_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::payment::PaymentSelection;
use crate::models::registration::{RegistrationInput, RegistrationOptions};
use crate::pipelines::contexts::EnrolmentCtxData;
use crate::pipelines::enrolment_flow::run_enrolment;
use crate::services::checkout::{CheckoutPort, RelayedCheckout};
use crate::state::AppState;
use crate::validation::validate;
use parish_flow::FlowCtx;

/// Body of `POST /registrations`.
#[derive(Debug, Deserialize)]
pub struct RegistrationRequest {
  pub registration: RegistrationInput,
  pub payment: PaymentSelection,
}

pub async fn registration_options_handler() -> HttpResponse {
  HttpResponse::Ok().json(RegistrationOptions::current())
}

#[instrument(name = "handler::validate_registration", skip_all)]
pub async fn validate_registration_handler(body: web::Json<RegistrationInput>) -> Result<HttpResponse, AppError> {
  validate(&body, Utc::now().date_naive()).map_err(AppError::Validation)?;
  Ok(HttpResponse::Ok().json(json!({ "valid": true })))
}

#[instrument(
  name = "handler::submit_registration",
  skip(app_state, body),
  fields(payment_method = ?body.payment.method())
)]
pub async fn submit_registration_handler(
  app_state: web::Data<AppState>,
  body: web::Json<RegistrationRequest>,
) -> Result<HttpResponse, AppError> {
  let RegistrationRequest { registration, payment } = body.into_inner();
  let checkout: Arc<dyn CheckoutPort> = Arc::new(RelayedCheckout::new(payment.relayed_outcome().cloned()));

  let ctx = FlowCtx::new(EnrolmentCtxData::new(
    app_state.get_ref().clone(),
    registration,
    payment,
    checkout,
    Utc::now().date_naive(),
  ));
  let view = run_enrolment(&app_state, ctx).await?;

  info!(member_id = %view.member_id(), "Registration completed.");
  Ok(HttpResponse::Created().json(view))
}

#[instrument(name = "handler::stats", skip_all)]
pub async fn stats_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let stats = app_state.store.stats().await?;
  Ok(HttpResponse::Ok().json(stats))
}
