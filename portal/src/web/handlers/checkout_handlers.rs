// parish-portal/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::registration::RegistrationInput;
use crate::services::checkout::{build_request, CheckoutWidgetConfig};
use crate::services::member_id;
use crate::state::AppState;
use crate::validation::validate;

/// Widget configuration for a form that passes validation. The member id in
/// the tx_ref is reused when the registration is submitted.
#[instrument(name = "handler::create_checkout_session", skip_all)]
pub async fn create_checkout_session_handler(
  app_state: web::Data<AppState>,
  body: web::Json<RegistrationInput>,
) -> Result<HttpResponse, AppError> {
  let now = Utc::now();
  let registration = validate(&body, now.date_naive()).map_err(AppError::Validation)?;

  let config = &app_state.config;
  let member_id = member_id::allocate(app_state.store.as_ref(), &config.member_id_prefix).await?;
  let tx_ref = member_id::tx_ref(&config.member_id_prefix, &member_id, now);
  let request = build_request(config, &registration, tx_ref);

  info!(%member_id, tx_ref = %request.tx_ref, "Checkout session prepared.");
  Ok(HttpResponse::Ok().json(CheckoutWidgetConfig::new(config, member_id, request)))
}
