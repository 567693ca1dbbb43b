// parish-portal/src/services/checkout.rs

//! Hosted checkout: request building and the port the payment result comes through.

use crate::config::AppConfig;
use crate::errors::{AppError, Result as AppResult};
use crate::models::payment::{CheckoutCustomer, CheckoutCustomizations, CheckoutOutcome, CheckoutRequest};
use crate::validation::ValidRegistration;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub const PAYMENT_OPTIONS: &str = "card,mobilemoney,ussd,banktransfer";
pub const CHECKOUT_DESCRIPTION: &str = "Membership Registration Fee";
pub const PAYMENT_NOT_COMPLETED: &str = "Payment was not completed. Please try again.";

/// Boundary to the hosted checkout provider.
#[async_trait]
pub trait CheckoutPort: Send + Sync {
  /// Presents `request` to the payer and reports how it ended.
  async fn complete(&self, request: &CheckoutRequest) -> AppResult<CheckoutOutcome>;
}

/// Outcome relayed by the browser, which ran the widget itself.
#[derive(Debug, Clone, Default)]
pub struct RelayedCheckout {
  outcome: Option<CheckoutOutcome>,
}

impl RelayedCheckout {
  pub fn new(outcome: Option<CheckoutOutcome>) -> Self {
    Self { outcome }
  }
}

#[async_trait]
impl CheckoutPort for RelayedCheckout {
  #[instrument(name = "RelayedCheckout::complete", skip_all, fields(tx_ref = %request.tx_ref))]
  async fn complete(&self, request: &CheckoutRequest) -> AppResult<CheckoutOutcome> {
    let Some(outcome) = self.outcome.clone() else {
      warn!("No checkout callback was relayed with the registration.");
      return Err(AppError::Payment(PAYMENT_NOT_COMPLETED.to_string()));
    };
    if outcome.tx_ref != request.tx_ref {
      warn!(relayed = %outcome.tx_ref, "Relayed checkout callback belongs to another transaction.");
      return Err(AppError::Payment(PAYMENT_NOT_COMPLETED.to_string()));
    }
    info!(status = ?outcome.status, "Checkout callback relayed.");
    Ok(outcome)
  }
}

pub fn build_request(config: &AppConfig, registration: &ValidRegistration, tx_ref: String) -> CheckoutRequest {
  CheckoutRequest {
    public_key: config.checkout_public_key.clone(),
    tx_ref,
    amount: config.registration_fee,
    currency: config.registration_currency.clone(),
    payment_options: PAYMENT_OPTIONS.to_string(),
    customer: CheckoutCustomer {
      email: registration.email().to_string(),
      phone_number: registration.phone().to_string(),
      name: registration.full_name().to_string(),
    },
    customizations: CheckoutCustomizations {
      title: config.organization_name.clone(),
      description: CHECKOUT_DESCRIPTION.to_string(),
    },
  }
}

/// What the browser needs to open the widget for one applicant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutWidgetConfig {
  pub session_id: Uuid,
  pub member_id: String,
  pub redirect_url: String,
  pub request: CheckoutRequest,
}

impl CheckoutWidgetConfig {
  pub fn new(config: &AppConfig, member_id: String, request: CheckoutRequest) -> Self {
    Self {
      session_id: Uuid::new_v4(),
      redirect_url: format!("{}/registration/complete", config.app_base_url.trim_end_matches('/')),
      member_id,
      request,
    }
  }
}
