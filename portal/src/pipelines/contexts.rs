// parish-portal/src/pipelines/contexts.rs

//! Context data the portal's flows run on.

use crate::config::AppConfig;
use crate::models::member::MemberRecord;
use crate::models::payment::{CheckoutOutcome, CheckoutRequest, PaymentReceipt, PaymentSelection};
use crate::models::registration::RegistrationInput;
use crate::services::checkout::CheckoutPort;
use crate::state::AppState;
use crate::validation::ValidRegistration;
use chrono::NaiveDate;
use parish_flow::FlowCtx;
use std::sync::Arc;

// --- Enrolment ---

/// One applicant's way through validation, payment and finalization.
#[derive(Clone)]
pub struct EnrolmentCtxData {
  pub app_state: AppState,
  pub input: RegistrationInput,
  pub payment: PaymentSelection,
  pub checkout: Arc<dyn CheckoutPort>,
  /// Date the minimum age is checked against.
  pub today: NaiveDate,

  pub registration: Option<ValidRegistration>,
  pub member_id: Option<String>,
  pub payment_sub_context: ActivePayment,
  pub receipt: Option<PaymentReceipt>,
  pub record: Option<MemberRecord>,
  pub admin_notified: bool,
}

impl EnrolmentCtxData {
  pub fn new(
    app_state: AppState,
    input: RegistrationInput,
    payment: PaymentSelection,
    checkout: Arc<dyn CheckoutPort>,
    today: NaiveDate,
  ) -> Self {
    Self {
      app_state,
      input,
      payment,
      checkout,
      today,
      registration: None,
      member_id: None,
      payment_sub_context: ActivePayment::None,
      receipt: None,
      record: None,
      admin_notified: false,
    }
  }
}

/// Sub-context of the payment path the applicant chose.
#[derive(Clone)]
pub enum ActivePayment {
  None,
  HostedCheckout(FlowCtx<PaymentSubCtxData>),
  BankTransfer(FlowCtx<PaymentSubCtxData>),
  Ussd(FlowCtx<PaymentSubCtxData>),
}

impl ActivePayment {
  pub fn sub_context(&self) -> Option<&FlowCtx<PaymentSubCtxData>> {
    match self {
      ActivePayment::None => None,
      ActivePayment::HostedCheckout(sub) | ActivePayment::BankTransfer(sub) | ActivePayment::Ussd(sub) => Some(sub),
    }
  }

  pub fn receipt(&self) -> Option<PaymentReceipt> {
    self.sub_context().and_then(|sub| sub.snapshot(|s| s.receipt.clone()))
  }
}

/// Data a payment sub-flow works on, whichever path it is.
#[derive(Clone)]
pub struct PaymentSubCtxData {
  pub config: Arc<AppConfig>,
  pub checkout: Arc<dyn CheckoutPort>,
  pub member_id: String,
  pub registration: ValidRegistration,
  /// tx_ref of a checkout the browser already ran, if any.
  pub relayed_tx_ref: Option<String>,

  pub checkout_request: Option<CheckoutRequest>,
  pub outcome: Option<CheckoutOutcome>,
  pub receipt: Option<PaymentReceipt>,
}

impl PaymentSubCtxData {
  pub fn new(
    config: Arc<AppConfig>,
    checkout: Arc<dyn CheckoutPort>,
    member_id: String,
    registration: ValidRegistration,
    relayed_tx_ref: Option<String>,
  ) -> Self {
    Self {
      config,
      checkout,
      member_id,
      registration,
      relayed_tx_ref,
      checkout_request: None,
      outcome: None,
      receipt: None,
    }
  }
}

// --- ID card ---

#[derive(Clone)]
pub struct IdCardCtxData {
  pub app_state: AppState,
  pub member_id: String,
  pub mark_printed: bool,
  pub issued_on: NaiveDate,
  pub record: Option<MemberRecord>,
  pub html: Option<String>,
}

impl IdCardCtxData {
  pub fn new(app_state: AppState, member_id: impl Into<String>, mark_printed: bool, issued_on: NaiveDate) -> Self {
    Self {
      app_state,
      member_id: member_id.into(),
      mark_printed,
      issued_on,
      record: None,
      html: None,
    }
  }
}
