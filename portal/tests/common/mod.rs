// parish-portal/tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use parish_flow::FlowCtx;
use parish_portal::config::{AppConfig, StorageBackend};
use parish_portal::errors::Result as AppResult;
use parish_portal::models::{
  CheckoutOutcome, CheckoutRequest, CheckoutStatus, MemberRecord, Ministry, PaymentMethod, PaymentReceipt,
  PaymentSelection, Photo, RegistrationInput, SacramentStatus, YearsInFaith,
};
use parish_portal::pipelines::contexts::EnrolmentCtxData;
use parish_portal::services::checkout::CheckoutPort;
use parish_portal::store::{InMemoryStore, MemberStore};
use parish_portal::validation::validate;
use parish_portal::AppState;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Defaults with the simulated payment waits switched off.
pub fn test_config() -> AppConfig {
  AppConfig {
    storage_backend: StorageBackend::Memory,
    checkout_public_key: "FLWPUBK_TEST-local".to_string(),
    bank_transfer_delay: Duration::ZERO,
    ussd_delay: Duration::ZERO,
    ..AppConfig::default()
  }
}

pub fn memory_state() -> AppState {
  AppState::new(test_config(), Arc::new(InMemoryStore::new()))
}

pub fn today() -> NaiveDate {
  NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn photo() -> Photo {
  Photo::new("image/png", vec![0x89, 0x50, 0x4e, 0x47]).unwrap()
}

pub fn sample_input() -> RegistrationInput {
  RegistrationInput {
    full_name: "Ada Obi".into(),
    date_of_birth: "1990-05-01".into(),
    phone_number: "08012345678".into(),
    email_address: "ada@example.com".into(),
    ministry: Some(Ministry::Choir),
    sacrament_status: Some(SacramentStatus::Confirmed),
    years_in_faith: Some(YearsInFaith::SixToTen),
    photo: Some(photo()),
    ..Default::default()
  }
}

pub fn input_named(name: &str, email: &str) -> RegistrationInput {
  RegistrationInput {
    full_name: name.into(),
    email_address: email.into(),
    ..sample_input()
  }
}

/// A finalized record built straight from a valid form, bypassing payment.
pub fn member_record(id: &str, input: &RegistrationInput, at: DateTime<Utc>) -> MemberRecord {
  let registration = validate(input, today()).unwrap();
  let receipt = PaymentReceipt {
    method: PaymentMethod::Ussd,
    reference: format!("USSD-{}", at.timestamp_millis()),
  };
  MemberRecord::new(id.to_string(), &registration, receipt, at)
}

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(y, m, d, 10, 30, 0).unwrap()
}

pub async fn seed(store: &dyn MemberStore, members: &[(&str, &str, &str)]) {
  for (id, name, email) in members {
    store.finalize(&member_record(id, &input_named(name, email), at(2024, 6, 1))).await.unwrap();
  }
}

/// Checkout port that answers every request with a fixed status.
pub struct ScriptedCheckout {
  status: CheckoutStatus,
  transaction_id: Option<String>,
  pub requests: Mutex<Vec<CheckoutRequest>>,
}

impl ScriptedCheckout {
  pub fn new(status: CheckoutStatus, transaction_id: Option<&str>) -> Arc<Self> {
    Arc::new(Self {
      status,
      transaction_id: transaction_id.map(str::to_string),
      requests: Mutex::new(Vec::new()),
    })
  }

  pub fn calls(&self) -> usize {
    self.requests.lock().len()
  }
}

#[async_trait]
impl CheckoutPort for ScriptedCheckout {
  async fn complete(&self, request: &CheckoutRequest) -> AppResult<CheckoutOutcome> {
    self.requests.lock().push(request.clone());
    Ok(CheckoutOutcome {
      status: self.status.clone(),
      transaction_id: self.transaction_id.clone(),
      tx_ref: request.tx_ref.clone(),
    })
  }
}

pub fn enrolment_ctx(
  state: &AppState,
  input: RegistrationInput,
  payment: PaymentSelection,
  checkout: Arc<dyn CheckoutPort>,
) -> FlowCtx<EnrolmentCtxData> {
  FlowCtx::new(EnrolmentCtxData::new(state.clone(), input, payment, checkout, today()))
}

pub fn unused_port() -> Arc<dyn CheckoutPort> {
  ScriptedCheckout::new(CheckoutStatus::Failed, None)
}
