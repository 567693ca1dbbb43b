// parish-portal/src/models/payment.rs

use serde::{Deserialize, Deserializer, Serialize};

/// How a member paid the registration fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
  HostedCheckout,
  BankTransfer,
  Ussd,
}

impl PaymentMethod {
  pub fn label(self) -> &'static str {
    match self {
      PaymentMethod::HostedCheckout => "Online Checkout",
      PaymentMethod::BankTransfer => "Bank Transfer",
      PaymentMethod::Ussd => "USSD",
    }
  }
}

/// Payment path picked by the applicant, tagged by `method`.
///
/// For hosted checkout the browser relays the widget callback in `outcome`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentSelection {
  HostedCheckout {
    #[serde(default)]
    outcome: Option<CheckoutOutcome>,
  },
  BankTransfer,
  Ussd,
}

impl PaymentSelection {
  pub fn method(&self) -> PaymentMethod {
    match self {
      PaymentSelection::HostedCheckout { .. } => PaymentMethod::HostedCheckout,
      PaymentSelection::BankTransfer => PaymentMethod::BankTransfer,
      PaymentSelection::Ussd => PaymentMethod::Ussd,
    }
  }

  pub fn relayed_outcome(&self) -> Option<&CheckoutOutcome> {
    match self {
      PaymentSelection::HostedCheckout { outcome } => outcome.as_ref(),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
  Successful,
  Cancelled,
  Failed,
  #[serde(other)]
  Unknown,
}

/// Result reported by the hosted checkout widget's callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOutcome {
  pub status: CheckoutStatus,
  #[serde(default, deserialize_with = "string_or_number")]
  pub transaction_id: Option<String>,
  pub tx_ref: String,
}

impl CheckoutOutcome {
  pub fn is_successful(&self) -> bool {
    self.status == CheckoutStatus::Successful
  }

  /// Transaction id from the provider, falling back to our own tx_ref.
  pub fn payment_reference(&self) -> &str {
    match self.transaction_id.as_deref() {
      Some(id) if !id.trim().is_empty() => id,
      _ => &self.tx_ref,
    }
  }
}

// The widget reports transaction ids as JSON numbers.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    Text(String),
    Number(serde_json::Number),
  }
  Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
    Raw::Text(s) => s,
    Raw::Number(n) => n.to_string(),
  }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutCustomer {
  pub email: String,
  pub phone_number: String,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutCustomizations {
  pub title: String,
  pub description: String,
}

/// Everything the hosted checkout widget is opened with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
  pub public_key: String,
  pub tx_ref: String,
  pub amount: u64,
  pub currency: String,
  pub payment_options: String,
  pub customer: CheckoutCustomer,
  pub customizations: CheckoutCustomizations,
}

/// Outcome of any payment path: which method and the reference it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
  pub method: PaymentMethod,
  pub reference: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn selection_is_tagged_by_method() {
    let ussd: PaymentSelection = serde_json::from_str(r#"{"method":"ussd"}"#).unwrap();
    assert_eq!(ussd.method(), PaymentMethod::Ussd);

    let hosted: PaymentSelection = serde_json::from_str(
      r#"{"method":"hosted_checkout","outcome":{"status":"successful","transaction_id":4417,"tx_ref":"SG-SG123456001-1"}}"#,
    )
    .unwrap();
    let outcome = hosted.relayed_outcome().unwrap();
    assert!(outcome.is_successful());
    assert_eq!(outcome.payment_reference(), "4417");
  }

  #[test]
  fn reference_falls_back_to_tx_ref_and_unknown_status_is_not_success() {
    let outcome: CheckoutOutcome = serde_json::from_str(r#"{"status":"pending","tx_ref":"SG-X-1"}"#).unwrap();
    assert_eq!(outcome.status, CheckoutStatus::Unknown);
    assert!(!outcome.is_successful());
    assert_eq!(outcome.payment_reference(), "SG-X-1");
  }
}
