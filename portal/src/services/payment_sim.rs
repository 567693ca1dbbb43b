// parish-portal/src/services/payment_sim.rs

//! Bank transfer and USSD payments are confirmed by waiting, nothing is verified.

use crate::models::payment::{PaymentMethod, PaymentReceipt};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{info, instrument};

pub const MISSING_TRANSFER_PROOF: &str = "Please upload payment screenshot to proceed.";

pub fn reference_prefix(method: PaymentMethod) -> &'static str {
  match method {
    PaymentMethod::BankTransfer => "BT",
    PaymentMethod::Ussd => "USSD",
    PaymentMethod::HostedCheckout => "CO",
  }
}

pub fn receipt(method: PaymentMethod, at: DateTime<Utc>) -> PaymentReceipt {
  PaymentReceipt {
    method,
    reference: format!("{}-{}", reference_prefix(method), at.timestamp_millis()),
  }
}

/// Waits out the simulated confirmation and issues the receipt.
#[instrument(skip(delay), fields(delay_ms = delay.as_millis() as u64))]
pub async fn confirm(method: PaymentMethod, delay: Duration) -> PaymentReceipt {
  if !delay.is_zero() {
    tokio::time::sleep(delay).await;
  }
  let receipt = receipt(method, Utc::now());
  info!(reference = %receipt.reference, "Simulated payment confirmed.");
  receipt
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn references_carry_method_prefix_and_millis() {
    let at = Utc.timestamp_millis_opt(1_717_000_000_123).unwrap();
    assert_eq!(receipt(PaymentMethod::BankTransfer, at).reference, "BT-1717000000123");
    assert_eq!(receipt(PaymentMethod::Ussd, at).reference, "USSD-1717000000123");
  }

  #[tokio::test]
  async fn confirmation_waits_for_the_delay() {
    let started = tokio::time::Instant::now();
    let receipt = confirm(PaymentMethod::Ussd, Duration::from_millis(30)).await;
    assert!(started.elapsed() >= Duration::from_millis(30));
    assert_eq!(receipt.method, PaymentMethod::Ussd);
  }
}
