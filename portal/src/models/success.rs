// parish-portal/src/models/success.rs

use crate::models::member::{MemberRecord, MemberSummary};
use crate::models::registration::RegistrationInput;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextStep {
  pub title: String,
  pub detail: String,
}

/// Confirmation document shown after a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessView {
  pub member: MemberSummary,
  pub member_id: String,
  pub confirmation_messages: Vec<String>,
  pub next_steps: Vec<NextStep>,
}

impl SuccessView {
  pub fn new(record: &MemberRecord, organization: &str) -> Self {
    let step = |title: &str, detail: &str| NextStep {
      title: title.to_string(),
      detail: detail.to_string(),
    };
    Self {
      member: record.summary(),
      member_id: record.id.clone(),
      confirmation_messages: vec![
        format!("Welcome to {organization}!"),
        "Your registration has been completed successfully and payment confirmed.".to_string(),
        format!(
          "Please keep your Member ID {} safe. You will need it when collecting your physical ID card from the church office.",
          record.id
        ),
      ],
      next_steps: vec![
        step("Admin Notification Sent", "Church admin has been notified of your registration"),
        step("ID Card Preparation", "Your membership ID card will be prepared for printing"),
        step("Collection Notice", "You will be contacted when your ID card is ready (24-48 hours)"),
      ],
    }
  }

  /// Text placed on the clipboard by "Copy ID".
  pub fn member_id(&self) -> &str {
    &self.member_id
  }

  /// Blank form for the next applicant.
  pub fn reset(&self) -> RegistrationInput {
    RegistrationInput::default()
  }
}
