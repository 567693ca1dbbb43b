// parish-portal/src/models/member.rs

use crate::models::payment::{PaymentMethod, PaymentReceipt};
use crate::models::registration::{RegistrationInput, SacramentStatus, YearsInFaith};
use crate::validation::ValidRegistration;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where a member is in the ID card workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
  PendingIdGeneration,
  IdCardPrinted,
}

impl MemberStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      MemberStatus::PendingIdGeneration => "pending_id_generation",
      MemberStatus::IdCardPrinted => "id_card_printed",
    }
  }
}

/// A finalized, paid registration. Only `status` ever changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
  pub id: String,
  pub name: String,
  pub email: String,
  pub phone: String,
  pub date_of_birth: NaiveDate,
  pub ministry: String,
  pub sacrament_status: SacramentStatus,
  pub years_in_faith: YearsInFaith,
  pub payment_method: PaymentMethod,
  pub payment_reference: String,
  pub status: MemberStatus,
  pub registered_at: DateTime<Utc>,
  /// Form exactly as submitted, photo and transfer proof included.
  pub submission: RegistrationInput,
}

impl MemberRecord {
  pub fn new(id: String, registration: &ValidRegistration, receipt: PaymentReceipt, registered_at: DateTime<Utc>) -> Self {
    Self {
      id,
      name: registration.full_name().to_string(),
      email: registration.email().to_string(),
      phone: registration.phone().to_string(),
      date_of_birth: registration.date_of_birth(),
      ministry: registration.ministry().to_string(),
      sacrament_status: registration.sacrament_status(),
      years_in_faith: registration.years_in_faith(),
      payment_method: receipt.method,
      payment_reference: receipt.reference,
      status: MemberStatus::PendingIdGeneration,
      registered_at,
      submission: registration.input().clone(),
    }
  }

  pub fn needs_id_card(&self) -> bool {
    self.status == MemberStatus::PendingIdGeneration
  }

  pub fn summary(&self) -> MemberSummary {
    MemberSummary {
      id: self.id.clone(),
      name: self.name.clone(),
      email: self.email.clone(),
      phone: self.phone.clone(),
      date_of_birth: self.date_of_birth,
      ministry: self.ministry.clone(),
      sacrament_status: self.sacrament_status,
      years_in_faith: self.years_in_faith,
      payment_method: self.payment_method,
      payment_method_label: self.payment_method.label(),
      payment_reference: self.payment_reference.clone(),
      status: self.status,
      registered_at: self.registered_at,
      has_photo: self.submission.photo.is_some(),
    }
  }
}

/// A member record without the uploaded images, for lists and confirmations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
  pub id: String,
  pub name: String,
  pub email: String,
  pub phone: String,
  pub date_of_birth: NaiveDate,
  pub ministry: String,
  pub sacrament_status: SacramentStatus,
  pub years_in_faith: YearsInFaith,
  pub payment_method: PaymentMethod,
  pub payment_method_label: &'static str,
  pub payment_reference: String,
  pub status: MemberStatus,
  pub registered_at: DateTime<Utc>,
  pub has_photo: bool,
}
