// parish-portal/src/services/export.rs

use crate::models::member::{MemberRecord, MemberStatus, MemberSummary};
use crate::models::registration::RegistrationInput;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Downloadable copy of one member's data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberExport {
  pub member_info: MemberSummary,
  pub registration_details: RegistrationInput,
  pub timestamp: DateTime<Utc>,
  pub status: MemberStatus,
}

impl MemberExport {
  pub fn of(record: &MemberRecord) -> Self {
    Self {
      member_info: record.summary(),
      registration_details: record.submission.clone(),
      timestamp: record.registered_at,
      status: record.status,
    }
  }
}

pub fn filename(member_id: &str) -> String {
  format!("member-{}-data.json", member_id)
}
