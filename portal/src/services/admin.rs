// parish-portal/src/services/admin.rs

//! Admin dashboard: listing, searching and the print workflow.

use crate::errors::{AppError, Result as AppResult};
use crate::models::member::{MemberRecord, MemberStatus, MemberSummary};
use crate::services::export::MemberExport;
use crate::store::MemberStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

pub const NO_MEMBERS_FOUND: &str = "No members found";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
  #[default]
  All,
  #[serde(alias = "pending_id_generation")]
  Pending,
  #[serde(alias = "id_card_printed")]
  Printed,
}

impl StatusFilter {
  pub fn admits(self, status: MemberStatus) -> bool {
    match self {
      StatusFilter::All => true,
      StatusFilter::Pending => status == MemberStatus::PendingIdGeneration,
      StatusFilter::Printed => status == MemberStatus::IdCardPrinted,
    }
  }
}

#[derive(Debug)]
pub struct SearchResult<'a> {
  pub matches: Vec<&'a MemberRecord>,
  pub message: Option<&'static str>,
}

/// Case-insensitive substring match over name, email and id, then the status filter.
pub fn search<'a>(records: &'a [MemberRecord], term: &str, filter: StatusFilter) -> SearchResult<'a> {
  let needle = term.trim().to_lowercase();
  let matches: Vec<&MemberRecord> = records
    .iter()
    .filter(|r| {
      needle.is_empty()
        || r.name.to_lowercase().contains(&needle)
        || r.email.to_lowercase().contains(&needle)
        || r.id.to_lowercase().contains(&needle)
    })
    .filter(|r| filter.admits(r.status))
    .collect();
  let message = matches.is_empty().then_some(NO_MEMBERS_FOUND);
  SearchResult { matches, message }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
  pub total: usize,
  pub pending: usize,
  pub printed: usize,
}

impl DashboardSummary {
  pub fn of(records: &[MemberRecord]) -> Self {
    let pending = records.iter().filter(|r| r.needs_id_card()).count();
    Self {
      total: records.len(),
      pending,
      printed: records.len() - pending,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
  pub summary: DashboardSummary,
  pub members: Vec<MemberSummary>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

#[derive(Clone)]
pub struct AdminService {
  store: Arc<dyn MemberStore>,
}

impl AdminService {
  pub fn new(store: Arc<dyn MemberStore>) -> Self {
    Self { store }
  }

  pub async fn list(&self) -> AppResult<Vec<MemberRecord>> {
    self.store.list().await
  }

  /// Summary counts always cover every record; the member list is filtered.
  #[instrument(name = "AdminService::dashboard", skip(self))]
  pub async fn dashboard(&self, term: &str, filter: StatusFilter) -> AppResult<Dashboard> {
    let records = self.store.list().await?;
    let result = search(&records, term, filter);
    Ok(Dashboard {
      summary: DashboardSummary::of(&records),
      members: result.matches.iter().map(|r| r.summary()).collect(),
      message: result.message.map(str::to_string),
    })
  }

  pub async fn get(&self, id: &str) -> AppResult<MemberRecord> {
    self
      .store
      .get(id)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))
  }

  #[instrument(name = "AdminService::mark_printed", skip(self))]
  pub async fn mark_printed(&self, id: &str) -> AppResult<MemberRecord> {
    let record = self
      .store
      .mark_printed(id)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))?;
    info!(member_id = %record.id, "ID card marked as printed.");
    Ok(record)
  }

  pub async fn export(&self, id: &str) -> AppResult<MemberExport> {
    Ok(MemberExport::of(&self.get(id).await?))
  }
}
