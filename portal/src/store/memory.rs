// parish-portal/src/store/memory.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::member::{MemberRecord, MemberStatus};
use crate::models::stats::RegistrationStats;
use crate::store::MemberStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
struct MemoryState {
  records: Vec<MemberRecord>,
  index: HashMap<String, usize>,
  stats: RegistrationStats,
}

/// Process-local store. One lock covers records and counters together.
#[derive(Default)]
pub struct InMemoryStore {
  state: RwLock<MemoryState>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl MemberStore for InMemoryStore {
  async fn contains_member_id(&self, id: &str) -> AppResult<bool> {
    Ok(self.state.read().index.contains_key(id))
  }

  async fn finalize(&self, record: &MemberRecord) -> AppResult<()> {
    let mut state = self.state.write();
    if state.index.contains_key(&record.id) {
      return Err(AppError::Internal(format!("member id {} is already registered", record.id)));
    }
    let position = state.records.len();
    state.records.push(record.clone());
    state.index.insert(record.id.clone(), position);
    state.stats.record(record.registered_at);
    Ok(())
  }

  async fn list(&self) -> AppResult<Vec<MemberRecord>> {
    Ok(self.state.read().records.clone())
  }

  async fn get(&self, id: &str) -> AppResult<Option<MemberRecord>> {
    let state = self.state.read();
    Ok(state.index.get(id).map(|&i| state.records[i].clone()))
  }

  async fn mark_printed(&self, id: &str) -> AppResult<Option<MemberRecord>> {
    let mut state = self.state.write();
    let Some(&position) = state.index.get(id) else {
      return Ok(None);
    };
    let record = &mut state.records[position];
    record.status = MemberStatus::IdCardPrinted;
    Ok(Some(record.clone()))
  }

  async fn member_counter(&self) -> AppResult<u64> {
    Ok(self.state.read().stats.total_members)
  }

  async fn stats(&self) -> AppResult<RegistrationStats> {
    Ok(self.state.read().stats.clone())
  }
}
