// parish-portal/src/store/mod.rs

//! Persistence for member records and registration counters.

pub mod memory;
pub mod sqlite;

use crate::config::{AppConfig, StorageBackend};
use crate::errors::Result as AppResult;
use crate::models::member::MemberRecord;
use crate::models::stats::RegistrationStats;
use async_trait::async_trait;
use std::sync::Arc;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait MemberStore: Send + Sync {
  async fn contains_member_id(&self, id: &str) -> AppResult<bool>;

  /// Inserts `record` and bumps the member counter and every tally in one
  /// operation. Either all of it lands or none of it does.
  async fn finalize(&self, record: &MemberRecord) -> AppResult<()>;

  /// Every record in insertion order.
  async fn list(&self) -> AppResult<Vec<MemberRecord>>;

  async fn get(&self, id: &str) -> AppResult<Option<MemberRecord>>;

  /// Flips the record to `IdCardPrinted`. `None` when the id is unknown.
  async fn mark_printed(&self, id: &str) -> AppResult<Option<MemberRecord>>;

  async fn member_counter(&self) -> AppResult<u64>;

  async fn stats(&self) -> AppResult<RegistrationStats>;
}

/// Opens the store selected by `STORAGE_BACKEND`.
pub async fn connect(config: &AppConfig) -> AppResult<Arc<dyn MemberStore>> {
  match config.storage_backend {
    StorageBackend::Memory => {
      tracing::warn!("Using the in-memory member store; records are lost on restart.");
      Ok(Arc::new(InMemoryStore::new()))
    }
    StorageBackend::Sqlite => Ok(Arc::new(SqliteStore::connect(&config.database_url).await?)),
  }
}
