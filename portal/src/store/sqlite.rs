// parish-portal/src/store/sqlite.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::member::{MemberRecord, MemberStatus};
use crate::models::stats::{RegistrationStats, TallyPeriod};
use crate::store::MemberStore;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info, instrument};

const MEMBER_COUNTER: &str = "member_counter";

/// Embedded store: one JSON document per member plus counter tables.
#[derive(Clone)]
pub struct SqliteStore {
  pool: SqlitePool,
}

impl SqliteStore {
  /// Opens (creating if needed) the database at `url` and applies migrations.
  pub async fn connect(url: &str) -> AppResult<Self> {
    let mut options = SqliteConnectOptions::from_str(url)
      .map_err(|e| AppError::Config(format!("Invalid DATABASE_URL: {}", e)))?
      .create_if_missing(true)
      .pragma("busy_timeout", "5000");
    if !url.contains(":memory:") {
      options = options.journal_mode(SqliteJournalMode::Wal);
    }
    let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;
    info!("Database connection established (SQLite).");
    Self::with_pool(pool).await
  }

  /// Private database for a test run. A single connection keeps every query
  /// on the same in-memory database.
  pub async fn in_memory() -> AppResult<Self> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .min_connections(1)
      .idle_timeout(None)
      .max_lifetime(None)
      .connect_with(options)
      .await?;
    Self::with_pool(pool).await
  }

  pub async fn with_pool(pool: SqlitePool) -> AppResult<Self> {
    sqlx::migrate!("./migrations").run(&pool).await.map_err(sqlx::Error::from)?;
    debug!("Database migrations applied.");
    Ok(Self { pool })
  }

  pub fn pool(&self) -> &SqlitePool {
    &self.pool
  }
}

fn decode(raw: &str) -> AppResult<MemberRecord> {
  Ok(serde_json::from_str(raw)?)
}

#[async_trait]
impl MemberStore for SqliteStore {
  async fn contains_member_id(&self, id: &str) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE id = ?")
      .bind(id)
      .fetch_one(&self.pool)
      .await?;
    Ok(count > 0)
  }

  #[instrument(name = "SqliteStore::finalize", skip_all, fields(member_id = %record.id))]
  async fn finalize(&self, record: &MemberRecord) -> AppResult<()> {
    let document = serde_json::to_string(record)?;
    let mut tx = self.pool.begin().await?;

    let inserted = sqlx::query("INSERT INTO members (id, status, registered_at, record) VALUES (?, ?, ?, ?)")
      .bind(&record.id)
      .bind(record.status.as_str())
      .bind(record.registered_at.to_rfc3339())
      .bind(&document)
      .execute(&mut *tx)
      .await;
    match inserted {
      Ok(_) => {}
      Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
        return Err(AppError::Internal(format!("member id {} is already registered", record.id)));
      }
      Err(e) => return Err(e.into()),
    }

    sqlx::query("UPDATE counters SET value = value + 1 WHERE name = ?")
      .bind(MEMBER_COUNTER)
      .execute(&mut *tx)
      .await?;

    for period in TallyPeriod::ALL {
      sqlx::query(
        "INSERT INTO registration_tallies (period, bucket, count) VALUES (?, ?, 1) \
         ON CONFLICT(period, bucket) DO UPDATE SET count = count + 1",
      )
      .bind(period.as_str())
      .bind(period.bucket(record.registered_at))
      .execute(&mut *tx)
      .await?;
    }

    tx.commit().await?;
    debug!("Member record and counters committed.");
    Ok(())
  }

  async fn list(&self) -> AppResult<Vec<MemberRecord>> {
    let rows: Vec<String> = sqlx::query_scalar("SELECT record FROM members ORDER BY seq")
      .fetch_all(&self.pool)
      .await?;
    rows.iter().map(|raw| decode(raw)).collect()
  }

  async fn get(&self, id: &str) -> AppResult<Option<MemberRecord>> {
    let row: Option<String> = sqlx::query_scalar("SELECT record FROM members WHERE id = ?")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    row.as_deref().map(decode).transpose()
  }

  #[instrument(name = "SqliteStore::mark_printed", skip(self))]
  async fn mark_printed(&self, id: &str) -> AppResult<Option<MemberRecord>> {
    let mut tx = self.pool.begin().await?;
    let row: Option<String> = sqlx::query_scalar("SELECT record FROM members WHERE id = ?")
      .bind(id)
      .fetch_optional(&mut *tx)
      .await?;
    let Some(raw) = row else {
      return Ok(None);
    };

    let mut record = decode(&raw)?;
    record.status = MemberStatus::IdCardPrinted;
    sqlx::query("UPDATE members SET status = ?, record = ? WHERE id = ?")
      .bind(record.status.as_str())
      .bind(serde_json::to_string(&record)?)
      .bind(id)
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;
    Ok(Some(record))
  }

  async fn member_counter(&self) -> AppResult<u64> {
    let value: Option<i64> = sqlx::query_scalar("SELECT value FROM counters WHERE name = ?")
      .bind(MEMBER_COUNTER)
      .fetch_optional(&self.pool)
      .await?;
    Ok(value.unwrap_or(0).max(0) as u64)
  }

  async fn stats(&self) -> AppResult<RegistrationStats> {
    let mut stats = RegistrationStats {
      total_members: self.member_counter().await?,
      ..Default::default()
    };
    let rows: Vec<(String, String, i64)> = sqlx::query_as("SELECT period, bucket, count FROM registration_tallies")
      .fetch_all(&self.pool)
      .await?;
    for (period, bucket, count) in rows {
      match TallyPeriod::parse(&period) {
        Some(period) => {
          stats.tallies_mut(period).insert(bucket, count.max(0) as u64);
        }
        None => tracing::warn!(%period, "Ignoring tally row with unknown period."),
      }
    }
    Ok(stats)
  }
}
