// parish-portal/src/services/member_id.rs

//! Member identifiers: prefix, last six digits of the millisecond clock and a
//! three digit random suffix, e.g. `SG482913057`.

use crate::errors::{AppError, Result as AppResult};
use crate::store::MemberStore;
use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use tracing::{debug, instrument, warn};

pub const MAX_ATTEMPTS: usize = 8;

pub fn candidate(prefix: &str, now: DateTime<Utc>, suffix: u32) -> String {
  let clock = now.timestamp_millis().rem_euclid(1_000_000);
  format!("{}{:06}{:03}", prefix, clock, suffix % 1000)
}

pub fn is_well_formed(prefix: &str, id: &str) -> bool {
  id.strip_prefix(prefix)
    .map(|digits| digits.len() == 9 && digits.bytes().all(|b| b.is_ascii_digit()))
    .unwrap_or(false)
}

/// Checkout transaction reference: `<prefix>-<member id>-<millis>`.
pub fn tx_ref(prefix: &str, member_id: &str, now: DateTime<Utc>) -> String {
  format!("{}-{}-{}", prefix, member_id, now.timestamp_millis())
}

/// Member id embedded in a tx_ref produced by [`tx_ref`].
pub fn member_id_from_tx_ref<'a>(prefix: &str, tx_ref: &'a str) -> Option<&'a str> {
  let rest = tx_ref.strip_prefix(prefix)?.strip_prefix('-')?;
  let (member_id, millis) = rest.rsplit_once('-')?;
  let millis_ok = !millis.is_empty() && millis.bytes().all(|b| b.is_ascii_digit());
  (millis_ok && is_well_formed(prefix, member_id)).then_some(member_id)
}

/// Picks an identifier not yet present in the store.
#[instrument(skip(store))]
pub async fn allocate(store: &dyn MemberStore, prefix: &str) -> AppResult<String> {
  for attempt in 1..=MAX_ATTEMPTS {
    let id = candidate(prefix, Utc::now(), OsRng.next_u32());
    if !store.contains_member_id(&id).await? {
      debug!(%id, attempt, "Member id allocated.");
      return Ok(id);
    }
    warn!(%id, attempt, "Member id collision, retrying.");
  }
  Err(AppError::Internal(format!(
    "could not allocate a unique member id after {} attempts",
    MAX_ATTEMPTS
  )))
}
