// parish-portal/src/models/stats.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TallyPeriod {
  Daily,
  Monthly,
  Yearly,
}

impl TallyPeriod {
  pub const ALL: [TallyPeriod; 3] = [TallyPeriod::Daily, TallyPeriod::Monthly, TallyPeriod::Yearly];

  pub fn as_str(self) -> &'static str {
    match self {
      TallyPeriod::Daily => "daily",
      TallyPeriod::Monthly => "monthly",
      TallyPeriod::Yearly => "yearly",
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    TallyPeriod::ALL.into_iter().find(|p| p.as_str() == raw)
  }

  /// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`, in UTC.
  pub fn bucket(self, at: DateTime<Utc>) -> String {
    match self {
      TallyPeriod::Daily => at.format("%Y-%m-%d").to_string(),
      TallyPeriod::Monthly => at.format("%Y-%m").to_string(),
      TallyPeriod::Yearly => at.format("%Y").to_string(),
    }
  }
}

/// Running member counter plus per-day, per-month and per-year tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStats {
  pub total_members: u64,
  pub daily: BTreeMap<String, u64>,
  pub monthly: BTreeMap<String, u64>,
  pub yearly: BTreeMap<String, u64>,
}

impl RegistrationStats {
  /// Counts one successful registration made at `at`.
  pub fn record(&mut self, at: DateTime<Utc>) {
    self.total_members += 1;
    for period in TallyPeriod::ALL {
      *self.tallies_mut(period).entry(period.bucket(at)).or_insert(0) += 1;
    }
  }

  pub fn tallies(&self, period: TallyPeriod) -> &BTreeMap<String, u64> {
    match period {
      TallyPeriod::Daily => &self.daily,
      TallyPeriod::Monthly => &self.monthly,
      TallyPeriod::Yearly => &self.yearly,
    }
  }

  pub fn tallies_mut(&mut self, period: TallyPeriod) -> &mut BTreeMap<String, u64> {
    match period {
      TallyPeriod::Daily => &mut self.daily,
      TallyPeriod::Monthly => &mut self.monthly,
      TallyPeriod::Yearly => &mut self.yearly,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn record_bumps_total_and_every_period() {
    let mut stats = RegistrationStats::default();
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap();
    stats.record(at);
    stats.record(at);

    assert_eq!(stats.total_members, 2);
    assert_eq!(stats.daily.get("2024-03-09"), Some(&2));
    assert_eq!(stats.monthly.get("2024-03"), Some(&2));
    assert_eq!(stats.yearly.get("2024"), Some(&2));
  }
}
