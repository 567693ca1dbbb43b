// parish-portal/src/models/registration.rs

//! Form input submitted by an applicant and the fixed choice lists it draws from.

use crate::models::photo::Photo;
use serde::de::value::StrDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ministry {
  #[serde(rename = "Choir")]
  Choir,
  #[serde(rename = "Ushering")]
  Ushering,
  #[serde(rename = "Lectors")]
  Lectors,
  #[serde(rename = "Altar Servers")]
  AltarServers,
  #[serde(rename = "Youth Ministry")]
  YouthMinistry,
  #[serde(rename = "Women's Guild")]
  WomensGuild,
  #[serde(rename = "Men's Fellowship")]
  MensFellowship,
  #[serde(rename = "Children's Ministry")]
  ChildrensMinistry,
  #[serde(rename = "Prayer Group")]
  PrayerGroup,
  #[serde(rename = "Evangelization")]
  Evangelization,
  #[serde(rename = "Social Services")]
  SocialServices,
  #[serde(rename = "Other")]
  Other,
}

impl Ministry {
  pub const ALL: [Ministry; 12] = [
    Ministry::Choir,
    Ministry::Ushering,
    Ministry::Lectors,
    Ministry::AltarServers,
    Ministry::YouthMinistry,
    Ministry::WomensGuild,
    Ministry::MensFellowship,
    Ministry::ChildrensMinistry,
    Ministry::PrayerGroup,
    Ministry::Evangelization,
    Ministry::SocialServices,
    Ministry::Other,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Ministry::Choir => "Choir",
      Ministry::Ushering => "Ushering",
      Ministry::Lectors => "Lectors",
      Ministry::AltarServers => "Altar Servers",
      Ministry::YouthMinistry => "Youth Ministry",
      Ministry::WomensGuild => "Women's Guild",
      Ministry::MensFellowship => "Men's Fellowship",
      Ministry::ChildrensMinistry => "Children's Ministry",
      Ministry::PrayerGroup => "Prayer Group",
      Ministry::Evangelization => "Evangelization",
      Ministry::SocialServices => "Social Services",
      Ministry::Other => "Other",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SacramentStatus {
  #[serde(rename = "Baptized")]
  Baptized,
  #[serde(rename = "Confirmed")]
  Confirmed,
  #[serde(rename = "First Communion")]
  FirstCommunion,
  #[serde(rename = "Baptized & Confirmed")]
  BaptizedAndConfirmed,
  #[serde(rename = "All Sacraments Received")]
  AllSacramentsReceived,
  #[serde(rename = "Preparing for Sacraments")]
  PreparingForSacraments,
}

impl SacramentStatus {
  pub const ALL: [SacramentStatus; 6] = [
    SacramentStatus::Baptized,
    SacramentStatus::Confirmed,
    SacramentStatus::FirstCommunion,
    SacramentStatus::BaptizedAndConfirmed,
    SacramentStatus::AllSacramentsReceived,
    SacramentStatus::PreparingForSacraments,
  ];

  pub fn label(self) -> &'static str {
    match self {
      SacramentStatus::Baptized => "Baptized",
      SacramentStatus::Confirmed => "Confirmed",
      SacramentStatus::FirstCommunion => "First Communion",
      SacramentStatus::BaptizedAndConfirmed => "Baptized & Confirmed",
      SacramentStatus::AllSacramentsReceived => "All Sacraments Received",
      SacramentStatus::PreparingForSacraments => "Preparing for Sacraments",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearsInFaith {
  #[serde(rename = "0-1")]
  UnderOne,
  #[serde(rename = "1-5")]
  OneToFive,
  #[serde(rename = "6-10")]
  SixToTen,
  #[serde(rename = "11-20")]
  ElevenToTwenty,
  #[serde(rename = "21-30")]
  TwentyOneToThirty,
  #[serde(rename = "30+")]
  OverThirty,
  #[serde(rename = "lifetime")]
  Lifetime,
}

impl YearsInFaith {
  pub const ALL: [YearsInFaith; 7] = [
    YearsInFaith::UnderOne,
    YearsInFaith::OneToFive,
    YearsInFaith::SixToTen,
    YearsInFaith::ElevenToTwenty,
    YearsInFaith::TwentyOneToThirty,
    YearsInFaith::OverThirty,
    YearsInFaith::Lifetime,
  ];

  /// Stored bucket key.
  pub fn value(self) -> &'static str {
    match self {
      YearsInFaith::UnderOne => "0-1",
      YearsInFaith::OneToFive => "1-5",
      YearsInFaith::SixToTen => "6-10",
      YearsInFaith::ElevenToTwenty => "11-20",
      YearsInFaith::TwentyOneToThirty => "21-30",
      YearsInFaith::OverThirty => "30+",
      YearsInFaith::Lifetime => "lifetime",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      YearsInFaith::UnderOne => "Less than 1 year",
      YearsInFaith::OneToFive => "1-5 years",
      YearsInFaith::SixToTen => "6-10 years",
      YearsInFaith::ElevenToTwenty => "11-20 years",
      YearsInFaith::TwentyOneToThirty => "21-30 years",
      YearsInFaith::OverThirty => "More than 30 years",
      YearsInFaith::Lifetime => "Lifetime Catholic",
    }
  }
}

/// Raw form state. Every field may be missing or malformed; `validation::validate`
/// decides whether it can go forward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationInput {
  pub full_name: String,
  /// `YYYY-MM-DD` as typed.
  pub date_of_birth: String,
  pub phone_number: String,
  pub email_address: String,
  #[serde(deserialize_with = "blank_as_none")]
  pub ministry: Option<Ministry>,
  pub custom_ministry: String,
  #[serde(deserialize_with = "blank_as_none")]
  pub sacrament_status: Option<SacramentStatus>,
  #[serde(deserialize_with = "blank_as_none")]
  pub years_in_faith: Option<YearsInFaith>,
  #[serde(rename = "passport", deserialize_with = "blank_as_none")]
  pub photo: Option<Photo>,
  #[serde(rename = "paymentScreenshot", deserialize_with = "blank_as_none")]
  pub payment_proof: Option<Photo>,
}

/// An unselected dropdown or empty file input arrives as `""`; treat it as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let raw = match Option::<String>::deserialize(deserializer)? {
    Some(raw) if !raw.trim().is_empty() => raw,
    _ => return Ok(None),
  };
  let de: StrDeserializer<'_, D::Error> = raw.trim().into_deserializer();
  T::deserialize(de).map(Some)
}

impl RegistrationInput {
  /// Ministry as shown to people: the free text when "Other" was picked.
  pub fn resolved_ministry(&self) -> Option<String> {
    match self.ministry? {
      Ministry::Other => Some(self.custom_ministry.trim().to_string()),
      m => Some(m.label().to_string()),
    }
  }
}

/// One selectable value with its display label.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceOption {
  pub value: &'static str,
  pub label: &'static str,
}

/// Choice lists served to the form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOptions {
  pub ministries: Vec<ChoiceOption>,
  pub sacrament_statuses: Vec<ChoiceOption>,
  pub years_in_faith: Vec<ChoiceOption>,
  pub minimum_age: u32,
}

impl RegistrationOptions {
  pub fn current() -> Self {
    Self {
      ministries: Ministry::ALL
        .iter()
        .map(|m| ChoiceOption {
          value: m.label(),
          label: m.label(),
        })
        .collect(),
      sacrament_statuses: SacramentStatus::ALL
        .iter()
        .map(|s| ChoiceOption {
          value: s.label(),
          label: s.label(),
        })
        .collect(),
      years_in_faith: YearsInFaith::ALL
        .iter()
        .map(|y| ChoiceOption {
          value: y.value(),
          label: y.label(),
        })
        .collect(),
      minimum_age: crate::validation::MINIMUM_AGE,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn choice_values_round_trip_through_serde_names() {
    for m in Ministry::ALL {
      let json = serde_json::to_string(&m).unwrap();
      assert_eq!(json, format!("\"{}\"", m.label()));
    }
    let years: YearsInFaith = serde_json::from_str("\"30+\"").unwrap();
    assert_eq!(years, YearsInFaith::OverThirty);
  }

  #[test]
  fn other_ministry_resolves_to_custom_text() {
    let input = RegistrationInput {
      ministry: Some(Ministry::Other),
      custom_ministry: "  Hospitality ".into(),
      ..Default::default()
    };
    assert_eq!(input.resolved_ministry().as_deref(), Some("Hospitality"));

    let choir = RegistrationInput {
      ministry: Some(Ministry::Choir),
      ..Default::default()
    };
    assert_eq!(choir.resolved_ministry().as_deref(), Some("Choir"));
  }

  #[test]
  fn blank_choices_and_photos_read_as_unselected() {
    let input: RegistrationInput = serde_json::from_str(
      r#"{"fullName":"Ada Obi","ministry":"","sacramentStatus":"  ","yearsInFaith":"","passport":"","paymentScreenshot":null}"#,
    )
    .unwrap();
    assert_eq!(input.full_name, "Ada Obi");
    assert_eq!(input.ministry, None);
    assert_eq!(input.sacrament_status, None);
    assert_eq!(input.years_in_faith, None);
    assert_eq!(input.photo, None);
    assert_eq!(input.payment_proof, None);

    let picked: RegistrationInput =
      serde_json::from_str(r#"{"ministry":"Altar Servers","yearsInFaith":"30+"}"#).unwrap();
    assert_eq!(picked.ministry, Some(Ministry::AltarServers));
    assert_eq!(picked.years_in_faith, Some(YearsInFaith::OverThirty));
    assert_eq!(picked.sacrament_status, None);

    assert!(serde_json::from_str::<RegistrationInput>(r#"{"ministry":"Bell Ringers"}"#).is_err());
    assert!(serde_json::from_str::<RegistrationInput>(r#"{"passport":"not a data url"}"#).is_err());
  }
}
