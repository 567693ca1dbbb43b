// parish-portal/src/validation.rs

//! Field checks for the registration form. Every field is checked so the
//! applicant sees all problems at once.

use crate::models::photo::Photo;
use crate::models::registration::{Ministry, RegistrationInput, SacramentStatus, YearsInFaith};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const MINIMUM_AGE: u32 = 16;

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s\-+()]{10,}$").expect("phone pattern"));
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// One message per failing field, keyed by the form's field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
  pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.entry(field).or_insert_with(|| message.into());
  }

  pub fn get(&self, field: &str) -> Option<&str> {
    self.0.get(field).map(String::as_str)
  }

  pub fn contains(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
    self.0.iter().map(|(k, v)| (*k, v.as_str()))
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, message) in self.iter() {
      if !first {
        f.write_str("; ")?;
      }
      write!(f, "{field}: {message}")?;
      first = false;
    }
    Ok(())
  }
}

/// A form that passed every check. The raw input rides along untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRegistration {
  input: RegistrationInput,
  date_of_birth: NaiveDate,
  ministry: String,
  sacrament_status: SacramentStatus,
  years_in_faith: YearsInFaith,
}

impl ValidRegistration {
  pub fn input(&self) -> &RegistrationInput {
    &self.input
  }

  pub fn full_name(&self) -> &str {
    self.input.full_name.trim()
  }

  pub fn email(&self) -> &str {
    self.input.email_address.trim()
  }

  pub fn phone(&self) -> &str {
    self.input.phone_number.trim()
  }

  pub fn date_of_birth(&self) -> NaiveDate {
    self.date_of_birth
  }

  /// Display ministry; the custom text when "Other" was picked.
  pub fn ministry(&self) -> &str {
    &self.ministry
  }

  pub fn sacrament_status(&self) -> SacramentStatus {
    self.sacrament_status
  }

  pub fn years_in_faith(&self) -> YearsInFaith {
    self.years_in_faith
  }

  pub fn photo(&self) -> Option<&Photo> {
    self.input.photo.as_ref()
  }

  pub fn payment_proof(&self) -> Option<&Photo> {
    self.input.payment_proof.as_ref()
  }
}

pub fn validate(input: &RegistrationInput, today: NaiveDate) -> Result<ValidRegistration, FieldErrors> {
  let mut errors = FieldErrors::default();

  if input.full_name.trim().is_empty() {
    errors.insert("fullName", "Full name is required");
  }

  let date_of_birth = check_date_of_birth(&input.date_of_birth, today, &mut errors);

  if input.phone_number.trim().is_empty() {
    errors.insert("phoneNumber", "Phone number is required");
  } else if !PHONE_PATTERN.is_match(&input.phone_number) {
    errors.insert("phoneNumber", "Please enter a valid phone number");
  }

  if input.email_address.trim().is_empty() {
    errors.insert("emailAddress", "Email address is required");
  } else if !EMAIL_PATTERN.is_match(&input.email_address) {
    errors.insert("emailAddress", "Please enter a valid email address");
  }

  match input.ministry {
    None => errors.insert("ministry", "Please select a ministry"),
    Some(Ministry::Other) if input.custom_ministry.trim().is_empty() => {
      errors.insert("customMinistry", "Please specify your ministry")
    }
    Some(_) => {}
  }

  if input.sacrament_status.is_none() {
    errors.insert("sacramentStatus", "Please select your sacrament status");
  }
  if input.years_in_faith.is_none() {
    errors.insert("yearsInFaith", "Please specify years in faith");
  }
  if input.photo.is_none() {
    errors.insert("passport", "Passport photograph is required");
  }

  match (date_of_birth, input.resolved_ministry(), input.sacrament_status, input.years_in_faith) {
    (Some(date_of_birth), Some(ministry), Some(sacrament_status), Some(years_in_faith)) if errors.is_empty() => {
      Ok(ValidRegistration {
        input: input.clone(),
        date_of_birth,
        ministry,
        sacrament_status,
        years_in_faith,
      })
    }
    _ => Err(errors),
  }
}

fn check_date_of_birth(raw: &str, today: NaiveDate, errors: &mut FieldErrors) -> Option<NaiveDate> {
  let raw = raw.trim();
  if raw.is_empty() {
    errors.insert("dateOfBirth", "Date of birth is required");
    return None;
  }
  let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") else {
    errors.insert("dateOfBirth", "Please enter a valid date of birth");
    return None;
  };
  // years_since is None for dates after today
  match today.years_since(date) {
    Some(age) if age >= MINIMUM_AGE => Some(date),
    _ => {
      errors.insert("dateOfBirth", format!("Must be at least {MINIMUM_AGE} years old"));
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
  }

  fn complete() -> RegistrationInput {
    RegistrationInput {
      full_name: "Ada Obi".into(),
      date_of_birth: "1990-05-01".into(),
      phone_number: "+234 801 234 5678".into(),
      email_address: "ada@example.com".into(),
      ministry: Some(Ministry::Choir),
      sacrament_status: Some(SacramentStatus::Confirmed),
      years_in_faith: Some(YearsInFaith::SixToTen),
      photo: Some(Photo::new("image/png", vec![1, 2, 3]).unwrap()),
      ..Default::default()
    }
  }

  #[test]
  fn complete_form_passes_and_keeps_input() {
    let valid = validate(&complete(), today()).unwrap();
    assert_eq!(valid.input(), &complete());
    assert_eq!(valid.date_of_birth(), NaiveDate::from_ymd_opt(1990, 5, 1).unwrap());
    assert_eq!(valid.ministry(), "Choir");
  }

  #[test]
  fn empty_form_reports_every_field() {
    let errors = validate(&RegistrationInput::default(), today()).unwrap_err();
    assert_eq!(errors.get("fullName"), Some("Full name is required"));
    assert_eq!(errors.get("dateOfBirth"), Some("Date of birth is required"));
    assert_eq!(errors.get("phoneNumber"), Some("Phone number is required"));
    assert_eq!(errors.get("emailAddress"), Some("Email address is required"));
    assert_eq!(errors.get("ministry"), Some("Please select a ministry"));
    assert_eq!(errors.get("sacramentStatus"), Some("Please select your sacrament status"));
    assert_eq!(errors.get("yearsInFaith"), Some("Please specify years in faith"));
    assert_eq!(errors.get("passport"), Some("Passport photograph is required"));
    assert_eq!(errors.len(), 8);
  }

  #[test]
  fn age_is_counted_in_completed_years() {
    let mut input = complete();
    input.date_of_birth = "2008-06-01".into();
    assert!(validate(&input, today()).is_ok());

    input.date_of_birth = "2008-06-02".into();
    let errors = validate(&input, today()).unwrap_err();
    assert_eq!(errors.get("dateOfBirth"), Some("Must be at least 16 years old"));

    input.date_of_birth = "2030-01-01".into();
    assert!(validate(&input, today()).unwrap_err().contains("dateOfBirth"));

    input.date_of_birth = "01/05/1990".into();
    let errors = validate(&input, today()).unwrap_err();
    assert_eq!(errors.get("dateOfBirth"), Some("Please enter a valid date of birth"));
  }

  #[test]
  fn malformed_contact_details_are_rejected() {
    let mut input = complete();
    input.phone_number = "12345".into();
    input.email_address = "ada@example".into();
    let errors = validate(&input, today()).unwrap_err();
    assert_eq!(errors.get("phoneNumber"), Some("Please enter a valid phone number"));
    assert_eq!(errors.get("emailAddress"), Some("Please enter a valid email address"));
    assert_eq!(errors.len(), 2);
  }

  #[test]
  fn other_ministry_needs_custom_text() {
    let mut input = complete();
    input.ministry = Some(Ministry::Other);
    input.custom_ministry = "   ".into();
    let errors = validate(&input, today()).unwrap_err();
    assert_eq!(errors.get("customMinistry"), Some("Please specify your ministry"));

    input.custom_ministry = "Hospitality".into();
    assert_eq!(validate(&input, today()).unwrap().ministry(), "Hospitality");
  }
}
