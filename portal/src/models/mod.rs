// parish-portal/src/models/mod.rs

pub mod member;
pub mod payment;
pub mod photo;
pub mod registration;
pub mod stats;
pub mod success;

pub use member::{MemberRecord, MemberStatus, MemberSummary};
pub use payment::{
  CheckoutCustomer, CheckoutCustomizations, CheckoutOutcome, CheckoutRequest, CheckoutStatus, PaymentMethod,
  PaymentReceipt, PaymentSelection,
};
pub use photo::{Photo, PhotoError};
pub use registration::{Ministry, RegistrationInput, RegistrationOptions, SacramentStatus, YearsInFaith};
pub use stats::{RegistrationStats, TallyPeriod};
pub use success::{NextStep, SuccessView};
