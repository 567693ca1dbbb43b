// parish-portal/src/lib.rs

//! Parish membership registration portal: applicants register and pay the
//! membership fee, admins review members and print ID cards.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;
pub mod web;

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, Result};
pub use crate::state::AppState;
