// parish-portal/src/web/handlers/mod.rs

pub mod admin_handlers;
pub mod checkout_handlers;
pub mod registration_handlers;
