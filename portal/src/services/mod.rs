// parish-portal/src/services/mod.rs

pub mod admin;
pub mod checkout;
pub mod export;
pub mod id_card;
pub mod member_id;
pub mod payment_sim;
