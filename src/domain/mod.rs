//! Domain aggregates exposed by the site service layer.

pub mod access;
pub mod auth;
pub mod contact;
pub mod error_log;
pub mod hearing;
pub mod listing;
pub mod practice_area;
pub mod team_member;
pub mod types;
pub mod user;
