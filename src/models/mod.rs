//! Database models backing the site repository.

#[cfg(feature = "server")]
pub mod config;
pub mod error_log;
pub mod hearing;
pub mod listing;
pub mod team_member;
pub mod user;
