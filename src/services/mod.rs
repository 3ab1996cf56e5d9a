//! Business logic sitting between the routes and the repository.

pub mod auth;
pub mod contact;
pub mod dashboard;
pub mod error_log;
mod errors;
pub mod hearings;
pub mod listings;
pub mod password;
pub mod public;
pub mod retry;
pub mod storage;
pub mod team;
pub mod translation;
pub mod users;

pub use errors::{ServiceError, ServiceResult, ensure_access};
