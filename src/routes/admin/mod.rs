//! Back-office screens. Every handler here sits behind the admin host gate
//! and requires an approved account.

pub mod dashboard;
pub mod error_logs;
pub mod hearings;
pub mod listings;
pub mod profile;
pub mod team;
pub mod users;

use serde::Deserialize;

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}
