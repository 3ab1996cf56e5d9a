//! DTOs for the back-office dashboard, users and error log screens.

use serde::Serialize;

use crate::domain::error_log::ErrorLogEntry;
use crate::domain::user::UserWithRoles;
use crate::dto::hearings::HearingView;
use crate::pagination::Paginated;

#[derive(Debug, Serialize)]
pub struct DashboardData {
    /// Next hearings visible to the user; empty for tecnicos.
    pub upcoming_hearings: Vec<HearingView>,
    pub upcoming_total: usize,
    pub listings_total: Option<usize>,
    pub team_total: Option<usize>,
    pub pending_users: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct UsersPageData {
    pub users: Vec<UserWithRoles>,
}

#[derive(Debug, Serialize)]
pub struct ErrorLogsPageData {
    pub entries: Paginated<ErrorLogEntry>,
}
