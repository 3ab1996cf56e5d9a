//! Back-office landing page.

use chrono::Utc;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::hearing::HearingStatus;
use crate::dto::admin::DashboardData;
use crate::dto::hearings::HearingView;
use crate::repository::{
    HearingListQuery, HearingReader, ListingListQuery, ListingReader, TeamMemberReader,
    UserReader,
};
use crate::services::ServiceResult;

const UPCOMING_LIMIT: usize = 5;

/// Summary cards for the signed-in user. Each card is filled only when the
/// user's roles grant access to the matching section.
pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardData>
where
    R: HearingReader + ListingReader + TeamMemberReader + UserReader + ?Sized,
{
    let (upcoming_total, upcoming_hearings) = if user.is_tecnico() {
        (0, Vec::new())
    } else {
        let mut query = HearingListQuery::default()
            .status(HearingStatus::Scheduled)
            .upcoming(Utc::now().naive_utc())
            .paginate(1, UPCOMING_LIMIT);
        if !user.is_admin() {
            query = query.lawyer(user.id);
        }
        let (total, hearings) = repo.list_hearings(query)?;
        (total, hearings.into_iter().map(HearingView::from).collect())
    };

    let listings_total = if user.is_admin() || user.is_tecnico() {
        let (total, _) = repo.list_listings(ListingListQuery::default().paginate(1, 1))?;
        Some(total)
    } else {
        None
    };

    let (team_total, pending_users) = if user.is_admin() {
        let team = repo.list_team_members(false)?.len();
        let pending = repo
            .list_users_with_roles()?
            .iter()
            .filter(|entry| !entry.user.approved)
            .count();
        (Some(team), Some(pending))
    } else {
        (None, None)
    };

    Ok(DashboardData {
        upcoming_hearings,
        upcoming_total,
        listings_total,
        team_total,
        pending_users,
    })
}
