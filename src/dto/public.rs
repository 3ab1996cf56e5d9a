//! DTOs for the public marketing pages.

use serde::Serialize;

use crate::dto::listings::ListingView;
use crate::dto::team::{AreaView, TeamMemberView};

#[derive(Debug, Serialize)]
pub struct HomePageData {
    pub areas: Vec<AreaView>,
    pub team: Vec<TeamMemberView>,
    pub listings: Vec<ListingView>,
}

#[derive(Debug, Serialize)]
pub struct AreaPageData {
    pub area: AreaView,
    pub lawyers: Vec<TeamMemberView>,
}
