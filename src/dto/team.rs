//! DTOs for team member profiles.

use serde::Serialize;

use crate::domain::practice_area::{PracticeArea, find_practice_area};
use crate::domain::team_member::TeamMember;
use crate::domain::types::Locale;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AreaView {
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
}

impl AreaView {
    pub fn new(area: &PracticeArea, locale: Locale) -> Self {
        Self {
            slug: area.slug,
            title: area.title(locale),
            summary: area.summary(locale),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeamMemberView {
    pub member: TeamMember,
    pub title: String,
    pub bio: String,
    pub education: String,
    pub areas: Vec<AreaView>,
}

impl TeamMemberView {
    pub fn new(member: TeamMember, locale: Locale) -> Self {
        let areas = member
            .practice_areas
            .iter()
            .filter_map(|slug| find_practice_area(slug))
            .map(|area| AreaView::new(area, locale))
            .collect();
        Self {
            title: member.title(locale).to_string(),
            bio: member.bio(locale).to_string(),
            education: member.education(locale).to_string(),
            areas,
            member,
        }
    }
}
