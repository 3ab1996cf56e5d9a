//! Diesel models for team members.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::team_member::{
    TeamMember as DomainTeamMember, TeamMemberDetails, TranslatedProfile, parse_practice_areas,
};
use crate::domain::types::{
    Email, ImageUrl, PersonName, PhoneNumber, RichText, TeamMemberId, Title, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::team_members)]
/// Diesel model for [`crate::domain::team_member::TeamMember`].
pub struct TeamMember {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub oab_number: Option<String>,
    pub title_pt: String,
    pub title_en: String,
    pub bio_pt: String,
    pub bio_en: String,
    pub education_pt: String,
    pub education_en: String,
    /// Comma separated practice area slugs.
    pub practice_areas: String,
    pub photo_url: Option<String>,
    pub display_order: i32,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::team_members)]
#[diesel(treat_none_as_null = true)]
/// Insertable and updatable form of [`TeamMember`]. The photo is managed
/// separately.
pub struct TeamMemberChanges<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub oab_number: Option<&'a str>,
    pub title_pt: &'a str,
    pub title_en: &'a str,
    pub bio_pt: &'a str,
    pub bio_en: &'a str,
    pub education_pt: &'a str,
    pub education_en: &'a str,
    pub practice_areas: String,
    pub display_order: i32,
    pub is_published: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::team_members)]
pub struct TranslationChanges<'a> {
    pub title_en: &'a str,
    pub bio_en: &'a str,
    pub education_en: &'a str,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<TeamMember> for DomainTeamMember {
    type Error = TypeConstraintError;

    fn try_from(member: TeamMember) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TeamMemberId::new(member.id)?,
            name: PersonName::new(member.name)?,
            email: Email::new(member.email)?,
            phone: member.phone.map(PhoneNumber::new).transpose()?,
            oab_number: member.oab_number.filter(|oab| !oab.trim().is_empty()),
            title_pt: Title::new(member.title_pt)?,
            title_en: member.title_en,
            bio_pt: RichText::new(member.bio_pt),
            bio_en: RichText::new(member.bio_en),
            education_pt: RichText::new(member.education_pt),
            education_en: RichText::new(member.education_en),
            practice_areas: parse_practice_areas(&member.practice_areas),
            photo_url: member.photo_url.map(ImageUrl::new).transpose()?,
            display_order: member.display_order,
            is_published: member.is_published,
            created_at: member.created_at,
            updated_at: member.updated_at,
        })
    }
}

impl<'a> TeamMemberChanges<'a> {
    pub fn from_details(details: &'a TeamMemberDetails, now: NaiveDateTime) -> Self {
        Self {
            name: details.name.as_str(),
            email: details.email.as_str(),
            phone: details.phone.as_ref().map(PhoneNumber::as_str),
            oab_number: details.oab_number.as_deref(),
            title_pt: details.title_pt.as_str(),
            title_en: details.title_en.as_str(),
            bio_pt: details.bio_pt.as_str(),
            bio_en: details.bio_en.as_str(),
            education_pt: details.education_pt.as_str(),
            education_en: details.education_en.as_str(),
            practice_areas: details.practice_areas.join(","),
            display_order: details.display_order,
            is_published: details.is_published,
            updated_at: now,
        }
    }
}

impl<'a> TranslationChanges<'a> {
    pub fn from_profile(profile: &'a TranslatedProfile, now: NaiveDateTime) -> Self {
        Self {
            title_en: profile.title_en.as_str(),
            bio_en: profile.bio_en.as_str(),
            education_en: profile.education_en.as_str(),
            updated_at: now,
        }
    }
}
