//! Diesel models for hearings.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::hearing::{
    Hearing as DomainHearing, HearingDetails, NewHearing as DomainNewHearing,
};
use crate::domain::types::{
    CaseNumber, CourtName, Email, HearingId, LocationText, PersonName, RichText, ShareToken,
    TypeConstraintError, UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::hearings)]
/// Diesel model for [`crate::domain::hearing::Hearing`].
pub struct Hearing {
    pub id: i32,
    pub lawyer_id: i32,
    pub client_name: String,
    pub client_email: Option<String>,
    pub case_number: String,
    pub court: String,
    pub hearing_type: String,
    pub scheduled_at: NaiveDateTime,
    pub location: String,
    pub description: String,
    pub notes: String,
    pub status: String,
    pub is_shared: bool,
    pub share_token: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::hearings)]
/// Insertable form of [`Hearing`].
pub struct NewHearing<'a> {
    pub lawyer_id: i32,
    pub client_name: &'a str,
    pub client_email: Option<&'a str>,
    pub case_number: &'a str,
    pub court: &'a str,
    pub hearing_type: &'a str,
    pub scheduled_at: NaiveDateTime,
    pub location: &'a str,
    pub description: &'a str,
    pub notes: &'a str,
    pub status: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::hearings)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Hearing`] record.
pub struct UpdateHearing<'a> {
    pub client_name: &'a str,
    pub client_email: Option<&'a str>,
    pub case_number: &'a str,
    pub court: &'a str,
    pub hearing_type: &'a str,
    pub scheduled_at: NaiveDateTime,
    pub location: &'a str,
    pub description: &'a str,
    pub notes: &'a str,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Hearing> for DomainHearing {
    type Error = TypeConstraintError;

    fn try_from(hearing: Hearing) -> Result<Self, Self::Error> {
        Ok(Self {
            id: HearingId::new(hearing.id)?,
            lawyer_id: UserId::new(hearing.lawyer_id)?,
            client_name: PersonName::new(hearing.client_name)?,
            client_email: hearing.client_email.map(Email::new).transpose()?,
            case_number: CaseNumber::new(hearing.case_number)?,
            court: CourtName::new(hearing.court)?,
            hearing_type: hearing.hearing_type.parse()?,
            scheduled_at: hearing.scheduled_at,
            location: LocationText::new(hearing.location)?,
            description: RichText::new(hearing.description),
            notes: RichText::new(hearing.notes),
            status: hearing.status.parse()?,
            is_shared: hearing.is_shared,
            share_token: hearing.share_token.map(ShareToken::new).transpose()?,
            created_at: hearing.created_at,
            updated_at: hearing.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewHearing> for NewHearing<'a> {
    fn from(hearing: &'a DomainNewHearing) -> Self {
        let details = &hearing.details;
        Self {
            lawyer_id: hearing.lawyer_id.get(),
            client_name: details.client_name.as_str(),
            client_email: details.client_email.as_ref().map(Email::as_str),
            case_number: details.case_number.as_str(),
            court: details.court.as_str(),
            hearing_type: details.hearing_type.as_str(),
            scheduled_at: details.scheduled_at,
            location: details.location.as_str(),
            description: details.description.as_str(),
            notes: details.notes.as_str(),
            status: details.status.as_str(),
        }
    }
}

impl<'a> UpdateHearing<'a> {
    pub fn from_details(details: &'a HearingDetails, now: NaiveDateTime) -> Self {
        Self {
            client_name: details.client_name.as_str(),
            client_email: details.client_email.as_ref().map(Email::as_str),
            case_number: details.case_number.as_str(),
            court: details.court.as_str(),
            hearing_type: details.hearing_type.as_str(),
            scheduled_at: details.scheduled_at,
            location: details.location.as_str(),
            description: details.description.as_str(),
            notes: details.notes.as_str(),
            status: details.status.as_str(),
            updated_at: now,
        }
    }
}
