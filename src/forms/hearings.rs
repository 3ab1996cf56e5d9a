//! Forms for creating, editing and re-scheduling hearings.

use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::hearing::{HearingDetails, HearingStatus, HearingType, NewHearing};
use crate::domain::types::{
    CaseNumber, CourtName, Email, LocationText, PersonName, RichText, UserId,
};
use crate::forms::{FormError, non_blank};

/// Parses the value of an `<input type="datetime-local">`.
pub fn parse_local_datetime(value: &str) -> Result<NaiveDateTime, FormError> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M"))
        .map_err(|_| FormError::InvalidDateTime)
}

#[derive(Deserialize, Validate)]
/// Form data shared by the create and edit hearing screens.
pub struct HearingForm {
    #[validate(length(min = 1, max = 200))]
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    #[validate(length(min = 1, max = 64))]
    pub case_number: String,
    #[validate(length(min = 1, max = 200))]
    pub court: String,
    pub hearing_type: String,
    /// `YYYY-MM-DDTHH:MM`, local time of the court.
    pub scheduled_at: String,
    #[validate(length(min = 1, max = 300))]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl TryFrom<HearingForm> for HearingDetails {
    type Error = FormError;

    fn try_from(form: HearingForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let client_email = non_blank(&form.client_email)
            .map(Email::new)
            .transpose()
            .map_err(|_| FormError::InvalidEmail)?;
        let status = match form.status.as_deref().and_then(non_blank) {
            Some(status) => status.parse::<HearingStatus>()?,
            None => HearingStatus::Scheduled,
        };

        Ok(Self {
            client_name: PersonName::new(form.client_name).map_err(|_| FormError::InvalidName)?,
            client_email,
            case_number: CaseNumber::new(form.case_number)
                .map_err(|_| FormError::Required("número do processo"))?,
            court: CourtName::new(form.court).map_err(|_| FormError::Required("vara/tribunal"))?,
            hearing_type: form.hearing_type.trim().parse::<HearingType>()?,
            scheduled_at: parse_local_datetime(&form.scheduled_at)?,
            location: LocationText::new(form.location)
                .map_err(|_| FormError::Required("local"))?,
            description: RichText::new(form.description),
            notes: RichText::new(form.notes),
            status,
        })
    }
}

impl HearingDetails {
    pub fn into_new_hearing(self, lawyer_id: UserId) -> NewHearing {
        NewHearing {
            lawyer_id,
            details: self,
        }
    }
}

#[derive(Deserialize)]
/// Quick status change from the hearings list.
pub struct HearingStatusForm {
    pub status: String,
}

impl TryFrom<HearingStatusForm> for HearingStatus {
    type Error = FormError;

    fn try_from(form: HearingStatusForm) -> Result<Self, Self::Error> {
        Ok(form.status.trim().parse::<HearingStatus>()?)
    }
}
