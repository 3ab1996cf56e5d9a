//! Hearings scheduled by lawyers and their public share links.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CaseNumber, CourtName, Email, HearingId, LocationText, PersonName, RichText, ShareToken,
    TypeConstraintError, UserId,
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HearingType {
    Conciliation,
    Instruction,
    Trial,
    Unified,
    Other,
}

impl HearingType {
    pub const ALL: [HearingType; 5] = [
        HearingType::Conciliation,
        HearingType::Instruction,
        HearingType::Trial,
        HearingType::Unified,
        HearingType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HearingType::Conciliation => "conciliation",
            HearingType::Instruction => "instruction",
            HearingType::Trial => "trial",
            HearingType::Unified => "unified",
            HearingType::Other => "other",
        }
    }

    /// Portuguese label shown to clients.
    pub fn label(self) -> &'static str {
        match self {
            HearingType::Conciliation => "Conciliação",
            HearingType::Instruction => "Instrução",
            HearingType::Trial => "Julgamento",
            HearingType::Unified => "Una",
            HearingType::Other => "Outra",
        }
    }
}

impl Display for HearingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HearingType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HearingType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("hearing type {s}")))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HearingStatus {
    Scheduled,
    Held,
    Cancelled,
    Postponed,
}

impl HearingStatus {
    pub const ALL: [HearingStatus; 4] = [
        HearingStatus::Scheduled,
        HearingStatus::Held,
        HearingStatus::Cancelled,
        HearingStatus::Postponed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HearingStatus::Scheduled => "scheduled",
            HearingStatus::Held => "held",
            HearingStatus::Cancelled => "cancelled",
            HearingStatus::Postponed => "postponed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HearingStatus::Scheduled => "Agendada",
            HearingStatus::Held => "Realizada",
            HearingStatus::Cancelled => "Cancelada",
            HearingStatus::Postponed => "Adiada",
        }
    }

    /// Only upcoming hearings are worth adding to a calendar.
    pub fn is_exportable(self) -> bool {
        matches!(self, HearingStatus::Scheduled | HearingStatus::Postponed)
    }
}

impl Display for HearingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HearingStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HearingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("hearing status {s}")))
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Hearing {
    pub id: HearingId,
    pub lawyer_id: UserId,
    pub client_name: PersonName,
    pub client_email: Option<Email>,
    pub case_number: CaseNumber,
    pub court: CourtName,
    pub hearing_type: HearingType,
    pub scheduled_at: NaiveDateTime,
    pub location: LocationText,
    pub description: RichText,
    pub notes: RichText,
    pub status: HearingStatus,
    pub is_shared: bool,
    pub share_token: Option<ShareToken>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Hearing {
    /// Whether `token` opens the public view of this hearing.
    pub fn is_publicly_viewable_with(&self, token: &str) -> bool {
        self.is_shared
            && self
                .share_token
                .as_ref()
                .is_some_and(|stored| stored.as_str() == token)
    }
}

/// Editable hearing fields shared by create and update.
#[derive(Clone, Debug, PartialEq)]
pub struct HearingDetails {
    pub client_name: PersonName,
    pub client_email: Option<Email>,
    pub case_number: CaseNumber,
    pub court: CourtName,
    pub hearing_type: HearingType,
    pub scheduled_at: NaiveDateTime,
    pub location: LocationText,
    pub description: RichText,
    pub notes: RichText,
    pub status: HearingStatus,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewHearing {
    pub lawyer_id: UserId,
    pub details: HearingDetails,
}

/// Change to the public sharing state of a hearing.
#[derive(Clone, Debug, PartialEq)]
pub enum ShareUpdate {
    /// Turn sharing on, keeping `token` as the active link.
    Enable(ShareToken),
    /// Turn sharing off; the stored token stops working.
    Disable,
    /// Replace the token, invalidating previously sent links.
    Rotate(ShareToken),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(is_shared: bool, token: Option<&str>) -> Hearing {
        let at = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        Hearing {
            id: HearingId::new(1).unwrap(),
            lawyer_id: UserId::new(2).unwrap(),
            client_name: PersonName::new("Ana Souza").unwrap(),
            client_email: None,
            case_number: CaseNumber::new("0001234-56.2025.8.26.0100").unwrap(),
            court: CourtName::new("2ª Vara Cível").unwrap(),
            hearing_type: HearingType::Conciliation,
            scheduled_at: at,
            location: LocationText::new("Fórum João Mendes").unwrap(),
            description: RichText::default(),
            notes: RichText::default(),
            status: HearingStatus::Scheduled,
            is_shared,
            share_token: token.map(|t| ShareToken::new(t).unwrap()),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn unshared_hearing_rejects_even_the_stored_token() {
        let hearing = sample(false, Some("abc123"));
        assert!(!hearing.is_publicly_viewable_with("abc123"));
        assert!(!hearing.is_publicly_viewable_with("other"));
    }

    #[test]
    fn shared_hearing_accepts_only_the_exact_token() {
        let token = "0f1e2d3c4b5a69788796a5b4c3d2e1f0";
        let hearing = sample(true, Some(token));
        assert!(hearing.is_publicly_viewable_with(token));

        for (idx, ch) in token.char_indices() {
            let replacement = if ch == 'a' { 'b' } else { 'a' };
            let mut mutated = token.to_string();
            mutated.replace_range(idx..idx + ch.len_utf8(), &replacement.to_string());
            assert!(!hearing.is_publicly_viewable_with(&mutated), "{mutated}");
        }
        assert!(!hearing.is_publicly_viewable_with(&token.to_uppercase()));
        assert!(!hearing.is_publicly_viewable_with(&format!("{token} ")));
    }

    #[test]
    fn shared_flag_without_token_is_not_viewable() {
        let hearing = sample(true, None);
        assert!(!hearing.is_publicly_viewable_with(""));
    }

    #[test]
    fn enums_parse_their_storage_names() {
        for kind in HearingType::ALL {
            assert_eq!(kind.as_str().parse::<HearingType>(), Ok(kind));
        }
        for status in HearingStatus::ALL {
            assert_eq!(status.as_str().parse::<HearingStatus>(), Ok(status));
        }
        assert!("pending".parse::<HearingStatus>().is_err());
    }
}
