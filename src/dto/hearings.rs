//! DTOs for hearing screens and the public share page.

use serde::Serialize;

use crate::domain::hearing::{Hearing, HearingStatus, HearingType};
use crate::dto::Choice;
use crate::pagination::Paginated;

#[derive(Debug, Serialize)]
pub struct HearingView {
    pub hearing: Hearing,
    pub type_label: &'static str,
    pub status_label: &'static str,
    /// Path of the public page while sharing is on.
    pub share_path: Option<String>,
    /// Whether offering a calendar download makes sense.
    pub can_export: bool,
}

impl From<Hearing> for HearingView {
    fn from(hearing: Hearing) -> Self {
        let share_path = match (&hearing.share_token, hearing.is_shared) {
            (Some(token), true) => Some(format!("/audiencia/{token}")),
            _ => None,
        };
        Self {
            type_label: hearing.hearing_type.label(),
            status_label: hearing.status.label(),
            can_export: hearing.status.is_exportable(),
            share_path,
            hearing,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HearingsPageData {
    pub hearings: Paginated<HearingView>,
    pub status: Option<HearingStatus>,
}

pub fn hearing_type_choices() -> Vec<Choice> {
    HearingType::ALL
        .into_iter()
        .map(|kind| Choice {
            value: kind.as_str(),
            label: kind.label(),
        })
        .collect()
}

pub fn hearing_status_choices() -> Vec<Choice> {
    HearingStatus::ALL
        .into_iter()
        .map(|status| Choice {
            value: status.as_str(),
            label: status.label(),
        })
        .collect()
}
