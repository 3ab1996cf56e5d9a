//! Forms for team member profiles.

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::practice_area::find_practice_area;
use crate::domain::team_member::TeamMemberDetails;
use crate::domain::types::{Email, PersonName, PhoneNumber, RichText, Title};
use crate::forms::{FormError, checkbox, non_blank};

#[derive(Deserialize, Validate)]
/// Team member editor. Sent as `application/x-www-form-urlencoded` with one
/// `practice_areas` entry per ticked checkbox.
pub struct TeamMemberForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub oab_number: String,
    #[validate(length(min = 1, max = 200))]
    pub title_pt: String,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub bio_pt: String,
    #[serde(default)]
    pub bio_en: String,
    #[serde(default)]
    pub education_pt: String,
    #[serde(default)]
    pub education_en: String,
    #[serde(default)]
    pub practice_areas: Vec<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub is_published: Option<String>,
}

impl TeamMemberForm {
    pub fn from_bytes(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|err| FormError::InvalidChoice(err.to_string()))
    }
}

impl TryFrom<TeamMemberForm> for TeamMemberDetails {
    type Error = FormError;

    fn try_from(form: TeamMemberForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let mut practice_areas: Vec<String> = Vec::new();
        for slug in &form.practice_areas {
            let slug = slug.trim().to_lowercase();
            if find_practice_area(&slug).is_none() {
                return Err(FormError::InvalidChoice(slug));
            }
            if !practice_areas.contains(&slug) {
                practice_areas.push(slug);
            }
        }

        let is_published = checkbox(&form.is_published);

        Ok(Self {
            name: PersonName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            phone: non_blank(&form.phone)
                .map(PhoneNumber::new)
                .transpose()
                .map_err(|_| FormError::InvalidPhoneNumber)?,
            oab_number: non_blank(&form.oab_number).map(str::to_string),
            title_pt: Title::new(form.title_pt).map_err(|_| FormError::Required("cargo"))?,
            title_en: form.title_en.trim().to_string(),
            bio_pt: RichText::new(form.bio_pt),
            bio_en: RichText::new(form.bio_en),
            education_pt: RichText::new(form.education_pt),
            education_en: RichText::new(form.education_en),
            practice_areas,
            display_order: form.display_order,
            is_published,
        })
    }
}

#[derive(MultipartForm)]
pub struct TeamPhotoForm {
    #[multipart(limit = "5MB")]
    pub photo: TempFile,
}
