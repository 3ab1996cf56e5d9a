//! Lawyers and staff presented on `/equipe`.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{
    Email, ImageUrl, Locale, PersonName, PhoneNumber, RichText, TeamMemberId, Title,
};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub oab_number: Option<String>,
    pub title_pt: Title,
    pub title_en: String,
    pub bio_pt: RichText,
    pub bio_en: RichText,
    pub education_pt: RichText,
    pub education_en: RichText,
    /// Slugs of the practice areas this member works in.
    pub practice_areas: Vec<String>,
    pub photo_url: Option<ImageUrl>,
    pub display_order: i32,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TeamMember {
    pub fn title(&self, locale: Locale) -> &str {
        locale.pick(self.title_pt.as_str(), &self.title_en)
    }

    pub fn bio(&self, locale: Locale) -> &str {
        locale.pick(self.bio_pt.as_str(), self.bio_en.as_str())
    }

    pub fn education(&self, locale: Locale) -> &str {
        locale.pick(self.education_pt.as_str(), self.education_en.as_str())
    }

    /// Portuguese texts to hand to the translator.
    pub fn translation_source(&self) -> TranslationSource {
        TranslationSource {
            title: self.title_pt.as_str().to_string(),
            bio: self.bio_pt.as_str().to_string(),
            education: self.education_pt.as_str().to_string(),
        }
    }
}

/// Editable team member fields shared by create and update.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamMemberDetails {
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub oab_number: Option<String>,
    pub title_pt: Title,
    pub title_en: String,
    pub bio_pt: RichText,
    pub bio_en: RichText,
    pub education_pt: RichText,
    pub education_en: RichText,
    pub practice_areas: Vec<String>,
    pub display_order: i32,
    pub is_published: bool,
}

/// Portuguese profile texts sent for translation.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TranslationSource {
    pub title: String,
    pub bio: String,
    pub education: String,
}

/// English profile texts produced by the translator.
#[derive(Clone, Debug, PartialEq)]
pub struct TranslatedProfile {
    pub title_en: String,
    pub bio_en: RichText,
    pub education_en: RichText,
}

/// Splits the stored comma separated practice area list.
pub fn parse_practice_areas(value: &str) -> Vec<String> {
    let mut areas: Vec<String> = Vec::new();
    for area in value.split(',').map(|s| s.trim().to_lowercase()) {
        if !area.is_empty() && !areas.contains(&area) {
            areas.push(area);
        }
    }
    areas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn practice_areas_are_trimmed_and_lowercased() {
        assert_eq!(
            parse_practice_areas(" Civil, trabalhista ,, Civil"),
            vec!["civil".to_string(), "trabalhista".to_string()]
        );
        assert!(parse_practice_areas("").is_empty());
    }
}
