//! Opportunity listings shown on `/oportunidades`.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ImageUrl, ListingId, Locale, PriceCents, RichText, Title, TypeConstraintError,
};

/// Image shown when a listing has no pictures.
pub const PLACEHOLDER_IMAGE: &str = "/assets/img/no-image.svg";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ListingCategory {
    Imoveis,
    Veiculos,
    Maquinas,
    Outros,
}

impl ListingCategory {
    pub const ALL: [ListingCategory; 4] = [
        ListingCategory::Imoveis,
        ListingCategory::Veiculos,
        ListingCategory::Maquinas,
        ListingCategory::Outros,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ListingCategory::Imoveis => "imoveis",
            ListingCategory::Veiculos => "veiculos",
            ListingCategory::Maquinas => "maquinas",
            ListingCategory::Outros => "outros",
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (ListingCategory::Imoveis, Locale::Pt) => "Imóveis",
            (ListingCategory::Imoveis, Locale::En) => "Real estate",
            (ListingCategory::Veiculos, Locale::Pt) => "Veículos",
            (ListingCategory::Veiculos, Locale::En) => "Vehicles",
            (ListingCategory::Maquinas, Locale::Pt) => "Máquinas",
            (ListingCategory::Maquinas, Locale::En) => "Machinery",
            (ListingCategory::Outros, Locale::Pt) => "Outros",
            (ListingCategory::Outros, Locale::En) => "Other",
        }
    }
}

impl Display for ListingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListingCategory {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListingCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("listing category {s}")))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Reserved,
    Sold,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 3] = [
        ListingStatus::Available,
        ListingStatus::Reserved,
        ListingStatus::Sold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ListingStatus::Available => "available",
            ListingStatus::Reserved => "reserved",
            ListingStatus::Sold => "sold",
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (ListingStatus::Available, Locale::Pt) => "Disponível",
            (ListingStatus::Available, Locale::En) => "Available",
            (ListingStatus::Reserved, Locale::Pt) => "Reservado",
            (ListingStatus::Reserved, Locale::En) => "Reserved",
            (ListingStatus::Sold, Locale::Pt) => "Vendido",
            (ListingStatus::Sold, Locale::En) => "Sold",
        }
    }
}

impl Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("listing status {s}")))
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub category: ListingCategory,
    pub status: ListingStatus,
    pub price: PriceCents,
    pub title_pt: Title,
    pub title_en: String,
    pub description_pt: RichText,
    pub description_en: RichText,
    pub location: String,
    pub images: Vec<ImageUrl>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Listing {
    pub fn title(&self, locale: Locale) -> &str {
        locale.pick(self.title_pt.as_str(), &self.title_en)
    }

    pub fn description(&self, locale: Locale) -> &str {
        locale.pick(self.description_pt.as_str(), self.description_en.as_str())
    }

    /// First picture, or the placeholder when the listing has none.
    pub fn cover_image(&self) -> &str {
        self.images
            .first()
            .map(ImageUrl::as_str)
            .unwrap_or(PLACEHOLDER_IMAGE)
    }
}

/// Editable listing fields shared by create and update.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingDetails {
    pub category: ListingCategory,
    pub status: ListingStatus,
    pub price: PriceCents,
    pub title_pt: Title,
    pub title_en: String,
    pub description_pt: RichText,
    pub description_en: RichText,
    pub location: String,
    pub images: Vec<ImageUrl>,
}

/// Filters accepted by the public opportunities page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListingFilter {
    pub category: Option<ListingCategory>,
    pub status: Option<ListingStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn listing(images: Vec<ImageUrl>) -> Listing {
        let now = Utc::now().naive_utc();
        Listing {
            id: ListingId::new(1).unwrap(),
            category: ListingCategory::Imoveis,
            status: ListingStatus::Available,
            price: PriceCents::new(35_000_000).unwrap(),
            title_pt: Title::new("Apartamento no centro").unwrap(),
            title_en: String::new(),
            description_pt: RichText::new("Três quartos"),
            description_en: RichText::default(),
            location: "São Paulo".to_string(),
            images,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn listing_without_images_uses_placeholder() {
        assert_eq!(listing(Vec::new()).cover_image(), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn listing_cover_is_first_image() {
        let images = vec![
            ImageUrl::new("/uploads/a.jpg").unwrap(),
            ImageUrl::new("/uploads/b.jpg").unwrap(),
        ];
        assert_eq!(listing(images).cover_image(), "/uploads/a.jpg");
    }

    #[test]
    fn english_title_falls_back_to_portuguese() {
        let item = listing(Vec::new());
        assert_eq!(item.title(Locale::En), "Apartamento no centro");
        assert_eq!(item.description(Locale::En), "Três quartos");
    }

    #[test]
    fn category_parses_storage_name() {
        assert_eq!(
            "imoveis".parse::<ListingCategory>(),
            Ok(ListingCategory::Imoveis)
        );
        assert!("boats".parse::<ListingCategory>().is_err());
    }
}
