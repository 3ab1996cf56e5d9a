//! Forms for managing opportunity listings.

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::listing::{ListingCategory, ListingDetails, ListingStatus};
use crate::domain::types::{ImageUrl, PriceCents, RichText, Title};
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
pub struct ListingForm {
    pub category: String,
    pub status: String,
    /// Amount as typed, e.g. `1.250.000,00`.
    pub price: String,
    #[validate(length(min = 1, max = 200))]
    pub title_pt: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub title_en: String,
    #[serde(default)]
    pub description_pt: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub location: String,
    /// One image URL per line.
    #[serde(default)]
    pub images: String,
}

impl TryFrom<ListingForm> for ListingDetails {
    type Error = FormError;

    fn try_from(form: ListingForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let images = form
            .images
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| ImageUrl::new(line).map_err(|_| FormError::InvalidUrl))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            category: form.category.trim().parse::<ListingCategory>()?,
            status: form.status.trim().parse::<ListingStatus>()?,
            price: PriceCents::parse_amount(&form.price).map_err(|_| FormError::InvalidPrice)?,
            title_pt: Title::new(form.title_pt).map_err(|_| FormError::Required("título"))?,
            title_en: form.title_en.trim().to_string(),
            description_pt: RichText::new(form.description_pt),
            description_en: RichText::new(form.description_en),
            location: form.location.trim().to_string(),
            images,
        })
    }
}

#[derive(MultipartForm)]
pub struct ListingImagesForm {
    #[multipart(limit = "10MB")]
    pub images: Vec<TempFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ListingForm {
        ListingForm {
            category: "imoveis".into(),
            status: "available".into(),
            price: "R$ 350.000,00".into(),
            title_pt: "Apartamento no centro".into(),
            title_en: "".into(),
            description_pt: "Três quartos".into(),
            description_en: "".into(),
            location: "São Paulo".into(),
            images: "/uploads/a.jpg\n\n  /uploads/b.png  ".into(),
        }
    }

    #[test]
    fn valid_form_becomes_details() {
        let details = ListingDetails::try_from(form()).unwrap();
        assert_eq!(details.category, ListingCategory::Imoveis);
        assert_eq!(details.price.get(), 35_000_000);
        assert_eq!(details.images.len(), 2);
        assert_eq!(details.images[1].as_str(), "/uploads/b.png");
    }

    #[test]
    fn invalid_price_is_rejected() {
        let mut bad = form();
        bad.price = "trezentos".into();
        assert!(matches!(
            ListingDetails::try_from(bad),
            Err(FormError::InvalidPrice)
        ));
    }

    #[test]
    fn empty_image_list_is_allowed() {
        let mut no_images = form();
        no_images.images = String::new();
        assert!(ListingDetails::try_from(no_images).unwrap().images.is_empty());
    }
}
