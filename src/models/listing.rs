//! Diesel models for opportunity listings.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::listing::{Listing as DomainListing, ListingDetails};
use crate::domain::types::{ImageUrl, ListingId, PriceCents, RichText, Title, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::listings)]
/// Diesel model for [`crate::domain::listing::Listing`].
pub struct Listing {
    pub id: i32,
    pub category: String,
    pub status: String,
    pub price_cents: i64,
    pub title_pt: String,
    pub title_en: String,
    pub description_pt: String,
    pub description_en: String,
    pub location: String,
    /// JSON array of image URLs.
    pub images: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::listings)]
/// Insertable and updatable form of [`Listing`].
pub struct ListingChanges<'a> {
    pub category: &'a str,
    pub status: &'a str,
    pub price_cents: i64,
    pub title_pt: &'a str,
    pub title_en: &'a str,
    pub description_pt: &'a str,
    pub description_en: &'a str,
    pub location: &'a str,
    pub images: String,
    pub updated_at: NaiveDateTime,
}

/// Serializes image URLs for the `images` column.
pub fn encode_images(images: &[ImageUrl]) -> String {
    let urls: Vec<&str> = images.iter().map(ImageUrl::as_str).collect();
    serde_json::to_string(&urls).unwrap_or_else(|_| "[]".to_string())
}

/// Reads the `images` column, dropping entries that are not valid URLs.
pub fn decode_images(value: &str) -> Vec<ImageUrl> {
    let urls: Vec<String> = serde_json::from_str(value).unwrap_or_default();
    urls.into_iter()
        .filter_map(|url| ImageUrl::new(url).ok())
        .collect()
}

impl TryFrom<Listing> for DomainListing {
    type Error = TypeConstraintError;

    fn try_from(listing: Listing) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ListingId::new(listing.id)?,
            category: listing.category.parse()?,
            status: listing.status.parse()?,
            price: PriceCents::new(listing.price_cents)?,
            title_pt: Title::new(listing.title_pt)?,
            title_en: listing.title_en,
            description_pt: RichText::new(listing.description_pt),
            description_en: RichText::new(listing.description_en),
            location: listing.location,
            images: decode_images(&listing.images),
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        })
    }
}

impl<'a> ListingChanges<'a> {
    pub fn from_details(details: &'a ListingDetails, now: NaiveDateTime) -> Self {
        Self {
            category: details.category.as_str(),
            status: details.status.as_str(),
            price_cents: details.price.get(),
            title_pt: details.title_pt.as_str(),
            title_en: details.title_en.as_str(),
            description_pt: details.description_pt.as_str(),
            description_en: details.description_en.as_str(),
            location: details.location.as_str(),
            images: encode_images(&details.images),
            updated_at: now,
        }
    }
}
