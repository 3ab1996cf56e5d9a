//! DTOs for opportunity listings, localized for rendering.

use serde::Serialize;

use crate::domain::listing::{Listing, ListingCategory, ListingStatus};
use crate::domain::types::Locale;
use crate::dto::Choice;
use crate::pagination::Paginated;

#[derive(Debug, Serialize)]
pub struct ListingView {
    pub listing: Listing,
    pub title: String,
    pub description: String,
    pub category_label: &'static str,
    pub status_label: &'static str,
    pub price: String,
    /// First image or the placeholder.
    pub cover_image: String,
}

impl ListingView {
    pub fn new(listing: Listing, locale: Locale) -> Self {
        Self {
            title: listing.title(locale).to_string(),
            description: listing.description(locale).to_string(),
            category_label: listing.category.label(locale),
            status_label: listing.status.label(locale),
            price: listing.price.to_string(),
            cover_image: listing.cover_image().to_string(),
            listing,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingsPageData {
    pub listings: Paginated<ListingView>,
    pub category: Option<ListingCategory>,
    pub status: Option<ListingStatus>,
    pub categories: Vec<Choice>,
    pub statuses: Vec<Choice>,
}

pub fn category_choices(locale: Locale) -> Vec<Choice> {
    ListingCategory::ALL
        .into_iter()
        .map(|category| Choice {
            value: category.as_str(),
            label: category.label(locale),
        })
        .collect()
}

pub fn status_choices(locale: Locale) -> Vec<Choice> {
    ListingStatus::ALL
        .into_iter()
        .map(|status| Choice {
            value: status.as_str(),
            label: status.label(locale),
        })
        .collect()
}
