//! Repository implementation for opportunity listings.

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::listing::{Listing, ListingDetails};
use crate::domain::types::{ImageUrl, ListingId};
use crate::models::listing::{
    Listing as DbListing, ListingChanges as DbListingChanges, decode_images, encode_images,
};
use crate::pagination::page_offset;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ListingListQuery, ListingReader, ListingWriter};

fn into_domain(db_listing: DbListing) -> RepositoryResult<Listing> {
    Listing::try_from(db_listing).map_err(RepositoryError::from)
}

impl ListingReader for DieselRepository {
    fn get_listing_by_id(&self, id: ListingId) -> RepositoryResult<Option<Listing>> {
        use crate::schema::listings;

        let mut conn = self.conn()?;
        let db_listing = listings::table
            .find(id.get())
            .first::<DbListing>(&mut conn)
            .optional()?;

        db_listing.map(into_domain).transpose()
    }

    fn list_listings(&self, query: ListingListQuery) -> RepositoryResult<(usize, Vec<Listing>)> {
        use crate::schema::listings;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = listings::table.into_boxed::<diesel::sqlite::Sqlite>();
            if let Some(category) = query.filter.category {
                items = items.filter(listings::category.eq(category.as_str()));
            }
            if let Some(status) = query.filter.status {
                items = items.filter(listings::status.eq(status.as_str()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((listings::created_at.desc(), listings::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items
                .limit(pagination.per_page as i64)
                .offset(page_offset(pagination.page, pagination.per_page));
        }

        let listings = items
            .load::<DbListing>(&mut conn)?
            .into_iter()
            .map(into_domain)
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, listings))
    }
}

impl ListingWriter for DieselRepository {
    fn create_listing(&self, details: &ListingDetails) -> RepositoryResult<Listing> {
        use crate::schema::listings;

        let mut conn = self.conn()?;
        let values = DbListingChanges::from_details(details, Utc::now().naive_utc());

        let db_listing = diesel::insert_into(listings::table)
            .values(&values)
            .get_result::<DbListing>(&mut conn)?;

        into_domain(db_listing)
    }

    fn update_listing(&self, id: ListingId, details: &ListingDetails) -> RepositoryResult<Listing> {
        use crate::schema::listings;

        let mut conn = self.conn()?;
        let changes = DbListingChanges::from_details(details, Utc::now().naive_utc());

        let db_listing = diesel::update(listings::table.find(id.get()))
            .set(&changes)
            .get_result::<DbListing>(&mut conn)?;

        into_domain(db_listing)
    }

    fn add_listing_images(&self, id: ListingId, images: &[ImageUrl]) -> RepositoryResult<Listing> {
        use crate::schema::listings;

        let mut conn = self.conn()?;
        let db_listing = conn.transaction::<DbListing, diesel::result::Error, _>(|conn| {
            let stored = listings::table
                .find(id.get())
                .select(listings::images)
                .first::<String>(conn)?;

            let mut all_images = decode_images(&stored);
            all_images.extend(images.iter().cloned());

            diesel::update(listings::table.find(id.get()))
                .set((
                    listings::images.eq(encode_images(&all_images)),
                    listings::updated_at.eq(Utc::now().naive_utc()),
                ))
                .get_result::<DbListing>(conn)
        })?;

        into_domain(db_listing)
    }

    fn delete_listing(&self, id: ListingId) -> RepositoryResult<()> {
        use crate::schema::listings;

        let mut conn = self.conn()?;
        let affected = diesel::delete(listings::table.find(id.get())).execute(&mut conn)?;
        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
