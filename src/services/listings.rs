//! Opportunity listings: back-office CRUD and the public catalogue.

use std::str::FromStr;

use crate::domain::access::RouteRequirements;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::listing::{
    Listing, ListingCategory, ListingDetails, ListingFilter, ListingStatus,
};
use crate::domain::types::{ListingId, Locale};
use crate::dto::listings::{ListingView, ListingsPageData, category_choices, status_choices};
use crate::forms::listings::{ListingForm, ListingImagesForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ListingListQuery, ListingReader, ListingWriter};
use crate::services::storage::FileStorage;
use crate::services::{ServiceError, ServiceResult, ensure_access};

/// Public catalogue page size.
pub const PUBLIC_ITEMS_PER_PAGE: usize = 12;

/// Parses the optional query string filters. Blank values mean "any".
pub fn parse_filter(category: Option<&str>, status: Option<&str>) -> ServiceResult<ListingFilter> {
    let category = match category.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => Some(value.parse::<ListingCategory>()?),
        None => None,
    };
    let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => Some(value.parse::<ListingStatus>()?),
        None => None,
    };
    Ok(ListingFilter { category, status })
}

/// Public variant of [`parse_filter`]: an unknown value drops only its own
/// filter.
pub fn parse_public_filter(category: Option<&str>, status: Option<&str>) -> ListingFilter {
    fn lenient<T: FromStr>(value: Option<&str>) -> Option<T> {
        value.and_then(|v| v.trim().parse().ok())
    }

    ListingFilter {
        category: lenient(category),
        status: lenient(status),
    }
}

fn listings_page<R>(
    repo: &R,
    filter: ListingFilter,
    page: usize,
    per_page: usize,
    locale: Locale,
) -> ServiceResult<ListingsPageData>
where
    R: ListingReader + ?Sized,
{
    let page = page.max(1);
    let query = ListingListQuery::new(filter.clone()).paginate(page, per_page);

    let (total, listings) = repo.list_listings(query).map_err(|err| {
        log::error!("Failed to list listings: {err}");
        err
    })?;

    let listings = listings
        .into_iter()
        .map(|listing| ListingView::new(listing, locale))
        .collect();

    Ok(ListingsPageData {
        listings: Paginated::new(listings, page, total, per_page),
        category: filter.category,
        status: filter.status,
        categories: category_choices(locale),
        statuses: status_choices(locale),
    })
}

/// Public `/oportunidades` page.
pub fn list_public_listings<R>(
    repo: &R,
    filter: ListingFilter,
    page: usize,
    locale: Locale,
) -> ServiceResult<ListingsPageData>
where
    R: ListingReader + ?Sized,
{
    listings_page(repo, filter, page, PUBLIC_ITEMS_PER_PAGE, locale)
}

pub fn load_public_listing<R>(
    repo: &R,
    listing_id: i32,
    locale: Locale,
) -> ServiceResult<ListingView>
where
    R: ListingReader + ?Sized,
{
    let id = ListingId::new(listing_id).map_err(|_| ServiceError::NotFound)?;
    let listing = repo.get_listing_by_id(id)?.ok_or(ServiceError::NotFound)?;
    Ok(ListingView::new(listing, locale))
}

pub fn list_listings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    filter: ListingFilter,
    page: usize,
) -> ServiceResult<ListingsPageData>
where
    R: ListingReader + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN_OR_TECNICO)?;
    listings_page(repo, filter, page, DEFAULT_ITEMS_PER_PAGE, Locale::Pt)
}

pub fn load_listing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    listing_id: i32,
) -> ServiceResult<Listing>
where
    R: ListingReader + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN_OR_TECNICO)?;

    repo.get_listing_by_id(ListingId::new(listing_id)?)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_listing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ListingForm,
) -> ServiceResult<Listing>
where
    R: ListingWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN_OR_TECNICO)?;

    let details = ListingDetails::try_from(form)?;
    let listing = repo.create_listing(&details).map_err(|err| {
        log::error!("Failed to create listing: {err}");
        err
    })?;
    log::info!("Listing {} created by user {}", listing.id, user.id);
    Ok(listing)
}

pub fn update_listing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    listing_id: i32,
    form: ListingForm,
) -> ServiceResult<Listing>
where
    R: ListingWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN_OR_TECNICO)?;

    let id = ListingId::new(listing_id)?;
    let details = ListingDetails::try_from(form)?;
    Ok(repo.update_listing(id, &details)?)
}

/// Stores every uploaded picture and appends them to the listing.
pub fn upload_listing_images<R>(
    repo: &R,
    storage: &FileStorage,
    user: &AuthenticatedUser,
    listing_id: i32,
    form: ListingImagesForm,
) -> ServiceResult<Listing>
where
    R: ListingReader + ListingWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN_OR_TECNICO)?;

    let id = ListingId::new(listing_id)?;
    repo.get_listing_by_id(id)?.ok_or(ServiceError::NotFound)?;

    if form.images.is_empty() {
        return Err(ServiceError::Form("Selecione ao menos uma imagem.".to_string()));
    }

    let images = form
        .images
        .iter()
        .map(|upload| storage.store_upload(upload))
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(repo.add_listing_images(id, &images)?)
}

pub fn delete_listing<R>(repo: &R, user: &AuthenticatedUser, listing_id: i32) -> ServiceResult<()>
where
    R: ListingWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN_OR_TECNICO)?;

    repo.delete_listing(ListingId::new(listing_id)?)?;
    log::info!("Listing {listing_id} deleted by user {}", user.id);
    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::access::{Role, RoleSet};
    use crate::domain::listing::PLACEHOLDER_IMAGE;
    use crate::domain::types::{Email, PersonName, PriceCents, RichText, Title, UserId};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use chrono::Utc;

    fn user(roles: &[Role]) -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new(1).unwrap(),
            email: Email::new("equipe@firma.com.br").unwrap(),
            name: PersonName::new("Equipe").unwrap(),
            roles: roles.iter().copied().collect::<RoleSet>(),
        }
    }

    fn listing() -> Listing {
        let now = Utc::now().naive_utc();
        Listing {
            id: ListingId::new(4).unwrap(),
            category: ListingCategory::Imoveis,
            status: ListingStatus::Available,
            price: PriceCents::new(12_000_000).unwrap(),
            title_pt: Title::new("Casa em leilão").unwrap(),
            title_en: "House at auction".to_string(),
            description_pt: RichText::new("Descrição"),
            description_en: RichText::default(),
            location: "Campinas".to_string(),
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn form() -> ListingForm {
        ListingForm {
            category: "imoveis".to_string(),
            status: "available".to_string(),
            price: "120.000,00".to_string(),
            title_pt: "Casa em leilão".to_string(),
            title_en: String::new(),
            description_pt: "Descrição".to_string(),
            description_en: String::new(),
            location: "Campinas".to_string(),
            images: String::new(),
        }
    }

    /// Blank filters are ignored and unknown ones rejected.
    #[test]
    fn filter_parsing() {
        let filter = parse_filter(Some("veiculos"), Some("")).unwrap();
        assert_eq!(filter.category, Some(ListingCategory::Veiculos));
        assert_eq!(filter.status, None);
        assert!(parse_filter(Some("barcos"), None).is_err());
    }

    #[test]
    fn public_filter_keeps_valid_value_next_to_unknown_one() {
        let filter = parse_public_filter(Some("imoveis"), Some("leiloado"));
        assert_eq!(filter.category, Some(ListingCategory::Imoveis));
        assert_eq!(filter.status, None);

        let filter = parse_public_filter(Some("barcos"), Some("sold"));
        assert_eq!(filter.category, None);
        assert_eq!(filter.status, Some(ListingStatus::Sold));
    }

    /// Lawyers without admin or tecnico cannot manage listings.
    #[test]
    fn lawyer_cannot_create_listing() {
        let mut repo = MockRepository::new();
        repo.expect_create_listing().times(0);

        let result = create_listing(&repo, &user(&[Role::Lawyer]), form());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    /// Tecnicos may create listings.
    #[test]
    fn tecnico_creates_listing() {
        let mut repo = MockRepository::new();
        repo.expect_create_listing()
            .withf(|details| details.price.get() == 12_000_000)
            .times(1)
            .returning(|_| Ok(listing()));

        let created = create_listing(&repo, &user(&[Role::Tecnico]), form()).unwrap();

        assert_eq!(created.id.get(), 4);
    }

    /// Public views are localized and fall back to the placeholder image.
    #[test]
    fn public_listing_is_localized() {
        let mut repo = MockRepository::new();
        repo.expect_get_listing_by_id()
            .returning(|_| Ok(Some(listing())));

        let view = load_public_listing(&repo, 4, Locale::En).unwrap();

        assert_eq!(view.title, "House at auction");
        assert_eq!(view.description, "Descrição");
        assert_eq!(view.cover_image, PLACEHOLDER_IMAGE);
        assert_eq!(view.category_label, "Real estate");
    }

    /// Invalid ids on public pages are plain 404s.
    #[test]
    fn public_listing_with_bad_id_is_not_found() {
        let repo = MockRepository::new();
        assert!(matches!(
            load_public_listing(&repo, 0, Locale::Pt),
            Err(ServiceError::NotFound)
        ));
    }

    /// Deleting a missing listing surfaces the repository error.
    #[test]
    fn delete_missing_listing() {
        let mut repo = MockRepository::new();
        repo.expect_delete_listing()
            .returning(|_| Err(RepositoryError::NotFound));

        let result = delete_listing(&repo, &user(&[Role::Admin]), 9);

        assert!(matches!(
            result,
            Err(ServiceError::Repository(RepositoryError::NotFound))
        ));
    }
}
