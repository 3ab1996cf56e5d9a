//! Read-only data for the public marketing pages.

use crate::domain::listing::{ListingFilter, ListingStatus};
use crate::domain::practice_area::{PRACTICE_AREAS, find_practice_area};
use crate::domain::types::Locale;
use crate::dto::listings::ListingView;
use crate::dto::public::{AreaPageData, HomePageData};
use crate::dto::team::{AreaView, TeamMemberView};
use crate::repository::{ListingListQuery, ListingReader, TeamMemberReader};
use crate::services::{ServiceError, ServiceResult};

const HOME_TEAM_LIMIT: usize = 4;
const HOME_LISTINGS_LIMIT: usize = 3;

pub fn practice_areas(locale: Locale) -> Vec<AreaView> {
    PRACTICE_AREAS
        .iter()
        .map(|area| AreaView::new(area, locale))
        .collect()
}

pub fn load_home<R>(repo: &R, locale: Locale) -> ServiceResult<HomePageData>
where
    R: TeamMemberReader + ListingReader + ?Sized,
{
    let team = repo
        .list_team_members(true)?
        .into_iter()
        .take(HOME_TEAM_LIMIT)
        .map(|member| TeamMemberView::new(member, locale))
        .collect();

    let filter = ListingFilter {
        category: None,
        status: Some(ListingStatus::Available),
    };
    let (_, listings) =
        repo.list_listings(ListingListQuery::new(filter).paginate(1, HOME_LISTINGS_LIMIT))?;

    Ok(HomePageData {
        areas: practice_areas(locale),
        team,
        listings: listings
            .into_iter()
            .map(|listing| ListingView::new(listing, locale))
            .collect(),
    })
}

/// Practice area page with the published lawyers working in it.
pub fn load_area<R>(repo: &R, slug: &str, locale: Locale) -> ServiceResult<AreaPageData>
where
    R: TeamMemberReader + ?Sized,
{
    let area = find_practice_area(slug).ok_or(ServiceError::NotFound)?;

    let lawyers = repo
        .list_team_members(true)?
        .into_iter()
        .filter(|member| member.practice_areas.iter().any(|s| s == area.slug))
        .map(|member| TeamMemberView::new(member, locale))
        .collect();

    Ok(AreaPageData {
        area: AreaView::new(area, locale),
        lawyers,
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::team_member::TeamMember;
    use crate::domain::types::{Email, PersonName, RichText, TeamMemberId, Title};
    use crate::repository::mock::MockRepository;
    use chrono::Utc;

    fn member(id: i32, areas: &[&str]) -> TeamMember {
        let now = Utc::now().naive_utc();
        TeamMember {
            id: TeamMemberId::new(id).unwrap(),
            name: PersonName::new(format!("Advogado {id}")).unwrap(),
            email: Email::new(format!("adv{id}@firma.com.br")).unwrap(),
            phone: None,
            oab_number: None,
            title_pt: Title::new("Advogado").unwrap(),
            title_en: String::new(),
            bio_pt: RichText::default(),
            bio_en: RichText::default(),
            education_pt: RichText::default(),
            education_en: RichText::default(),
            practice_areas: areas.iter().map(|s| s.to_string()).collect(),
            photo_url: None,
            display_order: id,
            is_published: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Area pages list only lawyers tagged with the area.
    #[test]
    fn area_lists_matching_lawyers() {
        let mut repo = MockRepository::new();
        repo.expect_list_team_members()
            .returning(|_| Ok(vec![member(1, &["civil"]), member(2, &["tributario"])]));

        let data = load_area(&repo, "tributario", Locale::Pt).unwrap();

        assert_eq!(data.area.title, "Direito Tributário");
        assert_eq!(data.lawyers.len(), 1);
        assert_eq!(data.lawyers[0].member.id.get(), 2);
    }

    /// Unknown slugs are 404s.
    #[test]
    fn unknown_area_is_not_found() {
        let repo = MockRepository::new();
        assert!(matches!(
            load_area(&repo, "maritimo", Locale::Pt),
            Err(ServiceError::NotFound)
        ));
    }

    /// The home page shows available listings only.
    #[test]
    fn home_asks_for_available_listings() {
        let mut repo = MockRepository::new();
        repo.expect_list_team_members().returning(|_| Ok(Vec::new()));
        repo.expect_list_listings()
            .withf(|query| query.filter.status == Some(ListingStatus::Available))
            .times(1)
            .returning(|_| Ok((0, Vec::new())));

        let data = load_home(&repo, Locale::En).unwrap();

        assert_eq!(data.areas.len(), PRACTICE_AREAS.len());
    }
}
