use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use lexsite::domain::access::RoleSet;
use lexsite::domain::error_log::NewErrorLogEntry;
use lexsite::domain::hearing::{HearingDetails, HearingStatus, HearingType, NewHearing, ShareUpdate};
use lexsite::domain::listing::{ListingCategory, ListingDetails, ListingFilter, ListingStatus};
use lexsite::domain::team_member::TeamMemberDetails;
use lexsite::domain::types::{
    CaseNumber, CourtName, Email, ErrorContext, ImageUrl, LocationText, PersonName, PriceCents,
    RichText, ShareToken, Title, UserId,
};
use lexsite::domain::user::{NewUser, PasswordReset};
use lexsite::repository::{
    DieselRepository, ErrorLogReader, ErrorLogWriter, HearingListQuery, HearingReader,
    HearingWriter, ListingListQuery, ListingReader, ListingWriter, Pagination, TeamMemberReader,
    TeamMemberWriter, UserReader, UserWriter,
};

mod common;

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 5, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn new_user(email: &str, approved: bool, roles: RoleSet) -> NewUser {
    NewUser {
        email: Email::new(email).unwrap(),
        name: PersonName::new("Maria Lima").unwrap(),
        password_hash: "hash".into(),
        approved,
        roles,
    }
}

fn lawyer_roles() -> RoleSet {
    RoleSet {
        lawyer: true,
        ..RoleSet::default()
    }
}

fn details(case_number: &str, scheduled_at: NaiveDateTime) -> HearingDetails {
    HearingDetails {
        client_name: PersonName::new("Carlos Pereira").unwrap(),
        client_email: Some(Email::new("carlos@example.com").unwrap()),
        case_number: CaseNumber::new(case_number).unwrap(),
        court: CourtName::new("1ª Vara do Trabalho").unwrap(),
        hearing_type: HearingType::Instruction,
        scheduled_at,
        location: LocationText::new("Fórum Ruy Barbosa").unwrap(),
        description: RichText::new("Oitiva de testemunhas"),
        notes: RichText::default(),
        status: HearingStatus::Scheduled,
    }
}

fn listing(title: &str, category: ListingCategory, status: ListingStatus) -> ListingDetails {
    ListingDetails {
        category,
        status,
        price: PriceCents::new(15_000_000).unwrap(),
        title_pt: Title::new(title).unwrap(),
        title_en: String::new(),
        description_pt: RichText::new("Descrição"),
        description_en: RichText::default(),
        location: "São Paulo".into(),
        images: vec![],
    }
}

fn member(name: &str, email: &str, order: i32, published: bool) -> TeamMemberDetails {
    TeamMemberDetails {
        name: PersonName::new(name).unwrap(),
        email: Email::new(email).unwrap(),
        phone: None,
        oab_number: Some("OAB/SP 123.456".into()),
        title_pt: Title::new("Sócia").unwrap(),
        title_en: String::new(),
        bio_pt: RichText::new("Atua há 20 anos."),
        bio_en: RichText::default(),
        education_pt: RichText::default(),
        education_en: RichText::default(),
        practice_areas: vec!["trabalhista".into()],
        display_order: order,
        is_published: published,
    }
}

#[test]
fn test_user_roles_are_replaced_as_a_set() {
    let test_db = common::TestDb::new("test_user_roles.db");
    let repo = DieselRepository::new(test_db.pool());

    let user = repo
        .create_user(&new_user("maria@example.com", false, lawyer_roles()))
        .unwrap();
    assert!(!user.approved);

    let loaded = repo.get_user_with_roles(user.id).unwrap().unwrap();
    assert_eq!(loaded.roles, lawyer_roles());

    let roles = RoleSet {
        admin: true,
        tecnico: true,
        ..RoleSet::default()
    };
    repo.set_user_roles(user.id, &roles).unwrap();
    repo.set_user_approved(user.id, true).unwrap();

    let loaded = repo.get_user_with_roles(user.id).unwrap().unwrap();
    assert_eq!(loaded.roles, roles);
    assert!(loaded.user.approved);

    repo.set_user_roles(user.id, &RoleSet::default()).unwrap();
    let listed = repo.list_users_with_roles().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].roles, RoleSet::default());
}

#[test]
fn test_user_email_is_unique() {
    let test_db = common::TestDb::new("test_user_unique.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.create_user(&new_user("ana@example.com", true, lawyer_roles()))
        .unwrap();
    assert!(
        repo.create_user(&new_user("ana@example.com", true, lawyer_roles()))
            .is_err()
    );

    let email = Email::new("ana@example.com").unwrap();
    let credentials = repo.get_credentials_by_email(&email).unwrap().unwrap();
    assert_eq!(credentials.password_hash, "hash");
}

#[test]
fn test_password_reset_is_consumed() {
    let test_db = common::TestDb::new("test_password_reset.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = repo
        .create_user(&new_user("joao@example.com", true, lawyer_roles()))
        .unwrap();

    let reset = PasswordReset {
        token: "reset-token".into(),
        user_id: user.id,
        expires_at: Utc::now().naive_utc() + Duration::hours(1),
    };
    repo.create_password_reset(&reset).unwrap();
    assert_eq!(
        repo.get_password_reset("reset-token").unwrap(),
        Some(reset.clone())
    );

    repo.complete_password_reset(user.id, "new-hash").unwrap();
    assert!(repo.get_password_reset("reset-token").unwrap().is_none());

    let credentials = repo.get_credentials_by_id(user.id).unwrap().unwrap();
    assert_eq!(credentials.password_hash, "new-hash");
}

#[test]
fn test_shared_hearing_requires_flag_and_exact_token() {
    let test_db = common::TestDb::new("test_share_gate.db");
    let repo = DieselRepository::new(test_db.pool());
    let lawyer = repo
        .create_user(&new_user("lawyer@example.com", true, lawyer_roles()))
        .unwrap();

    let hearing = repo
        .create_hearing(&NewHearing {
            lawyer_id: lawyer.id,
            details: details("0001111-22.2030.5.02.0001", at(10, 14)),
        })
        .unwrap();
    assert!(!hearing.is_shared);
    assert!(hearing.share_token.is_none());

    let token = ShareToken::generate();
    let shared = repo
        .update_hearing_share(hearing.id, &ShareUpdate::Enable(token.clone()))
        .unwrap();
    assert!(shared.is_publicly_viewable_with(token.as_str()));
    assert!(repo.get_shared_hearing(token.as_str()).unwrap().is_some());
    assert!(
        repo.get_shared_hearing(&token.as_str().to_uppercase())
            .unwrap()
            .is_none()
    );
    assert!(
        repo.get_shared_hearing(&format!(" {}", token.as_str()))
            .unwrap()
            .is_none()
    );

    // Disabling keeps the token but the link stops working.
    let disabled = repo
        .update_hearing_share(hearing.id, &ShareUpdate::Disable)
        .unwrap();
    assert_eq!(disabled.share_token.as_ref(), Some(&token));
    assert!(repo.get_shared_hearing(token.as_str()).unwrap().is_none());

    repo.update_hearing_share(hearing.id, &ShareUpdate::Enable(token.clone()))
        .unwrap();
    let rotated = ShareToken::generate();
    repo.update_hearing_share(hearing.id, &ShareUpdate::Rotate(rotated.clone()))
        .unwrap();
    assert!(repo.get_shared_hearing(token.as_str()).unwrap().is_none());
    assert_eq!(
        repo.get_shared_hearing(rotated.as_str()).unwrap().map(|h| h.id),
        Some(hearing.id)
    );
}

#[test]
fn test_hearing_listing_filters_and_orders() {
    let test_db = common::TestDb::new("test_hearing_list.db");
    let repo = DieselRepository::new(test_db.pool());
    let first = repo
        .create_user(&new_user("first@example.com", true, lawyer_roles()))
        .unwrap();
    let second = repo
        .create_user(&new_user("second@example.com", true, lawyer_roles()))
        .unwrap();

    let late = repo
        .create_hearing(&NewHearing {
            lawyer_id: first.id,
            details: details("0000003-00.2030.8.26.0100", at(20, 9)),
        })
        .unwrap();
    let early = repo
        .create_hearing(&NewHearing {
            lawyer_id: first.id,
            details: details("0000001-00.2030.8.26.0100", at(5, 9)),
        })
        .unwrap();
    repo.create_hearing(&NewHearing {
        lawyer_id: second.id,
        details: details("0000002-00.2030.8.26.0100", at(12, 9)),
    })
    .unwrap();

    let (total, items) = repo.list_hearings(HearingListQuery::default()).unwrap();
    assert_eq!(total, 3);
    assert_eq!(items.first().map(|h| h.id), Some(early.id));

    let (total, items) = repo
        .list_hearings(HearingListQuery::default().lawyer(first.id))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(
        items.iter().map(|h| h.id).collect::<Vec<_>>(),
        vec![early.id, late.id]
    );

    repo.update_hearing_status(late.id, HearingStatus::Postponed)
        .unwrap();
    let (total, items) = repo
        .list_hearings(HearingListQuery::default().status(HearingStatus::Postponed))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, late.id);

    let (total, items) = repo
        .list_hearings(HearingListQuery::default().upcoming(at(10, 0)).paginate(1, 1))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(items.len(), 1);

    repo.delete_hearing(early.id).unwrap();
    assert!(repo.get_hearing_by_id(early.id).unwrap().is_none());
}

#[test]
fn test_listing_repository_crud() {
    let test_db = common::TestDb::new("test_listing_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let house = repo
        .create_listing(&listing(
            "Casa em Pinheiros",
            ListingCategory::Imoveis,
            ListingStatus::Available,
        ))
        .unwrap();
    repo.create_listing(&listing(
        "Trator agrícola",
        ListingCategory::Maquinas,
        ListingStatus::Sold,
    ))
    .unwrap();

    let (total, _) = repo.list_listings(ListingListQuery::default()).unwrap();
    assert_eq!(total, 2);

    let filter = ListingFilter {
        category: Some(ListingCategory::Imoveis),
        status: None,
    };
    let (total, items) = repo
        .list_listings(ListingListQuery::new(filter).paginate(1, 12))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, house.id);

    let images = vec![
        ImageUrl::new("/uploads/a.jpg").unwrap(),
        ImageUrl::new("/uploads/b.jpg").unwrap(),
    ];
    let updated = repo.add_listing_images(house.id, &images[..1]).unwrap();
    assert_eq!(updated.images, images[..1].to_vec());
    let updated = repo.add_listing_images(house.id, &images[1..]).unwrap();
    assert_eq!(updated.images, images);
    assert_eq!(updated.cover_image(), "/uploads/a.jpg");

    let mut changed = listing(
        "Casa reformada",
        ListingCategory::Imoveis,
        ListingStatus::Reserved,
    );
    changed.images = updated.images.clone();
    let updated = repo.update_listing(house.id, &changed).unwrap();
    assert_eq!(updated.status, ListingStatus::Reserved);
    assert_eq!(updated.title_pt.as_str(), "Casa reformada");

    repo.delete_listing(house.id).unwrap();
    assert!(repo.get_listing_by_id(house.id).unwrap().is_none());
}

#[test]
fn test_team_members_are_ordered_and_drafts_hidden() {
    let test_db = common::TestDb::new("test_team_members.db");
    let repo = DieselRepository::new(test_db.pool());

    let second = repo
        .create_team_member(&member("Bruno Alves", "bruno@example.com", 2, true))
        .unwrap();
    let first = repo
        .create_team_member(&member("Ana Costa", "ana@example.com", 1, true))
        .unwrap();
    let draft = repo
        .create_team_member(&member("Caio Dias", "caio@example.com", 0, false))
        .unwrap();

    let public = repo.list_team_members(true).unwrap();
    assert_eq!(
        public.iter().map(|m| m.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );
    assert_eq!(repo.list_team_members(false).unwrap().len(), 3);

    let photo = ImageUrl::new("/uploads/caio.png").unwrap();
    let updated = repo.set_team_member_photo(draft.id, &photo).unwrap();
    assert_eq!(updated.photo_url, Some(photo));

    repo.delete_team_member(draft.id).unwrap();
    assert!(repo.get_team_member_by_id(draft.id).unwrap().is_none());
}

#[test]
fn test_error_log_pages_and_clears() {
    let test_db = common::TestDb::new("test_error_log.db");
    let repo = DieselRepository::new(test_db.pool());

    for n in 0..3 {
        let entry = NewErrorLogEntry::new(
            ErrorContext::new("contact").unwrap(),
            format!("failure {n}"),
            None::<UserId>,
            Some("/contato".into()),
        );
        repo.create_error_log(&entry).unwrap();
    }

    let (total, items) = repo
        .list_error_logs(Pagination {
            page: 1,
            per_page: 2,
        })
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].message, "failure 2");

    assert_eq!(repo.list_all_error_logs().unwrap().len(), 3);
    assert_eq!(repo.clear_error_logs().unwrap(), 3);
    assert!(repo.list_all_error_logs().unwrap().is_empty());
}
