//! Persistence traits and their Diesel implementation.

use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::access::RoleSet;
use crate::domain::error_log::{ErrorLogEntry, NewErrorLogEntry};
use crate::domain::hearing::{Hearing, HearingDetails, HearingStatus, NewHearing, ShareUpdate};
use crate::domain::listing::{Listing, ListingDetails, ListingFilter};
use crate::domain::team_member::{TeamMember, TeamMemberDetails, TranslatedProfile};
use crate::domain::types::{Email, HearingId, ImageUrl, ListingId, TeamMemberId, UserId};
use crate::domain::user::{
    NewUser, PasswordReset, UpdateProfile, User, UserCredentials, UserWithRoles,
};
use crate::repository::errors::RepositoryResult;

pub mod error_log;
pub mod errors;
pub mod hearing;
pub mod listing;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod team_member;
pub mod user;

#[derive(Clone)]
/// Diesel-backed repository shared by all handlers.
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Default)]
pub struct HearingListQuery {
    pub lawyer_id: Option<UserId>,
    pub status: Option<HearingStatus>,
    /// Only hearings scheduled at or after this moment.
    pub from: Option<NaiveDateTime>,
    pub pagination: Option<Pagination>,
}

impl HearingListQuery {
    pub fn lawyer(mut self, lawyer_id: UserId) -> Self {
        self.lawyer_id = Some(lawyer_id);
        self
    }

    pub fn status(mut self, status: HearingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn upcoming(mut self, now: NaiveDateTime) -> Self {
        self.from = Some(now);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListingListQuery {
    pub filter: ListingFilter,
    pub pagination: Option<Pagination>,
}

impl ListingListQuery {
    pub fn new(filter: ListingFilter) -> Self {
        Self {
            filter,
            pagination: None,
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    /// Loads the user and every role it holds in one query.
    fn get_user_with_roles(&self, id: UserId) -> RepositoryResult<Option<UserWithRoles>>;
    fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;
    fn get_credentials_by_email(&self, email: &Email) -> RepositoryResult<Option<UserCredentials>>;
    fn get_credentials_by_id(&self, id: UserId) -> RepositoryResult<Option<UserCredentials>>;
    fn list_users_with_roles(&self) -> RepositoryResult<Vec<UserWithRoles>>;
    fn get_password_reset(&self, token: &str) -> RepositoryResult<Option<PasswordReset>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_profile(&self, id: UserId, profile: &UpdateProfile) -> RepositoryResult<User>;
    fn update_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<()>;
    fn set_user_approved(&self, id: UserId, approved: bool) -> RepositoryResult<()>;
    fn set_user_roles(&self, id: UserId, roles: &RoleSet) -> RepositoryResult<()>;
    fn create_password_reset(&self, reset: &PasswordReset) -> RepositoryResult<()>;
    /// Stores the new hash and drops every pending reset of the user.
    fn complete_password_reset(&self, user_id: UserId, password_hash: &str)
    -> RepositoryResult<()>;
}

pub trait HearingReader {
    fn get_hearing_by_id(&self, id: HearingId) -> RepositoryResult<Option<Hearing>>;
    /// Hearing currently shared under exactly `token`.
    fn get_shared_hearing(&self, token: &str) -> RepositoryResult<Option<Hearing>>;
    fn list_hearings(&self, query: HearingListQuery) -> RepositoryResult<(usize, Vec<Hearing>)>;
}

pub trait HearingWriter {
    fn create_hearing(&self, hearing: &NewHearing) -> RepositoryResult<Hearing>;
    fn update_hearing(&self, id: HearingId, details: &HearingDetails) -> RepositoryResult<Hearing>;
    fn update_hearing_status(
        &self,
        id: HearingId,
        status: HearingStatus,
    ) -> RepositoryResult<Hearing>;
    fn update_hearing_share(&self, id: HearingId, update: &ShareUpdate)
    -> RepositoryResult<Hearing>;
    fn delete_hearing(&self, id: HearingId) -> RepositoryResult<()>;
}

pub trait ListingReader {
    fn get_listing_by_id(&self, id: ListingId) -> RepositoryResult<Option<Listing>>;
    fn list_listings(&self, query: ListingListQuery) -> RepositoryResult<(usize, Vec<Listing>)>;
}

pub trait ListingWriter {
    fn create_listing(&self, details: &ListingDetails) -> RepositoryResult<Listing>;
    fn update_listing(&self, id: ListingId, details: &ListingDetails) -> RepositoryResult<Listing>;
    fn add_listing_images(&self, id: ListingId, images: &[ImageUrl]) -> RepositoryResult<Listing>;
    fn delete_listing(&self, id: ListingId) -> RepositoryResult<()>;
}

pub trait TeamMemberReader {
    fn get_team_member_by_id(&self, id: TeamMemberId) -> RepositoryResult<Option<TeamMember>>;
    /// Members in display order; `published_only` hides drafts.
    fn list_team_members(&self, published_only: bool) -> RepositoryResult<Vec<TeamMember>>;
}

pub trait TeamMemberWriter {
    fn create_team_member(&self, details: &TeamMemberDetails) -> RepositoryResult<TeamMember>;
    fn update_team_member(
        &self,
        id: TeamMemberId,
        details: &TeamMemberDetails,
    ) -> RepositoryResult<TeamMember>;
    fn set_team_member_photo(
        &self,
        id: TeamMemberId,
        photo: &ImageUrl,
    ) -> RepositoryResult<TeamMember>;
    fn save_translation(
        &self,
        id: TeamMemberId,
        profile: &TranslatedProfile,
    ) -> RepositoryResult<TeamMember>;
    fn delete_team_member(&self, id: TeamMemberId) -> RepositoryResult<()>;
}

pub trait ErrorLogReader {
    fn list_error_logs(&self, pagination: Pagination)
    -> RepositoryResult<(usize, Vec<ErrorLogEntry>)>;
    fn list_all_error_logs(&self) -> RepositoryResult<Vec<ErrorLogEntry>>;
}

pub trait ErrorLogWriter {
    fn create_error_log(&self, entry: &NewErrorLogEntry) -> RepositoryResult<()>;
    /// Deletes every entry, returning how many were removed.
    fn clear_error_logs(&self) -> RepositoryResult<usize>;
}
