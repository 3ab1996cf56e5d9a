//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::access::RoleSet;
use crate::domain::error_log::{ErrorLogEntry, NewErrorLogEntry};
use crate::domain::hearing::{Hearing, HearingDetails, HearingStatus, NewHearing, ShareUpdate};
use crate::domain::listing::{Listing, ListingDetails};
use crate::domain::team_member::{TeamMember, TeamMemberDetails, TranslatedProfile};
use crate::domain::types::{Email, HearingId, ImageUrl, ListingId, TeamMemberId, UserId};
use crate::domain::user::{
    NewUser, PasswordReset, UpdateProfile, User, UserCredentials, UserWithRoles,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ErrorLogReader, ErrorLogWriter, HearingListQuery, HearingReader, HearingWriter,
    ListingListQuery, ListingReader, ListingWriter, Pagination, TeamMemberReader,
    TeamMemberWriter, UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
        fn get_user_with_roles(&self, id: UserId) -> RepositoryResult<Option<UserWithRoles>>;
        fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;
        fn get_credentials_by_email(&self, email: &Email) -> RepositoryResult<Option<UserCredentials>>;
        fn get_credentials_by_id(&self, id: UserId) -> RepositoryResult<Option<UserCredentials>>;
        fn list_users_with_roles(&self) -> RepositoryResult<Vec<UserWithRoles>>;
        fn get_password_reset(&self, token: &str) -> RepositoryResult<Option<PasswordReset>>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_profile(&self, id: UserId, profile: &UpdateProfile) -> RepositoryResult<User>;
        fn update_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<()>;
        fn set_user_approved(&self, id: UserId, approved: bool) -> RepositoryResult<()>;
        fn set_user_roles(&self, id: UserId, roles: &RoleSet) -> RepositoryResult<()>;
        fn create_password_reset(&self, reset: &PasswordReset) -> RepositoryResult<()>;
        fn complete_password_reset(&self, user_id: UserId, password_hash: &str) -> RepositoryResult<()>;
    }

    impl HearingReader for Repository {
        fn get_hearing_by_id(&self, id: HearingId) -> RepositoryResult<Option<Hearing>>;
        fn get_shared_hearing(&self, token: &str) -> RepositoryResult<Option<Hearing>>;
        fn list_hearings(&self, query: HearingListQuery) -> RepositoryResult<(usize, Vec<Hearing>)>;
    }

    impl HearingWriter for Repository {
        fn create_hearing(&self, hearing: &NewHearing) -> RepositoryResult<Hearing>;
        fn update_hearing(&self, id: HearingId, details: &HearingDetails) -> RepositoryResult<Hearing>;
        fn update_hearing_status(&self, id: HearingId, status: HearingStatus) -> RepositoryResult<Hearing>;
        fn update_hearing_share(&self, id: HearingId, update: &ShareUpdate) -> RepositoryResult<Hearing>;
        fn delete_hearing(&self, id: HearingId) -> RepositoryResult<()>;
    }

    impl ListingReader for Repository {
        fn get_listing_by_id(&self, id: ListingId) -> RepositoryResult<Option<Listing>>;
        fn list_listings(&self, query: ListingListQuery) -> RepositoryResult<(usize, Vec<Listing>)>;
    }

    impl ListingWriter for Repository {
        fn create_listing(&self, details: &ListingDetails) -> RepositoryResult<Listing>;
        fn update_listing(&self, id: ListingId, details: &ListingDetails) -> RepositoryResult<Listing>;
        fn add_listing_images(&self, id: ListingId, images: &[ImageUrl]) -> RepositoryResult<Listing>;
        fn delete_listing(&self, id: ListingId) -> RepositoryResult<()>;
    }

    impl TeamMemberReader for Repository {
        fn get_team_member_by_id(&self, id: TeamMemberId) -> RepositoryResult<Option<TeamMember>>;
        fn list_team_members(&self, published_only: bool) -> RepositoryResult<Vec<TeamMember>>;
    }

    impl TeamMemberWriter for Repository {
        fn create_team_member(&self, details: &TeamMemberDetails) -> RepositoryResult<TeamMember>;
        fn update_team_member(&self, id: TeamMemberId, details: &TeamMemberDetails) -> RepositoryResult<TeamMember>;
        fn set_team_member_photo(&self, id: TeamMemberId, photo: &ImageUrl) -> RepositoryResult<TeamMember>;
        fn save_translation(&self, id: TeamMemberId, profile: &TranslatedProfile) -> RepositoryResult<TeamMember>;
        fn delete_team_member(&self, id: TeamMemberId) -> RepositoryResult<()>;
    }

    impl ErrorLogReader for Repository {
        fn list_error_logs(&self, pagination: Pagination) -> RepositoryResult<(usize, Vec<ErrorLogEntry>)>;
        fn list_all_error_logs(&self) -> RepositoryResult<Vec<ErrorLogEntry>>;
    }

    impl ErrorLogWriter for Repository {
        fn create_error_log(&self, entry: &NewErrorLogEntry) -> RepositoryResult<()>;
        fn clear_error_logs(&self) -> RepositoryResult<usize>;
    }
}
