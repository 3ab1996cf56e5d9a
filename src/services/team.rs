//! Team member profiles: back-office management and public pages.

use crate::domain::access::RouteRequirements;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::team_member::{TeamMember, TeamMemberDetails};
use crate::domain::types::{Locale, TeamMemberId};
use crate::dto::team::TeamMemberView;
use crate::forms::team::{TeamMemberForm, TeamPhotoForm};
use crate::repository::{TeamMemberReader, TeamMemberWriter};
use crate::services::storage::FileStorage;
use crate::services::{ServiceError, ServiceResult, ensure_access};

/// Published members for `/equipe`, in display order.
pub fn list_public_team<R>(repo: &R, locale: Locale) -> ServiceResult<Vec<TeamMemberView>>
where
    R: TeamMemberReader + ?Sized,
{
    let members = repo.list_team_members(true).map_err(|err| {
        log::error!("Failed to list team members: {err}");
        err
    })?;
    Ok(members
        .into_iter()
        .map(|member| TeamMemberView::new(member, locale))
        .collect())
}

/// Drafts are hidden from the public profile page.
pub fn load_public_member<R>(
    repo: &R,
    member_id: i32,
    locale: Locale,
) -> ServiceResult<TeamMemberView>
where
    R: TeamMemberReader + ?Sized,
{
    let id = TeamMemberId::new(member_id).map_err(|_| ServiceError::NotFound)?;
    let member = repo
        .get_team_member_by_id(id)?
        .filter(|member| member.is_published)
        .ok_or(ServiceError::NotFound)?;
    Ok(TeamMemberView::new(member, locale))
}

pub fn list_team<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<TeamMember>>
where
    R: TeamMemberReader + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN)?;
    Ok(repo.list_team_members(false)?)
}

pub fn load_member<R>(
    repo: &R,
    user: &AuthenticatedUser,
    member_id: i32,
) -> ServiceResult<TeamMember>
where
    R: TeamMemberReader + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN)?;

    repo.get_team_member_by_id(TeamMemberId::new(member_id)?)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_member<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: TeamMemberForm,
) -> ServiceResult<TeamMember>
where
    R: TeamMemberWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN)?;

    let details = TeamMemberDetails::try_from(form)?;
    let member = repo.create_team_member(&details).map_err(|err| {
        log::error!("Failed to create team member: {err}");
        err
    })?;
    log::info!("Team member {} created by user {}", member.id, user.id);
    Ok(member)
}

pub fn update_member<R>(
    repo: &R,
    user: &AuthenticatedUser,
    member_id: i32,
    form: TeamMemberForm,
) -> ServiceResult<TeamMember>
where
    R: TeamMemberWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN)?;

    let id = TeamMemberId::new(member_id)?;
    let details = TeamMemberDetails::try_from(form)?;
    Ok(repo.update_team_member(id, &details)?)
}

pub fn upload_photo<R>(
    repo: &R,
    storage: &FileStorage,
    user: &AuthenticatedUser,
    member_id: i32,
    form: TeamPhotoForm,
) -> ServiceResult<TeamMember>
where
    R: TeamMemberReader + TeamMemberWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN)?;

    let id = TeamMemberId::new(member_id)?;
    repo.get_team_member_by_id(id)?
        .ok_or(ServiceError::NotFound)?;

    let photo = storage.store_upload(&form.photo)?;
    Ok(repo.set_team_member_photo(id, &photo)?)
}

pub fn delete_member<R>(repo: &R, user: &AuthenticatedUser, member_id: i32) -> ServiceResult<()>
where
    R: TeamMemberWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN)?;

    repo.delete_team_member(TeamMemberId::new(member_id)?)?;
    log::info!("Team member {member_id} deleted by user {}", user.id);
    Ok(())
}
