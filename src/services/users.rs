//! Account approval and role management.

use crate::domain::access::{RoleSet, RouteRequirements};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::UserId;
use crate::dto::admin::UsersPageData;
use crate::forms::users::UserRolesForm;
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult, ensure_access};

/// Pending accounts first, then by name.
pub fn list_users<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<UsersPageData>
where
    R: UserReader + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN)?;

    let users = repo.list_users_with_roles().map_err(|err| {
        log::error!("Failed to list users: {err}");
        err
    })?;
    Ok(UsersPageData { users })
}

fn target_id<R>(repo: &R, user_id: i32) -> ServiceResult<UserId>
where
    R: UserReader + ?Sized,
{
    let id = UserId::new(user_id)?;
    repo.get_user_by_id(id)?.ok_or(ServiceError::NotFound)?;
    Ok(id)
}

pub fn approve_user<R>(repo: &R, user: &AuthenticatedUser, user_id: i32) -> ServiceResult<()>
where
    R: UserReader + UserWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN)?;

    let id = target_id(repo, user_id)?;
    repo.set_user_approved(id, true)?;
    log::info!("User {id} approved by {}", user.id);
    Ok(())
}

/// Withdraws approval; the account can no longer sign in.
pub fn revoke_user<R>(repo: &R, user: &AuthenticatedUser, user_id: i32) -> ServiceResult<()>
where
    R: UserReader + UserWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN)?;

    let id = target_id(repo, user_id)?;
    if id == user.id {
        return Err(ServiceError::Form(
            "Você não pode revogar o próprio acesso.".to_string(),
        ));
    }
    repo.set_user_approved(id, false)?;
    log::info!("User {id} revoked by {}", user.id);
    Ok(())
}

/// Replaces the whole role set of an account.
pub fn set_roles<R>(
    repo: &R,
    user: &AuthenticatedUser,
    user_id: i32,
    form: UserRolesForm,
) -> ServiceResult<RoleSet>
where
    R: UserReader + UserWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN)?;

    let id = target_id(repo, user_id)?;
    let roles = RoleSet::try_from(form)?;
    if id == user.id && !roles.admin {
        return Err(ServiceError::Form(
            "Você não pode remover o próprio papel de administrador.".to_string(),
        ));
    }
    repo.set_user_roles(id, &roles)?;
    log::info!("Roles of user {id} set to {:?} by {}", roles.roles(), user.id);
    Ok(roles)
}
