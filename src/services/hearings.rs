//! Hearing management for lawyers and the public share link.

use crate::calendar::{CalendarFile, export_hearing};
use crate::domain::access::RouteRequirements;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::hearing::{Hearing, HearingDetails, HearingStatus, ShareUpdate};
use crate::domain::types::{HearingId, ShareToken};
use crate::dto::hearings::{HearingView, HearingsPageData};
use crate::forms::hearings::{HearingForm, HearingStatusForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{HearingListQuery, HearingReader, HearingWriter};
use crate::services::{ServiceError, ServiceResult, ensure_access};

fn can_manage(user: &AuthenticatedUser, hearing: &Hearing) -> bool {
    user.is_admin() || hearing.lawyer_id == user.id
}

/// Loads a hearing the user may manage. Hearings of other lawyers are
/// reported as missing.
fn load_managed<R>(repo: &R, user: &AuthenticatedUser, hearing_id: i32) -> ServiceResult<Hearing>
where
    R: HearingReader + ?Sized,
{
    ensure_access(user, RouteRequirements::NOT_TECNICO)?;

    let hearing = repo
        .get_hearing_by_id(HearingId::new(hearing_id)?)?
        .ok_or(ServiceError::NotFound)?;

    if !can_manage(user, &hearing) {
        log::warn!(
            "User {} tried to access hearing {} owned by {}",
            user.id,
            hearing.id,
            hearing.lawyer_id
        );
        return Err(ServiceError::NotFound);
    }
    Ok(hearing)
}

/// Admins see every hearing, lawyers only their own.
pub fn list_hearings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    status: Option<&str>,
    page: usize,
) -> ServiceResult<HearingsPageData>
where
    R: HearingReader + ?Sized,
{
    ensure_access(user, RouteRequirements::NOT_TECNICO)?;

    let page = page.max(1);
    let status = match status.filter(|s| !s.trim().is_empty()) {
        Some(status) => Some(status.parse::<HearingStatus>()?),
        None => None,
    };

    let mut query = HearingListQuery::default().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if !user.is_admin() {
        query = query.lawyer(user.id);
    }
    if let Some(status) = status {
        query = query.status(status);
    }

    let (total, hearings) = repo.list_hearings(query).map_err(|err| {
        log::error!("Failed to list hearings: {err}");
        err
    })?;

    let hearings = hearings.into_iter().map(HearingView::from).collect();

    Ok(HearingsPageData {
        hearings: Paginated::new(hearings, page, total, DEFAULT_ITEMS_PER_PAGE),
        status,
    })
}

pub fn load_hearing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hearing_id: i32,
) -> ServiceResult<HearingView>
where
    R: HearingReader + ?Sized,
{
    load_managed(repo, user, hearing_id).map(HearingView::from)
}

/// Creates a hearing owned by the current user.
pub fn create_hearing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: HearingForm,
) -> ServiceResult<Hearing>
where
    R: HearingWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::NOT_TECNICO)?;

    let details = HearingDetails::try_from(form)?;
    let new_hearing = details.into_new_hearing(user.id);

    let hearing = repo.create_hearing(&new_hearing).map_err(|err| {
        log::error!("Failed to create hearing: {err}");
        err
    })?;
    log::info!("Hearing {} created by user {}", hearing.id, user.id);
    Ok(hearing)
}

pub fn update_hearing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hearing_id: i32,
    form: HearingForm,
) -> ServiceResult<Hearing>
where
    R: HearingReader + HearingWriter + ?Sized,
{
    let hearing = load_managed(repo, user, hearing_id)?;
    let details = HearingDetails::try_from(form)?;

    Ok(repo.update_hearing(hearing.id, &details)?)
}

pub fn change_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hearing_id: i32,
    form: HearingStatusForm,
) -> ServiceResult<Hearing>
where
    R: HearingReader + HearingWriter + ?Sized,
{
    let hearing = load_managed(repo, user, hearing_id)?;
    let status = HearingStatus::try_from(form)?;

    Ok(repo.update_hearing_status(hearing.id, status)?)
}

/// Turns the public link on, reusing the stored token when there is one.
pub fn share_hearing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hearing_id: i32,
) -> ServiceResult<Hearing>
where
    R: HearingReader + HearingWriter + ?Sized,
{
    let hearing = load_managed(repo, user, hearing_id)?;
    let token = hearing.share_token.clone().unwrap_or_else(ShareToken::generate);

    Ok(repo.update_hearing_share(hearing.id, &ShareUpdate::Enable(token))?)
}

pub fn unshare_hearing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hearing_id: i32,
) -> ServiceResult<Hearing>
where
    R: HearingReader + HearingWriter + ?Sized,
{
    let hearing = load_managed(repo, user, hearing_id)?;

    Ok(repo.update_hearing_share(hearing.id, &ShareUpdate::Disable)?)
}

/// Issues a fresh token; links sent before stop working.
pub fn regenerate_share_token<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hearing_id: i32,
) -> ServiceResult<Hearing>
where
    R: HearingReader + HearingWriter + ?Sized,
{
    let hearing = load_managed(repo, user, hearing_id)?;

    Ok(repo.update_hearing_share(hearing.id, &ShareUpdate::Rotate(ShareToken::generate()))?)
}

pub fn delete_hearing<R>(repo: &R, user: &AuthenticatedUser, hearing_id: i32) -> ServiceResult<()>
where
    R: HearingReader + HearingWriter + ?Sized,
{
    let hearing = load_managed(repo, user, hearing_id)?;

    repo.delete_hearing(hearing.id)?;
    log::info!("Hearing {} deleted by user {}", hearing.id, user.id);
    Ok(())
}

pub fn export_calendar<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hearing_id: i32,
    uid_domain: &str,
) -> ServiceResult<CalendarFile>
where
    R: HearingReader + ?Sized,
{
    let hearing = load_managed(repo, user, hearing_id)?;
    Ok(export_hearing(&hearing, uid_domain))
}

/// Resolves a public share token. Unknown, malformed and disabled tokens
/// are indistinguishable.
pub fn load_shared_hearing<R>(repo: &R, token: &str) -> ServiceResult<Hearing>
where
    R: HearingReader + ?Sized,
{
    let token = ShareToken::new(token).map_err(|_| ServiceError::NotFound)?;

    let hearing = repo
        .get_shared_hearing(token.as_str())?
        .ok_or(ServiceError::NotFound)?;

    if !hearing.is_publicly_viewable_with(token.as_str()) {
        return Err(ServiceError::NotFound);
    }
    Ok(hearing)
}

pub fn export_shared_calendar<R>(
    repo: &R,
    token: &str,
    uid_domain: &str,
) -> ServiceResult<CalendarFile>
where
    R: HearingReader + ?Sized,
{
    let hearing = load_shared_hearing(repo, token)?;
    log::info!("Shared calendar for hearing {} downloaded", hearing.id);
    Ok(export_hearing(&hearing, uid_domain))
}
