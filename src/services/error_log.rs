//! Back-office error log: best-effort recording, listing, CSV export.

use crate::domain::access::RouteRequirements;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::error_log::NewErrorLogEntry;
use crate::domain::types::{ErrorContext, UserId};
use crate::dto::admin::ErrorLogsPageData;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ErrorLogReader, ErrorLogWriter, Pagination};
use crate::services::{ServiceError, ServiceResult, ensure_access};

/// Stores an error entry. Failures are only logged so the caller's own
/// error handling is never masked.
pub fn record_error<R>(
    repo: &R,
    context: &str,
    message: &str,
    user_id: Option<UserId>,
    path: Option<&str>,
) where
    R: ErrorLogWriter + ?Sized,
{
    let context = match ErrorContext::new(context) {
        Ok(context) => context,
        Err(err) => {
            log::error!("Invalid error log context {context:?}: {err}");
            return;
        }
    };
    let entry = NewErrorLogEntry::new(context, message, user_id, path.map(str::to_string));
    if let Err(err) = repo.create_error_log(&entry) {
        log::error!("Failed to record error ({message}): {err}");
    }
}

pub fn list_error_logs<R>(
    repo: &R,
    user: &AuthenticatedUser,
    page: usize,
) -> ServiceResult<ErrorLogsPageData>
where
    R: ErrorLogReader + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN)?;

    let page = page.max(1);
    let (total, entries) = repo
        .list_error_logs(Pagination {
            page,
            per_page: DEFAULT_ITEMS_PER_PAGE,
        })
        .map_err(|err| {
            log::error!("Failed to list error logs: {err}");
            err
        })?;

    Ok(ErrorLogsPageData {
        entries: Paginated::new(entries, page, total, DEFAULT_ITEMS_PER_PAGE),
    })
}

/// Renders the whole log as CSV, newest first.
pub fn export_error_logs_csv<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<String>
where
    R: ErrorLogReader + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN)?;

    let entries = repo.list_all_error_logs()?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["id", "created_at", "context", "message", "user_id", "path"])
        .map_err(|e| ServiceError::Internal(e.to_string()))?;
    for entry in &entries {
        let created_at = entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
        let user_id = entry.user_id.map(|id| id.to_string()).unwrap_or_default();
        writer
            .write_record([
                entry.id.to_string().as_str(),
                created_at.as_str(),
                entry.context.as_str(),
                entry.message.as_str(),
                user_id.as_str(),
                entry.path.as_deref().unwrap_or_default(),
            ])
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ServiceError::Internal(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ServiceError::Internal(e.to_string()))
}

pub fn clear_error_logs<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<usize>
where
    R: ErrorLogWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::ADMIN)?;

    let removed = repo.clear_error_logs()?;
    log::info!("User {} cleared {removed} error log entries", user.id);
    Ok(removed)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::access::{Role, RoleSet};
    use crate::domain::error_log::ErrorLogEntry;
    use crate::domain::types::{Email, ErrorLogId, PersonName};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use chrono::NaiveDate;

    fn user(roles: &[Role]) -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new(1).unwrap(),
            email: Email::new("admin@firma.com.br").unwrap(),
            name: PersonName::new("Admin").unwrap(),
            roles: roles.iter().copied().collect::<RoleSet>(),
        }
    }

    /// A failing error log write does not panic or propagate.
    #[test]
    fn record_error_swallows_repository_failures() {
        let mut repo = MockRepository::new();
        repo.expect_create_error_log()
            .times(1)
            .returning(|_| Err(RepositoryError::ConnectionError("down".into())));

        record_error(&repo, "contact", "zmq unavailable", None, Some("/contato"));
    }

    /// Export quotes fields containing separators.
    #[test]
    fn export_writes_header_and_quoted_rows() {
        let mut repo = MockRepository::new();
        repo.expect_list_all_error_logs().times(1).returning(|| {
            Ok(vec![ErrorLogEntry {
                id: ErrorLogId::new(5).unwrap(),
                context: ErrorContext::new("hearings").unwrap(),
                message: "failed, retry later".into(),
                user_id: Some(UserId::new(2).unwrap()),
                path: None,
                created_at: NaiveDate::from_ymd_opt(2025, 1, 2)
                    .unwrap()
                    .and_hms_opt(3, 4, 5)
                    .unwrap(),
            }])
        });

        let csv = export_error_logs_csv(&repo, &user(&[Role::Admin])).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,created_at,context,message,user_id,path")
        );
        assert_eq!(
            lines.next(),
            Some("5,2025-01-02 03:04:05,hearings,\"failed, retry later\",2,")
        );
    }

    /// Only admins may wipe the log.
    #[test]
    fn clear_requires_admin() {
        let mut repo = MockRepository::new();
        repo.expect_clear_error_logs().times(0);

        let result = clear_error_logs(&repo, &user(&[Role::Lawyer]));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
