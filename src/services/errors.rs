use thiserror::Error;

use crate::domain::access::{RouteDecision, RouteRequirements, SessionState, decide};
use crate::domain::auth::AuthenticatedUser;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

/// Rejects the request unless the user's roles satisfy `requirements`.
pub fn ensure_access(
    user: &AuthenticatedUser,
    requirements: RouteRequirements,
) -> ServiceResult<()> {
    match decide(SessionState::Authenticated(user.roles), requirements) {
        RouteDecision::Render => Ok(()),
        _ => Err(ServiceError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::{Role, RoleSet};
    use crate::domain::types::{Email, PersonName, UserId};

    fn user(roles: &[Role]) -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new(1).unwrap(),
            email: Email::new("user@firma.com.br").unwrap(),
            name: PersonName::new("Usuário").unwrap(),
            roles: roles.iter().copied().collect::<RoleSet>(),
        }
    }

    #[test]
    fn tecnico_cannot_reach_hearings() {
        let result = ensure_access(&user(&[Role::Tecnico]), RouteRequirements::NOT_TECNICO);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn tecnico_reaches_listings() {
        let tecnico = user(&[Role::Tecnico]);
        assert!(ensure_access(&tecnico, RouteRequirements::ADMIN_OR_TECNICO).is_ok());
    }

    #[test]
    fn user_without_roles_reaches_dashboard_only() {
        let nobody = user(&[]);
        assert!(ensure_access(&nobody, RouteRequirements::AUTHENTICATED).is_ok());
        assert!(ensure_access(&nobody, RouteRequirements::ADMIN).is_err());
        assert!(ensure_access(&nobody, RouteRequirements::ADMIN_OR_TECNICO).is_err());
    }
}
