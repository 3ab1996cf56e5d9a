//! Identity of the signed-in back-office user.

use serde::Serialize;

use crate::domain::access::{Role, RoleSet};
use crate::domain::types::{Email, PersonName, UserId};
use crate::domain::user::User;

/// Approved user attached to the current request together with its roles.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: Email,
    pub name: PersonName,
    pub roles: RoleSet,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(Role::Admin)
    }

    pub fn is_tecnico(&self) -> bool {
        self.roles.contains(Role::Tecnico)
    }
}

impl From<(User, RoleSet)> for AuthenticatedUser {
    fn from((user, roles): (User, RoleSet)) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            roles,
        }
    }
}
