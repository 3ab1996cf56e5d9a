//! Role model and the route access state machine for the admin panel.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Named capability granted to a back-office user.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Lawyer,
    Tecnico,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Lawyer, Role::Tecnico];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Lawyer => "lawyer",
            Role::Tecnico => "tecnico",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "lawyer" => Ok(Role::Lawyer),
            "tecnico" => Ok(Role::Tecnico),
            other => Err(TypeConstraintError::InvalidValue(format!("unknown role {other}"))),
        }
    }
}

/// Full set of roles held by a user, resolved in one query.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RoleSet {
    pub admin: bool,
    pub lawyer: bool,
    pub tecnico: bool,
}

impl RoleSet {
    pub fn contains(&self, role: Role) -> bool {
        match role {
            Role::Admin => self.admin,
            Role::Lawyer => self.lawyer,
            Role::Tecnico => self.tecnico,
        }
    }

    pub fn insert(&mut self, role: Role) {
        match role {
            Role::Admin => self.admin = true,
            Role::Lawyer => self.lawyer = true,
            Role::Tecnico => self.tecnico = true,
        }
    }

    pub fn roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.contains(*role))
            .collect()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = RoleSet::default();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

/// Role requirements attached to an admin route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteRequirements {
    pub require_admin: bool,
    pub require_admin_or_tecnico: bool,
    pub require_tecnico: bool,
    pub deny_tecnico: bool,
}

impl RouteRequirements {
    /// Any approved, signed-in user.
    pub const AUTHENTICATED: Self = Self {
        require_admin: false,
        require_admin_or_tecnico: false,
        require_tecnico: false,
        deny_tecnico: false,
    };

    pub const ADMIN: Self = Self {
        require_admin: true,
        ..Self::AUTHENTICATED
    };

    pub const ADMIN_OR_TECNICO: Self = Self {
        require_admin_or_tecnico: true,
        ..Self::AUTHENTICATED
    };

    pub const NOT_TECNICO: Self = Self {
        deny_tecnico: true,
        ..Self::AUTHENTICATED
    };
}

/// Where a request stands in the sign-in lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// A session exists but its profile and roles have not resolved yet.
    Loading,
    Anonymous,
    Authenticated(RoleSet),
}

/// Outcome of evaluating a route against the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Pending,
    RedirectToLogin,
    RedirectToDashboard,
    Render,
}

/// Evaluates route requirements for the session.
pub fn decide(session: SessionState, requirements: RouteRequirements) -> RouteDecision {
    let roles = match session {
        SessionState::Loading => return RouteDecision::Pending,
        SessionState::Anonymous => return RouteDecision::RedirectToLogin,
        SessionState::Authenticated(roles) => roles,
    };

    let allowed = (!requirements.require_admin || roles.admin)
        && (!requirements.require_admin_or_tecnico || roles.admin || roles.tecnico)
        && (!requirements.require_tecnico || roles.tecnico)
        && !(requirements.deny_tecnico && roles.tecnico);

    if allowed {
        RouteDecision::Render
    } else {
        RouteDecision::RedirectToDashboard
    }
}
