//! Back-office accounts and their approval workflow.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::access::RoleSet;
use crate::domain::types::{Email, PersonName, PhoneNumber, TypeConstraintError, UserId};

/// Stored account. The password hash never leaves the repository layer
/// except through [`UserCredentials`].
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: PersonName,
    pub phone: Option<PhoneNumber>,
    pub approved: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    pub fn try_new(
        id: i32,
        email: String,
        name: String,
        phone: Option<String>,
        approved: bool,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: UserId::new(id)?,
            email: Email::new(email)?,
            name: PersonName::new(name)?,
            phone: phone.map(PhoneNumber::new).transpose()?,
            approved,
            created_at,
            updated_at,
        })
    }
}

/// Account together with its role set, as listed on the users screen.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UserWithRoles {
    pub user: User,
    pub roles: RoleSet,
}

/// Account plus the stored password hash, used only to verify a login.
#[derive(Clone, Debug)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Data required to register a new account.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: Email,
    pub name: PersonName,
    pub password_hash: String,
    pub approved: bool,
    pub roles: RoleSet,
}

/// Profile fields a user may change about themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateProfile {
    pub name: PersonName,
    pub phone: Option<PhoneNumber>,
}

/// Pending password reset request.
#[derive(Clone, Debug, PartialEq)]
pub struct PasswordReset {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: NaiveDateTime,
}

impl PasswordReset {
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now >= self.expires_at
    }
}
