//! Diesel models for accounts, roles and password resets.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::access::{Role, RoleSet};
use crate::domain::types::{TypeConstraintError, UserId};
use crate::domain::user::{
    NewUser as DomainNewUser, PasswordReset as DomainPasswordReset,
    UpdateProfile as DomainUpdateProfile, User as DomainUser, UserCredentials,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
/// Diesel model for [`crate::domain::user::User`].
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub approved: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
/// Insertable form of [`User`].
pub struct NewUser<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub approved: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
#[diesel(treat_none_as_null = true)]
/// Data used when a user edits their own profile.
pub struct UpdateProfile<'a> {
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::user_roles)]
pub struct UserRole {
    pub user_id: i32,
    pub role: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::password_resets)]
pub struct PasswordReset {
    pub token: String,
    pub user_id: i32,
    pub expires_at: NaiveDateTime,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        DomainUser::try_new(
            user.id,
            user.email,
            user.name,
            user.phone,
            user.approved,
            user.created_at,
            user.updated_at,
        )
    }
}

impl TryFrom<User> for UserCredentials {
    type Error = TypeConstraintError;

    fn try_from(mut user: User) -> Result<Self, Self::Error> {
        let password_hash = std::mem::take(&mut user.password_hash);
        Ok(Self {
            user: DomainUser::try_from(user)?,
            password_hash,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            email: user.email.as_str(),
            name: user.name.as_str(),
            password_hash: user.password_hash.as_str(),
            approved: user.approved,
        }
    }
}

impl<'a> UpdateProfile<'a> {
    pub fn from_domain(profile: &'a DomainUpdateProfile, now: NaiveDateTime) -> Self {
        Self {
            name: profile.name.as_str(),
            phone: profile.phone.as_ref().map(|p| p.as_str()),
            updated_at: now,
        }
    }
}

/// Collapses stored role rows into a [`RoleSet`], skipping unknown names.
pub fn role_set_from_rows(rows: &[UserRole]) -> RoleSet {
    rows.iter()
        .filter_map(|row| match row.role.parse::<Role>() {
            Ok(role) => Some(role),
            Err(err) => {
                log::warn!("Ignoring role row for user {}: {err}", row.user_id);
                None
            }
        })
        .collect()
}

impl TryFrom<PasswordReset> for DomainPasswordReset {
    type Error = TypeConstraintError;

    fn try_from(reset: PasswordReset) -> Result<Self, Self::Error> {
        Ok(Self {
            token: reset.token,
            user_id: UserId::new(reset.user_id)?,
            expires_at: reset.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn credentials_keep_hash_separate() {
        let now = Utc::now().naive_utc();
        let db = User {
            id: 3,
            email: "Lawyer@Firm.com".into(),
            name: "Dra. Paula".into(),
            phone: None,
            password_hash: "$argon2id$hash".into(),
            approved: true,
            created_at: now,
            updated_at: now,
        };

        let credentials = UserCredentials::try_from(db).expect("valid user");

        assert_eq!(credentials.password_hash, "$argon2id$hash");
        assert_eq!(credentials.user.email.as_str(), "lawyer@firm.com");
        assert!(credentials.user.approved);
    }

    #[test]
    fn unknown_roles_are_skipped() {
        let rows = vec![
            UserRole {
                user_id: 1,
                role: "admin".into(),
            },
            UserRole {
                user_id: 1,
                role: "owner".into(),
            },
        ];
        let roles = role_set_from_rows(&rows);
        assert!(roles.admin);
        assert!(!roles.lawyer && !roles.tecnico);
    }
}
