//! Repository implementation for accounts, roles and password resets.

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::access::RoleSet;
use crate::domain::types::{Email, UserId};
use crate::domain::user::{
    NewUser, PasswordReset, UpdateProfile, User, UserCredentials, UserWithRoles,
};
use crate::models::user::{
    NewUser as DbNewUser, PasswordReset as DbPasswordReset, UpdateProfile as DbUpdateProfile,
    User as DbUser, UserRole as DbUserRole, role_set_from_rows,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, UserReader, UserWriter};

fn role_rows(roles: &RoleSet, user_id: i32) -> Vec<DbUserRole> {
    roles
        .roles()
        .into_iter()
        .map(|role| DbUserRole {
            user_id,
            role: role.as_str().to_string(),
        })
        .collect()
}

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = users::table
            .find(id.get())
            .first::<DbUser>(&mut conn)
            .optional()?;

        db_user
            .map(|user| User::try_from(user).map_err(RepositoryError::from))
            .transpose()
    }

    fn get_user_with_roles(&self, id: UserId) -> RepositoryResult<Option<UserWithRoles>> {
        use crate::schema::{user_roles, users};

        let mut conn = self.conn()?;
        let rows = users::table
            .left_join(user_roles::table)
            .filter(users::id.eq(id.get()))
            .select((DbUser::as_select(), user_roles::role.nullable()))
            .load::<(DbUser, Option<String>)>(&mut conn)?;

        let Some((db_user, _)) = rows.first() else {
            return Ok(None);
        };

        let found = rows
            .iter()
            .filter_map(|(user, role)| {
                role.as_ref().map(|role| DbUserRole {
                    user_id: user.id,
                    role: role.clone(),
                })
            })
            .collect::<Vec<_>>();

        let user = User::try_from(db_user.clone()).map_err(RepositoryError::from)?;
        Ok(Some(UserWithRoles {
            user,
            roles: role_set_from_rows(&found),
        }))
    }

    fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        Ok(self.get_credentials_by_email(email)?.map(|c| c.user))
    }

    fn get_credentials_by_email(&self, email: &Email) -> RepositoryResult<Option<UserCredentials>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = users::table
            .filter(users::email.eq(email.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        db_user
            .map(|user| UserCredentials::try_from(user).map_err(RepositoryError::from))
            .transpose()
    }

    fn get_credentials_by_id(&self, id: UserId) -> RepositoryResult<Option<UserCredentials>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = users::table
            .find(id.get())
            .first::<DbUser>(&mut conn)
            .optional()?;

        db_user
            .map(|user| UserCredentials::try_from(user).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_users_with_roles(&self) -> RepositoryResult<Vec<UserWithRoles>> {
        use crate::schema::{user_roles, users};

        let mut conn = self.conn()?;
        let db_users = users::table
            .order((users::approved.asc(), users::name.asc()))
            .load::<DbUser>(&mut conn)?;

        let user_ids = db_users.iter().map(|user| user.id).collect::<Vec<i32>>();

        let db_roles = user_roles::table
            .filter(user_roles::user_id.eq_any(user_ids))
            .load::<DbUserRole>(&mut conn)?;

        db_users
            .into_iter()
            .map(|db_user| {
                let rows = db_roles
                    .iter()
                    .filter(|row| row.user_id == db_user.id)
                    .cloned()
                    .collect::<Vec<_>>();
                let user = User::try_from(db_user).map_err(RepositoryError::from)?;
                Ok(UserWithRoles {
                    user,
                    roles: role_set_from_rows(&rows),
                })
            })
            .collect()
    }

    fn get_password_reset(&self, token: &str) -> RepositoryResult<Option<PasswordReset>> {
        use crate::schema::password_resets;

        let mut conn = self.conn()?;
        let db_reset = password_resets::table
            .find(token)
            .first::<DbPasswordReset>(&mut conn)
            .optional()?;

        db_reset
            .map(|reset| PasswordReset::try_from(reset).map_err(RepositoryError::from))
            .transpose()
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::{user_roles, users};

        let mut conn = self.conn()?;
        let db_new_user: DbNewUser = new_user.into();

        let db_user = conn.transaction::<DbUser, diesel::result::Error, _>(|conn| {
            let db_user = diesel::insert_into(users::table)
                .values(&db_new_user)
                .get_result::<DbUser>(conn)?;

            let rows = role_rows(&new_user.roles, db_user.id);
            if !rows.is_empty() {
                diesel::insert_into(user_roles::table)
                    .values(&rows)
                    .execute(conn)?;
            }
            Ok(db_user)
        })?;

        User::try_from(db_user).map_err(RepositoryError::from)
    }

    fn update_profile(&self, id: UserId, profile: &UpdateProfile) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let changes = DbUpdateProfile::from_domain(profile, Utc::now().naive_utc());

        let db_user = diesel::update(users::table.find(id.get()))
            .set(&changes)
            .get_result::<DbUser>(&mut conn)?;

        User::try_from(db_user).map_err(RepositoryError::from)
    }

    fn update_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<()> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let affected = diesel::update(users::table.find(id.get()))
            .set((
                users::password_hash.eq(password_hash),
                users::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn set_user_approved(&self, id: UserId, approved: bool) -> RepositoryResult<()> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let affected = diesel::update(users::table.find(id.get()))
            .set((
                users::approved.eq(approved),
                users::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn set_user_roles(&self, id: UserId, roles: &RoleSet) -> RepositoryResult<()> {
        use crate::schema::user_roles;

        let mut conn = self.conn()?;
        let rows = role_rows(roles, id.get());

        conn.transaction::<(), diesel::result::Error, _>(move |conn| {
            diesel::delete(user_roles::table.filter(user_roles::user_id.eq(id.get())))
                .execute(conn)?;
            if !rows.is_empty() {
                diesel::insert_into(user_roles::table)
                    .values(&rows)
                    .execute(conn)?;
            }
            Ok(())
        })
        .map_err(RepositoryError::from)
    }

    fn create_password_reset(&self, reset: &PasswordReset) -> RepositoryResult<()> {
        use crate::schema::password_resets;

        let mut conn = self.conn()?;
        let row = DbPasswordReset {
            token: reset.token.clone(),
            user_id: reset.user_id.get(),
            expires_at: reset.expires_at,
        };
        diesel::insert_into(password_resets::table)
            .values(&row)
            .execute(&mut conn)?;
        Ok(())
    }

    fn complete_password_reset(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> RepositoryResult<()> {
        use crate::schema::{password_resets, users};

        let mut conn = self.conn()?;
        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            let affected = diesel::update(users::table.find(user_id.get()))
                .set((
                    users::password_hash.eq(password_hash),
                    users::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;
            if affected == 0 {
                return Err(diesel::result::Error::NotFound);
            }
            diesel::delete(
                password_resets::table.filter(password_resets::user_id.eq(user_id.get())),
            )
            .execute(conn)?;
            Ok(())
        })
        .map_err(RepositoryError::from)
    }
}
