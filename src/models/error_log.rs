//! Diesel models for the error log.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::error_log::{ErrorLogEntry as DomainErrorLogEntry, NewErrorLogEntry};
use crate::domain::types::{ErrorContext, ErrorLogId, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::error_logs)]
pub struct ErrorLogEntry {
    pub id: i32,
    pub context: String,
    pub message: String,
    pub user_id: Option<i32>,
    pub path: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::error_logs)]
pub struct NewErrorLog<'a> {
    pub context: &'a str,
    pub message: &'a str,
    pub user_id: Option<i32>,
    pub path: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ErrorLogEntry> for DomainErrorLogEntry {
    type Error = TypeConstraintError;

    fn try_from(entry: ErrorLogEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ErrorLogId::new(entry.id)?,
            context: ErrorContext::new(entry.context)?,
            message: entry.message,
            user_id: entry.user_id.map(UserId::new).transpose()?,
            path: entry.path,
            created_at: entry.created_at,
        })
    }
}

impl<'a> NewErrorLog<'a> {
    pub fn from_entry(entry: &'a NewErrorLogEntry, now: NaiveDateTime) -> Self {
        Self {
            context: entry.context.as_str(),
            message: entry.message.as_str(),
            user_id: entry.user_id.map(UserId::get),
            path: entry.path.as_deref(),
            created_at: now,
        }
    }
}
