//! Repository implementation for the back-office error log.

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::error_log::{ErrorLogEntry, NewErrorLogEntry};
use crate::models::error_log::{ErrorLogEntry as DbErrorLogEntry, NewErrorLog as DbNewErrorLog};
use crate::pagination::page_offset;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ErrorLogReader, ErrorLogWriter, Pagination};

fn into_domain(entry: DbErrorLogEntry) -> RepositoryResult<ErrorLogEntry> {
    ErrorLogEntry::try_from(entry).map_err(RepositoryError::from)
}

impl ErrorLogReader for DieselRepository {
    fn list_error_logs(
        &self,
        pagination: Pagination,
    ) -> RepositoryResult<(usize, Vec<ErrorLogEntry>)> {
        use crate::schema::error_logs;

        let mut conn = self.conn()?;
        let total = error_logs::table.count().get_result::<i64>(&mut conn)? as usize;

        let entries = error_logs::table
            .order((error_logs::created_at.desc(), error_logs::id.desc()))
            .limit(pagination.per_page as i64)
            .offset(page_offset(pagination.page, pagination.per_page))
            .load::<DbErrorLogEntry>(&mut conn)?
            .into_iter()
            .map(into_domain)
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, entries))
    }

    fn list_all_error_logs(&self) -> RepositoryResult<Vec<ErrorLogEntry>> {
        use crate::schema::error_logs;

        let mut conn = self.conn()?;
        error_logs::table
            .order((error_logs::created_at.desc(), error_logs::id.desc()))
            .load::<DbErrorLogEntry>(&mut conn)?
            .into_iter()
            .map(into_domain)
            .collect()
    }
}

impl ErrorLogWriter for DieselRepository {
    fn create_error_log(&self, entry: &NewErrorLogEntry) -> RepositoryResult<()> {
        use crate::schema::error_logs;

        let mut conn = self.conn()?;
        let row = DbNewErrorLog::from_entry(entry, Utc::now().naive_utc());
        diesel::insert_into(error_logs::table)
            .values(&row)
            .execute(&mut conn)?;
        Ok(())
    }

    fn clear_error_logs(&self) -> RepositoryResult<usize> {
        use crate::schema::error_logs;

        let mut conn = self.conn()?;
        Ok(diesel::delete(error_logs::table).execute(&mut conn)?)
    }
}
