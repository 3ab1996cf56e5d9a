//! Repository implementation for hearings and their share links.

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::hearing::{Hearing, HearingDetails, HearingStatus, NewHearing, ShareUpdate};
use crate::domain::types::HearingId;
use crate::models::hearing::{
    Hearing as DbHearing, NewHearing as DbNewHearing, UpdateHearing as DbUpdateHearing,
};
use crate::pagination::page_offset;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, HearingListQuery, HearingReader, HearingWriter};

fn into_domain(db_hearing: DbHearing) -> RepositoryResult<Hearing> {
    Hearing::try_from(db_hearing).map_err(RepositoryError::from)
}

impl HearingReader for DieselRepository {
    fn get_hearing_by_id(&self, id: HearingId) -> RepositoryResult<Option<Hearing>> {
        use crate::schema::hearings;

        let mut conn = self.conn()?;
        let db_hearing = hearings::table
            .find(id.get())
            .first::<DbHearing>(&mut conn)
            .optional()?;

        db_hearing.map(into_domain).transpose()
    }

    fn get_shared_hearing(&self, token: &str) -> RepositoryResult<Option<Hearing>> {
        use crate::schema::hearings;

        let mut conn = self.conn()?;
        let db_hearing = hearings::table
            .filter(hearings::share_token.eq(token))
            .filter(hearings::is_shared.eq(true))
            .first::<DbHearing>(&mut conn)
            .optional()?;

        db_hearing.map(into_domain).transpose()
    }

    fn list_hearings(&self, query: HearingListQuery) -> RepositoryResult<(usize, Vec<Hearing>)> {
        use crate::schema::hearings;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = hearings::table.into_boxed::<diesel::sqlite::Sqlite>();
            if let Some(lawyer_id) = query.lawyer_id {
                items = items.filter(hearings::lawyer_id.eq(lawyer_id.get()));
            }
            if let Some(status) = query.status {
                items = items.filter(hearings::status.eq(status.as_str()));
            }
            if let Some(from) = query.from {
                items = items.filter(hearings::scheduled_at.ge(from));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((hearings::scheduled_at.asc(), hearings::id.asc()));
        if let Some(pagination) = &query.pagination {
            items = items
                .limit(pagination.per_page as i64)
                .offset(page_offset(pagination.page, pagination.per_page));
        }

        let hearings = items
            .load::<DbHearing>(&mut conn)?
            .into_iter()
            .map(into_domain)
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, hearings))
    }
}

impl HearingWriter for DieselRepository {
    fn create_hearing(&self, hearing: &NewHearing) -> RepositoryResult<Hearing> {
        use crate::schema::hearings;

        let mut conn = self.conn()?;
        let db_new_hearing: DbNewHearing = hearing.into();

        let db_hearing = diesel::insert_into(hearings::table)
            .values(&db_new_hearing)
            .get_result::<DbHearing>(&mut conn)?;

        into_domain(db_hearing)
    }

    fn update_hearing(&self, id: HearingId, details: &HearingDetails) -> RepositoryResult<Hearing> {
        use crate::schema::hearings;

        let mut conn = self.conn()?;
        let changes = DbUpdateHearing::from_details(details, Utc::now().naive_utc());

        let db_hearing = diesel::update(hearings::table.find(id.get()))
            .set(&changes)
            .get_result::<DbHearing>(&mut conn)?;

        into_domain(db_hearing)
    }

    fn update_hearing_status(
        &self,
        id: HearingId,
        status: HearingStatus,
    ) -> RepositoryResult<Hearing> {
        use crate::schema::hearings;

        let mut conn = self.conn()?;
        let db_hearing = diesel::update(hearings::table.find(id.get()))
            .set((
                hearings::status.eq(status.as_str()),
                hearings::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbHearing>(&mut conn)?;

        into_domain(db_hearing)
    }

    fn update_hearing_share(
        &self,
        id: HearingId,
        update: &ShareUpdate,
    ) -> RepositoryResult<Hearing> {
        use crate::schema::hearings;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let target = hearings::table.find(id.get());

        let db_hearing = match update {
            ShareUpdate::Enable(token) | ShareUpdate::Rotate(token) => diesel::update(target)
                .set((
                    hearings::is_shared.eq(true),
                    hearings::share_token.eq(Some(token.as_str())),
                    hearings::updated_at.eq(now),
                ))
                .get_result::<DbHearing>(&mut conn)?,
            ShareUpdate::Disable => diesel::update(target)
                .set((hearings::is_shared.eq(false), hearings::updated_at.eq(now)))
                .get_result::<DbHearing>(&mut conn)?,
        };

        into_domain(db_hearing)
    }

    fn delete_hearing(&self, id: HearingId) -> RepositoryResult<()> {
        use crate::schema::hearings;

        let mut conn = self.conn()?;
        let affected = diesel::delete(hearings::table.find(id.get())).execute(&mut conn)?;
        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
