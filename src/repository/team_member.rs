//! Repository implementation for team member profiles.

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::team_member::{TeamMember, TeamMemberDetails, TranslatedProfile};
use crate::domain::types::{ImageUrl, TeamMemberId};
use crate::models::team_member::{
    TeamMember as DbTeamMember, TeamMemberChanges as DbTeamMemberChanges,
    TranslationChanges as DbTranslationChanges,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TeamMemberReader, TeamMemberWriter};

fn into_domain(db_member: DbTeamMember) -> RepositoryResult<TeamMember> {
    TeamMember::try_from(db_member).map_err(RepositoryError::from)
}

impl TeamMemberReader for DieselRepository {
    fn get_team_member_by_id(&self, id: TeamMemberId) -> RepositoryResult<Option<TeamMember>> {
        use crate::schema::team_members;

        let mut conn = self.conn()?;
        let db_member = team_members::table
            .find(id.get())
            .first::<DbTeamMember>(&mut conn)
            .optional()?;

        db_member.map(into_domain).transpose()
    }

    fn list_team_members(&self, published_only: bool) -> RepositoryResult<Vec<TeamMember>> {
        use crate::schema::team_members;

        let mut conn = self.conn()?;
        let mut query = team_members::table
            .order((team_members::display_order.asc(), team_members::name.asc()))
            .into_boxed();
        if published_only {
            query = query.filter(team_members::is_published.eq(true));
        }

        query
            .load::<DbTeamMember>(&mut conn)?
            .into_iter()
            .map(into_domain)
            .collect()
    }
}

impl TeamMemberWriter for DieselRepository {
    fn create_team_member(&self, details: &TeamMemberDetails) -> RepositoryResult<TeamMember> {
        use crate::schema::team_members;

        let mut conn = self.conn()?;
        let values = DbTeamMemberChanges::from_details(details, Utc::now().naive_utc());

        let db_member = diesel::insert_into(team_members::table)
            .values(&values)
            .get_result::<DbTeamMember>(&mut conn)?;

        into_domain(db_member)
    }

    fn update_team_member(
        &self,
        id: TeamMemberId,
        details: &TeamMemberDetails,
    ) -> RepositoryResult<TeamMember> {
        use crate::schema::team_members;

        let mut conn = self.conn()?;
        let changes = DbTeamMemberChanges::from_details(details, Utc::now().naive_utc());

        let db_member = diesel::update(team_members::table.find(id.get()))
            .set(&changes)
            .get_result::<DbTeamMember>(&mut conn)?;

        into_domain(db_member)
    }

    fn set_team_member_photo(
        &self,
        id: TeamMemberId,
        photo: &ImageUrl,
    ) -> RepositoryResult<TeamMember> {
        use crate::schema::team_members;

        let mut conn = self.conn()?;
        let db_member = diesel::update(team_members::table.find(id.get()))
            .set((
                team_members::photo_url.eq(Some(photo.as_str())),
                team_members::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbTeamMember>(&mut conn)?;

        into_domain(db_member)
    }

    fn save_translation(
        &self,
        id: TeamMemberId,
        profile: &TranslatedProfile,
    ) -> RepositoryResult<TeamMember> {
        use crate::schema::team_members;

        let mut conn = self.conn()?;
        let changes = DbTranslationChanges::from_profile(profile, Utc::now().naive_utc());

        let db_member = diesel::update(team_members::table.find(id.get()))
            .set(&changes)
            .get_result::<DbTeamMember>(&mut conn)?;

        into_domain(db_member)
    }

    fn delete_team_member(&self, id: TeamMemberId) -> RepositoryResult<()> {
        use crate::schema::team_members;

        let mut conn = self.conn()?;
        let affected = diesel::delete(team_members::table.find(id.get())).execute(&mut conn)?;
        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
