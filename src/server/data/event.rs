use sea_orm::{
    sea_query::OnConflict, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, QueryFilter,
};

/// Repository for the local (character, tower) -> remote event id records.
///
/// Generic over the connection so the reconciler can apply its staged
/// changes inside a transaction while everything else uses the plain
/// connection.
pub struct EventRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EventRepository<'a, C> {
    /// Creates a new instance of [`EventRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Fetches every tracked event record belonging to a character
    pub async fn get_for_char(
        &self,
        char_id: i64,
    ) -> Result<Vec<entity::calendar_event::Model>, DbErr> {
        entity::prelude::CalendarEvent::find()
            .filter(entity::calendar_event::Column::CharId.eq(char_id))
            .all(self.db)
            .await
    }

    /// Creates or replaces the record tracking a tower's remote event
    pub async fn upsert(&self, char_id: i64, orbit_id: i64, event_id: &str) -> Result<(), DbErr> {
        let record = entity::calendar_event::ActiveModel {
            char_id: ActiveValue::Set(char_id),
            orbit_id: ActiveValue::Set(orbit_id),
            event_id: ActiveValue::Set(event_id.to_string()),
        };

        entity::prelude::CalendarEvent::insert(record)
            .on_conflict(
                OnConflict::columns([
                    entity::calendar_event::Column::CharId,
                    entity::calendar_event::Column::OrbitId,
                ])
                .update_column(entity::calendar_event::Column::EventId)
                .to_owned(),
            )
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Deletes the record for a (character, tower) pair
    ///
    /// Returns OK regardless of the record existing, to confirm the deletion
    /// result check the [`DeleteResult::rows_affected`] field.
    pub async fn delete(&self, char_id: i64, orbit_id: i64) -> Result<DeleteResult, DbErr> {
        entity::prelude::CalendarEvent::delete_by_id((char_id, orbit_id))
            .exec(self.db)
            .await
    }
}
