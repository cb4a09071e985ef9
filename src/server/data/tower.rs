use sea_orm::{
    sea_query::OnConflict, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, DeleteResult,
    EntityTrait, QueryFilter, QuerySelect,
};

pub struct TowerRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TowerRepository<'a> {
    /// Creates a new instance of [`TowerRepository`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches the towers a character has enabled monitoring for
    pub async fn get_for_char(
        &self,
        char_id: i64,
    ) -> Result<Vec<entity::enabled_tower::Model>, DbErr> {
        entity::prelude::EnabledTower::find()
            .filter(entity::enabled_tower::Column::CharId.eq(char_id))
            .all(self.db)
            .await
    }

    /// Fetches the distinct characters with at least one enabled tower
    pub async fn distinct_char_ids(&self) -> Result<Vec<i64>, DbErr> {
        entity::prelude::EnabledTower::find()
            .select_only()
            .column(entity::enabled_tower::Column::CharId)
            .distinct()
            .into_tuple::<i64>()
            .all(self.db)
            .await
    }

    /// Enables monitoring of a tower for a character, ignoring duplicates
    pub async fn enable(&self, char_id: i64, orbit_id: i64) -> Result<(), DbErr> {
        let membership = entity::enabled_tower::ActiveModel {
            char_id: ActiveValue::Set(char_id),
            orbit_id: ActiveValue::Set(orbit_id),
        };

        entity::prelude::EnabledTower::insert(membership)
            .on_conflict(
                OnConflict::columns([
                    entity::enabled_tower::Column::CharId,
                    entity::enabled_tower::Column::OrbitId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }

    /// Disables monitoring of a tower for a character
    ///
    /// Returns OK regardless of the membership existing, to confirm the
    /// deletion result check the [`DeleteResult::rows_affected`] field.
    pub async fn disable(&self, char_id: i64, orbit_id: i64) -> Result<DeleteResult, DbErr> {
        entity::prelude::EnabledTower::delete_by_id((char_id, orbit_id))
            .exec(self.db)
            .await
    }
}
