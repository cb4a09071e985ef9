use sea_orm::entity::prelude::*;

/// Local record of a remote calendar event tracked for a character's tower.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "calendar_event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub char_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub orbit_id: i64,
    pub event_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
