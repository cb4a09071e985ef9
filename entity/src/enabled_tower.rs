use sea_orm::entity::prelude::*;

/// Membership row marking a tower a character has opted to monitor.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "enabled_tower")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub char_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub orbit_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
