pub use sea_orm_migration::prelude::*;

mod m20260115_000001_create_setting_table;
mod m20260115_000002_create_token_table;
mod m20260115_000003_create_enabled_tower_table;
mod m20260115_000004_create_calendar_event_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260115_000001_create_setting_table::Migration),
            Box::new(m20260115_000002_create_token_table::Migration),
            Box::new(m20260115_000003_create_enabled_tower_table::Migration),
            Box::new(m20260115_000004_create_calendar_event_table::Migration),
        ]
    }
}
