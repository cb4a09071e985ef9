use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CalendarEvent::Table)
                    .if_not_exists()
                    .col(big_integer(CalendarEvent::CharId))
                    .col(big_integer(CalendarEvent::OrbitId))
                    .col(string(CalendarEvent::EventId))
                    .primary_key(
                        Index::create()
                            .col(CalendarEvent::CharId)
                            .col(CalendarEvent::OrbitId),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CalendarEvent::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum CalendarEvent {
    Table,
    CharId,
    OrbitId,
    EventId,
}
