use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EnabledTower::Table)
                    .if_not_exists()
                    .col(big_integer(EnabledTower::CharId))
                    .col(big_integer(EnabledTower::OrbitId))
                    .primary_key(
                        Index::create()
                            .col(EnabledTower::CharId)
                            .col(EnabledTower::OrbitId),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EnabledTower::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum EnabledTower {
    Table,
    CharId,
    OrbitId,
}
