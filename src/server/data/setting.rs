use sea_orm::{sea_query::OnConflict, ActiveValue, DatabaseConnection, DbErr, EntityTrait};

pub struct SettingRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SettingRepository<'a> {
    /// Setting key holding the character's Google calendar id.
    pub const CALENDAR: &'static str = "calendar";

    /// Creates a new instance of [`SettingRepository`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches a setting value for a character
    pub async fn get(&self, char_id: i64, key: &str) -> Result<Option<String>, DbErr> {
        let setting = entity::prelude::Setting::find_by_id((char_id, key.to_string()))
            .one(self.db)
            .await?;

        Ok(setting.map(|model| model.value))
    }

    /// Sets a setting value for a character, replacing any previous value
    pub async fn set(&self, char_id: i64, key: &str, value: &str) -> Result<(), DbErr> {
        let setting = entity::setting::ActiveModel {
            char_id: ActiveValue::Set(char_id),
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value.to_string()),
        };

        entity::prelude::Setting::insert(setting)
            .on_conflict(
                OnConflict::columns([
                    entity::setting::Column::CharId,
                    entity::setting::Column::Key,
                ])
                .update_column(entity::setting::Column::Value)
                .to_owned(),
            )
            .exec(self.db)
            .await?;

        Ok(())
    }
}
