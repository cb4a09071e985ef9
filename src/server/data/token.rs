use sea_orm::{sea_query::OnConflict, ActiveValue, DatabaseConnection, DbErr, EntityTrait};

pub struct TokenRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TokenRepository<'a> {
    /// Credential kind under which Google OAuth tokens are stored.
    pub const GOOGLE_OAUTH: &'static str = "google_oauth";

    /// Creates a new instance of [`TokenRepository`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches the stored Google OAuth credential blob for a character
    pub async fn get_google_oauth(
        &self,
        char_id: i64,
    ) -> Result<Option<entity::token::Model>, DbErr> {
        entity::prelude::Token::find_by_id((char_id, Self::GOOGLE_OAUTH.to_string()))
            .one(self.db)
            .await
    }

    /// Stores the Google OAuth credential blob for a character, replacing
    /// any previous value
    pub async fn set_google_oauth(&self, char_id: i64, value: &str) -> Result<(), DbErr> {
        let token = entity::token::ActiveModel {
            char_id: ActiveValue::Set(char_id),
            kind: ActiveValue::Set(Self::GOOGLE_OAUTH.to_string()),
            value: ActiveValue::Set(value.to_string()),
        };

        entity::prelude::Token::insert(token)
            .on_conflict(
                OnConflict::columns([
                    entity::token::Column::CharId,
                    entity::token::Column::Kind,
                ])
                .update_column(entity::token::Column::Value)
                .to_owned(),
            )
            .exec(self.db)
            .await?;

        Ok(())
    }
}
