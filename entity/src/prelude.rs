pub use super::calendar_event::Entity as CalendarEvent;
pub use super::enabled_tower::Entity as EnabledTower;
pub use super::setting::Entity as Setting;
pub use super::token::Entity as Token;
