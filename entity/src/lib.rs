pub mod calendar_event;
pub mod enabled_tower;
pub mod prelude;
pub mod setting;
pub mod token;
