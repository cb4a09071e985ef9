/// Cron expression for the periodic synchronization run
/// Runs hourly at the top of the hour (00:00, 01:00, 02:00, etc.)
pub const CRON_EXPRESSION: &str = "0 0 * * * *";
