pub struct Config {
    pub database_url: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub posmon_url: String,
    pub listen_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, std::env::VarError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")?,
            google_client_id: std::env::var("GOOGLE_CLIENT_ID")?,
            google_client_secret: std::env::var("GOOGLE_CLIENT_SECRET")?,
            posmon_url: std::env::var("POSMON_URL")?,
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
        })
    }
}

/// Endpoints and credentials for the Google APIs the service talks to.
///
/// Production code uses the public Google endpoints; tests point both URLs at
/// a mock server.
#[derive(Clone, Debug)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Base URL of the Google Calendar v3 REST API, without a trailing slash.
    pub api_url: String,
    /// URL of the OAuth token endpoint used for refresh-token exchanges.
    pub token_url: String,
}

impl GoogleConfig {
    pub const API_URL: &'static str = "https://www.googleapis.com/calendar/v3";
    pub const TOKEN_URL: &'static str = "https://oauth2.googleapis.com/token";

    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            api_url: Self::API_URL.to_string(),
            token_url: Self::TOKEN_URL.to_string(),
        }
    }
}
