use std::sync::Arc;

use poscal::server::{
    client::posmon::PosmonClient,
    config::{Config, GoogleConfig},
    model::app::AppState,
    router,
    scheduler::SyncScheduler,
    startup,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let http = reqwest::Client::new();
    let google = GoogleConfig::new(&config.google_client_id, &config.google_client_secret);
    let posmon = PosmonClient::new(http.clone(), &config.posmon_url);
    let db = startup::connect_to_database(&config).await.unwrap();

    let sync = Arc::new(SyncScheduler::new(
        db.clone(),
        http.clone(),
        google.clone(),
        posmon.clone(),
    ));
    sync.start().await.unwrap();

    tracing::info!("Starting server on {}", config.listen_addr);

    let state = AppState {
        db,
        http,
        google,
        posmon,
        sync,
    };
    let router = router::routes().with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .unwrap();
    axum::serve(listener, router).await.unwrap();
}
