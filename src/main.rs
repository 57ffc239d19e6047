use std::sync::Arc;

use mock_social_api::config::Config;
use mock_social_api::routes::create_router;
use mock_social_api::store::JsonStore;
use mock_social_api::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::init();

    let store = match JsonStore::load(&config.db_path) {
        Ok(store) => store,
        Err(err) => {
            println!(
                "🔥 Failed to load {}: {:?} (run the `gen` binary first)",
                config.db_path, err
            );
            std::process::exit(1);
        }
    };

    let port = config.port;
    let app_state = AppState::new(config, store);
    let app = create_router(Arc::new(app_state));

    let listener = tokio::net::TcpListener::bind(format!("[::]:{port}"))
        .await
        .unwrap();
    println!("JSON mock server is running on http://localhost:{port}");
    axum::serve(listener, app).await.unwrap();
}
