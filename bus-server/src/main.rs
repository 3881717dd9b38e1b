use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use bus_server::cache::CacheConfig;
use bus_server::store::MemoryStore;
use bus_server::web::{AppState, create_router};

/// Seed catalog loaded when SEED_DATA is not set.
const DEFAULT_SEED_PATH: &str = "data/seed.json";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load the catalog. The default path works from the workspace member
    // directory; fall back to the manifest-relative copy when run elsewhere.
    let seed_path = std::env::var("SEED_DATA").unwrap_or_else(|_| {
        if std::path::Path::new(DEFAULT_SEED_PATH).exists() {
            DEFAULT_SEED_PATH.to_string()
        } else {
            concat!(env!("CARGO_MANIFEST_DIR"), "/data/seed.json").to_string()
        }
    });
    let store = MemoryStore::from_seed_file(&seed_path)
        .unwrap_or_else(|e| panic!("Failed to load seed data from {seed_path}: {e}"));
    println!(
        "Loaded {} routes and {} buses from {seed_path}",
        store.route_count().await,
        store.bus_count().await
    );

    // Build app state
    let state = AppState::new(store, &CacheConfig::default());

    // Create router
    let app = create_router(state);

    // Bind and serve
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("Bus booking server listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health                - Health check");
    println!("  GET  /buses                 - Search buses");
    println!("  POST /bookings              - Book seats");
    println!("  POST /bookings/:id/cancel   - Cancel a booking");
    println!("  GET  /bookings/my-trips     - List your bookings");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
