use axum::{routing::get, Router};
use mimalloc::MiMalloc;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_system::{config::Config, controllers, AppState};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Movie Reservation API");

    // Connects to Postgres and Redis, runs migrations, wires the payment
    // gateway and the seat-event broadcaster.
    let state = AppState::new(config.clone())
        .await
        .expect("Failed to initialise application state");
    info!("Database connected, migrations applied");

    // --- Start the web server ---

    let app = Router::new()
        .route(
            "/",
            get(|| async { "Hello! The Movie Reservation API is running." }),
        )
        .route("/health", get(|| async { "OK" }))
        .merge(controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Browser clients connect from arbitrary origins.
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.app.port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
