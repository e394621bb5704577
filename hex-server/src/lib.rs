//! Hex Server - HTTP API over the rules engine
//!
//! This crate provides the transport layer:
//! - In-memory registry of games, one lock per game
//! - REST API for creating, loading and playing games
//! - Static file serving for the web client

mod error;
mod routes;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

pub use error::ApiError;
pub use routes::games::GameView;
pub use state::{lock_game, GameId, ServerState, SharedGame};

/// Largest board the API accepts by default
pub const DEFAULT_MAX_BOARD_SIZE: usize = 19;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    pub max_board_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8002,
            static_dir: "public".to_string(),
            max_board_size: DEFAULT_MAX_BOARD_SIZE,
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    // Unknown paths get the client's index page (HTML5 navigation)
    let index = Path::new(&config.static_dir).join("index.html");
    let static_service = ServeDir::new(&config.static_dir).fallback(ServeFile::new(index));

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Game API
        .route("/api/games", post(routes::games::create_game))
        .route("/api/games/load", post(routes::games::load_game))
        .route("/api/games/:id", get(routes::games::get_game))
        .route("/api/games/:id/start", post(routes::games::start_game))
        .route("/api/games/:id/move", post(routes::games::make_move))
        .route("/api/games/:id/resign", post(routes::games::resign))
        .route("/api/games/:id/forfeit", post(routes::games::forfeit))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new(&config));
    let router = create_router(&config, state);

    tracing::info!("Hex server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
