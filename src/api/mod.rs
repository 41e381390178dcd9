//! REST API over the puzzle store.
//!
//! All routes live under `/api` and speak JSON. Failures carry a
//! `{code, message}` body.

mod error;
mod extract;
mod handlers;

pub use error::{ApiError, ApiErrorResponse};
pub use handlers::{CreateUserRequest, HealthStatus, PlayedMessage, UserQuery};

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::db::PuzzleRepository;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    repository: PuzzleRepository,
}

impl AppState {
    /// Wraps a repository for use by the handlers.
    pub fn new(repository: PuzzleRepository) -> Self {
        Self { repository }
    }
}

/// Builds the full application router with tracing and permissive CORS.
#[instrument(skip(repository), fields(db_path = %repository.db_path()))]
pub fn create_router(repository: PuzzleRepository) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/users/{id}",
            get(handlers::get_user).delete(handlers::delete_user),
        )
        .route(
            "/users/{user_id}/played/{game_id}",
            post(handlers::record_play),
        )
        .route("/games", get(handlers::list_games).post(handlers::create_game))
        .route(
            "/games/{id}",
            get(handlers::get_game).delete(handlers::delete_game),
        );

    info!("Router built");
    Router::new()
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(AppState::new(repository))
}
