//! HTTP handlers for users, games and plays.
//!
//! Every handler runs its diesel work on the blocking pool.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::{ApiErrorResponse, AppState};
use crate::db::{
    CreatedGame, DbError, GameDetail, GameSummary, NewPuzzle, PlayRecorded, PuzzleRepository, User,
    UserDetail,
};

/// Liveness reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `"ok"`.
    pub status: String,
}

/// Reply to a play being recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMessage {
    /// Whether the play was new or refreshed.
    pub outcome: PlayRecorded,
    /// Human-readable form of `outcome`.
    pub message: String,
}

/// Body of `POST /api/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    /// Requested username.
    #[serde(default)]
    pub username: String,
}

/// Query string of `GET /api/users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    /// Exact username to look up.
    pub username: Option<String>,
}

/// Runs a repository call on the blocking pool.
async fn blocking<T, F>(state: &AppState, call: F) -> Result<T, ApiErrorResponse>
where
    T: Send + 'static,
    F: FnOnce(&PuzzleRepository) -> Result<T, DbError> + Send + 'static,
{
    let repository = state.repository.clone();
    tokio::task::spawn_blocking(move || call(&repository))
        .await
        .map_err(|e| {
            error!(error = %e, "Blocking task failed");
            ApiErrorResponse::internal_error("Server error")
        })?
        .map_err(ApiErrorResponse::from)
}

/// `GET /api/health`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}

/// `GET /api/users[?username=]`
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<User>>, ApiErrorResponse> {
    let users: Vec<User> = match query.username {
        Some(username) => {
            debug!(username = %username, "Filtering users by name");
            blocking(&state, move |repo| repo.get_user_by_name(&username))
                .await?
                .into_iter()
                .collect()
        }
        None => blocking(&state, |repo| repo.list_users()).await?,
    };
    Ok(Json(users))
}

/// `GET /api/users/{id}`
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i32>,
) -> Result<Json<UserDetail>, ApiErrorResponse> {
    let detail = blocking(&state, move |repo| repo.user_detail(user_id)).await?;
    Ok(Json(detail))
}

/// `POST /api/users`
#[instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiErrorResponse> {
    if request.username.trim().is_empty() {
        return Err(ApiErrorResponse::bad_request(
            "INVALID_INPUT",
            "Username is required",
        ));
    }
    let user = blocking(&state, move |repo| repo.create_user(request.username)).await?;
    info!(user_id = user.id(), "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `DELETE /api/users/{id}`
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i32>,
) -> Result<StatusCode, ApiErrorResponse> {
    blocking(&state, move |repo| repo.delete_user(user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/games`
#[instrument(skip(state))]
pub async fn list_games(
    State(state): State<AppState>,
) -> Result<Json<Vec<GameSummary>>, ApiErrorResponse> {
    let games = blocking(&state, |repo| repo.list_games()).await?;
    Ok(Json(games))
}

/// `GET /api/games/{id}`
#[instrument(skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    ApiPath(game_id): ApiPath<i32>,
) -> Result<Json<GameDetail>, ApiErrorResponse> {
    let game = blocking(&state, move |repo| repo.game_detail(game_id)).await?;
    Ok(Json(game))
}

/// `POST /api/games`
#[instrument(skip(state, puzzle), fields(title = %puzzle.title))]
pub async fn create_game(
    State(state): State<AppState>,
    ApiJson(puzzle): ApiJson<NewPuzzle>,
) -> Result<(StatusCode, Json<CreatedGame>), ApiErrorResponse> {
    puzzle.validate()?;
    let created = blocking(&state, move |repo| repo.create_game(&puzzle)).await?;
    info!(game_id = created.id, "Game published");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `DELETE /api/games/{id}`
#[instrument(skip(state))]
pub async fn delete_game(
    State(state): State<AppState>,
    ApiPath(game_id): ApiPath<i32>,
) -> Result<StatusCode, ApiErrorResponse> {
    blocking(&state, move |repo| repo.delete_game(game_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/users/{user_id}/played/{game_id}`
#[instrument(skip(state))]
pub async fn record_play(
    State(state): State<AppState>,
    ApiPath((user_id, game_id)): ApiPath<(i32, i32)>,
) -> Result<Json<PlayedMessage>, ApiErrorResponse> {
    let recorded = blocking(&state, move |repo| repo.record_play(user_id, game_id)).await?;
    Ok(Json(PlayedMessage {
        outcome: recorded,
        message: recorded.message().to_string(),
    }))
}
