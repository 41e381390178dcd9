//! Puzzle store reached over the REST API.

use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, PlayedMessage};
use crate::db::{CreatedGame, GameDetail, GameSummary, NewPuzzle, PlayRecorded, User};
use crate::games::connections::Puzzle;
use crate::store::{PuzzleStore, StoreError};

/// HTTP client for a running puzzle server.
#[derive(Debug, Clone)]
pub struct RestPuzzleClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct CreateUserBody<'a> {
    username: &'a str,
}

impl RestPuzzleClient {
    /// Creates a client for the server at `base_url`, e.g. `http://localhost:3000`.
    #[instrument]
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Creating REST puzzle client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Server root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Turns a non-success response into its `{code, message}` error body.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await?;
        let message = serde_json::from_str::<ApiError>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| format!("HTTP {}", status));
        warn!(status = %status, message = %message, "Server rejected request");
        Err(StoreError::new(message))
    }

    #[instrument(skip(self))]
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut url = reqwest::Url::parse(&self.url("/users"))
            .map_err(|e| StoreError::new(format!("Invalid server URL: {}", e)))?;
        url.query_pairs_mut().append_pair("username", username);
        let response = self.client.get(url).send().await?;
        let users: Vec<User> = Self::decode(response).await?;
        Ok(users.into_iter().next())
    }
}

#[async_trait::async_trait]
impl PuzzleStore for RestPuzzleClient {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let response = self.client.get(self.url("/users")).send().await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn sign_in(&self, username: &str) -> Result<User, StoreError> {
        let username = username.trim();
        if let Some(user) = self.find_user(username).await? {
            debug!(user_id = user.id(), "Existing user found");
            return Ok(user);
        }

        let response = self
            .client
            .post(self.url("/users"))
            .json(&CreateUserBody { username })
            .send()
            .await?;
        if response.status() == StatusCode::CONFLICT {
            return self
                .find_user(username)
                .await?
                .ok_or_else(|| StoreError::new("Username already exists"));
        }
        let user: User = Self::decode(response).await?;
        info!(user_id = user.id(), "User created");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list_puzzles(&self) -> Result<Vec<GameSummary>, StoreError> {
        let response = self.client.get(self.url("/games")).send().await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn load_puzzle(&self, game_id: i32) -> Result<Puzzle, StoreError> {
        let response = self
            .client
            .get(self.url(&format!("/games/{}", game_id)))
            .send()
            .await?;
        let detail: GameDetail = Self::decode(response).await?;
        debug!(title = %detail.title, "Game fetched");
        Ok(detail.to_puzzle()?)
    }

    #[instrument(skip(self, puzzle), fields(title = %puzzle.title))]
    async fn create_puzzle(&self, puzzle: &NewPuzzle) -> Result<CreatedGame, StoreError> {
        let response = self
            .client
            .post(self.url("/games"))
            .json(puzzle)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn record_play(&self, user_id: i32, game_id: i32) -> Result<PlayRecorded, StoreError> {
        let response = self
            .client
            .post(self.url(&format!("/users/{}/played/{}", user_id, game_id)))
            .send()
            .await?;
        let body: PlayedMessage = Self::decode(response).await?;
        debug!(outcome = ?body.outcome, "Play recorded");
        Ok(body.outcome)
    }
}
