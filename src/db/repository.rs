//! Database repository for users, puzzles and play history.

use chrono::Utc;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::models::{
    CategoryRecord, GameRecord, NewCategoryRecord, NewGameRecord, NewPlayRecord, NewUser,
    NewWordRecord, PlayRecord, PlayRecorded, User, WordRecord,
};
use crate::db::views::{
    CategoryDetail, CreatedGame, GameDetail, GameSummary, NewPuzzle, UserDetail,
};
use crate::db::{DbError, schema};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for user, puzzle and play operations.
///
/// Opens a fresh SQLite connection per call with foreign keys enforced, so
/// the repository is cheap to clone into blocking tasks.
#[derive(Debug, Clone)]
pub struct PuzzleRepository {
    db_path: String,
}

impl PuzzleRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::invalid("Database path must not be empty"));
        }
        info!(path = %db_path, "Creating PuzzleRepository");
        Ok(Self { db_path })
    }

    /// Path of the backing database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection with foreign keys enabled.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
        Ok(conn)
    }

    // ─────────────────────────────────────────────────────────────
    //  Schema
    // ─────────────────────────────────────────────────────────────

    /// Applies any pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(applied = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Drops every table and recreates the schema.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if reverting or reapplying fails.
    #[instrument(skip(self))]
    pub fn reset(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let reverted = conn
            .revert_all_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Revert failed: {}", e)))?;
        warn!(reverted = reverted.len(), "All tables dropped");
        drop(conn);
        self.run_migrations()
    }

    // ─────────────────────────────────────────────────────────────
    //  Users
    // ─────────────────────────────────────────────────────────────

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns a [`DbError`] of kind `Conflict` if the username is taken and
    /// `Invalid` if it is blank.
    #[instrument(skip(self))]
    pub fn create_user(&self, username: String) -> Result<User, DbError> {
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(DbError::invalid("Username is required"));
        }
        debug!(username = %username, "Creating user");
        let mut conn = self.connection()?;

        let user = diesel::insert_into(schema::users::table)
            .values(&NewUser::new(username))
            .returning(User::as_returning())
            .get_result(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => DbError::conflict("Username already exists"),
                other => DbError::from(other),
            })?;

        info!(user_id = user.id(), username = %user.username(), "User created");
        Ok(user)
    }

    /// Gets a user by id.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` [`DbError`] if no such user exists.
    #[instrument(skip(self))]
    pub fn get_user(&self, user_id: i32) -> Result<User, DbError> {
        let mut conn = self.connection()?;
        schema::users::table
            .find(user_id)
            .select(User::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::not_found(format!("User {} not found", user_id)))
    }

    /// Gets a user by username. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_by_name(&self, username: &str) -> Result<Option<User>, DbError> {
        debug!(username = %username, "Looking up user by name");
        let mut conn = self.connection()?;

        let user = schema::users::table
            .filter(schema::users::username.eq(username))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = user.is_some(), "User lookup finished");
        Ok(user)
    }

    /// Lists all users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_users(&self) -> Result<Vec<User>, DbError> {
        let mut conn = self.connection()?;
        let users = schema::users::table
            .order((schema::users::created_at.asc(), schema::users::id.asc()))
            .select(User::as_select())
            .load(&mut conn)?;

        info!(count = users.len(), "Users loaded");
        Ok(users)
    }

    /// Gets a user with the ids of the games they created and played.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` [`DbError`] if no such user exists.
    #[instrument(skip(self))]
    pub fn user_detail(&self, user_id: i32) -> Result<UserDetail, DbError> {
        let user = self.get_user(user_id)?;
        let mut conn = self.connection()?;

        let created_games = schema::games::table
            .filter(schema::games::creator_id.eq(user_id))
            .order(schema::games::id.asc())
            .select(schema::games::id)
            .load::<i32>(&mut conn)?;

        let played_games = schema::user_played_games::table
            .filter(schema::user_played_games::user_id.eq(user_id))
            .order(schema::user_played_games::played_at.desc())
            .select(schema::user_played_games::game_id)
            .load::<i32>(&mut conn)?;

        debug!(
            created = created_games.len(),
            played = played_games.len(),
            "User detail loaded"
        );
        Ok(UserDetail {
            id: *user.id(),
            username: user.username().clone(),
            created_at: *user.created_at(),
            created_games,
            played_games,
        })
    }

    /// Deletes a user along with their games and play history.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` [`DbError`] if no such user exists.
    #[instrument(skip(self))]
    pub fn delete_user(&self, user_id: i32) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(schema::users::table.find(user_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(DbError::not_found(format!("User {} not found", user_id)));
        }
        info!(user_id, "User deleted");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Games
    // ─────────────────────────────────────────────────────────────

    /// Stores a game with its categories and words in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an `Invalid` [`DbError`] if the request fails validation and
    /// a `NotFound` one if the creator does not exist.
    #[instrument(skip(self, puzzle), fields(title = %puzzle.title, creator_id = ?puzzle.creator_id))]
    pub fn create_game(&self, puzzle: &NewPuzzle) -> Result<CreatedGame, DbError> {
        let creator_id = puzzle
            .validate()
            .and_then(|()| puzzle.creator())
            .map_err(|e| DbError::invalid(e.to_string()))?;
        let mut conn = self.connection()?;

        let created = conn.transaction::<_, DbError, _>(|conn| {
            let creator = schema::users::table
                .find(creator_id)
                .select(schema::users::id)
                .first::<i32>(conn)
                .optional()?;
            if creator.is_none() {
                return Err(DbError::not_found(format!(
                    "Creator {} not found",
                    creator_id
                )));
            }

            let title = puzzle.title.trim().to_string();
            let game_id = diesel::insert_into(schema::games::table)
                .values(&NewGameRecord::new(title.clone(), creator_id))
                .returning(schema::games::id)
                .get_result::<i32>(conn)?;

            for (index, category) in puzzle.categories.iter().enumerate() {
                let category_id = diesel::insert_into(schema::categories::table)
                    .values(&NewCategoryRecord::new(
                        game_id,
                        category.category_name.trim().to_string(),
                        puzzle.difficulty_of(index),
                        category.description.clone(),
                    ))
                    .returning(schema::categories::id)
                    .get_result::<i32>(conn)?;

                let words: Vec<NewWordRecord> = category
                    .words
                    .iter()
                    .map(|w| NewWordRecord::new(category_id, w.trim().to_string()))
                    .collect();
                diesel::insert_into(schema::words::table)
                    .values(&words)
                    .execute(conn)?;
            }

            Ok(CreatedGame {
                id: game_id,
                title,
                creator_id,
            })
        })?;

        info!(game_id = created.id, "Game created");
        Ok(created)
    }

    /// Lists game summaries with creator names, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<GameSummary>, DbError> {
        let mut conn = self.connection()?;
        let rows = schema::games::table
            .inner_join(schema::users::table)
            .order((schema::games::created_at.desc(), schema::games::id.desc()))
            .select((GameRecord::as_select(), schema::users::username))
            .load::<(GameRecord, String)>(&mut conn)?;

        info!(count = rows.len(), "Games loaded");
        Ok(rows
            .into_iter()
            .map(|(game, creator_name)| GameSummary {
                id: *game.id(),
                title: game.title().clone(),
                creator_id: *game.creator_id(),
                creator_name,
                created_at: *game.created_at(),
            })
            .collect())
    }

    /// Gets a game with its categories, easiest first, and their words.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` [`DbError`] if no such game exists.
    #[instrument(skip(self))]
    pub fn game_detail(&self, game_id: i32) -> Result<GameDetail, DbError> {
        let mut conn = self.connection()?;

        let (game, creator_name) = schema::games::table
            .inner_join(schema::users::table)
            .filter(schema::games::id.eq(game_id))
            .select((GameRecord::as_select(), schema::users::username))
            .first::<(GameRecord, String)>(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::not_found(format!("Game {} not found", game_id)))?;

        let categories = CategoryRecord::belonging_to(&game)
            .order((
                schema::categories::difficulty_level.asc(),
                schema::categories::id.asc(),
            ))
            .select(CategoryRecord::as_select())
            .load(&mut conn)?;

        let words = WordRecord::belonging_to(&categories)
            .order(schema::words::id.asc())
            .select(WordRecord::as_select())
            .load(&mut conn)?;

        let categories: Vec<CategoryDetail> = words
            .grouped_by(&categories)
            .into_iter()
            .zip(&categories)
            .map(|(words, category)| CategoryDetail {
                id: *category.id(),
                category_name: category.category_name().clone(),
                difficulty_level: *category.difficulty_level(),
                description: category.description().clone(),
                words: words.into_iter().map(|w| w.word().clone()).collect(),
            })
            .collect();

        debug!(categories = categories.len(), "Game detail loaded");
        Ok(GameDetail {
            id: *game.id(),
            title: game.title().clone(),
            creator_id: *game.creator_id(),
            creator_name,
            created_at: *game.created_at(),
            categories,
        })
    }

    /// Deletes a game with its categories, words and play records.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` [`DbError`] if no such game exists.
    #[instrument(skip(self))]
    pub fn delete_game(&self, game_id: i32) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(schema::games::table.find(game_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(DbError::not_found(format!("Game {} not found", game_id)));
        }
        info!(game_id, "Game deleted");
        Ok(())
    }

    /// Deletes a single category and its words.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` [`DbError`] if no such category exists.
    #[instrument(skip(self))]
    pub fn delete_category(&self, category_id: i32) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let deleted =
            diesel::delete(schema::categories::table.find(category_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(DbError::not_found(format!(
                "Category {} not found",
                category_id
            )));
        }
        info!(category_id, "Category deleted");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Plays
    // ─────────────────────────────────────────────────────────────

    /// Marks a game as played by a user, refreshing the time on replays.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` [`DbError`] if the user or game does not exist.
    #[instrument(skip(self))]
    pub fn record_play(&self, user_id: i32, game_id: i32) -> Result<PlayRecorded, DbError> {
        let mut conn = self.connection()?;

        let recorded = conn.transaction::<_, DbError, _>(|conn| {
            let user_exists = schema::users::table
                .find(user_id)
                .select(schema::users::id)
                .first::<i32>(conn)
                .optional()?
                .is_some();
            let game_exists = schema::games::table
                .find(game_id)
                .select(schema::games::id)
                .first::<i32>(conn)
                .optional()?
                .is_some();
            if !user_exists || !game_exists {
                return Err(DbError::not_found("User or game not found"));
            }

            let existing = schema::user_played_games::table
                .find((user_id, game_id))
                .select(PlayRecord::as_select())
                .first(conn)
                .optional()?;

            if existing.is_some() {
                diesel::update(schema::user_played_games::table.find((user_id, game_id)))
                    .set(schema::user_played_games::played_at.eq(Utc::now().naive_utc()))
                    .execute(conn)?;
                Ok(PlayRecorded::Refreshed)
            } else {
                diesel::insert_into(schema::user_played_games::table)
                    .values(&NewPlayRecord::new(user_id, game_id))
                    .execute(conn)?;
                Ok(PlayRecorded::Inserted)
            }
        })?;

        info!(user_id, game_id, recorded = ?recorded, "Play recorded");
        Ok(recorded)
    }

    /// Play records for a user, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn plays_for_user(&self, user_id: i32) -> Result<Vec<PlayRecord>, DbError> {
        let mut conn = self.connection()?;
        let plays = schema::user_played_games::table
            .filter(schema::user_played_games::user_id.eq(user_id))
            .order(schema::user_played_games::played_at.desc())
            .select(PlayRecord::as_select())
            .load(&mut conn)?;

        debug!(count = plays.len(), "Plays loaded");
        Ok(plays)
    }
}
