//! Database models mirroring the puzzle store tables.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::schema;

/// Player or puzzle author.
#[derive(
    Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters, Serialize, Deserialize,
)]
#[diesel(table_name = schema::users)]
pub struct User {
    id: i32,
    username: String,
    created_at: NaiveDateTime,
}

/// Insertable user model for creating new users.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    username: String,
}

/// Stored game header; categories and words live in their own tables.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(belongs_to(User, foreign_key = creator_id))]
pub struct GameRecord {
    id: i32,
    title: String,
    creator_id: i32,
    created_at: NaiveDateTime,
}

/// Insertable game header.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    title: String,
    creator_id: i32,
}

/// Stored category belonging to a game.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::categories)]
#[diesel(belongs_to(GameRecord, foreign_key = game_id))]
pub struct CategoryRecord {
    id: i32,
    game_id: i32,
    category_name: String,
    difficulty_level: i32,
    description: Option<String>,
}

/// Insertable category.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::categories)]
pub struct NewCategoryRecord {
    game_id: i32,
    category_name: String,
    difficulty_level: i32,
    description: Option<String>,
}

/// Stored word belonging to a category.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::words)]
#[diesel(belongs_to(CategoryRecord, foreign_key = category_id))]
pub struct WordRecord {
    id: i32,
    category_id: i32,
    word: String,
}

/// Insertable word.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::words)]
pub struct NewWordRecord {
    category_id: i32,
    word: String,
}

/// A user having played a game, refreshed on every replay.
#[derive(Debug, Clone, Queryable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::user_played_games)]
pub struct PlayRecord {
    user_id: i32,
    game_id: i32,
    played_at: NaiveDateTime,
}

/// Insertable play record; `played_at` defaults to now.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::user_played_games)]
pub struct NewPlayRecord {
    user_id: i32,
    game_id: i32,
}

/// What [`record_play`](crate::PuzzleRepository::record_play) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayRecorded {
    /// First play of this game by this user.
    Inserted,
    /// The existing record's timestamp was refreshed.
    Refreshed,
}

impl PlayRecorded {
    /// Message returned to API clients.
    pub fn message(self) -> &'static str {
        match self {
            Self::Inserted => "Game marked as played",
            Self::Refreshed => "Game play time updated",
        }
    }
}
