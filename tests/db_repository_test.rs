//! Tests for database repository operations.

use diesel::Connection;
use diesel::SqliteConnection;
use diesel_migrations::MigrationHarness;
use tempfile::NamedTempFile;

use connections::{
    ConstructionError, DbErrorKind, MIGRATIONS, NewPuzzle, PlayRecorded, PuzzleRepository,
    PuzzleService,
};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, PuzzleRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let mut conn = SqliteConnection::establish(&db_path).expect("Failed to connect");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Migrations failed");

    let repo = PuzzleRepository::new(db_path).expect("Failed to create repository");
    (db_file, repo)
}

/// Stores the sample puzzle under a fresh user and returns (user id, game id).
fn seed_sample(repo: &PuzzleRepository) -> (i32, i32) {
    let user = repo
        .create_user("john_doe".to_string())
        .expect("Create failed");
    let game = repo
        .create_game(&NewPuzzle::tech_terms(*user.id()))
        .expect("Create game failed");
    (*user.id(), game.id)
}

#[test]
fn test_create_user() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("Alice".to_string())
        .expect("Create failed");
    assert_eq!(user.username(), "Alice");
    assert!(*user.id() > 0);
}

#[test]
fn test_create_user_duplicate_name_conflicts() {
    let (_db, repo) = setup_test_db();
    repo.create_user("Bob".to_string())
        .expect("First create failed");
    let err = repo.create_user("Bob".to_string()).unwrap_err();
    assert_eq!(err.kind, DbErrorKind::Conflict);
    assert_eq!(err.message, "Username already exists");
}

#[test]
fn test_create_user_blank_name_invalid() {
    let (_db, repo) = setup_test_db();
    let err = repo.create_user("   ".to_string()).unwrap_err();
    assert_eq!(err.kind, DbErrorKind::Invalid);
}

#[test]
fn test_get_user_by_name() {
    let (_db, repo) = setup_test_db();
    repo.create_user("Carol".to_string())
        .expect("Create failed");
    let found = repo.get_user_by_name("Carol").expect("Query failed");
    assert_eq!(found.unwrap().username(), "Carol");
    assert!(repo.get_user_by_name("NoSuchUser").expect("Query failed").is_none());
}

#[test]
fn test_get_user_missing_is_not_found() {
    let (_db, repo) = setup_test_db();
    assert_eq!(repo.get_user(404).unwrap_err().kind, DbErrorKind::NotFound);
}

#[test]
fn test_list_users_ordered_by_creation() {
    let (_db, repo) = setup_test_db();
    for name in ["Alpha", "Beta", "Gamma"] {
        repo.create_user(name.to_string()).expect("Create failed");
    }
    let users = repo.list_users().expect("List failed");
    let names: Vec<&str> = users.iter().map(|u| u.username().as_str()).collect();
    assert_eq!(names, ["Alpha", "Beta", "Gamma"]);
}

#[test]
fn test_game_detail_orders_categories_by_difficulty() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user("ada".to_string()).expect("Create failed");
    let mut puzzle = NewPuzzle::tech_terms(*user.id());
    puzzle.categories.reverse();
    let created = repo.create_game(&puzzle).expect("Create game failed");
    assert_eq!(created.title, "Tech Terms");

    let detail = repo.game_detail(created.id).expect("Detail failed");
    assert_eq!(detail.creator_name, "ada");
    let levels: Vec<i32> = detail.categories.iter().map(|c| c.difficulty_level).collect();
    assert_eq!(levels, [1, 2, 3, 4]);
    assert_eq!(detail.categories[0].category_name, "Programming Languages");
    assert_eq!(
        detail.categories[0].words,
        ["PYTHON", "JAVASCRIPT", "JAVA", "RUBY"]
    );
    assert_eq!(
        detail.categories[3].description.as_deref(),
        Some("Major cloud service providers")
    );
}

#[test]
fn test_missing_difficulty_stored_as_position() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user("ada".to_string()).expect("Create failed");
    let mut puzzle = NewPuzzle::tech_terms(*user.id());
    for category in &mut puzzle.categories {
        category.difficulty_level = None;
    }
    let created = repo.create_game(&puzzle).expect("Create game failed");
    let detail = repo.game_detail(created.id).expect("Detail failed");
    let levels: Vec<i32> = detail.categories.iter().map(|c| c.difficulty_level).collect();
    assert_eq!(levels, [1, 2, 3, 4]);
}

#[test]
fn test_create_game_unknown_creator() {
    let (_db, repo) = setup_test_db();
    let err = repo.create_game(&NewPuzzle::tech_terms(77)).unwrap_err();
    assert_eq!(err.kind, DbErrorKind::NotFound);
    assert!(repo.list_games().expect("List failed").is_empty());
}

#[test]
fn test_create_game_rejects_malformed_request() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user("ada".to_string()).expect("Create failed");
    let mut puzzle = NewPuzzle::tech_terms(*user.id());
    puzzle.categories[0].words.truncate(3);
    let err = repo.create_game(&puzzle).unwrap_err();
    assert_eq!(err.kind, DbErrorKind::Invalid);
    assert!(repo.list_games().expect("List failed").is_empty());
}

#[test]
fn test_list_games_newest_first_with_creator() {
    let (_db, repo) = setup_test_db();
    let (user_id, first) = seed_sample(&repo);
    let mut second = NewPuzzle::tech_terms(user_id);
    second.title = "More Tech".to_string();
    let second = repo.create_game(&second).expect("Create game failed");

    let games = repo.list_games().expect("List failed");
    let ids: Vec<i32> = games.iter().map(|g| g.id).collect();
    assert_eq!(ids, [second.id, first]);
    assert!(games.iter().all(|g| g.creator_name == "john_doe"));
}

#[test]
fn test_record_play_upserts() {
    let (_db, repo) = setup_test_db();
    let (user_id, game_id) = seed_sample(&repo);

    let first = repo.record_play(user_id, game_id).expect("Record failed");
    assert_eq!(first, PlayRecorded::Inserted);
    assert_eq!(first.message(), "Game marked as played");

    let second = repo.record_play(user_id, game_id).expect("Record failed");
    assert_eq!(second, PlayRecorded::Refreshed);
    assert_eq!(second.message(), "Game play time updated");

    let plays = repo.plays_for_user(user_id).expect("Plays failed");
    assert_eq!(plays.len(), 1);
    assert_eq!(*plays[0].game_id(), game_id);
}

#[test]
fn test_record_play_unknown_game() {
    let (_db, repo) = setup_test_db();
    let (user_id, _) = seed_sample(&repo);
    let err = repo.record_play(user_id, 999).unwrap_err();
    assert_eq!(err.kind, DbErrorKind::NotFound);
}

#[test]
fn test_user_detail_lists_created_and_played() {
    let (_db, repo) = setup_test_db();
    let (user_id, game_id) = seed_sample(&repo);
    let player = repo.create_user("player".to_string()).expect("Create failed");
    repo.record_play(*player.id(), game_id).expect("Record failed");

    let author = repo.user_detail(user_id).expect("Detail failed");
    assert_eq!(author.created_games, [game_id]);
    assert!(author.played_games.is_empty());

    let player = repo.user_detail(*player.id()).expect("Detail failed");
    assert!(player.created_games.is_empty());
    assert_eq!(player.played_games, [game_id]);
}

#[test]
fn test_delete_game_cascades() {
    let (_db, repo) = setup_test_db();
    let (user_id, game_id) = seed_sample(&repo);
    repo.record_play(user_id, game_id).expect("Record failed");

    repo.delete_game(game_id).expect("Delete failed");
    assert_eq!(
        repo.game_detail(game_id).unwrap_err().kind,
        DbErrorKind::NotFound
    );
    assert!(repo.plays_for_user(user_id).expect("Plays failed").is_empty());
    assert_eq!(
        repo.delete_game(game_id).unwrap_err().kind,
        DbErrorKind::NotFound
    );
}

#[test]
fn test_delete_user_cascades_to_games() {
    let (_db, repo) = setup_test_db();
    let (user_id, _) = seed_sample(&repo);
    repo.delete_user(user_id).expect("Delete failed");
    assert!(repo.list_games().expect("List failed").is_empty());
    assert!(repo.list_users().expect("List failed").is_empty());
}

#[test]
fn test_deleted_category_makes_puzzle_unplayable() {
    let (_db, repo) = setup_test_db();
    let (_, game_id) = seed_sample(&repo);
    let detail = repo.game_detail(game_id).expect("Detail failed");
    repo.delete_category(detail.categories[1].id)
        .expect("Delete failed");

    let detail = repo.game_detail(game_id).expect("Detail failed");
    assert_eq!(detail.categories.len(), 3);
    assert_eq!(
        detail.to_puzzle().unwrap_err(),
        ConstructionError::CategoryCount { found: 3 }
    );
}

#[test]
fn test_stored_sample_builds_puzzle() {
    let (_db, repo) = setup_test_db();
    let (_, game_id) = seed_sample(&repo);
    let puzzle = repo
        .game_detail(game_id)
        .expect("Detail failed")
        .to_puzzle()
        .expect("Puzzle failed");
    assert_eq!(puzzle.title(), "Tech Terms");
    assert_eq!(puzzle.words().count(), 16);
    assert_eq!(puzzle.categories()[2].difficulty(), &Some(3));
}

#[test]
fn test_reset_clears_everything() {
    let (_db, repo) = setup_test_db();
    seed_sample(&repo);
    repo.reset().expect("Reset failed");
    assert!(repo.list_users().expect("List failed").is_empty());
    assert!(repo.list_games().expect("List failed").is_empty());
}

#[test]
fn test_run_migrations_is_idempotent() {
    let (_db, repo) = setup_test_db();
    repo.run_migrations().expect("Second run failed");
}

#[test]
fn test_service_get_or_create_reuses_user() {
    let (_db, repo) = setup_test_db();
    let service = PuzzleService::new(repo);
    let first = service.get_or_create_user("ada").expect("Create failed");
    let second = service.get_or_create_user(" ada ").expect("Lookup failed");
    assert_eq!(first.id(), second.id());
    assert_eq!(service.repository().list_users().expect("List failed").len(), 1);
}
