//! The same store contract exercised against the local and HTTP backends.

use std::sync::Arc;

use tempfile::NamedTempFile;

use connections::{
    NewPuzzle, PlayRecorded, PuzzleRepository, PuzzleService, PuzzleStore, RestPuzzleClient,
    Session, SessionStatus, create_router,
};

fn repository() -> (NamedTempFile, PuzzleRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let repo = PuzzleRepository::new(db_file.path().to_str().expect("Invalid path").to_string())
        .expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, repo)
}

/// Serves the router on an ephemeral port and returns a client for it.
async fn spawn_server(repo: PuzzleRepository) -> RestPuzzleClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Bind failed");
    let address = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, create_router(repo))
            .await
            .expect("Server failed");
    });
    RestPuzzleClient::new(&format!("http://{address}/"))
}

async fn exercise_store(store: Arc<dyn PuzzleStore>) {
    assert!(store.list_users().await.expect("List failed").is_empty());

    let user = store.sign_in("ada").await.expect("Sign in failed");
    let again = store.sign_in("ada").await.expect("Second sign in failed");
    assert_eq!(user.id(), again.id());
    assert_eq!(store.list_users().await.expect("List failed").len(), 1);

    let created = store
        .create_puzzle(&NewPuzzle::tech_terms(*user.id()))
        .await
        .expect("Create failed");
    let puzzles = store.list_puzzles().await.expect("List failed");
    assert_eq!(puzzles.len(), 1);
    assert_eq!(puzzles[0].creator_name, "ada");

    let puzzle = store.load_puzzle(created.id).await.expect("Load failed");
    assert_eq!(puzzle.title(), "Tech Terms");
    let session = Session::initialize(puzzle);
    assert_eq!(session.status(), SessionStatus::Playing);
    assert_eq!(session.pool().len(), 16);

    assert_eq!(
        store.record_play(*user.id(), created.id).await.expect("Play failed"),
        PlayRecorded::Inserted
    );
    assert_eq!(
        store.record_play(*user.id(), created.id).await.expect("Play failed"),
        PlayRecorded::Refreshed
    );

    assert!(store.load_puzzle(created.id + 100).await.is_err());
    assert!(store.record_play(*user.id(), created.id + 100).await.is_err());
}

#[tokio::test]
async fn local_service_fulfils_store_contract() {
    let (_db, repo) = repository();
    exercise_store(Arc::new(PuzzleService::new(repo))).await;
}

#[tokio::test]
async fn rest_client_fulfils_store_contract() {
    let (_db, repo) = repository();
    let client = spawn_server(repo).await;
    assert!(!client.base_url().ends_with('/'));
    exercise_store(Arc::new(client)).await;
}

#[tokio::test]
async fn rest_client_surfaces_validation_message() {
    let (_db, repo) = repository();
    let client = spawn_server(repo).await;
    let user = client.sign_in("ada").await.expect("Sign in failed");

    let mut puzzle = NewPuzzle::tech_terms(*user.id());
    puzzle.categories.truncate(3);
    let err = client.create_puzzle(&puzzle).await.unwrap_err();
    assert!(err.message.contains("exactly 4 categories"), "{err}");
}

#[tokio::test]
async fn damaged_puzzle_fails_to_load() {
    let (_db, repo) = repository();
    let service = PuzzleService::new(repo.clone());
    let user = service.sign_in("ada").await.expect("Sign in failed");
    let created = service
        .create_puzzle(&NewPuzzle::tech_terms(*user.id()))
        .await
        .expect("Create failed");

    let detail = repo.game_detail(created.id).expect("Detail failed");
    repo.delete_category(detail.categories[0].id)
        .expect("Delete failed");

    let err = service.load_puzzle(created.id).await.unwrap_err();
    assert!(err.message.contains("categories"), "{err}");
}
