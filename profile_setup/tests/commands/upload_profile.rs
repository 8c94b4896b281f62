use claims::{assert_matches, assert_ok_eq};
use fake::{faker::lorem::en::Sentence, Fake};
use profile_setup::{
    cli::{execute, Operation},
    domain::entities::point::PointId,
    use_cases::upload_profile::UploadProfileError,
};
use serde_json::json;

use crate::helpers::{spawn_store, spawn_store_with, FakeEmbeddingsService, TempFile};

fn profile_json(nb_blocks: u64) -> String {
    let blocks: Vec<_> = (1..=nb_blocks)
        .map(|id| {
            json!({
                "id": id,
                "text": Sentence(3..8).fake::<String>(),
                "category": "hobbies",
            })
        })
        .collect();
    serde_json::to_string(&blocks).unwrap()
}

#[tokio::test]
async fn uploading_a_profile_stores_one_point_per_block() {
    let app = spawn_store("nana");
    let file = TempFile::new(&profile_json(4));

    assert!(app.store.upload_profile(&file.path).await);

    let points = app.point_repository.points("nana_profile");
    assert_eq!(points.len(), 4);
    for point in &points {
        assert_eq!(point.vector.len(), 768);
        assert_eq!(point.payload.len(), 2);
        assert_eq!(point.payload["category"], "hobbies");
        assert!(point.payload["text"].is_string());
    }
    assert_eq!(app.embeddings_service.nb_calls(), 4);
}

#[tokio::test]
async fn uploading_a_profile_twice_overwrites_the_blocks() {
    let app = spawn_store("nana");
    let first = TempFile::new(r#"[{"id": 1, "text": "Likes hiking", "category": "hobbies"}]"#);
    let second = TempFile::new(r#"[{"id": 1, "text": "Likes climbing", "category": "hobbies"}]"#);

    assert!(app.store.upload_profile(&first.path).await);
    assert!(app.store.upload_profile(&second.path).await);

    let points = app.point_repository.points("nana_profile");
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].id, PointId::Num(1));
    assert_eq!(points[0].payload["text"], "Likes climbing");
}

#[tokio::test]
async fn blocks_with_string_ids_are_uploaded() {
    let app = spawn_store("alex");
    let file = TempFile::new(
        r#"[
            {"id": "8c3f4c6e-4f38-4a5e-9a4e-2b1f0f4f5a11", "text": "Works remotely", "category": "work"},
            {"id": "morning-routine", "text": "Walks every morning", "category": "health"}
        ]"#,
    );

    assert_ok_eq!(app.store.try_upload_profile(&file.path).await, 2);
    assert_eq!(app.point_repository.points("alex_profile").len(), 2);
}

#[tokio::test]
async fn an_empty_profile_creates_the_collection_without_points() {
    let app = spawn_store("nana");
    let file = TempFile::new("[]");

    assert!(app.store.upload_profile(&file.path).await);

    assert!(app.point_repository.collection_exists("nana_profile"));
    assert!(app.point_repository.points("nana_profile").is_empty());
    assert_eq!(app.embeddings_service.nb_calls(), 0);
}

#[tokio::test]
async fn an_invalid_json_file_fails_without_any_call() {
    let app = spawn_store("nana");
    let file = TempFile::new("{ not json");

    assert!(!app.store.upload_profile(&file.path).await);

    assert_eq!(app.point_repository.nb_calls(), 0);
    assert_eq!(app.embeddings_service.nb_calls(), 0);
}

#[tokio::test]
async fn a_block_without_text_fails_without_any_call() {
    let app = spawn_store("nana");
    let file = TempFile::new(r#"[{"id": 1, "category": "hobbies"}]"#);

    assert_matches!(
        app.store.try_upload_profile(&file.path).await,
        Err(UploadProfileError::ProfileBlocksError(_))
    );
    assert_eq!(app.point_repository.nb_calls(), 0);
}

#[tokio::test]
async fn a_missing_file_fails_without_any_call() {
    let app = spawn_store("nana");
    let file = TempFile::new("[]");
    let missing_path = file.path.with_extension("missing");

    assert!(!app.store.upload_profile(&missing_path).await);

    assert_eq!(app.point_repository.nb_calls(), 0);
}

#[tokio::test]
async fn an_embeddings_failure_saves_no_block() {
    let app = spawn_store_with("nana", FakeEmbeddingsService::failing());
    let file = TempFile::new(&profile_json(3));

    assert_matches!(
        app.store.try_upload_profile(&file.path).await,
        Err(UploadProfileError::EmbedTextError(_))
    );
    assert!(app.point_repository.points("nana_profile").is_empty());
}

#[tokio::test]
async fn the_upload_command_succeeds_on_a_valid_profile() {
    let app = spawn_store("nana");
    let file = TempFile::new(&profile_json(2));

    let success = execute(
        &Operation::UploadProfile {
            json_file: file.path.clone(),
        },
        &app.store,
    )
    .await;

    assert!(success);
    assert_eq!(app.point_repository.points("nana_profile").len(), 2);
}
