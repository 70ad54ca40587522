use std::sync::Arc;

use axum::http::{Method, StatusCode};
use fitcoach_api::config::SchedulingConfig;
use fitcoach_core::models::draft::WorkoutDraft;
use fitcoach_db::{mock::repositories::MockDraftStore, DraftStore, InMemoryEventStore};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{build_app, send, Caller, TestContext};

#[tokio::test]
async fn test_draft_autosave_cycle() {
    let ctx = TestContext::new();
    let client = Caller::client();
    let workout_id = Uuid::new_v4();
    let uri = format!("/api/drafts/workouts/{}", workout_id);

    let (status, _) = ctx.send(Method::GET, &uri, Some(client), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, saved) = ctx
        .send(
            Method::PUT,
            &uri,
            Some(client),
            Some(json!({
                "exercises": [{
                    "name": "Deadlift",
                    "sets": [
                        { "reps": 5, "weight": 140.0, "completed": true },
                        { "reps": 5, "weight": 140.0 }
                    ]
                }],
                "notes": "grip slipping on last set"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["client_id"], json!(client.user_id));

    let (status, loaded) = ctx.send(Method::GET, &uri, Some(client), None).await;
    assert_eq!(status, StatusCode::OK);
    let draft: WorkoutDraft = serde_json::from_value(loaded).unwrap();
    assert_eq!(draft.workout_id, workout_id);
    assert_eq!(draft.completed_sets(), 1);
    assert_eq!(draft.notes.as_deref(), Some("grip slipping on last set"));

    let stored = ctx
        .drafts
        .load(&WorkoutDraft::storage_key(client.user_id, workout_id))
        .await
        .unwrap();
    assert!(stored.is_some());

    let (status, _) = ctx.send(Method::DELETE, &uri, Some(client), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx.send(Method::DELETE, &uri, Some(client), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_drafts_are_scoped_to_their_owner() {
    let ctx = TestContext::new();
    let owner = Caller::client();
    let uri = format!("/api/drafts/workouts/{}", Uuid::new_v4());

    ctx.send(Method::PUT, &uri, Some(owner), Some(json!({ "notes": "day one" })))
        .await;

    let (status, _) = ctx.send(Method::GET, &uri, Some(Caller::client()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_draft_store_failure_surfaces_as_server_error() {
    let client = Caller::client();
    let workout_id = Uuid::new_v4();
    let expected_key = WorkoutDraft::storage_key(client.user_id, workout_id);

    let mut drafts = MockDraftStore::new();
    drafts
        .expect_save()
        .withf(move |key, value| key.to_string() == expected_key && value["exercises"].is_array())
        .times(1)
        .returning(|_, _| Err(eyre::eyre!("disk quota exceeded")));

    let app = build_app(
        Arc::new(InMemoryEventStore::new()),
        Arc::new(drafts),
        SchedulingConfig::default(),
    );

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/drafts/workouts/{}", workout_id),
        Some(client),
        None,
        Some(json!({ "exercises": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Database error"));
}
