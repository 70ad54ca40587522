use std::sync::Arc;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Duration, Utc};
use fake::{faker::lorem::en::Sentence, Fake};
use fitcoach_api::config::SchedulingConfig;
use fitcoach_core::models::event::CalendarEvent;
use fitcoach_db::{mock::repositories::MockEventStore, InMemoryDraftStore};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

use crate::test_utils::{build_app, send, Caller, TestContext};

fn event_body(title: &str, start: &str, end: &str) -> Value {
    json!({
        "title": title,
        "description": null,
        "start_time": start,
        "end_time": end,
        "client_id": null,
        "event_type": "session",
        "check_in_id": null
    })
}

fn recurring_body(title: &str, pattern: &str, count: u32, confirm: bool) -> Value {
    let mut body = event_body(title, "2024-01-01T09:00:00Z", "2024-01-01T10:00:00Z");
    body["recurrence"] = json!({ "pattern": pattern, "interval": 1, "count": count });
    body["confirm"] = json!(confirm);
    body
}

fn created_starts(body: &Value) -> Vec<DateTime<Utc>> {
    let created: Vec<CalendarEvent> = serde_json::from_value(body["created"].clone()).unwrap();
    created.iter().map(|e| e.start_time).collect()
}

#[tokio::test]
async fn test_create_single_event() {
    let ctx = TestContext::new();
    let coach = Caller::coach();
    let title: String = Sentence(2..4).fake();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/calendar/events",
            Some(coach),
            Some(event_body(&title, "2024-03-04T09:00:00Z", "2024-03-04T10:00:00Z")),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["skipped_duplicates"], 0);
    assert_eq!(body["created"][0]["title"], json!(title));
    assert_eq!(body["created"][0]["coach_id"], json!(coach.user_id));
    assert_eq!(ctx.events.len().await, 1);
}

#[tokio::test]
async fn test_weekly_series_is_expanded() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/calendar/events",
            Some(Caller::coach()),
            Some(recurring_body("Strength block", "weekly", 4, false)),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let starts = created_starts(&body);
    let expected: Vec<DateTime<Utc>> = ["2024-01-01", "2024-01-08", "2024-01-15", "2024-01-22"]
        .iter()
        .map(|d| format!("{}T09:00:00Z", d).parse().unwrap())
        .collect();
    assert_eq!(starts, expected);
}

#[tokio::test]
async fn test_resubmitted_series_is_skipped() {
    let ctx = TestContext::new();
    let coach = Caller::coach();
    let body = recurring_body("Mobility", "daily", 5, false);

    let (status, _) = ctx
        .send(Method::POST, "/api/calendar/events", Some(coach), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, second) = ctx
        .send(Method::POST, "/api/calendar/events", Some(coach), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["created"], json!([]));
    assert_eq!(second["skipped_duplicates"], 5);
    assert_eq!(ctx.events.len().await, 5);
}

#[tokio::test]
async fn test_same_series_for_another_coach_is_not_a_duplicate() {
    let ctx = TestContext::new();
    let body = recurring_body("Mobility", "daily", 3, false);

    ctx.send(Method::POST, "/api/calendar/events", Some(Caller::coach()), Some(body.clone()))
        .await;
    let (_, second) = ctx
        .send(Method::POST, "/api/calendar/events", Some(Caller::coach()), Some(body))
        .await;

    assert_eq!(second["skipped_duplicates"], 0);
    assert_eq!(ctx.events.len().await, 6);
}

#[rstest]
#[case(52, false, StatusCode::CREATED)]
#[case(53, false, StatusCode::CONFLICT)]
#[case(53, true, StatusCode::CREATED)]
#[tokio::test]
async fn test_large_series_needs_confirmation(
    #[case] count: u32,
    #[case] confirm: bool,
    #[case] expected: StatusCode,
) {
    let ctx = TestContext::new();

    let (status, _) = ctx
        .send(
            Method::POST,
            "/api/calendar/events",
            Some(Caller::coach()),
            Some(recurring_body("Weekly review", "weekly", count, confirm)),
        )
        .await;

    assert_eq!(status, expected);
    let stored = if expected == StatusCode::CREATED { count as usize } else { 0 };
    assert_eq!(ctx.events.len().await, stored);
}

#[tokio::test]
async fn test_year_long_series_is_evenly_spaced() {
    let ctx = TestContext::new();

    let (_, body) = ctx
        .send(
            Method::POST,
            "/api/calendar/events",
            Some(Caller::coach()),
            Some(recurring_body("Weekly review", "weekly", 52, false)),
        )
        .await;

    let starts = created_starts(&body);
    assert_eq!(starts.len(), 52);
    assert!(starts.windows(2).all(|w| w[1] - w[0] == Duration::weeks(1)));
}

#[tokio::test]
async fn test_confirmation_threshold_comes_from_config() {
    let ctx = TestContext::with_scheduling(SchedulingConfig {
        recurrence_confirm_threshold: 3,
        ..SchedulingConfig::default()
    });

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/calendar/events",
            Some(Caller::coach()),
            Some(recurring_body("Check-in", "weekly", 4, false)),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Confirmation required"));
}

#[rstest]
#[case(10, StatusCode::CREATED)]
#[case(11, StatusCode::BAD_REQUEST)]
#[case(4_000_000_000, StatusCode::BAD_REQUEST)]
#[tokio::test]
async fn test_confirmed_series_is_still_capped(#[case] count: u32, #[case] expected: StatusCode) {
    let ctx = TestContext::with_scheduling(SchedulingConfig {
        recurrence_confirm_threshold: 3,
        max_recurrence_count: 10,
        ..SchedulingConfig::default()
    });

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/calendar/events",
            Some(Caller::coach()),
            Some(recurring_body("Daily mobility", "daily", count, true)),
        )
        .await;

    assert_eq!(status, expected);
    if expected == StatusCode::BAD_REQUEST {
        assert!(body["error"].as_str().unwrap().contains("at most 10"));
        assert_eq!(ctx.events.len().await, 0);
    }
}

#[tokio::test]
async fn test_oversized_interval_is_rejected() {
    let ctx = TestContext::new();
    let mut body = recurring_body("Quarterly review", "monthly", 2, false);
    body["recurrence"]["interval"] = json!(3_000_000_000u32);

    let (status, body) = ctx
        .send(Method::POST, "/api/calendar/events", Some(Caller::coach()), Some(body))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("at most"));
    assert_eq!(ctx.events.len().await, 0);
}

#[tokio::test]
async fn test_monthly_series_in_session_time_zone() {
    let ctx = TestContext::new();
    let mut body = event_body("Monthly review", "2024-01-31T17:00:00Z", "2024-01-31T18:00:00Z");
    body["recurrence"] = json!({ "pattern": "monthly", "count": 3 });

    // 18:00 Berlin time each month; summer time starts on Mar 31, so that
    // occurrence is 16:00 UTC.
    let (status, created) = ctx
        .send_in_zone(Method::POST, "/api/calendar/events", Caller::coach(), "Europe/Berlin", Some(body))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let starts = created_starts(&created);
    let expected: Vec<DateTime<Utc>> = ["2024-01-31T17:00:00Z", "2024-02-29T17:00:00Z", "2024-03-31T16:00:00Z"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    assert_eq!(starts, expected);
}

#[rstest]
#[case("2024-03-04T09:00:00Z", "2024-03-04T09:10:00Z")]
#[case("2024-03-04T09:00:00Z", "2024-03-05T09:30:00Z")]
#[case("2024-03-04T09:00:00Z", "2024-03-04T08:00:00Z")]
#[tokio::test]
async fn test_invalid_duration_is_rejected(#[case] start: &str, #[case] end: &str) {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/calendar/events",
            Some(Caller::coach()),
            Some(event_body("Too odd", start, end)),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Validation error"));
    assert!(ctx.events.is_empty().await);
}

#[tokio::test]
async fn test_clients_cannot_create_events() {
    let ctx = TestContext::new();

    let (status, _) = ctx
        .send(
            Method::POST,
            "/api/calendar/events",
            Some(Caller::client()),
            Some(event_body("Sneaky", "2024-03-04T09:00:00Z", "2024-03-04T10:00:00Z")),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_layout_places_overlapping_events_side_by_side() {
    let ctx = TestContext::new();
    let coach = Caller::coach();
    for (title, start, end) in [
        ("A", "2024-03-04T09:00:00Z", "2024-03-04T10:30:00Z"),
        ("B", "2024-03-04T09:15:00Z", "2024-03-04T10:15:00Z"),
        ("C", "2024-03-04T09:30:00Z", "2024-03-04T10:00:00Z"),
        ("D", "2024-03-04T14:00:00Z", "2024-03-04T15:00:00Z"),
        ("E", "2024-03-05T09:00:00Z", "2024-03-05T10:00:00Z"),
    ] {
        ctx.send(Method::POST, "/api/calendar/events", Some(coach), Some(event_body(title, start, end)))
            .await;
    }

    let (status, body) = ctx
        .send(
            Method::GET,
            "/api/calendar/layout?from=2024-03-04T00:00:00Z&to=2024-03-11T00:00:00Z",
            Some(coach),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timezone"], "UTC");
    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["date"], "2024-03-04");

    let placed: Vec<(String, u64, u64, bool)> = days[0]["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| {
            (
                p["event"]["title"].as_str().unwrap().to_string(),
                p["column"].as_u64().unwrap(),
                p["total_columns"].as_u64().unwrap(),
                p["has_conflict"].as_bool().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        placed,
        vec![
            ("A".to_string(), 0, 3, true),
            ("B".to_string(), 1, 3, true),
            ("C".to_string(), 2, 3, true),
            ("D".to_string(), 0, 1, false),
        ]
    );
}

#[tokio::test]
async fn test_layout_window_must_be_valid() {
    let ctx = TestContext::new();

    let (status, _) = ctx
        .send(
            Method::GET,
            "/api/calendar/layout?from=2024-03-11T00:00:00Z&to=2024-03-04T00:00:00Z",
            Some(Caller::coach()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .send(
            Method::GET,
            "/api/calendar/layout?from=2024-03-04T00:00:00Z&to=2024-03-11T00:00:00Z&tz=Mars/Olympus",
            Some(Caller::coach()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_client_sees_only_their_events() {
    let ctx = TestContext::new();
    let coach = Caller::coach();
    let client = Caller::client();

    let mut body = event_body("Assessment", "2024-03-04T09:00:00Z", "2024-03-04T10:00:00Z");
    body["client_id"] = json!(client.user_id);
    let (_, created) = ctx
        .send(Method::POST, "/api/calendar/events", Some(coach), Some(body))
        .await;
    ctx.send(
        Method::POST,
        "/api/calendar/events",
        Some(coach),
        Some(event_body("Admin", "2024-03-04T12:00:00Z", "2024-03-04T13:00:00Z")),
    )
    .await;

    let (status, events) = ctx
        .send(Method::GET, "/api/calendar/events", Some(client), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.as_array().unwrap().len(), 1);
    assert_eq!(events[0]["title"], "Assessment");

    let id = created["created"][0]["id"].as_str().unwrap().to_string();
    let (status, _) = ctx
        .send(Method::GET, &format!("/api/calendar/events/{}", id), Some(client), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .send(
            Method::PUT,
            &format!("/api/calendar/events/{}", id),
            Some(client),
            Some(json!({ "title": "Renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_and_delete_event() {
    let ctx = TestContext::new();
    let coach = Caller::coach();
    let (_, created) = ctx
        .send(
            Method::POST,
            "/api/calendar/events",
            Some(coach),
            Some(event_body("Intro call", "2024-03-04T09:00:00Z", "2024-03-04T09:30:00Z")),
        )
        .await;
    let uri = format!("/api/calendar/events/{}", created["created"][0]["id"].as_str().unwrap());

    let (status, updated) = ctx
        .send(
            Method::PUT,
            &uri,
            Some(coach),
            Some(json!({ "title": "Intro consultation", "event_type": "consultation" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Intro consultation");
    assert_eq!(updated["event_type"], "consultation");

    let (status, _) = ctx
        .send(Method::PUT, &uri, Some(Caller::coach()), Some(json!({ "title": "Mine now" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .send(
            Method::PUT,
            &uri,
            Some(coach),
            Some(json!({ "end_time": "2024-03-04T09:05:00Z" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx.send(Method::DELETE, &uri, Some(coach), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx.send(Method::GET, &uri, Some(coach), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_store_failure_surfaces_as_server_error() {
    let mut store = MockEventStore::new();
    store.expect_filter().returning(|_| Ok(Vec::new()));
    store
        .expect_bulk_create()
        .times(1)
        .returning(|_| Err(eyre::eyre!("connection reset by peer")));

    let app = build_app(
        Arc::new(store),
        Arc::new(InMemoryDraftStore::new()),
        SchedulingConfig::default(),
    );

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/calendar/events",
        Some(Caller::coach()),
        None,
        Some(recurring_body("Leg day", "weekly", 2, false)),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Database error"));
}
