mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{get, make_app, post_json, MemoryStore};

#[tokio::test]
async fn assignments_can_be_created_and_filtered() {
    let app = make_app(MemoryStore::new());

    for (id, class, section) in [("a1", "7", "B"), ("a2", "7", "C"), ("a3", "8", "B")] {
        let (status, json) = post_json(
            &app,
            "/api/assignments",
            json!({
                "id": id,
                "title": format!("Reading {}", id),
                "targetClass": class,
                "targetSection": section,
                "description": "Read chapter one"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["targetClass"], class);
    }

    let (status, json) = get(&app, "/api/assignments").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let (_, json) = get(&app, "/api/assignments?class=7&section=B").await;
    let filtered = json["data"].as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["id"], "a1");
}

#[tokio::test]
async fn duplicate_assignment_is_a_conflict() {
    let app = make_app(MemoryStore::new());
    let body = json!({ "id": "a1", "title": "Reading" });

    let (status, _) = post_json(&app, "/api/assignments", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = post_json(&app, "/api/assignments", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn assignment_requires_id() {
    let app = make_app(MemoryStore::new());

    let (status, json) = post_json(&app, "/api/assignments", json!({ "title": "Reading" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Missing required field: id");
}

#[tokio::test]
async fn progress_defaults_to_pending_and_filters_by_student() {
    let app = make_app(MemoryStore::new());

    let (status, json) = post_json(
        &app,
        "/api/progress",
        json!({ "assignmentId": "a1", "studentId": "s1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["bestScore"], 0);

    let (status, json) = post_json(
        &app,
        "/api/progress",
        json!({
            "assignmentId": "a1",
            "studentId": "s2",
            "status": "in-progress",
            "bestScore": 80,
            "timeSpent": 12
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["status"], "in-progress");

    let (_, json) = get(&app, "/api/progress?studentId=s2").await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["timeSpent"], 12);

    let (_, json) = get(&app, "/api/progress?assignmentId=a1").await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn progress_rejects_bad_input() {
    let app = make_app(MemoryStore::new());

    let (status, _) = post_json(
        &app,
        "/api/progress",
        json!({ "assignmentId": "a1", "studentId": "s1", "status": "abandoned" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app,
        "/api/progress",
        json!({ "assignmentId": "a1", "studentId": "s1", "bestScore": -5 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = post_json(&app, "/api/progress", json!({ "studentId": "s1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Missing required field: assignmentId");
}
