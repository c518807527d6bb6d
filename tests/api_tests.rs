use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use tagrec_api::{
    repository::MemoryStore,
    routes::{create_router, AppState},
};

const USER_ID: HeaderName = HeaderName::from_static("x-user-id");
const USER_ROLE: HeaderName = HeaderName::from_static("x-user-role");

fn create_test_server() -> TestServer {
    let state = AppState::from_store(MemoryStore::new());
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

/// Adds tags as an admin and returns their IDs in the given order
async fn add_tags(server: &TestServer, tags: &[&str]) -> Vec<i64> {
    let response = server
        .post("/api/v1/admin/tags")
        .add_header(USER_ID, HeaderValue::from_static("1"))
        .add_header(USER_ROLE, HeaderValue::from_static("admin"))
        .json(&json!({ "tags": tags }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let records: Vec<Value> = response.json();
    records.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

/// Registers a video as an admin and returns its ID
async fn register_video(server: &TestServer, title: &str, tags: &[&str]) -> i64 {
    let response = server
        .post("/api/v1/admin/videos")
        .add_header(USER_ID, HeaderValue::from_static("1"))
        .add_header(USER_ROLE, HeaderValue::from_static("admin"))
        .json(&json!({
            "user_id": 50,
            "title": title,
            "description": format!("{} description", title),
            "url": format!("https://cdn.example.com/{}.mp4", title),
            "tags": tags
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let video: Value = response.json();
    video["id"].as_i64().unwrap()
}

async fn select_interests(server: &TestServer, user: &'static str, tag_ids: &[i64]) {
    server
        .put("/api/v1/interests")
        .add_header(USER_ID, HeaderValue::from_static(user))
        .json(&json!({ "tag_ids": tag_ids }))
        .await
        .assert_status_ok();
}

async fn recommendation_ids(
    server: &TestServer,
    user: &'static str,
    page: Option<&str>,
    limit: Option<&str>,
) -> Vec<i64> {
    let mut request = server
        .get("/api/v1/recommendations")
        .add_header(USER_ID, HeaderValue::from_static(user));
    if let Some(page) = page {
        request = request.add_query_param("page", page);
    }
    if let Some(limit) = limit {
        request = request.add_query_param("limit", limit);
    }

    let response = request.await;
    response.assert_status_ok();
    let videos: Vec<Value> = response.json();
    videos.iter().map(|v| v["id"].as_i64().unwrap()).collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let id = "3f1c1f9e-6c1a-4d53-9a8e-1f2b3c4d5e6f";

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(id),
        )
        .await;

    assert_eq!(response.headers().get("x-request-id").unwrap(), id);
}

#[tokio::test]
async fn test_recommendations_require_identity() {
    let server = create_test_server();

    let response = server.get("/api/v1/recommendations").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/v1/recommendations")
        .add_header(USER_ID, HeaderValue::from_static("not-a-number"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/admin/tags")
        .add_header(USER_ID, HeaderValue::from_static("5"))
        .json(&json!({ "tags": ["cats"] }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_without_interests_gets_empty_list() {
    let server = create_test_server();
    register_video(&server, "cats", &["cats"]).await;

    let ids = recommendation_ids(&server, "7", None, None).await;
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_recommendation_flow_ranks_by_tag_overlap() {
    let server = create_test_server();
    let tag_ids = add_tags(&server, &["cats", "dogs", "baking"]).await;

    let single = register_video(&server, "single", &["cat"]).await;
    let double = register_video(&server, "double", &["cat", "catt"]).await;
    register_video(&server, "unrelated", &["baking"]).await;

    select_interests(&server, "7", &tag_ids[..2]).await;

    let response = server
        .get("/api/v1/recommendations")
        .add_header(USER_ID, HeaderValue::from_static("7"))
        .await;
    response.assert_status_ok();

    let videos: Vec<Value> = response.json();
    let ids: Vec<i64> = videos.iter().map(|v| v["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![double, single]);

    assert_eq!(videos[0]["title"], "double");
    assert_eq!(videos[0]["user_id"], 50);
    assert_eq!(videos[0]["url"], "https://cdn.example.com/double.mp4");
    assert!(videos[0].get("created_at").is_none());
}

#[tokio::test]
async fn test_tags_are_stored_with_their_whitespace() {
    let server = create_test_server();
    let tag_ids = add_tags(&server, &["music"]).await;

    let padded = register_video(&server, "padded", &["   music"]).await;
    let exact = register_video(&server, "exact", &["music"]).await;
    select_interests(&server, "5", &tag_ids).await;

    // "   music" is three edits away from "music"
    let ids = recommendation_ids(&server, "5", None, None).await;
    assert_eq!(ids, vec![exact]);
    assert!(!ids.contains(&padded));
}

#[tokio::test]
async fn test_interests_round_trip() {
    let server = create_test_server();
    let tag_ids = add_tags(&server, &["music", "travel"]).await;

    select_interests(&server, "3", &tag_ids).await;
    select_interests(&server, "3", &tag_ids[1..]).await;

    let response = server
        .get("/api/v1/interests")
        .add_header(USER_ID, HeaderValue::from_static("3"))
        .await;
    response.assert_status_ok();
    let tags: Vec<String> = response.json();
    assert_eq!(tags, vec!["travel".to_string()]);
}

#[tokio::test]
async fn test_selecting_unknown_tag_is_not_found() {
    let server = create_test_server();

    let response = server
        .put("/api/v1/interests")
        .add_header(USER_ID, HeaderValue::from_static("3"))
        .json(&json!({ "tag_ids": [999] }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pagination_pages_are_consistent() {
    let server = create_test_server();
    let tag_ids = add_tags(&server, &["game"]).await;

    for i in 0..12 {
        let tags: &[&str] = if i % 3 == 0 { &["game", "gamer"] } else { &["gam"] };
        register_video(&server, &format!("video{}", i), tags).await;
    }
    register_video(&server, "other", &["gaming"]).await;
    select_interests(&server, "9", &tag_ids).await;

    let page1 = recommendation_ids(&server, "9", Some("1"), Some("5")).await;
    let page2 = recommendation_ids(&server, "9", Some("2"), Some("5")).await;
    let first_ten = recommendation_ids(&server, "9", Some("1"), Some("10")).await;

    assert_eq!(page1.len(), 5);
    assert_eq!([page1, page2].concat(), first_ten);

    let page3 = recommendation_ids(&server, "9", Some("3"), Some("5")).await;
    assert_eq!(page3.len(), 2);

    let beyond = recommendation_ids(&server, "9", Some("4"), Some("5")).await;
    assert!(beyond.is_empty());
}

#[tokio::test]
async fn test_invalid_paging_falls_back_to_defaults() {
    let server = create_test_server();
    let tag_ids = add_tags(&server, &["news"]).await;
    for i in 0..12 {
        register_video(&server, &format!("news{}", i), &["news"]).await;
    }
    select_interests(&server, "4", &tag_ids).await;

    let ids = recommendation_ids(&server, "4", Some("-1"), Some("abc")).await;
    assert_eq!(ids.len(), 10);
    assert_eq!(ids, recommendation_ids(&server, "4", None, None).await);
}

#[tokio::test]
async fn test_deleted_video_leaves_recommendations() {
    let server = create_test_server();
    let tag_ids = add_tags(&server, &["chess"]).await;
    let video = register_video(&server, "openings", &["chess"]).await;
    select_interests(&server, "2", &tag_ids).await;

    assert_eq!(recommendation_ids(&server, "2", None, None).await, vec![video]);

    server
        .delete(&format!("/api/v1/admin/videos/{}", video))
        .add_header(USER_ID, HeaderValue::from_static("1"))
        .add_header(USER_ROLE, HeaderValue::from_static("admin"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(recommendation_ids(&server, "2", None, None).await.is_empty());

    server
        .delete(&format!("/api/v1/admin/videos/{}", video))
        .add_header(USER_ID, HeaderValue::from_static("1"))
        .add_header(USER_ROLE, HeaderValue::from_static("admin"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_tag_drops_out_of_interests() {
    let server = create_test_server();
    let tag_ids = add_tags(&server, &["art", "film"]).await;
    select_interests(&server, "6", &tag_ids).await;

    server
        .delete(&format!("/api/v1/admin/tags/{}", tag_ids[0]))
        .add_header(USER_ID, HeaderValue::from_static("1"))
        .add_header(USER_ROLE, HeaderValue::from_static("admin"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = server
        .get("/api/v1/tags")
        .add_header(USER_ID, HeaderValue::from_static("6"))
        .await;
    let tags: Vec<Value> = response.json();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0]["tag"], "film");

    let response = server
        .get("/api/v1/interests")
        .add_header(USER_ID, HeaderValue::from_static("6"))
        .await;
    let interests: Vec<String> = response.json();
    assert_eq!(interests, vec!["film".to_string()]);
}
