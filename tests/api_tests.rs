use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use flixdex::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.cache.timeout_seconds = 0;

    let state = flixdex::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    flixdex::api::router(state).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn sample_title() -> Value {
    json!({
        "netflix_show_id": "s100",
        "title_type": "movie",
        "title": "Paper Lanterns",
        "director": ["Rosa Vidal"],
        "cast_members": ["Ian Holt", "June Park"],
        "countries": ["spain"],
        "genres": ["dramas"],
        "netflix_date_added": "2021-09-24",
        "release_year": 2020,
        "rating": "TV MA",
        "duration": 104,
        "duration_units": "minutes",
        "description": "Two sisters reopen a lantern shop"
    })
}

async fn create_sample(app: &Router) -> i64 {
    let (status, body) = send(app, json_request("POST", "/api/titles", &sample_title())).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let (status, body) = send(&app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_create_and_get_title() {
    let app = spawn_app().await;

    let (status, body) = send(&app, json_request("POST", "/api/titles", &sample_title())).await;
    assert_eq!(status, StatusCode::CREATED);

    let data = &body["data"];
    assert_eq!(data["directors"], json!(["Rosa Vidal"]));
    assert_eq!(data["countries"], json!(["Spain"]));
    assert_eq!(data["genres"], json!(["Dramas"]));
    assert_eq!(data["rating"], "TV-MA");
    assert!(data.get("deleted").is_none());

    let id = data["id"].as_i64().unwrap();
    let (status, body) = send(&app, get(&format!("/api/titles/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Paper Lanterns");
}

#[tokio::test]
async fn test_list_titles_with_projection() {
    let app = spawn_app().await;
    create_sample(&app).await;

    let (status, body) = send(
        &app,
        get("/api/titles?include=title,release_year&genre=Dramas&release_year=geq:2020"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0],
        json!({ "title": "Paper Lanterns", "release_year": 2020 })
    );

    let (status, body) = send(&app, get("/api/titles?genre=Not%20A%20Genre")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = spawn_app().await;
    create_sample(&app).await;

    for uri in [
        "/api/titles?page=2",
        "/api/titles?page=18446744073709551615",
        "/api/titles?page=18446744073709551615&perpage=1000",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["data"], json!([]), "{uri}");
    }

    // Still serving afterwards
    let (status, _) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_list_titles_rejects_bad_parameters() {
    let app = spawn_app().await;

    for uri in [
        "/api/titles?page=0",
        "/api/titles?perpage=0",
        "/api/titles?perpage=5000",
        "/api/titles?search=a",
        "/api/titles?search=robert%27)%3B",
        "/api/titles?release_year=soon",
        "/api/titles?release_year=between:1990",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["success"], false, "{uri}");
    }
}

#[tokio::test]
async fn test_write_errors_are_unprocessable() {
    let app = spawn_app().await;

    let mut unknown_genre = sample_title();
    unknown_genre["genres"] = json!(["Space Westerns"]);
    let (status, body) = send(&app, json_request("POST", "/api/titles", &unknown_genre)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Space Westerns"));

    let mut half_duration = sample_title();
    half_duration["duration_units"] = Value::Null;
    let (status, _) = send(&app, json_request("POST", "/api/titles", &half_duration)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut blank_id = sample_title();
    blank_id["netflix_show_id"] = json!("  ");
    let (status, _) = send(&app, json_request("POST", "/api/titles", &blank_id)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_and_delete_title() {
    let app = spawn_app().await;
    let id = create_sample(&app).await;
    let uri = format!("/api/titles/{id}");

    let replacement = json!({
        "netflix_show_id": "s100",
        "title": "Paper Lanterns (Director's Cut)",
        "release_year": 2021
    });
    let (status, body) = send(&app, json_request("PUT", &uri, &replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["release_year"], 2021);
    assert_eq!(body["data"]["directors"], json!([]));
    assert!(body["data"]["rating"].is_null());

    let delete = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, delete).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["deleted"].is_string());

    let (status, _) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, json_request("PUT", &uri, &replacement)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_and_missing_ids() {
    let app = spawn_app().await;

    let (status, _) = send(&app, get("/api/titles/0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get("/api/titles/123456789")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_summary_and_cache_invalidation() {
    let app = spawn_app().await;
    create_sample(&app).await;

    let (status, body) = send(&app, get("/api/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title_count"], 1);
    assert_eq!(body["data"]["director_count"], 1);
    assert_eq!(body["data"]["cast_member_count"], 2);
    assert_eq!(body["data"]["movies"]["count"], 1);
    assert_eq!(body["data"]["movies"]["ratings"]["TV-MA"], 1);
    assert_eq!(body["data"]["shows"]["count"], 0);

    let invalidate = Request::builder()
        .method("POST")
        .uri("/api/cache/invalidate")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, invalidate).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let app = spawn_app().await;

    let response = app.clone().oneshot(get("/api/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
