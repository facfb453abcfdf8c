//! HTTP-level tests for login and the admin routes.

mod common;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use common::{
    body_json, build_test_app, delete_auth, get, get_auth, post_json, post_json_auth,
    put_json_auth, send, TestApp, TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD,
};
use hearts_api::auth::jwt::generate_access_token;
use serde_json::json;

async fn create_artwork(app: &TestApp, token: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app.app(), "/api/v1/admin/artworks", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn upload(app: &TestApp, token: &str, uri: &str, file_name: &str) -> axum::response::Response {
    let boundary = "hearts-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
         Content-Type: image/webp\r\n\r\n\
         fake-image-bytes\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::post(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app.app(), request).await
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_routes_require_a_token() {
    let app = build_test_app();

    let response = get(app.app(), "/api/v1/admin/dashboard").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.app(), "/api/v1/admin/dashboard", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_admin_role_is_forbidden() {
    let app = build_test_app();
    let token = generate_access_token("visitor@example.com", "viewer", &app.state.config.jwt).unwrap();

    let response = get_auth(app.app(), "/api/v1/admin/artworks", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn login_issues_a_working_admin_token() {
    let app = build_test_app();
    let body = json!({"email": TEST_ADMIN_EMAIL, "password": TEST_ADMIN_PASSWORD});

    let response = post_json(app.app(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], TEST_ADMIN_EMAIL);
    assert_eq!(json["user"]["role"], "admin");
    assert_eq!(json["expires_in"], 3600);

    let token = json["access_token"].as_str().unwrap();
    let response = get_auth(app.app(), "/api/v1/admin/dashboard", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_rejects_wrong_password_and_other_addresses() {
    let app = build_test_app();

    let wrong_password = json!({"email": TEST_ADMIN_EMAIL, "password": "guess"});
    let response = post_json(app.app(), "/api/v1/auth/login", wrong_password).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let other_case = json!({"email": TEST_ADMIN_EMAIL.to_uppercase(), "password": TEST_ADMIN_PASSWORD});
    let response = post_json(app.app(), "/api/v1/auth/login", other_case).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Artworks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_artwork_is_public_immediately() {
    let app = build_test_app();
    let token = app.admin_token();

    let artwork = create_artwork(&app, &token, json!({"title": "Quiet Lotus", "medium": "Acrylic"})).await;
    assert_eq!(artwork["slug"], "quiet-lotus");
    assert_eq!(artwork["published"], true);
    assert_eq!(artwork["isAvailable"], true);
    assert!(artwork["id"].is_string());

    let response = get(app.app(), "/api/v1/artworks/quiet-lotus").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], artwork["id"]);
}

#[tokio::test]
async fn invalid_artwork_is_rejected_before_writing() {
    let app = build_test_app();
    let token = app.admin_token();

    let response = post_json_auth(
        app.app(),
        "/api/v1/admin/artworks",
        json!({"title": "No medium", "medium": ""}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(app.store.write_count(), 0);
}

#[tokio::test]
async fn update_and_delete_round_through_the_cache() {
    let app = build_test_app();
    let token = app.admin_token();
    let artwork = create_artwork(&app, &token, json!({"title": "Quiet Lotus", "medium": "Acrylic"})).await;
    let id = artwork["id"].as_str().unwrap();

    let response = put_json_auth(
        app.app(),
        &format!("/api/v1/admin/artworks/{id}"),
        json!({"price": "On request"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["price"], "On request");
    assert_eq!(json["data"]["title"], "Quiet Lotus");
    assert!(json["data"]["updatedAt"].is_string());

    let response = delete_auth(app.app(), &format!("/api/v1/admin/artworks/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.app(), "/api/v1/artworks/quiet-lotus").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.app(), &format!("/api/v1/admin/artworks/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_of_unknown_artwork_is_not_found() {
    let app = build_test_app();
    let token = app.admin_token();

    let response = put_json_auth(
        app.app(),
        "/api/v1/admin/artworks/missing",
        json!({"title": "Anything"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn toggles_flip_flags_for_public_views() {
    let app = build_test_app();
    let token = app.admin_token();
    let artwork = create_artwork(&app, &token, json!({"title": "Nandi painting", "medium": "Acrylic"})).await;
    let id = artwork["id"].as_str().unwrap();

    let uri = format!("/api/v1/admin/artworks/{id}/toggle-available");
    let json = body_json(post_json_auth(app.app(), &uri, json!({}), &token).await).await;
    assert_eq!(json["data"]["isAvailable"], false);
    let works = body_json(get(app.app(), "/api/v1/available-works").await).await;
    assert_eq!(works["data"], json!([]));

    let uri = format!("/api/v1/admin/artworks/{id}/toggle-published");
    let json = body_json(post_json_auth(app.app(), &uri, json!({}), &token).await).await;
    assert_eq!(json["data"]["published"], false);
    let list = body_json(get(app.app(), "/api/v1/artworks").await).await;
    assert_eq!(list["data"], json!([]));
}

#[tokio::test]
async fn failed_toggle_rolls_back_shared_state() {
    let app = build_test_app();
    let token = app.admin_token();
    let artwork = create_artwork(&app, &token, json!({"title": "Nandi painting", "medium": "Acrylic"})).await;
    let id = artwork["id"].as_str().unwrap();
    assert!(app.provider().snapshot().artworks[0].published);

    app.store.fail_next(1);
    let uri = format!("/api/v1/admin/artworks/{id}/toggle-published");
    let response = post_json_auth(app.app(), &uri, json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    assert!(app.provider().snapshot().artworks[0].published);
    let public = get(app.app(), "/api/v1/artworks/nandi-painting").await;
    assert_eq!(public.status(), StatusCode::OK);
}

#[tokio::test]
async fn delete_all_empties_collection() {
    let app = build_test_app();
    let token = app.admin_token();
    create_artwork(&app, &token, json!({"title": "One", "medium": "Oil"})).await;
    create_artwork(&app, &token, json!({"title": "Two", "medium": "Oil"})).await;

    let response = delete_auth(app.app(), "/api/v1/admin/artworks", &token).await;
    assert_eq!(body_json(response).await["data"]["deleted"], 2);

    let list = body_json(get(app.app(), "/api/v1/artworks").await).await;
    assert_eq!(list["notice"], "No artworks yet");
}

#[tokio::test]
async fn refresh_bypasses_the_cache() {
    let app = build_test_app();
    let token = app.admin_token();
    create_artwork(&app, &token, json!({"title": "One", "medium": "Oil"})).await;
    let reads = app.store.read_count();

    let response = post_json_auth(app.app(), "/api/v1/admin/artworks/refresh", json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
    assert_eq!(app.store.read_count(), reads + 1);
}

#[tokio::test(start_paused = true)]
async fn slow_store_times_out_with_gateway_timeout() {
    let app = build_test_app();
    let token = app.admin_token();
    app.store.set_latency(Some(std::time::Duration::from_secs(9)));

    let response = get_auth(app.app(), "/api/v1/admin/dashboard", &token).await;
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body_json(response).await["code"], "TIMEOUT");
}

// ---------------------------------------------------------------------------
// Blogs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blog_drafts_publish_via_toggle() {
    let app = build_test_app();
    let token = app.admin_token();

    let response = post_json_auth(
        app.app(),
        "/api/v1/admin/blogs",
        json!({"title": "Colours of Vastu", "excerpt": "Which colours suit which walls", "tags": [" vastu ", "colour"]}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let blog = body_json(response).await["data"].clone();
    assert_eq!(blog["published"], false);
    assert_eq!(blog["tags"], json!(["vastu", "colour"]));
    let id = blog["id"].as_str().unwrap();

    let response = get(app.app(), "/api/v1/blogs/colours-of-vastu").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let uri = format!("/api/v1/admin/blogs/{id}/toggle-published");
    let json = body_json(post_json_auth(app.app(), &uri, json!({}), &token).await).await;
    assert_eq!(json["data"]["published"], true);

    let response = get(app.app(), "/api/v1/blogs/colours-of-vastu").await;
    assert_eq!(response.status(), StatusCode::OK);

    let admin_list = body_json(get_auth(app.app(), "/api/v1/admin/blogs", &token).await).await;
    assert_eq!(admin_list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn blog_requires_excerpt() {
    let app = build_test_app();
    let token = app.admin_token();

    let response = post_json_auth(
        app.app(),
        "/api/v1/admin/blogs",
        json!({"title": "No excerpt", "excerpt": ""}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seed_reports_status_and_is_idempotent() {
    let app = build_test_app();
    let token = app.admin_token();

    let status = body_json(get_auth(app.app(), "/api/v1/admin/seed", &token).await).await;
    let statuses: Vec<_> = status["data"].as_array().unwrap().iter().map(|i| i["status"].clone()).collect();
    assert_eq!(statuses, [json!("pending"), json!("pending"), json!("pending")]);

    let report = body_json(post_json_auth(app.app(), "/api/v1/admin/seed", json!({}), &token).await).await;
    assert_eq!(report["data"]["items"][0]["slug"], "a-moment-between-worlds");
    assert_eq!(report["data"]["items"][2]["status"], "seeded");
    assert_eq!(app.store.len("artworks").await, 3);

    let report = body_json(post_json_auth(app.app(), "/api/v1/admin/seed", json!({}), &token).await).await;
    assert_eq!(report["data"]["items"][0]["status"], "exists");
    assert_eq!(app.store.len("artworks").await, 3);

    let report = body_json(
        post_json_auth(app.app(), "/api/v1/admin/seed", json!({"overwrite": true}), &token).await,
    )
    .await;
    assert_eq!(report["data"]["items"][1]["status"], "updated");
    assert_eq!(app.store.len("artworks").await, 3);

    let collections = body_json(get(app.app(), "/api/v1/collections").await).await;
    assert_eq!(collections["data"].as_array().unwrap().len(), 3);

    let cleared = body_json(delete_auth(app.app(), "/api/v1/admin/seed", &token).await).await;
    assert_eq!(cleared["data"]["deleted"], 3);
    assert_eq!(app.store.len("artworks").await, 0);
}

// ---------------------------------------------------------------------------
// Images, dashboard, cache
// ---------------------------------------------------------------------------

#[tokio::test]
async fn uploaded_image_is_removed_with_its_artwork() {
    let app = build_test_app();
    let token = app.admin_token();

    let response = upload(&app, &token, "/api/v1/admin/images?folder=artworks", "nandi art.webp").await;
    assert_eq!(response.status(), StatusCode::OK);
    let url = body_json(response).await["data"]["url"].as_str().unwrap().to_string();
    assert!(url.contains("/images/artworks/"), "{url}");
    assert!(url.ends_with("_nandi_art.webp"), "{url}");
    assert_eq!(app.objects.len().await, 1);

    let artwork = create_artwork(
        &app,
        &token,
        json!({"title": "Nandi painting", "medium": "Acrylic", "image": url, "imageSource": "upload"}),
    )
    .await;
    let id = artwork["id"].as_str().unwrap();

    delete_auth(app.app(), &format!("/api/v1/admin/artworks/{id}"), &token).await;
    assert_eq!(app.objects.len().await, 0);
}

#[tokio::test]
async fn upload_rejects_unknown_folder_and_missing_file() {
    let app = build_test_app();
    let token = app.admin_token();

    let response = upload(&app, &token, "/api/v1/admin/images?folder=secrets", "x.webp").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.objects.upload_attempts(), 0);

    let response = post_json_auth(app.app(), "/api/v1/admin/images", json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_counts_records() {
    let app = build_test_app();
    let token = app.admin_token();
    create_artwork(&app, &token, json!({"title": "One", "medium": "Oil"})).await;
    create_artwork(&app, &token, json!({"title": "Two", "medium": "Oil", "isAvailable": false})).await;
    create_artwork(&app, &token, json!({"title": "Three", "medium": "Oil", "published": false})).await;

    let json = body_json(get_auth(app.app(), "/api/v1/admin/dashboard", &token).await).await;
    assert_eq!(json["data"]["artworks"], 3);
    assert_eq!(json["data"]["published_artworks"], 2);
    assert_eq!(json["data"]["available_artworks"], 1);
    assert_eq!(json["data"]["blogs"], 0);
}

#[tokio::test]
async fn cache_invalidation_forces_next_read_to_the_store() {
    let app = build_test_app();
    let token = app.admin_token();
    get_auth(app.app(), "/api/v1/admin/artworks", &token).await;
    let reads = app.store.read_count();

    get_auth(app.app(), "/api/v1/admin/artworks", &token).await;
    assert_eq!(app.store.read_count(), reads, "second read is served from cache");

    let response = post_json_auth(
        app.app(),
        "/api/v1/admin/cache/invalidate",
        json!({"prefix": "artworks"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    get_auth(app.app(), "/api/v1/admin/artworks", &token).await;
    assert_eq!(app.store.read_count(), reads + 1);
}
