mod common;

use common::spawn_app;
use serde_json::{json, Value};

const EMAIL: &str = "allan@example.com";
const PASSWORD: &str = "password123";

#[tokio::test]
async fn create_chirp_requires_access_token() {
    let app = spawn_app("dev").await;

    let response = app
        .post_json("/api/chirps", &json!({ "body": "hello" }))
        .await;
    assert_eq!(401, response.status().as_u16());

    let response = app.post_chirp("not.a.jwt", "hello").await;
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn create_chirp_returns_201_owned_by_token_subject() {
    let app = spawn_app("dev").await;
    let login = app.signed_in_user(EMAIL, PASSWORD).await;

    let response = app
        .post_chirp(login["token"].as_str().unwrap(), "I'm the one who knocks")
        .await;
    assert_eq!(201, response.status().as_u16());

    let chirp: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(chirp["user_id"], login["id"]);
    assert_eq!(chirp["body"], "I'm the one who knocks");
    assert!(chirp["id"].as_str().is_some());
    assert!(chirp["created_at"].as_str().is_some());
}

#[tokio::test]
async fn create_chirp_masks_profanity() {
    let app = spawn_app("dev").await;
    let login = app.signed_in_user(EMAIL, PASSWORD).await;

    let chirp: Value = app
        .post_chirp(login["token"].as_str().unwrap(), "what a Sharbert day")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(chirp["body"], "what a **** day");
}

#[tokio::test]
async fn create_chirp_rejects_long_body() {
    let app = spawn_app("dev").await;
    let login = app.signed_in_user(EMAIL, PASSWORD).await;

    let response = app
        .post_chirp(login["token"].as_str().unwrap(), &"a".repeat(141))
        .await;

    assert_eq!(400, response.status().as_u16());
    let chirps: Value = app.get("/api/chirps").await.json().await.unwrap();
    assert_eq!(chirps.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_chirp_for_deleted_user_returns_401() {
    let app = spawn_app("dev").await;
    let login = app.signed_in_user(EMAIL, PASSWORD).await;

    let response = app
        .client
        .post(&format!("{}/admin/reset", app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    // the access token is still cryptographically valid
    let response = app.post_chirp(login["token"].as_str().unwrap(), "hello").await;
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn list_chirps_is_oldest_first() {
    let app = spawn_app("dev").await;
    let walt = app.signed_in_user(EMAIL, PASSWORD).await;
    let jesse = app.signed_in_user("jesse@example.com", PASSWORD).await;

    let bodies = ["first", "second", "third"];
    for (i, body) in bodies.iter().enumerate() {
        let login = if i % 2 == 0 { &walt } else { &jesse };
        let response = app.post_chirp(login["token"].as_str().unwrap(), body).await;
        assert_eq!(201, response.status().as_u16());
    }

    let response = app.get("/api/chirps").await;
    assert_eq!(200, response.status().as_u16());
    let chirps: Vec<Value> = response.json().await.unwrap();

    let listed: Vec<&str> = chirps.iter().map(|c| c["body"].as_str().unwrap()).collect();
    assert_eq!(listed, bodies);
    assert_eq!(chirps[1]["user_id"], jesse["id"]);

    let created: Vec<&str> = chirps
        .iter()
        .map(|c| c["created_at"].as_str().unwrap())
        .collect();
    let parsed: Vec<chrono::DateTime<chrono::Utc>> =
        created.iter().map(|t| t.parse().unwrap()).collect();
    assert!(parsed.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn get_chirp_by_id() {
    let app = spawn_app("dev").await;
    let login = app.signed_in_user(EMAIL, PASSWORD).await;
    let created: Value = app
        .post_chirp(login["token"].as_str().unwrap(), "hello")
        .await
        .json()
        .await
        .unwrap();

    let response = app
        .get(&format!("/api/chirps/{}", created["id"].as_str().unwrap()))
        .await;
    assert_eq!(200, response.status().as_u16());
    let fetched: Value = response.json().await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_unknown_chirp_returns_404() {
    let app = spawn_app("dev").await;

    let response = app
        .get(&format!("/api/chirps/{}", uuid::Uuid::new_v4()))
        .await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn get_chirp_rejects_malformed_id() {
    let app = spawn_app("dev").await;

    let response = app.get("/api/chirps/not-a-uuid").await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn validate_chirp_masks_profanity() {
    let app = spawn_app("dev").await;

    let response = app
        .post_json(
            "/api/validate_chirp",
            &json!({ "body": "I had something interesting for breakfast Kerfuffle!" }),
        )
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["cleaned_body"],
        "I had something interesting for breakfast Kerfuffle!"
    );

    let response = app
        .post_json(
            "/api/validate_chirp",
            &json!({ "body": "This is a kerfuffle opinion I need to share with the world" }),
        )
        .await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["cleaned_body"],
        "This is a **** opinion I need to share with the world"
    );
}

#[tokio::test]
async fn validate_chirp_rejects_long_body() {
    let app = spawn_app("dev").await;

    let response = app
        .post_json("/api/validate_chirp", &json!({ "body": "x".repeat(141) }))
        .await;

    assert_eq!(400, response.status().as_u16());
}
