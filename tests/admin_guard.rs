mod support;

use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_advance_without_admin_token_is_forbidden() {
    let base_url = support::ensure_server();
    let game_id = uuid::Uuid::new_v4();

    let res = reqwest::Client::new()
        .post(format!("{base_url}/games/{game_id}/advance"))
        .json(&json!({ "requested_by": "intruder" }))
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let payload: Value = res.json().await.expect("json body");
    assert_eq!(payload["message"], "admin capability required");
}

#[tokio::test]
async fn test_advance_for_unknown_game_is_not_found() {
    let base_url = support::ensure_server();
    let game_id = uuid::Uuid::new_v4();

    let res = reqwest::Client::new()
        .post(format!("{base_url}/games/{game_id}/advance"))
        .header("x-admin-token", support::ADMIN_TOKEN)
        .json(&json!({ "requested_by": "integration" }))
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
