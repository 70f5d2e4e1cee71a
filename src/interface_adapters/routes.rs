use crate::interface_adapters::handlers::{
    advance_round, create_game, game_status, join_game, submit_action, unlock_game,
};
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

// Build the HTTP router standing in for the chat transport and admin tools.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/{game_id}", get(game_status))
        .route("/games/{game_id}/players", post(join_game))
        .route("/games/{game_id}/actions", post(submit_action))
        .route("/games/{game_id}/advance", post(advance_round))
        .route("/games/{game_id}/unlock", post(unlock_game))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::ArenaTuning;
    use crate::frameworks::seed::{default_catalog, default_zones};
    use crate::interface_adapters::handlers::ADMIN_TOKEN_HEADER;
    use crate::interface_adapters::state::{InMemoryGameStore, SystemClock};
    use crate::use_cases::{ArenaEngine, NarrationPublisher};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tokio::sync::broadcast;
    use tower::ServiceExt;

    const TOKEN: &str = "test-admin-token";

    fn build_test_app() -> Router {
        let store = Arc::new(InMemoryGameStore::new(default_zones(), default_catalog()));
        let (narration, _rx) = NarrationPublisher::channel(64);
        let tuning = ArenaTuning::default();
        let engine = ArenaEngine::new(store, SystemClock, tuning, narration, Some(3));
        let (tx, _) = broadcast::channel(16);
        app(Arc::new(AppState {
            engine: Arc::new(engine),
            admin_token: Some(Arc::from(TOKEN)),
            narration: tx,
        }))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<&str>,
        admin: bool,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if admin {
            builder = builder.header(ADMIN_TOKEN_HEADER, TOKEN);
        }
        let request = builder
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .expect("expected request to build");

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("expected response body");
        let payload = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, payload)
    }

    async fn create_game(app: &Router) -> String {
        let (status, payload) =
            send(app, "POST", "/games", Some(r#"{"kind":"arena"}"#), true).await;
        assert_eq!(status, StatusCode::OK);
        payload["game_id"]
            .as_str()
            .expect("expected game id")
            .to_string()
    }

    #[tokio::test]
    async fn when_create_game_lacks_admin_token_then_returns_403_and_error_message() {
        let app = build_test_app();

        let (status, payload) =
            send(&app, "POST", "/games", Some(r#"{"kind":"arena"}"#), false).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(payload["message"], "admin capability required");
    }

    #[tokio::test]
    async fn when_game_of_kind_is_running_then_create_returns_409() {
        let app = build_test_app();
        create_game(&app).await;

        let (status, _) = send(&app, "POST", "/games", Some(r#"{"kind":"arena"}"#), true).await;

        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn when_player_submits_for_unknown_player_then_returns_404() {
        let app = build_test_app();
        let game_id = create_game(&app).await;

        let (status, payload) = send(
            &app,
            "POST",
            &format!("/games/{game_id}/actions"),
            Some(r#"{"player_id":42,"action":{"kind":"hide"}}"#),
            false,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload["message"], "player 42 not found");
    }

    #[tokio::test]
    async fn when_action_kind_is_unknown_then_returns_422() {
        let app = build_test_app();
        let game_id = create_game(&app).await;

        let (status, _) = send(
            &app,
            "POST",
            &format!("/games/{game_id}/actions"),
            Some(r#"{"player_id":1,"action":{"kind":"teleport"}}"#),
            false,
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn when_player_cheers_for_themself_then_returns_400() {
        let app = build_test_app();
        let game_id = create_game(&app).await;
        let (_, joined) = send(
            &app,
            "POST",
            &format!("/games/{game_id}/players"),
            Some(r#"{"user_id":"U1"}"#),
            false,
        )
        .await;
        let player_id = joined["player_id"].as_u64().expect("expected player id");

        let body = serde_json::json!({
            "player_id": player_id,
            "action": { "kind": "cheer", "target_player_id": player_id },
        })
        .to_string();
        let (status, payload) = send(
            &app,
            "POST",
            &format!("/games/{game_id}/actions"),
            Some(&body),
            false,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["message"], "invalid action: you cannot cheer for yourself");
    }

    #[tokio::test]
    async fn when_round_is_advanced_then_next_round_is_reported() {
        let app = build_test_app();
        let game_id = create_game(&app).await;
        for user in ["U1", "U2", "U3"] {
            let body = format!(r#"{{"user_id":"{user}"}}"#);
            let (status, _) = send(
                &app,
                "POST",
                &format!("/games/{game_id}/players"),
                Some(&body),
                false,
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, payload) = send(
            &app,
            "POST",
            &format!("/games/{game_id}/advance"),
            Some(r#"{"requested_by":"mod"}"#),
            true,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["round_number"], 1);
        assert_eq!(payload["next_round_number"], 2);
        assert_eq!(payload["game_over"], false);
        assert_eq!(payload["everyone_visible"], false);

        let (status, payload) = send(&app, "GET", &format!("/games/{game_id}"), None, false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["round"]["number"], 2);
        assert_eq!(payload["resolving"], false);
    }

    #[tokio::test]
    async fn when_advance_reveals_everyone_then_following_rounds_stay_visible() {
        let app = build_test_app();
        let game_id = create_game(&app).await;
        for user in ["U1", "U2"] {
            let body = format!(r#"{{"user_id":"{user}"}}"#);
            send(&app, "POST", &format!("/games/{game_id}/players"), Some(&body), false).await;
        }
        let advance = format!("/games/{game_id}/advance");

        let (status, payload) = send(
            &app,
            "POST",
            &advance,
            Some(r#"{"requested_by":"mod","everyone_visible":true}"#),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["everyone_visible"], true);

        let (status, payload) =
            send(&app, "POST", &advance, Some(r#"{"requested_by":"mod"}"#), true).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["everyone_visible"], true);

        let (_, status_payload) =
            send(&app, "GET", &format!("/games/{game_id}"), None, false).await;
        assert_eq!(status_payload["round"]["number"], 3);
        assert_eq!(status_payload["round"]["is_everyone_visible"], true);
    }

    #[tokio::test]
    async fn when_unlock_is_called_without_a_stuck_flag_then_cleared_is_false() {
        let app = build_test_app();
        let game_id = create_game(&app).await;

        let (status, payload) = send(
            &app,
            "POST",
            &format!("/games/{game_id}/unlock"),
            Some(r#"{"requested_by":"mod"}"#),
            true,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["cleared"], false);
    }

    #[tokio::test]
    async fn when_game_is_unknown_then_status_returns_404() {
        let app = build_test_app();

        let (status, _) = send(
            &app,
            "GET",
            "/games/00000000-0000-0000-0000-000000000000",
            None,
            false,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn when_games_route_is_called_with_get_then_returns_405() {
        let app = build_test_app();

        let (status, _) = send(&app, "GET", "/games", None, false).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
