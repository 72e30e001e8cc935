pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::conversation::handlers as conversation;
use crate::crs::handlers as crs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless scoring
        .route("/api/v1/crs/score", post(crs::handle_score))
        // Conversational intake
        .route("/api/v1/conversations", post(conversation::handle_create))
        .route(
            "/api/v1/conversations/:id",
            get(conversation::handle_get).delete(conversation::handle_delete),
        )
        .route(
            "/api/v1/conversations/:id/messages",
            post(conversation::handle_message),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::conversation::interpreter::{InterpretError, Interpretation, SlotInterpreter};
    use crate::conversation::orchestrator::Orchestrator;
    use crate::conversation::slots::Slot;
    use crate::conversation::store::ConversationStore;
    use crate::llm_client::LlmError;
    use crate::models::chat::ChatMessage;

    /// Treats the latest user message as a JSON literal for the slot.
    struct EchoInterpreter;

    #[async_trait]
    impl SlotInterpreter for EchoInterpreter {
        async fn interpret(
            &self,
            _slot: Slot,
            history: &[ChatMessage],
        ) -> Result<Interpretation, InterpretError> {
            let last = history
                .last()
                .ok_or(InterpretError::Llm(LlmError::NoUserTurn))?;
            match serde_json::from_str::<Value>(&last.content) {
                Ok(value) => Ok(Interpretation::Resolved { value }),
                Err(_) => Ok(Interpretation::NeedsClarification {
                    reason: "Please answer plainly.".into(),
                }),
            }
        }
    }

    fn test_state() -> AppState {
        AppState {
            orchestrator: Arc::new(Orchestrator::new(
                Arc::new(EchoInterpreter),
                Duration::from_secs(5),
            )),
            conversations: ConversationStore::new(100),
            config: Config {
                anthropic_api_key: "test".into(),
                port: 0,
                rust_log: "debug".into(),
                interpreter_timeout: Duration::from_secs(5),
                llm_request_timeout: Duration::from_secs(5),
                max_conversations: 100,
            },
        }
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state());
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_score_endpoint() {
        let app = build_router(test_state());
        let factors = json!({
            "has_spouse": false,
            "age": 25,
            "education": "bachelors_or_three_year",
            "first_language": {"listening": 9, "reading": 9, "writing": 9, "speaking": 9}
        });
        let (status, body) = send(&app, "POST", "/api/v1/crs/score", Some(factors)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_score"], 379);
        assert_eq!(body["ceiling"], 1200);
        assert_eq!(body["core"]["first_language"], 124);
    }

    #[tokio::test]
    async fn test_score_endpoint_rejects_out_of_range() {
        let app = build_router(test_state());
        let factors = json!({
            "has_spouse": true,
            "age": 121,
            "education": "doctoral",
            "first_language": {"listening": 9, "reading": 9, "writing": 9, "speaking": 9}
        });
        let (status, body) = send(&app, "POST", "/api/v1/crs/score", Some(factors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["details"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_conversation_round_trip() {
        let app = build_router(test_state());
        let (status, body) = send(&app, "POST", "/api/v1/conversations", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["complete"], false);
        assert_eq!(body["slot"], "marital_status");
        let id = body["conversation_id"].as_str().unwrap().to_string();
        let messages_uri = format!("/api/v1/conversations/{id}/messages");

        let answers = [
            "false", "28", "\"masters_or_professional\"", "8", "8", "8", "8", "null", "2", "3",
            "false", "true", "\"none\"",
        ];
        for answer in answers {
            let (status, body) = send(&app, "POST", &messages_uri, Some(json!({"content": answer}))).await;
            assert_eq!(status, StatusCode::OK, "{body}");
            assert_eq!(body["complete"], false);
        }

        let (status, body) = send(&app, "POST", &messages_uri, Some(json!({"content": "false"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["complete"], true);
        assert_eq!(body["final_score"], body["breakdown"]["total_score"]);
        assert!(body["closing_message"].as_str().unwrap().contains("CRS score"));

        let (status, body) = send(&app, "POST", &messages_uri, Some(json!({"content": "again"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");

        let (status, body) = send(&app, "GET", &format!("/api/v1/conversations/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"]["state"], "complete");
        assert_eq!(body["progress"]["resolved"], 14);
        assert_eq!(body["progress"]["required"], 14);
        assert!(body["result"]["breakdown"]["total_score"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_vague_answer_keeps_slot() {
        let app = build_router(test_state());
        let (_, body) = send(&app, "POST", "/api/v1/conversations", None).await;
        let id = body["conversation_id"].as_str().unwrap().to_string();
        let uri = format!("/api/v1/conversations/{id}/messages");

        let (status, body) = send(&app, "POST", &uri, Some(json!({"content": "it's complicated"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slot"], "marital_status");
        assert_eq!(body["kind"], "clarify");
    }

    #[tokio::test]
    async fn test_delete_and_unknown_conversation() {
        let app = build_router(test_state());
        let (_, body) = send(&app, "POST", "/api/v1/conversations", None).await;
        let id = body["conversation_id"].as_str().unwrap().to_string();
        let uri = format!("/api/v1/conversations/{id}");

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
