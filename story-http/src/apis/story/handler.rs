use std::time::Instant;

use axum::{extract::State, Json};
use storyteller_core::{render_outcome, StoryError, StoryRequest};
use tracing::info;
use uuid::Uuid;

use super::types::StoryResponse;
use crate::logger::{colored_request_id, log_outcome};
use crate::{ApiJson, ErrorResponse, ServerState};

/// Generate button: run the completion loop and render either outcome as text
pub async fn handle_generate_story(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<StoryRequest>,
) -> Result<Json<StoryResponse>, ErrorResponse> {
    let request_id = Uuid::new_v4().to_string();
    info!(
        "[{}] POST /v1/story language={} variations={}",
        colored_request_id(&request_id), payload.language, payload.variations
    );

    let started = Instant::now();
    let outcome = state.storyteller.generate(&payload).await;
    log_outcome(&outcome, &request_id, started.elapsed().as_millis());

    // a bad count is the caller's fault, everything else is shown in the output box
    if let Err(e @ StoryError::VariationsOutOfRange(_)) = &outcome {
        return Err(ErrorResponse::unprocessable(e.to_string()));
    }

    Ok(Json(StoryResponse {
        success: outcome.is_ok(),
        story: render_outcome(&outcome),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use storyteller_core::STORY_SEPARATOR;
    use storyteller_llm::LlmError;
    use tower::ServiceExt;

    use crate::test_support::{body_string, post_json, storyteller};
    use crate::{build_router, ServerState};
    use super::StoryResponse;

    fn form(variations: i64) -> serde_json::Value {
        json!({
            "issue": "Lack of clean water",
            "impact": "Affects children's health",
            "helpers": "Local volunteers",
            "desired_change": "Build wells",
            "location": "Rural India",
            "facts": "60% lack access",
            "language": "English",
            "variations": variations
        })
    }

    #[tokio::test]
    async fn returns_joined_variations() {
        let (teller, provider) = storyteller(vec![
            Ok("**Title: One**\na\nb\nAct.".to_string()),
            Ok("**Title: Two**\na\nb\nAct.".to_string()),
        ]);
        let app = build_router(ServerState::new(teller, "unused.txt"));

        let response = app.oneshot(post_json("/v1/story", form(2))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: StoryResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(body.success);
        assert_eq!(body.story.split(STORY_SEPARATOR).count(), 2);
        assert!(body.story.starts_with("**Title: One**"));
        assert_eq!(*provider.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn upstream_failure_is_rendered_not_raised() {
        let (teller, _) = storyteller(vec![
            Ok("**Title: One**".to_string()),
            Err(LlmError::Api { status: 401, message: "Invalid API Key".to_string() }),
        ]);
        let app = build_router(ServerState::new(teller, "unused.txt"));

        let response = app.oneshot(post_json("/v1/story", form(3))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: StoryResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(!body.success);
        assert!(body.story.starts_with("⚠️ Error: "));
        assert!(body.story.contains("Invalid API Key"));
        assert!(!body.story.contains("Title: One"));
    }

    #[tokio::test]
    async fn out_of_range_variations_are_rejected() {
        let (teller, provider) = storyteller(vec![]);
        let app = build_router(ServerState::new(teller, "unused.txt"));

        let response = app.oneshot(post_json("/v1/story", form(0))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_string(response).await.contains("variations must be between 1 and 3"));
        assert_eq!(*provider.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_fields_default_to_empty() {
        let (teller, provider) = storyteller(vec![Ok("**Title: Blank**".to_string())]);
        let app = build_router(ServerState::new(teller, "unused.txt"));

        let response = app.oneshot(post_json("/v1/story", json!({}))).await.unwrap();
        let body: StoryResponse = serde_json::from_str(&body_string(response).await).unwrap();

        assert!(body.success);
        assert_eq!(body.story, "**Title: Blank**");
        assert_eq!(*provider.calls.lock().unwrap(), 1);
    }
}
