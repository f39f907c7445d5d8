use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use storyteller_core::{save_to_path, EXPORT_FILENAME};
use tracing::{error, info};
use uuid::Uuid;

use crate::logger::colored_request_id;
use crate::{ApiJson, ErrorResponse, ServerState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Whatever the output box currently shows, warnings included
    #[serde(default)]
    pub story: String,
}

/// Download button: overwrite the export file and hand it back as an attachment
pub async fn handle_download(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<DownloadRequest>,
) -> Result<Response, ErrorResponse> {
    let request_id = Uuid::new_v4().to_string();
    let request_id = colored_request_id(&request_id);

    let export_file = state.export_file.clone();
    let story = payload.story.clone();
    let path = tokio::task::spawn_blocking(move || save_to_path(export_file.as_path(), &story))
        .await
        .map_err(|e| ErrorResponse::internal_error(format!("Export task failed: {}", e)))?
        .map_err(|e| {
            error!("[{}] failed to write {}: {}", request_id, state.export_file.display(), e);
            ErrorResponse::internal_error(format!("Failed to write {}: {}", state.export_file.display(), e))
        })?;
    info!("[{}] POST /v1/download wrote {} bytes to {}", request_id, payload.story.len(), path.display());

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| EXPORT_FILENAME.to_string());

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        payload.story,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use axum::http::{header, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support::{body_string, post_json, storyteller};
    use crate::{build_router, ServerState};

    #[tokio::test]
    async fn writes_file_and_returns_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("social_good_story.txt");
        let (teller, _) = storyteller(vec![]);
        let app = build_router(ServerState::new(teller, target.clone()));

        let story = "**Title: Wells**\n\n---\n\n**Title: पानी**";
        let response = app.oneshot(post_json("/v1/download", json!({ "story": story }))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"social_good_story.txt\""
        );
        assert_eq!(body_string(response).await, story);
        assert_eq!(fs::read_to_string(&target).unwrap(), story);
    }

    #[tokio::test]
    async fn each_download_overwrites_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        let (teller, _) = storyteller(vec![]);
        let app = build_router(ServerState::new(teller, target.clone()));

        app.clone().oneshot(post_json("/v1/download", json!({ "story": "first and longer" }))).await.unwrap();
        app.oneshot(post_json("/v1/download", json!({ "story": "second" }))).await.unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn export_runs_off_a_single_threaded_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("story.txt");
        let (teller, _) = storyteller(vec![]);
        let app = build_router(ServerState::new(teller, target.clone()));

        let response = app.oneshot(post_json("/v1/download", json!({ "story": "blocking-free" }))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(fs::read_to_string(&target).unwrap(), "blocking-free");
    }

    #[tokio::test]
    async fn write_failure_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("no-such-dir").join("out.txt");
        let (teller, _) = storyteller(vec![]);
        let app = build_router(ServerState::new(teller, target));

        let response = app.oneshot(post_json("/v1/download", json!({ "story": "x" }))).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(response).await.contains("Failed to write"));
    }
}
