// SPDX-License-Identifier: MIT

//! HTTP adapter - thin request/response layer over the pipeline

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::flow::error::ScribeError;
use crate::scribe::collab::{BraveSearch, GroqModel, YtDlpTranscripts, DEFAULT_MODEL};
use crate::scribe::pipeline::Pipeline;

pub async fn serve(port: u16) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // TraceLayer emits through tracing; surface it alongside env_logger.
    let _ = tracing_subscriber::fmt::try_init();

    let app = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/analyze", post(analyze_video))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    video_url: Option<String>,
}

/// Collaborators are constructed fresh per request, so concurrent
/// invocations share no mutable state.
fn build_pipeline() -> Result<Pipeline, ScribeError> {
    let model = Arc::new(GroqModel::new(DEFAULT_MODEL.to_string())?);
    let transcripts = Arc::new(YtDlpTranscripts::new());
    let search = Arc::new(BraveSearch::new()?);
    Ok(Pipeline::new(model, transcripts, search))
}

async fn analyze_video(Json(payload): Json<AnalyzeRequest>) -> (StatusCode, Json<Value>) {
    let Some(video_url) = payload.video_url.filter(|url| !url.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No video URL provided" })),
        );
    };

    let pipeline = match build_pipeline() {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!("failed to build pipeline: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            );
        }
    };

    match pipeline.run(&video_url).await {
        Ok(output) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "blog_post": output.blog_post,
                "debug_analysis": output.video_analysis,
                "debug_research": output.research_summary,
            })),
        ),
        Err(e) => {
            tracing::warn!("pipeline failed at {} stage: {}", e.stage(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_analyze_rejects_missing_url() {
        let (status, Json(body)) = analyze_video(Json(AnalyzeRequest { video_url: None })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No video URL provided");
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_url() {
        let (status, Json(body)) = analyze_video(Json(AnalyzeRequest {
            video_url: Some(String::new()),
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No video URL provided");
    }
}
