//! Request handlers.

use anyhow::Context as _;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use reelsmith::{FinalAsset, NarrationMode, ReelError, RenderRequest, SpeechRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::ServerConfig;
use crate::error::ApiResult;
use crate::state::AppState;

/// How a finished reel is handed back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    /// JSON with a link under `/files`.
    #[default]
    Url,
    /// The MP4 bytes as an attachment.
    Download,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeliveryQuery {
    #[serde(default)]
    pub delivery: Delivery,
}

#[derive(Debug, Serialize)]
pub struct AssetLink {
    pub ok: bool,
    pub id: String,
    pub url: String,
    pub has_audio: bool,
    pub duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<String>,
}

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": "reelsmith",
        "version": env!("CARGO_PKG_VERSION"),
        "speech": state.pipeline.speech_available(),
    }))
}

/// Text-only reel: narration is forced off.
#[tracing::instrument(skip_all, fields(duration = req.duration))]
pub async fn render_reel(
    State(state): State<AppState>,
    Query(query): Query<DeliveryQuery>,
    Json(mut req): Json<RenderRequest>,
) -> ApiResult<Response> {
    req.narration = NarrationMode::None;
    req.narration_required = false;
    run_and_deliver(&state, &req, query.delivery).await
}

/// Narrated reel; a missing narration mode means narrator only.
#[tracing::instrument(skip_all, fields(duration = req.duration, narration = ?req.narration))]
pub async fn render_voice_reel(
    State(state): State<AppState>,
    Query(query): Query<DeliveryQuery>,
    Json(mut req): Json<RenderRequest>,
) -> ApiResult<Response> {
    if req.narration == NarrationMode::None {
        req.narration = NarrationMode::Narrator;
    }
    run_and_deliver(&state, &req, query.delivery).await
}

/// Speech-only pass-through.
#[tracing::instrument(skip_all, fields(voice = %req.voice, format = req.format.as_str()))]
pub async fn tts(
    State(state): State<AppState>,
    Json(req): Json<SpeechRequest>,
) -> ApiResult<Response> {
    let audio = state.pipeline.speak(&req).await?;
    Ok(([(header::CONTENT_TYPE, req.format.content_type())], audio).into_response())
}

async fn run_and_deliver(
    state: &AppState,
    req: &RenderRequest,
    delivery: Delivery,
) -> ApiResult<Response> {
    let spec = req.validate()?;
    let asset = state.pipeline.run(&spec, None).await?;
    deliver(&state.config, &asset, delivery).await
}

pub(crate) async fn deliver(
    config: &ServerConfig,
    asset: &FinalAsset,
    delivery: Delivery,
) -> ApiResult<Response> {
    let file_name = format!("{}.mp4", asset.id);
    match delivery {
        Delivery::Url => Ok(Json(AssetLink {
            ok: true,
            id: asset.id.to_string(),
            url: config.file_url(&file_name),
            has_audio: asset.has_audio(),
            duration_secs: asset.duration_secs,
            degraded: asset.degraded.clone(),
        })
        .into_response()),
        Delivery::Download => {
            let bytes = tokio::fs::read(&asset.path)
                .await
                .with_context(|| format!("read final asset '{}'", asset.path.display()))
                .map_err(ReelError::from)?;
            // Downloaded reels are never linked, so nothing else will ask for the file.
            if let Err(e) = tokio::fs::remove_file(&asset.path).await {
                tracing::warn!(path = %asset.path.display(), error = %e, "failed to remove delivered reel");
            }
            let headers = [
                (header::CONTENT_TYPE, "video/mp4".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"reel-{file_name}\""),
                ),
            ];
            Ok((headers, bytes).into_response())
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/handlers.rs"]
mod tests;
