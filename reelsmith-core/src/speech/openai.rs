use async_trait::async_trait;
use serde::Serialize;

use crate::config::SpeechConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::speech::synth::{SpeechRequest, SpeechSynthesizer, truncate_input};

#[derive(Debug, Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    speed: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a str>,
}

/// OpenAI-compatible `/v1/audio/speech` client.
#[derive(Clone, Debug)]
pub struct OpenAiSpeech {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl OpenAiSpeech {
    /// Client for `config`.
    pub fn new(config: SpeechConfig) -> ReelResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ReelError::configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}/v1/audio/speech", self.config.base_url)
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeech {
    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(voice = %request.voice, format = request.format.as_str()))]
    async fn synthesize(&self, request: &SpeechRequest) -> ReelResult<Vec<u8>> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(ReelError::configuration(
                "OPENAI_API_KEY is not set; speech synthesis is unavailable",
            ));
        };
        request.validate()?;

        let input = truncate_input(&request.text);
        if input.len() < request.text.len() {
            tracing::warn!(
                chars = request.text.chars().count(),
                "speech input truncated to provider limit"
            );
        }
        let body = SpeechBody {
            model: &self.config.model,
            input,
            voice: &request.voice,
            response_format: request.format.as_str(),
            speed: request.speed,
            instructions: request.instructions.as_deref().filter(|s| !s.trim().is_empty()),
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReelError::external(None, format!("speech request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ReelError::external(
                Some(status.as_u16()),
                provider_detail(&text),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ReelError::external(None, format!("speech body read failed: {e}")))?;
        if bytes.is_empty() {
            return Err(ReelError::external(
                Some(status.as_u16()),
                "speech provider returned empty audio",
            ));
        }
        tracing::debug!(bytes = bytes.len(), "speech synthesized");
        Ok(bytes.to_vec())
    }
}

/// Provider error message from an `{"error": {"message": ..}}` body, or the raw body.
fn provider_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(500).collect())
}

#[cfg(test)]
#[path = "../../tests/unit/speech/openai.rs"]
mod tests;
