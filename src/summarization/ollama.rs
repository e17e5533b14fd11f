use std::time::Duration;

use async_trait::async_trait;
use futures_util::{pin_mut, stream::StreamExt};
use reqwest::{Client, StatusCode};
use serde_json::json;

use super::stream::generate_frames;
use super::{SummaryClient, SummaryError, build_prompt};
use crate::config::Config;
use crate::students::StudentRecord;

/// Summary client backed by an Ollama-compatible `/api/generate` endpoint.
///
/// The endpoint streams JSON frames; fragments are concatenated until the first frame with
/// `done: true`, after which the rest of the body is discarded.
pub struct OllamaSummaryClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaSummaryClient {
    /// Construct a client for `base_url` that requests completions from `model`.
    ///
    /// `timeout` bounds the full round-trip including the streamed body; `None` waits
    /// indefinitely.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, SummaryError> {
        let mut builder = Client::builder().user_agent("student-records/summary");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|error| SummaryError::ClientBuild(error.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    /// Construct a client from the generation settings in `config`.
    pub fn from_config(config: &Config) -> Result<Self, SummaryError> {
        Self::new(
            config.generation_url.clone(),
            config.generation_model.clone(),
            config.generation_timeout,
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SummaryClient for OllamaSummaryClient {
    async fn generate_summary(&self, student: &StudentRecord) -> Result<String, SummaryError> {
        let payload = json!({
            "model": self.model,
            "prompt": build_prompt(student),
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummaryError::Upstream(format!(
                    "failed to reach generation API at {}: {error}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SummaryError::Upstream(format!(
                "generation API request failed with status: {status}"
            )));
        }

        let frames = generate_frames(response.bytes_stream());
        pin_mut!(frames);

        let mut summary = String::new();
        let mut completed = false;
        while let Some(frame) = frames.next().await {
            let frame = frame?;
            if let Some(fragment) = frame.response {
                summary.push_str(&fragment);
            }
            if frame.done {
                completed = true;
                break;
            }
        }

        if !completed {
            return Err(SummaryError::Upstream(
                "generation stream ended before the final frame".into(),
            ));
        }
        if summary.is_empty() {
            return Err(SummaryError::EmptyResponse);
        }

        tracing::debug!(student_id = student.id, summary = %summary, "Generation API response");
        Ok(summary)
    }
}
