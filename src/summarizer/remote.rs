use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{SummarizeError, Summarizer};
use crate::config::GrokConfig;
use crate::models::CommitRecord;

const INSTRUCTION: &str = "Summarize these GitHub commits concisely. \
Focus on the main changes, features, and fixes.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Summarizes through an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct RemoteSummarizer {
    config: GrokConfig,
    client: Client,
}

impl RemoteSummarizer {
    pub fn new(config: GrokConfig, timeout: Duration) -> Result<Self, SummarizeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { config, client })
    }

    /// The user message sent to the API: the fixed instruction followed by
    /// one line per commit.
    pub fn render_prompt(commits: &[CommitRecord]) -> String {
        let mut prompt = format!("{}\n\nCommits:\n", INSTRUCTION);
        for commit in commits {
            prompt.push_str(&format!(
                "- [{}] {}: {}\n",
                commit.authored_at().format("%Y-%m-%d"),
                commit.author_name(),
                commit.message().trim()
            ));
        }
        prompt
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Summarizer for RemoteSummarizer {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn summarize(&self, commits: &[CommitRecord]) -> Result<String, SummarizeError> {
        if commits.is_empty() {
            return Err(SummarizeError::EmptyInput);
        }

        let request = ChatRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::render_prompt(commits),
            }],
        };

        tracing::debug!(
            "Requesting summary of {} commits from {}",
            commits.len(),
            self.config.model
        );
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SummarizeError::Upstream { status, body });
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Could not decode summary response: {}", e);
            SummarizeError::Malformed(e.to_string())
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                tracing::error!("Summary response had no content");
                SummarizeError::Malformed("response contained no message content".to_string())
            })
    }
}
