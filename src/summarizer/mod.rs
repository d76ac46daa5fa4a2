//! Commit summarization strategies.
//!
//! [`Summarizer`] is implemented by [`LocalSummarizer`], a keyword
//! heuristic with no network access, and [`RemoteSummarizer`], which asks a
//! text-generation API. The strategy is chosen from configuration at
//! startup.

mod local;
mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::{Config, SummarizerKind};
use crate::models::CommitRecord;

pub use local::LocalSummarizer;
pub use remote::RemoteSummarizer;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("no commits to summarize")]
    EmptyInput,

    #[error("text-generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("text-generation API returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("malformed text-generation response: {0}")]
    Malformed(String),

    #[error("remote summarizer requires a text-generation API key")]
    MissingApiKey,
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    /// Summarize `commits`, most recent first.
    async fn summarize(&self, commits: &[CommitRecord]) -> Result<String, SummarizeError>;
}

/// Build the configured summarization strategy.
pub fn from_config(config: &Config) -> Result<Arc<dyn Summarizer>, SummarizeError> {
    match (config.summarizer, &config.grok) {
        (SummarizerKind::Remote, Some(grok)) => Ok(Arc::new(RemoteSummarizer::new(
            grok.clone(),
            config.upstream_timeout,
        )?)),
        (SummarizerKind::Remote, None) => Err(SummarizeError::MissingApiKey),
        (SummarizerKind::Local, _) => Ok(Arc::new(LocalSummarizer)),
    }
}

/// Text returned when the window holds no commits.
pub fn no_commits_message(days: u32) -> String {
    format!("No commits found in the last {} days.", days)
}

/// Run `summarizer` without failing the request.
///
/// - empty input gives [`no_commits_message`]
/// - an upstream error status gives a placeholder naming the status
/// - transport or decoding failures fall back to [`LocalSummarizer`]
pub async fn summarize_or_degrade(
    summarizer: &dyn Summarizer,
    commits: &[CommitRecord],
    days: u32,
) -> String {
    match summarizer.summarize(commits).await {
        Ok(summary) => summary,
        Err(SummarizeError::EmptyInput) => no_commits_message(days),
        Err(SummarizeError::Upstream { status, body }) => {
            tracing::warn!("{} summarizer got {}: {}", summarizer.name(), status, body);
            format!(
                "Error generating summary: text-generation API returned status {}",
                status.as_u16()
            )
        }
        Err(e) => {
            tracing::warn!(
                "{} summarizer unavailable, using local heuristic: {}",
                summarizer.name(),
                e
            );
            LocalSummarizer
                .summarize_commits(commits)
                .unwrap_or_else(|_| no_commits_message(days))
        }
    }
}
