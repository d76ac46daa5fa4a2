//! HTTP client for the GitHub commits API.
//!
//! One list request per digest (up to [`PER_PAGE`] commits), plus one
//! detail request per listed commit when the caller wants changed files.
//! Nothing is retried; non-success statuses surface as
//! [`GithubError::Upstream`] with the status and raw body.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use futures::stream::{self, StreamExt};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::Config;
use crate::models::CommitRecord;

/// Page size of the single list request.
pub const PER_PAGE: u32 = 100;

const USER_AGENT: &str = concat!("commit-digest/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("Unexpected GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Commit {0} has no detail URL")]
    MissingUrl(String),

    #[error("A {0}-day window reaches before the earliest representable date")]
    WindowOutOfRange(u32),
}

/// Commits listed for a time window.
#[derive(Debug, Clone)]
pub struct CommitWindow {
    /// Cutoff sent as `since`.
    pub since: DateTime<Utc>,
    /// When the window was computed.
    pub until: DateTime<Utc>,
    pub commits: Vec<CommitRecord>,
}

/// Outcome of fetching per-commit detail for a list of commits.
#[derive(Debug, Clone, Default)]
pub struct DetailFetch {
    /// Detail records, in the order of the input list.
    pub commits: Vec<CommitRecord>,
    /// How many commits were skipped because their detail request failed.
    pub dropped: usize,
}

#[derive(Debug, Clone)]
pub struct GithubClient {
    base_url: String,
    token: String,
    detail_concurrency: usize,
    client: Client,
}

impl GithubClient {
    pub fn from_config(config: &Config) -> Result<Self, GithubError> {
        Self::new(
            config.github_api_url.clone(),
            config.github_token.clone(),
            config.upstream_timeout,
            config.detail_concurrency,
        )
    }

    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
        detail_concurrency: usize,
    ) -> Result<Self, GithubError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            detail_concurrency: detail_concurrency.max(1),
            client,
        })
    }

    /// Build an authenticated GET request.
    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github+json")
    }

    /// Read the body, converting non-success statuses to `Upstream`.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, GithubError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(GithubError::Upstream { status, body })
        }
    }

    /// List commits for `owner/repo` authored in the last `days` days.
    pub async fn fetch_commits(
        &self,
        owner: &str,
        repo: &str,
        days: u32,
    ) -> Result<CommitWindow, GithubError> {
        let until = Utc::now();
        let since = until
            .checked_sub_signed(chrono::Duration::days(i64::from(days)))
            .ok_or(GithubError::WindowOutOfRange(days))?;
        let commits = self.fetch_commits_since(owner, repo, since).await?;

        Ok(CommitWindow {
            since,
            until,
            commits,
        })
    }

    /// List commits for `owner/repo` since the given cutoff.
    pub async fn fetch_commits_since(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitRecord>, GithubError> {
        let url = format!("{}/repos/{}/{}/commits", self.base_url, owner, repo);
        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let per_page = PER_PAGE.to_string();
        tracing::debug!("Listing commits: {} since {}", url, since);

        let response = self
            .get(&url)
            .query(&[("since", since.as_str()), ("per_page", per_page.as_str())])
            .send()
            .await?;
        let commits: Vec<CommitRecord> = self.handle_response(response).await?;

        tracing::info!("Fetched {} commits for {}/{}", commits.len(), owner, repo);
        Ok(commits)
    }

    /// Fetch a single commit, including its changed files.
    pub async fn fetch_commit_detail(&self, commit_url: &str) -> Result<CommitRecord, GithubError> {
        let response = self.get(commit_url).send().await?;
        self.handle_response(response).await
    }

    /// Fetch detail for every commit with at most `detail_concurrency`
    /// requests in flight. Failed commits are logged, counted and left out;
    /// the rest keep the input order.
    pub async fn fetch_commit_details(&self, commits: &[CommitRecord]) -> DetailFetch {
        let targets: Vec<(String, String)> = commits
            .iter()
            .map(|commit| (commit.sha.clone(), commit.url.clone()))
            .collect();

        // `buffered` yields results in input order regardless of completion order.
        let results: Vec<Option<CommitRecord>> = stream::iter(targets)
            .map(|(sha, url)| {
                let github = self.clone();
                async move {
                    let detail = if url.is_empty() {
                        Err(GithubError::MissingUrl(sha.clone()))
                    } else {
                        github.fetch_commit_detail(&url).await
                    };

                    match detail {
                        Ok(detail) => Some(detail),
                        Err(e) => {
                            tracing::warn!(sha = %sha, "Dropping commit from detail view: {}", e);
                            None
                        }
                    }
                }
            })
            .buffered(self.detail_concurrency)
            .collect()
            .await;

        let dropped = results.iter().filter(|r| r.is_none()).count();
        if dropped > 0 {
            tracing::warn!("{} of {} commit detail fetches failed", dropped, commits.len());
        }

        DetailFetch {
            commits: results.into_iter().flatten().collect(),
            dropped,
        }
    }
}
