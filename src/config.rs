//! Service configuration loaded from environment variables.
//!
//! Configuration is read once at startup and handed to the components that
//! need it. See [`Config::from_env`] for the recognized variables.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GROK_API_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_GROK_MODEL: &str = "grok-beta";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_DAYS: u32 = 7;
pub const DEFAULT_DETAIL_CONCURRENCY: usize = 8;
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Which response shape `POST /summarize` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestMode {
    /// Per-commit detail, grouped by date, with aggregate stats.
    #[default]
    Detailed,
    /// A prose summary of the top-level commit list.
    Direct,
}

impl DigestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detailed => "detailed",
            Self::Direct => "direct",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detailed" => Some(Self::Detailed),
            "direct" => Some(Self::Direct),
            _ => None,
        }
    }
}

/// Which summarization strategy direct mode uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizerKind {
    Local,
    Remote,
}

impl SummarizerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Self::Local),
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }
}

/// Text-generation API settings.
#[derive(Clone)]
pub struct GrokConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
}

impl std::fmt::Debug for GrokConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrokConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Clone)]
pub struct Config {
    pub github_token: String,
    pub github_api_url: String,
    /// Present when a text-generation API key is configured.
    pub grok: Option<GrokConfig>,
    pub mode: DigestMode,
    pub summarizer: SummarizerKind,
    pub default_days: u32,
    /// Upper bound on concurrent per-commit detail requests.
    pub detail_concurrency: usize,
    /// Applied to every outbound request.
    pub upstream_timeout: Duration,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &"<redacted>")
            .field("github_api_url", &self.github_api_url)
            .field("grok", &self.grok)
            .field("mode", &self.mode)
            .field("summarizer", &self.summarizer)
            .field("default_days", &self.default_days)
            .field("detail_concurrency", &self.detail_concurrency)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// - `GITHUB_TOKEN` (required), `GITHUB_API_URL`
    /// - `GROK_API_KEY`, `GROK_API_URL`, `GROK_MODEL`, `GROK_MAX_TOKENS`
    /// - `DIGEST_MODE` (`detailed` | `direct`)
    /// - `DIGEST_SUMMARIZER` (`local` | `remote`)
    /// - `DIGEST_DEFAULT_DAYS`, `DIGEST_DETAIL_CONCURRENCY`,
    ///   `DIGEST_UPSTREAM_TIMEOUT_SECS`
    /// - `DIGEST_HOST`, `DIGEST_PORT`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let github_token = get("GITHUB_TOKEN").ok_or(ConfigError::Missing("GITHUB_TOKEN"))?;

        let grok = match get("GROK_API_KEY") {
            Some(api_key) => Some(GrokConfig {
                api_key,
                api_url: get("GROK_API_URL").unwrap_or_else(|| DEFAULT_GROK_API_URL.to_string()),
                model: get("GROK_MODEL").unwrap_or_else(|| DEFAULT_GROK_MODEL.to_string()),
                max_tokens: parse_or("GROK_MAX_TOKENS", get("GROK_MAX_TOKENS"), DEFAULT_MAX_TOKENS)?,
            }),
            None => None,
        };

        let mode = match get("DIGEST_MODE") {
            Some(value) => DigestMode::from_str(&value).ok_or(ConfigError::Invalid {
                var: "DIGEST_MODE",
                value,
            })?,
            None => DigestMode::default(),
        };

        let summarizer = match get("DIGEST_SUMMARIZER") {
            Some(value) => SummarizerKind::from_str(&value).ok_or(ConfigError::Invalid {
                var: "DIGEST_SUMMARIZER",
                value,
            })?,
            None if grok.is_some() => SummarizerKind::Remote,
            None => SummarizerKind::Local,
        };
        if summarizer == SummarizerKind::Remote && grok.is_none() {
            return Err(ConfigError::Missing("GROK_API_KEY"));
        }

        let default_days = parse_or("DIGEST_DEFAULT_DAYS", get("DIGEST_DEFAULT_DAYS"), DEFAULT_DAYS)?;
        if default_days == 0 {
            return Err(ConfigError::Invalid {
                var: "DIGEST_DEFAULT_DAYS",
                value: "0".to_string(),
            });
        }

        let detail_concurrency = parse_or(
            "DIGEST_DETAIL_CONCURRENCY",
            get("DIGEST_DETAIL_CONCURRENCY"),
            DEFAULT_DETAIL_CONCURRENCY,
        )?
        .max(1);

        let upstream_timeout = Duration::from_secs(parse_or(
            "DIGEST_UPSTREAM_TIMEOUT_SECS",
            get("DIGEST_UPSTREAM_TIMEOUT_SECS"),
            DEFAULT_UPSTREAM_TIMEOUT.as_secs(),
        )?);
        if upstream_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: "DIGEST_UPSTREAM_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            github_token,
            github_api_url: get("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            grok,
            mode,
            summarizer,
            default_days,
            detail_concurrency,
            upstream_timeout,
            host: get("DIGEST_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or("DIGEST_PORT", get("DIGEST_PORT"), DEFAULT_PORT)?,
        })
    }

    /// A local-summarizer configuration pointing at the given GitHub API
    /// base URL (for tests and one-off runs).
    pub fn new(github_token: impl Into<String>, github_api_url: impl Into<String>) -> Self {
        Self {
            github_token: github_token.into(),
            github_api_url: github_api_url.into(),
            grok: None,
            mode: DigestMode::default(),
            summarizer: SummarizerKind::Local,
            default_days: DEFAULT_DAYS,
            detail_concurrency: DEFAULT_DETAIL_CONCURRENCY,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }

    pub fn with_mode(mut self, mode: DigestMode) -> Self {
        self.mode = mode;
        self
    }

    /// Switch to the remote summarizer with the given API settings.
    pub fn with_grok(mut self, grok: GrokConfig) -> Self {
        self.grok = Some(grok);
        self.summarizer = SummarizerKind::Remote;
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn requires_github_token() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("GITHUB_TOKEN"));
    }

    #[test]
    fn applies_defaults() {
        let config = load(&[("GITHUB_TOKEN", "ghp_test")]).unwrap();

        assert_eq!(config.github_api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(config.mode, DigestMode::Detailed);
        assert_eq!(config.summarizer, SummarizerKind::Local);
        assert_eq!(config.default_days, 7);
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert!(config.grok.is_none());
    }

    #[test]
    fn api_key_selects_remote_summarizer() {
        let config = load(&[("GITHUB_TOKEN", "t"), ("GROK_API_KEY", "xai-key")]).unwrap();

        assert_eq!(config.summarizer, SummarizerKind::Remote);
        let grok = config.grok.expect("grok config");
        assert_eq!(grok.model, DEFAULT_GROK_MODEL);
        assert_eq!(grok.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn explicit_local_summarizer_wins_over_api_key() {
        let config = load(&[
            ("GITHUB_TOKEN", "t"),
            ("GROK_API_KEY", "xai-key"),
            ("DIGEST_SUMMARIZER", "local"),
        ])
        .unwrap();

        assert_eq!(config.summarizer, SummarizerKind::Local);
    }

    #[test]
    fn remote_summarizer_requires_api_key() {
        let err = load(&[("GITHUB_TOKEN", "t"), ("DIGEST_SUMMARIZER", "remote")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("GROK_API_KEY"));
    }

    #[test]
    fn parses_mode_case_insensitively() {
        let config = load(&[("GITHUB_TOKEN", "t"), ("DIGEST_MODE", "Direct")]).unwrap();
        assert_eq!(config.mode, DigestMode::Direct);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = load(&[("GITHUB_TOKEN", "t"), ("DIGEST_MODE", "verbose")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "DIGEST_MODE", .. }));
    }

    #[test]
    fn rejects_bad_port() {
        let err = load(&[("GITHUB_TOKEN", "t"), ("DIGEST_PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "DIGEST_PORT", .. }));
    }

    #[test]
    fn rejects_zero_upstream_timeout() {
        let err = load(&[("GITHUB_TOKEN", "t"), ("DIGEST_UPSTREAM_TIMEOUT_SECS", "0")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "DIGEST_UPSTREAM_TIMEOUT_SECS",
                value: "0".to_string(),
            }
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = load(&[("GITHUB_TOKEN", "ghp_secret"), ("GROK_API_KEY", "xai-secret")]).unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("ghp_secret"));
        assert!(!rendered.contains("xai-secret"));
    }
}
