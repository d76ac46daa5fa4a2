use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Largest accepted window, roughly a century.
pub const MAX_DAYS: u32 = 36_500;

/// Raw body of `POST /summarize`.
///
/// Fields are kept loose so that validation can report a precise message
/// instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    /// Integer or integer-valued string.
    #[serde(default)]
    pub days: Option<Value>,
}

/// A validated digest request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestQuery {
    pub owner: String,
    pub repo: String,
    pub days: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct InvalidRequest(pub String);

impl SummarizeRequest {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, days: Option<u32>) -> Self {
        Self {
            owner: Some(owner.into()),
            repo: Some(repo.into()),
            days: days.map(Value::from),
        }
    }

    pub fn validate(self, default_days: u32) -> Result<DigestQuery, InvalidRequest> {
        let owner = required_segment("owner", self.owner)?;
        let repo = required_segment("repo", self.repo)?;
        let days = match self.days {
            None | Some(Value::Null) => default_days,
            Some(value) => parse_days(&value)?,
        };

        Ok(DigestQuery { owner, repo, days })
    }
}

fn required_segment(field: &str, value: Option<String>) -> Result<String, InvalidRequest> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| InvalidRequest(format!("'{}' is required", field)))?;

    if value.contains('/') {
        return Err(InvalidRequest(format!(
            "'{}' must be a single path segment",
            field
        )));
    }
    Ok(value)
}

fn parse_days(value: &Value) -> Result<u32, InvalidRequest> {
    let days = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| InvalidRequest(format!("'days' must be an integer, got {}", value)))?;

    u32::try_from(days)
        .ok()
        .filter(|d| (1..=MAX_DAYS).contains(d))
        .ok_or_else(|| {
            InvalidRequest(format!(
                "'days' must be between 1 and {}, got {}",
                MAX_DAYS, days
            ))
        })
}
