//! Domain models for the commit digest.
//!
//! - [`CommitRecord`]: a commit as the GitHub API returns it, request-scoped.
//! - [`FormattedCommit`]: the per-commit projection placed in responses.
//! - [`DateGroupedCommits`]: formatted commits keyed by day, newest day first.
//! - [`SummaryStats`]: totals over the requested window.
//! - [`SummaryResult`]: the response body, detailed or direct.
//! - [`SummarizeRequest`]: the inbound request body and its validation.

mod commit;
mod request;
mod summary;

pub use commit::*;
pub use request::*;
pub use summary::*;
