//! Commit digest service.
//!
//! Fetches recent commit history for a repository from the GitHub API,
//! groups it by day, computes aggregate statistics and optionally produces
//! a prose summary, either locally or through a text-generation API.

pub mod api;
pub mod config;
pub mod digest;
pub mod github;
pub mod models;
pub mod summarizer;
