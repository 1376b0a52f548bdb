//! Network collaborators: HTTP client wrapper, retry helper, and the
//! GitHub tag and pull-request clients.

pub mod client;
pub mod pulls;
pub mod retry;
pub mod tags;

pub use client::HttpClient;
pub use pulls::PullClient;
pub use retry::{retry_async, RetryConfig, RetryStats};
pub use tags::{normalize_tags, TagClient};
