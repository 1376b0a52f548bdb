//! Tag caching: in-memory TTL tier plus a JSON disk tier.

pub mod tags;

pub use tags::{CachedTags, TagCache};
