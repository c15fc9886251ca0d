//! In-memory response cache with time-based expiry
//!
//! This module provides [`ResponseCache`], a thread-safe key/value store for raw
//! response bodies keyed by request URL. Every entry shares one TTL. A background
//! reaper task wakes once per TTL and evicts entries older than the TTL, so expiry
//! is eventual: a lookup may return an entry up to one sweep period past its TTL.

mod manager;
mod reaper;
mod store;

pub use manager::{CacheError, ResponseCache};
