//! Cache module for persisting API responses to disk
//!
//! This module provides a durable key-value store backed by JSON files. The
//! store is a dumb container: reads return whatever was last written and
//! writes replace the stored value wholesale. Deciding whether a stored
//! record is still fresh is the caller's responsibility.

mod store;

pub use store::CacheStore;
