//! Client-side persistence
//!
//! The client keeps a handful of small values between runs: auth tokens,
//! the ticket-list filters and a short-lived statistics cache. They all go
//! through the [`KeyValueStore`] trait so the file backing can be swapped
//! for an in-memory one in tests.

mod cache;
mod file;
mod memory;
mod repository;

pub use cache::{PUBLIC_STATS_KEY, PUBLIC_STATS_TTL_MINUTES, TtlCache};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::{
    ACCESS_TOKEN_KEY, FILTERS_KEY, FiltersStorage, KeyValueStore, REFRESH_TOKEN_KEY, TokenStorage,
};

use crate::error::Result;
use std::sync::Arc;

impl<T> KeyValueStore for Arc<T>
where
    T: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
