use crate::auth::TokenPair;
use crate::core::TicketsFilters;
use crate::error::Result;

/// Storage key for the persisted ticket filters
pub const FILTERS_KEY: &str = "tickets_filters";
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Key-value store trait, the client's equivalent of browser local storage
///
/// Every call is atomic on its own; there are no transactions spanning
/// several keys.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Repository trait for the ticket-list filters
pub trait FiltersStorage: Send + Sync {
    /// Loads the saved filters, falling back to defaults
    fn load_filters(&self) -> Result<TicketsFilters>;

    /// Persists the filters
    fn save_filters(&self, filters: &TicketsFilters) -> Result<()>;

    /// Forgets the saved filters
    fn clear_filters(&self) -> Result<()>;
}

/// Repository trait for auth tokens
pub trait TokenStorage: Send + Sync {
    fn access_token(&self) -> Result<Option<String>>;

    fn refresh_token(&self) -> Result<Option<String>>;

    /// Stores both tokens; a pair without refresh token removes the old one
    fn store_tokens(&self, tokens: &TokenPair) -> Result<()>;

    fn clear_tokens(&self) -> Result<()>;
}

impl<T> FiltersStorage for T
where
    T: KeyValueStore,
{
    fn load_filters(&self) -> Result<TicketsFilters> {
        let Some(raw) = self.get(FILTERS_KEY)? else {
            return Ok(TicketsFilters::default());
        };

        match serde_json::from_str(&raw) {
            Ok(filters) => Ok(filters),
            Err(e) => {
                tracing::warn!("Discarding unreadable saved filters: {}", e);
                Ok(TicketsFilters::default())
            },
        }
    }

    fn save_filters(&self, filters: &TicketsFilters) -> Result<()> {
        let raw = serde_json::to_string(filters)?;
        self.set(FILTERS_KEY, &raw)
    }

    fn clear_filters(&self) -> Result<()> {
        self.remove(FILTERS_KEY)
    }
}

impl<T> TokenStorage for T
where
    T: KeyValueStore,
{
    fn access_token(&self) -> Result<Option<String>> {
        Ok(self.get(ACCESS_TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self.get(REFRESH_TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    fn store_tokens(&self, tokens: &TokenPair) -> Result<()> {
        self.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        match &tokens.refresh_token {
            Some(refresh) => self.set(REFRESH_TOKEN_KEY, refresh),
            None => self.remove(REFRESH_TOKEN_KEY),
        }
    }

    fn clear_tokens(&self) -> Result<()> {
        self.remove(ACCESS_TOKEN_KEY)?;
        self.remove(REFRESH_TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SortField, ViewMode};
    use crate::storage::{FileStore, MemoryStore};
    use tempfile::TempDir;

    #[test]
    fn test_filters_round_trip_through_memory() {
        let store = MemoryStore::new();
        assert_eq!(store.load_filters().unwrap(), TicketsFilters::default());

        let mut filters = TicketsFilters::default();
        filters.search = "printer".to_string();
        filters.view_mode = ViewMode::Calendar;
        filters.sort_by = SortField::PlannedAt;
        store.save_filters(&filters).unwrap();

        assert_eq!(store.load_filters().unwrap(), filters);

        store.clear_filters().unwrap();
        assert_eq!(store.load_filters().unwrap(), TicketsFilters::default());
    }

    #[test]
    fn test_corrupt_filters_fall_back_to_default() {
        let store = MemoryStore::new();
        store.set(FILTERS_KEY, "{not json").unwrap();
        assert_eq!(store.load_filters().unwrap(), TicketsFilters::default());
    }

    #[test]
    fn test_filters_survive_reopening_file_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");

        let mut filters = TicketsFilters::default();
        filters.buildings = vec![1, 2];
        FileStore::new(&path).save_filters(&filters).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.load_filters().unwrap().buildings, vec![1, 2]);
    }

    #[test]
    fn test_token_storage() {
        let store = MemoryStore::new();
        assert!(store.access_token().unwrap().is_none());

        store
            .store_tokens(&TokenPair {
                access_token: "a".into(),
                refresh_token: Some("r".into()),
            })
            .unwrap();
        assert_eq!(store.access_token().unwrap().as_deref(), Some("a"));
        assert_eq!(store.refresh_token().unwrap().as_deref(), Some("r"));

        store
            .store_tokens(&TokenPair {
                access_token: "b".into(),
                refresh_token: None,
            })
            .unwrap();
        assert!(store.refresh_token().unwrap().is_none());

        store.clear_tokens().unwrap();
        assert!(store.access_token().unwrap().is_none());
    }
}
