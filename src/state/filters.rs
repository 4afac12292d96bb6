use std::sync::Arc;

use tokio::sync::watch;

use super::Store;
use crate::core::TicketsFilters;
use crate::error::Result;
use crate::storage::FiltersStorage;

/// Ticket-list filters, written through to storage on every change
#[derive(Clone)]
pub struct FiltersStore {
    store: Store<TicketsFilters>,
    storage: Arc<dyn FiltersStorage>,
}

impl FiltersStore {
    /// Seed the store from whatever was saved last
    pub fn load(storage: Arc<dyn FiltersStorage>) -> Result<Self> {
        let filters = storage.load_filters()?;
        Ok(Self {
            store: Store::new(filters),
            storage,
        })
    }

    #[must_use]
    pub fn get(&self) -> TicketsFilters {
        self.store.get()
    }

    pub fn set(&self, filters: TicketsFilters) -> Result<()> {
        self.storage.save_filters(&filters)?;
        self.store.set(filters);
        Ok(())
    }

    /// Apply `f` to a copy of the filters, persist it, then publish it
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut TicketsFilters),
    {
        let mut filters = self.get();
        f(&mut filters);
        self.set(filters)
    }

    /// Back to defaults, forgetting the saved copy
    pub fn reset(&self) -> Result<()> {
        self.storage.clear_filters()?;
        self.store.set(TicketsFilters::default());
        Ok(())
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TicketsFilters> {
        self.store.subscribe()
    }
}
