//! Observable application state
//!
//! Each piece of shared state is an explicit [`Store`] handed to whoever
//! needs it. Subscribers are woken through `tokio::sync::watch`.

mod consts;
mod filters;
mod store;

use std::sync::Arc;

pub use consts::{Consts, ConstsStore};
pub use filters::FiltersStore;
pub use store::Store;

use crate::api::Profile;
use crate::error::Result;
use crate::storage::FiltersStorage;

/// All stores of one client session
#[derive(Clone)]
pub struct AppState {
    pub filters: FiltersStore,
    pub consts: ConstsStore,
    pub current_user: Store<Option<Profile>>,
    pub page_title: Store<String>,
}

impl AppState {
    pub fn load(filters: Arc<dyn FiltersStorage>) -> Result<Self> {
        Ok(Self {
            filters: FiltersStore::load(filters)?,
            consts: ConstsStore::new(),
            current_user: Store::new(None),
            page_title: Store::new(String::new()),
        })
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user
            .with(|user| user.as_ref().is_some_and(Profile::is_admin))
    }
}
