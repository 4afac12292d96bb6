use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::AuthManager;
use crate::config::Config;
use crate::error::Result;
use crate::state::AppState;
use crate::storage::FileStore;

/// Everything a command handler needs: configuration, storage, API client
pub struct HandlerContext {
    pub config: Config,
    pub store: Arc<FileStore>,
    pub client: ApiClient,
    pub auth: AuthManager,
    pub state: AppState,
}

impl HandlerContext {
    pub fn new(config: Config) -> Result<Self> {
        let store = Arc::new(FileStore::new(config.storage_path()));
        tracing::debug!("Using storage file {}", store.path().display());

        let client = ApiClient::new(&config.api, config.ui.locale)?.with_tokens(store.clone());
        let auth = AuthManager::new(store.clone());
        let state = AppState::load(store.clone())?;

        Ok(Self {
            config,
            store,
            client,
            auth,
            state,
        })
    }

    /// Make sure the stored access token is fresh before calling the API
    pub async fn authorize(&self) -> Result<()> {
        self.auth.access_token(&self.client).await.map(|_| ())
    }
}
