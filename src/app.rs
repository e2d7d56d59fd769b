//! Application context: the auth store and both resource clients, built once at
//! startup and handed to every action explicitly. There is no global state;
//! whoever owns the context owns the session.

use crate::{
    api::ApiClient,
    config::AppConfig,
    errors::AppError,
    features::{
        auth::{AuthStore, FileStore, KeyValueStore},
        prisoners::PrisonerClient,
        users::UserClient,
    },
    routes::Router,
};

pub struct AppContext<S> {
    pub auth: AuthStore<S>,
    pub prisoners: PrisonerClient,
    pub users: UserClient,
}

impl AppContext<FileStore> {
    /// Wires the file-backed session and the API clients from config, then
    /// hydrates the auth flag from the state file.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let api = ApiClient::new(config)?;
        let auth = AuthStore::hydrate(FileStore::new(&config.state_file));
        Ok(Self::new(auth, api))
    }
}

impl<S: KeyValueStore> AppContext<S> {
    pub fn new(auth: AuthStore<S>, api: ApiClient) -> Self {
        Self {
            auth,
            prisoners: PrisonerClient::new(api.clone()),
            users: UserClient::new(api),
        }
    }

    /// A fresh router bound to this context's auth store.
    pub fn router(&self) -> Router<'_, S> {
        Router::new(&self.auth)
    }
}
