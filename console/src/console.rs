//! Composition root wiring adapters into the console core.
//!
//! [`Console::from_settings`] builds the production graph: a file-backed
//! credential store, the reqwest gateway, a wall-clock cache, the router, and
//! the session controller. Tests use [`Console::assemble`] to swap in their
//! own store and gateway.

use std::sync::Arc;

use chrono::TimeDelta;
use futures_util::future::try_join;
use mockable::{Clock, DefaultClock};
use pagination::{ListQuery, Page};
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, ConsoleSettings};
use crate::domain::ports::{ApiGateway, CredentialStore, CredentialStoreError};
use crate::domain::{
    AuthApi, Failure, QueryCache, ResourceClient, Role, SessionController, SessionError,
    SessionState, User, UserProfile,
};
use crate::inbound::forms::{LoginForm, RegisterForm, UserForm};
use crate::inbound::{RouteView, Router};
use crate::outbound::credentials::FileCredentialStore;
use crate::outbound::http::ReqwestGateway;

/// Errors raised while building the console from configuration.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A setting could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The credential directory could not be opened.
    #[error(transparent)]
    Store(#[from] CredentialStoreError),
    /// The HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Counts shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    /// First page of users.
    pub users: Page<User>,
    /// Every role.
    pub roles: Page<Role>,
}

impl DashboardSummary {
    /// Total users as reported by the paginator, else the page length.
    #[must_use]
    pub fn user_total(&self) -> u64 {
        page_total(&self.users)
    }

    /// Total roles as reported by the paginator, else the page length.
    #[must_use]
    pub fn role_total(&self) -> u64 {
        page_total(&self.roles)
    }
}

fn page_total<T>(page: &Page<T>) -> u64 {
    page.meta()
        .map_or_else(|| u64::try_from(page.len()).unwrap_or(u64::MAX), |meta| meta.total)
}

/// The wired console core.
pub struct Console {
    store: Arc<dyn CredentialStore>,
    cache: Arc<QueryCache>,
    router: Arc<Router>,
    session: Arc<SessionController>,
    auth: AuthApi,
    users: ResourceClient<User>,
    roles: ResourceClient<Role>,
}

impl Console {
    /// Build the production console from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError`] when a setting is invalid, the credential
    /// directory cannot be opened, or the HTTP client cannot be built.
    pub fn from_settings(settings: &ConsoleSettings) -> Result<Self, ConsoleError> {
        let base_url = settings.api_base_url()?;
        let timeout = settings.request_timeout()?;
        let max_age = settings.cache_max_age()?;
        let storage_dir = settings.storage_dir();

        let store: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::open(&storage_dir)?);
        let gateway = Arc::new(ReqwestGateway::new(
            base_url.clone(),
            timeout,
            Arc::clone(&store),
        )?);
        info!(
            api_base_url = %base_url,
            storage_dir = %storage_dir.display(),
            "console configured"
        );
        Ok(Self::assemble(store, gateway, Arc::new(DefaultClock), max_age))
    }

    /// Wire the core around explicit adapters.
    #[must_use]
    pub fn assemble(
        store: Arc<dyn CredentialStore>,
        gateway: Arc<dyn ApiGateway>,
        clock: Arc<dyn Clock + Send + Sync>,
        max_age: TimeDelta,
    ) -> Self {
        let cache = Arc::new(QueryCache::new(clock, max_age));
        let router = Arc::new(Router::new());
        let session = Arc::new(SessionController::init(
            Arc::clone(&store),
            Arc::clone(&cache),
            router.clone(),
        ));
        let auth = AuthApi::new(Arc::clone(&gateway));
        let users = ResourceClient::new(Arc::clone(&gateway), Arc::clone(&cache), session.clone());
        let roles = ResourceClient::new(gateway, Arc::clone(&cache), session.clone());
        Self {
            store,
            cache,
            router,
            session,
            auth,
            users,
            roles,
        }
    }

    /// Session controller.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionController> {
        &self.session
    }

    /// Router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Shared query cache.
    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Credential store.
    #[must_use]
    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    /// Login and registration client.
    #[must_use]
    pub fn auth(&self) -> &AuthApi {
        &self.auth
    }

    /// User client.
    #[must_use]
    pub fn users(&self) -> &ResourceClient<User> {
        &self.users
    }

    /// Role client.
    #[must_use]
    pub fn roles(&self) -> &ResourceClient<Role> {
        &self.roles
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Profile of the logged-in user.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        self.session.current_user()
    }

    /// Navigate to `path` and return what the guard lets through.
    pub fn open(&self, path: &str) -> RouteView {
        self.router.visit(path, self.session.state())
    }

    /// Empty login form bound to this console's session.
    #[must_use]
    pub fn login_form(&self) -> LoginForm {
        LoginForm::new(self.auth.clone(), Arc::clone(&self.session))
    }

    /// Empty registration form.
    #[must_use]
    pub fn register_form(&self) -> RegisterForm {
        RegisterForm::new(self.auth.clone(), Arc::clone(&self.session))
    }

    /// Blank user creation form.
    #[must_use]
    pub fn new_user_form(&self) -> UserForm {
        UserForm::create(self.users.clone())
    }

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the stored credential could not be
    /// removed. The session is anonymous either way.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.session.logout()
    }

    /// Load the first page of users and every role concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first [`Failure`] either request produced.
    pub async fn dashboard(&self) -> Result<DashboardSummary, Failure> {
        let everything = ListQuery::default();
        let (users, roles) =
            try_join(self.users.list(&everything), self.roles.list(&everything)).await?;
        Ok(DashboardSummary { users, roles })
    }
}
