//! # Timeline
//!
//! Account, customer and product management for the Timeline API, with
//! password sign-in, account lockout and stateless JWT sessions.
//!
//! [`Timeline`] wires a storage backend to the services in `timeline-core`.
//! Build it once at startup and share it behind an `Arc`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use timeline::{JwtConfig, SqliteRepositoryProvider, Timeline};
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = sqlx::SqlitePool::connect("sqlite://timeline.db?mode=rwc").await.unwrap();
//!     let repositories = Arc::new(SqliteRepositoryProvider::new(pool));
//!
//!     let timeline = Timeline::new(repositories, JwtConfig::new_hs256(b"secret".to_vec()));
//!     timeline.migrate().await.unwrap();
//!
//!     let session = timeline
//!         .register("Alice", "alice@example.com", "hunter2", None)
//!         .await
//!         .unwrap();
//!     println!("{}", session.user.email);
//! }
//! ```
use std::sync::Arc;

use timeline_core::{
    repositories::{AccountRepositoryAdapter, CustomerRepositoryAdapter, ProductRepositoryAdapter},
    services::{AccountService, CredentialGuard, CustomerService, ProductService},
};

/// Re-export core types from timeline_core
pub use timeline_core::{
    Account, AccountId, AccountUpdate, AccountView, AuthSession, Caller, Customer, CustomerId, CustomerUpdate,
    CustomerView, Error, JwtClaims, JwtConfig, JwtSessionProvider, LockStatus, LockoutConfig,
    NewCustomer, NewProduct, Product, ProductId, RepositoryProvider, Role, SessionConfig,
    SessionToken, error,
};

#[cfg(feature = "sqlite")]
pub use timeline_storage_sqlite::SqliteRepositoryProvider;

pub type Guard<R> = CredentialGuard<AccountRepositoryAdapter<R>>;
pub type Accounts<R> = AccountService<AccountRepositoryAdapter<R>>;
pub type Customers<R> = CustomerService<CustomerRepositoryAdapter<R>>;
pub type Products<R> = ProductService<ProductRepositoryAdapter<R>>;

/// Coordinator holding the repository provider and every service built on it.
pub struct Timeline<R: RepositoryProvider> {
    repositories: Arc<R>,
    jwt_config: JwtConfig,
    session_config: SessionConfig,
    lockout_config: LockoutConfig,
    guard: Arc<Guard<R>>,
    accounts: Arc<Accounts<R>>,
    customers: Arc<Customers<R>>,
    products: Arc<Products<R>>,
}

impl<R: RepositoryProvider> Timeline<R> {
    /// Create a new instance with the default session lifetime and lockout policy
    pub fn new(repositories: Arc<R>, jwt_config: JwtConfig) -> Self {
        let session_config = SessionConfig::default();
        let lockout_config = LockoutConfig::default();

        Self {
            guard: Arc::new(Self::build_guard(
                &repositories,
                &jwt_config,
                &session_config,
                &lockout_config,
            )),
            accounts: Arc::new(AccountService::new(Arc::new(AccountRepositoryAdapter::new(
                repositories.clone(),
            )))),
            customers: Arc::new(CustomerService::new(Arc::new(
                CustomerRepositoryAdapter::new(repositories.clone()),
            ))),
            products: Arc::new(ProductService::new(Arc::new(ProductRepositoryAdapter::new(
                repositories.clone(),
            )))),
            repositories,
            jwt_config,
            session_config,
            lockout_config,
        }
    }

    fn build_guard(
        repositories: &Arc<R>,
        jwt_config: &JwtConfig,
        session_config: &SessionConfig,
        lockout_config: &LockoutConfig,
    ) -> Guard<R> {
        CredentialGuard::new(
            Arc::new(AccountRepositoryAdapter::new(repositories.clone())),
            JwtSessionProvider::new(jwt_config.clone(), session_config.clone()),
            lockout_config.clone(),
        )
    }

    fn rebuild_guard(mut self) -> Self {
        self.guard = Arc::new(Self::build_guard(
            &self.repositories,
            &self.jwt_config,
            &self.session_config,
            &self.lockout_config,
        ));
        self
    }

    /// Set the session token lifetime
    pub fn with_session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self.rebuild_guard()
    }

    /// Set the lockout threshold and duration
    pub fn with_lockout_config(mut self, config: LockoutConfig) -> Self {
        self.lockout_config = config;
        self.rebuild_guard()
    }

    pub fn guard(&self) -> &Guard<R> {
        &self.guard
    }

    pub fn accounts(&self) -> &Accounts<R> {
        &self.accounts
    }

    pub fn customers(&self) -> &Customers<R> {
        &self.customers
    }

    pub fn products(&self) -> &Products<R> {
        &self.products
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }

    /// Run migrations for all repositories
    pub async fn migrate(&self) -> Result<(), Error> {
        self.repositories.migrate().await
    }

    /// Health check for all repositories
    pub async fn health_check(&self) -> Result<(), Error> {
        self.repositories.health_check().await.inspect_err(|e| {
            tracing::error!(error = %e, "Storage health check failed");
        })
    }

    /// Sign in with email and password
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, Error> {
        self.guard.authenticate(email, password).await
    }

    /// Create an account and sign it in
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<AuthSession, Error> {
        self.guard.register(full_name, email, password, role).await
    }

    /// Resolve an `Authorization` header value to the calling account
    pub async fn resolve_caller(&self, authorization: Option<&str>) -> Result<AccountView, Error> {
        self.guard.resolve_caller(authorization).await
    }

    /// Verify an `Authorization` header value without a store lookup
    pub fn verify_token(&self, authorization: Option<&str>) -> Result<Caller, Error> {
        self.guard.verify_token(authorization)
    }
}
