//! Core functionality for the timeline API
//!
//! This crate holds everything that does not depend on a particular storage
//! backend or HTTP framework:
//!
//! - the record types ([`Account`], [`Customer`], [`Product`]) and their outward views
//! - the error taxonomy in [`error`]
//! - repository traits in [`repositories`] that storage crates implement
//! - services in [`services`], most importantly the [`CredentialGuard`] which
//!   verifies credentials, enforces account lockout and issues session tokens
//! - stateless JWT sessions in [`session`]
pub mod account;
pub mod crypto;
pub mod customer;
pub mod error;
pub mod id;
pub mod product;
pub mod repositories;
pub mod services;
pub mod session;
pub mod validation;

pub use account::{Account, AccountId, AccountUpdate, AccountView, NewAccount, Role};
pub use customer::{Customer, CustomerId, CustomerUpdate, CustomerView, NewCustomer};
pub use error::Error;
pub use product::{NewProduct, Product, ProductId};
pub use repositories::RepositoryProvider;
pub use services::{
    AccountService, AuthSession, CredentialGuard, CustomerService, LockStatus, LockoutConfig,
    ProductService,
};
pub use session::{Caller, JwtClaims, JwtConfig, JwtSessionProvider, SessionConfig, SessionToken};
