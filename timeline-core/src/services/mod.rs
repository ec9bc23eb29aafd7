//! Service layer for business logic
//!
//! Services are generic over the repository traits and hold them behind `Arc`,
//! so a single storage provider can back all of them.

pub mod account;
pub mod customer;
pub mod guard;
pub mod lockout;
pub mod product;

pub use account::AccountService;
pub use customer::CustomerService;
pub use guard::{AuthSession, CredentialGuard};
pub use lockout::{LockStatus, LockoutConfig};
pub use product::ProductService;
