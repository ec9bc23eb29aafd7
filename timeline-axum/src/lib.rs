//! # Timeline Axum Integration
//!
//! HTTP surface for the Timeline API: the `/auth` routes, record CRUD for
//! users, customers and products, and the bearer middleware guarding them.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use timeline::{JwtConfig, SqliteRepositoryProvider, Timeline};
//!
//! #[tokio::main]
//! async fn main() {
//!     let repositories = Arc::new(SqliteRepositoryProvider::connect("sqlite://timeline.db?mode=rwc").await.unwrap());
//!     let timeline = Timeline::new(repositories, JwtConfig::new_random_hs256().unwrap());
//!     timeline.migrate().await.unwrap();
//!
//!     let app = timeline_axum::create_router(Arc::new(timeline));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

mod error;
mod extractors;
mod middleware;
mod routes;
mod types;

pub use error::{ApiError, Result};
pub use extractors::{ApiJson, ApiPath, CurrentCaller};
pub use middleware::{AppState, require_bearer};
pub use routes::create_router;
pub use types::*;
