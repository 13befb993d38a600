//! In-memory shopping list HTTP service with ETag-based optimistic
//! concurrency control.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod store;
pub mod versioning;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::ShoppingStore;
