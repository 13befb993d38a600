//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, routes)
//!     → request.rs (request ID, conditional headers, path ids)
//!     → handlers/ (decode body → payload.rs → store)
//!     → response.rs (status mapping, ETag / Location headers)
//!     → Send to client
//! ```

pub mod handlers;
pub mod location;
pub mod payload;
pub mod request;
pub mod response;
pub mod server;

pub use location::Locator;
pub use request::{MakeRequestUuid, Preconditions, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};
