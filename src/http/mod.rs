//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, request-id / trace / timeout layers)
//!     → handlers.rs (DTO parsing, dispatch to managers & coordinator)
//!     → response.rs (domain error → status code + problem body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use response::ApiError;
pub use server::{AppState, HttpServer};
