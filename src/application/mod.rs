// Application layer - use cases and orchestration shared by the HTTP server and the CLI.

pub mod auth;
pub mod error;
pub mod service;

pub use auth::*;
pub use error::*;
pub use service::*;
