//! Terminal client library for the diaglab diagram-generation service
//!
//! This library provides session handling, the client-side diagram
//! collection store, the notification queue, and the HTTP bindings used
//! by the `diaglab` binary.

mod api;
mod cli;
mod config;
mod demo;
mod diagram;
mod envelope;
mod errors;
mod notify;
mod query;
mod session;
mod store;
mod templates;
mod types;
mod user;

// Re-export key components
pub use api::*;
pub use cli::*;
pub use config::*;
pub use demo::*;
pub use diagram::*;
pub use envelope::*;
pub use errors::*;
pub use notify::*;
pub use query::*;
pub use session::*;
pub use store::*;
pub use templates::*;
pub use types::*;
pub use user::*;
