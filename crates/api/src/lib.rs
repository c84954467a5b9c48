//! Generation queue API server library.
//!
//! Exposes config, state, error handling, the form registry and the route
//! tree so integration tests and the binary entrypoint share them.

pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
