//! Runtime orchestration and lifecycle management.
//!
//! - [`Store`] - registers resource modules under their names, routes
//!   string-addressed actions and getters, and shuts every module down
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod store;
pub mod tracing;

pub use self::store::*;
pub use self::tracing::*;
