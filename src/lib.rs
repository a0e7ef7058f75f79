//! # Resource Store
//!
//! > **Client-side state for REST collections, one actor per collection.**
//!
//! This crate turns a REST collection (`/posts/abc/comments`) into a namespaced
//! store module: normalized state, declared mutations, async actions that talk
//! to the API, and synchronous getters. Every fetched or created entity is a
//! [`Resource`](resource::Resource) that can save, delete and update itself.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### One Writer per Module
//! Each module's state is owned by a single Tokio task (the store actor). Actions,
//! resources and the root store never touch the state directly; they send
//! [`Mutation`](store::Mutation)s over a channel and wait for the acknowledgement.
//! Mutations are applied sequentially, so there are no locks around the state.
//!
//! ### Snapshots for Reads
//! After every mutation the actor publishes an immutable snapshot. Getters read
//! the latest snapshot synchronously, and [`subscribe`](module::ResourceModule::subscribe)
//! hands out a receiver that wakes on every change.
//!
//! ### Failures Live in State
//! HTTP failures never escape an action. They become `status = ERROR` plus the
//! stored [`ResourceError`](error::ResourceError), the way a UI would render them.
//! Only channel-level failures ([`StoreError`](error::StoreError)) are returned.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Factory ([`module`])
//! - **Role**: builds a fresh store module for one collection and runs its actions.
//! - **Key items**: [`create_resource_module`](module::create_resource_module),
//!   [`ResourceModule`](module::ResourceModule), [`NewResource`](module::NewResource).
//!
//! ### 2. The Instance ([`resource`])
//! - **Role**: one entity with hidden metadata; `save`, `delete`, `set`.
//!
//! ### 3. The Engine ([`store`])
//! - **Role**: the store actor, its clients, the state and the mutation set.
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! - **Role**: registers modules by name, string dispatch and getters, shutdown, tracing.
//! - **Key items**: [`Store`](lifecycle::Store), [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 5. The Plumbing ([`http`], [`path`], [`inflect`], [`normalize`], [`config`])
//! - **Role**: the transport seam and its mock, URL path generation, pluralization,
//!   entity normalization, JSON configuration.
//!
//! ## 🚀 Quick Start
//!
//! ```rust,no_run
//! use resource_store::module::create_resource_module;
//! use resource_store::path::PathSegments;
//!
//! # async fn demo() {
//! let posts = create_resource_module("posts", "http://localhost:3000", None);
//! posts.fetch_resources(&PathSegments::new()).await;
//!
//! for post in posts.all() {
//!     println!("{}", serde_json::to_string(&post).unwrap_or_default());
//! }
//! # }
//! ```
//!
//! ### Running the Demo
//!
//! ```bash
//! RESOURCE_STORE_BASE_URL=http://localhost:3000 RUST_LOG=info cargo run -- comments post=abc
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod inflect;
pub mod lifecycle;
pub mod module;
pub mod normalize;
pub mod path;
pub mod resource;
pub mod store;

pub use error::{ConfigError, DispatchError, ResourceError, StoreError};
pub use lifecycle::{setup_tracing, Dispatched, Store};
pub use module::{create_resource_module, NewResource, ResourceModule};
pub use path::{generate_path, PathSegments};
pub use resource::{Lifecycle, Resource};
pub use store::{LocalId, Mutation, Status};
