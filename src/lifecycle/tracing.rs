//! # Observability & Tracing
//!
//! Every module action and every resource operation runs inside a span carrying
//! the collection name (`resource`) and, for instances, the client-local id
//! (`local_id`). The store task logs each applied mutation at `debug` level.
//!
//! ## Log Levels
//!
//! - `info` - completed fetches, saves and deletes, module start and stop
//! - `debug` - individual mutations and request payloads
//! - `warn` - HTTP failures captured into module state, failed commits
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run -- comments post=abc
//! RUST_LOG=resource_store=debug cargo run -- posts
//! ```
//!
//! The compact format shows span hierarchy inline:
//! - `INFO fetch_resources{resource="comments"}: Fetched path=/posts/abc/comments count=2`
//! - `WARN save{resource="comments" local_id=local_7}: Request failed error=HTTP 500: ...`

/// Installs a compact fmt subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // spans already name the resource
        .compact()
        .try_init();
}
