//! Browser artifact for the presage prefetch scheduler.
//!
//! Compiled with `wasm-pack` and loaded as an ES module, this crate is
//! self-starting: module init waits for the document to finish parsing,
//! resolves configuration from the embedding page, latches the interaction
//! mode, and wires whichever listeners that mode calls for. All mutable
//! state lives in a thread-local scheduler context on the main thread.

/// DOM-backed implementations of the page surfaces.
#[cfg(target_arch = "wasm32")]
pub mod dom;

/// Configuration intake from the embedding page.
#[cfg(target_arch = "wasm32")]
pub mod embed;

/// Bootstrap, event wiring, and the thread-local scheduler context.
#[cfg(target_arch = "wasm32")]
pub mod runtime;


#[cfg(target_arch = "wasm32")]
pub use crate::runtime::presage_snapshot;
