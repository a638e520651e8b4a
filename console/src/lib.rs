//! Admin console client core.
//!
//! The crate owns the client-side half of the admin console: the persisted
//! credential, the session state consulted by routing, the authenticated API
//! gateway, and the cached resource access layer that normalises backend
//! failures into field-level errors.
//!
//! Layout follows a hexagonal split:
//! - `domain`: types, services, and the ports they depend on.
//! - `inbound`: driving adapters (router, form controllers).
//! - `outbound`: driven adapters (credential storage, HTTP transport).
//! - `console`: composition root wiring adapters from configuration.

pub mod config;
pub mod console;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use config::ConsoleSettings;
pub use console::Console;
