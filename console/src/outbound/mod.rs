//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **credentials**: file-backed and in-memory credential stores
//! - **http**: reqwest-backed API gateway
//!
//! Adapters are thin translators between domain types and the storage or
//! wire representation. They contain no session or caching logic.

pub mod credentials;
pub mod http;
