//! Resource query layer: cached reads, invalidating mutations, and the
//! single classification of backend failures.

mod auth_api;
mod classify;
mod envelope;
mod exchange;
mod resources;

pub use auth_api::AuthApi;
pub use resources::{Mutated, QueryOutcome, ResourceClient};
