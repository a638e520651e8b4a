//! Driving adapters: the router and the form controllers views talk to.

pub mod forms;
pub mod router;

pub use router::{RouteView, Router};
