//! HTTP transport adapters.

mod gateway;

pub use gateway::{ReqwestGateway, TRACE_ID_HEADER};
