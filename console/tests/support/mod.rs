//! Shared helpers for console integration tests.
//!
//! Integration tests compile as separate crates, so the stub backend lives
//! here and each test file pulls it in with `mod support;`.

pub mod stub_backend;
