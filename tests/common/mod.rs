// tests/common/mod.rs

//! Shared helpers for the integration tests.

#[allow(unused_imports)]
pub use gowatch_test_utils::init_tracing;
