//! Retry module
//! - policy.rs: policy-based retries with exponential backoff and jitter
//!
//! Only plain request/response calls are retried; a stream may already have
//! shown partial text and is never replayed.

pub mod policy;

pub use policy::*;
