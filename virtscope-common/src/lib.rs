//! # virtscope Common
//!
//! Shared utilities for the virtscope components.
//!
//! ## Logging
//!
//! Tracing-based logging setup shared by all crates:
//!
//! ```rust
//! use virtscope_common::init_logging;
//!
//! // Initialize with level
//! init_logging("info").unwrap();
//! ```

pub mod logging;

// Re-export logging functions
pub use logging::{init_logging, init_logging_json, init_test_logging};
