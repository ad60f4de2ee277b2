//! Shared domain types for Parley.
//!
//! Sessions, metrics snapshots, conversation windows, agent/task catalog
//! entries, pipeline results, configuration, and the error taxonomy used
//! across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod catalog;
pub mod config;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod pipeline;
pub mod reply;
pub mod room;
pub mod session;
