//! Infrastructure layer for Parley.
//!
//! Contains implementations of the port traits defined in `parley-core`:
//! SQLite storage for rooms and encrypted history, the AES-256-GCM content
//! cipher, the OpenAI-compatible agent pipeline and summarizer, and the
//! configuration and catalog file loaders.

pub mod catalog;
pub mod config;
pub mod crypto;
pub mod llm;
pub mod sqlite;
