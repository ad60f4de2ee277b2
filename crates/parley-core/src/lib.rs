//! State and resilience layer for Parley.
//!
//! Every inbound chat command passes through the components defined here:
//! a TTL response cache, a per-(user, room) session store, a fixed-window
//! rate limiter, a metrics recorder, a retry wrapper around the agent call,
//! and an encrypted, auto-summarizing conversation memory. The
//! [`orchestrator::Orchestrator`] composes them around each command.
//!
//! This crate also defines the "ports" (traits) the infrastructure layer
//! implements: durable record storage, the room key registry, the content
//! cipher, the agent pipeline and the summarizer. It depends only on
//! `parley-types` -- never on `parley-infra` or any database/IO crate.

pub mod cache;
pub mod cipher;
pub mod command;
pub mod memory;
pub mod metrics;
pub mod orchestrator;
pub mod pipeline;
pub mod rate_limit;
pub mod repository;
pub mod retry;
pub mod session;
pub mod sweeper;

#[cfg(test)]
pub(crate) mod testing;
