//! VoxQueue Core Library
//!
//! This crate provides the per-conversation playback core for the VoxQueue
//! chat music bot:
//! - Media entry payloads (resolved remote tracks and direct file uploads)
//! - A concurrency-safe per-session queue store driving playback order
//! - Validation errors for malformed payloads
//!
//! Queues are in-memory and scoped to the process lifetime; the messaging
//! transport, media download backend, and chat administration layers are
//! separate collaborators built on top of this crate.

pub mod entry;
pub mod error;
pub mod queue;

pub use entry::{Media, MediaEntry, Track};
pub use error::{Error, Result};
pub use queue::{DEFAULT_PEEK_COUNT, QueueConfig, QueueStore, SessionId, StoreStats};
