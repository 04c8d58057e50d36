//! Per-session playback queue store.
//!
//! This module provides the queue system at the heart of the bot:
//! - One ordered queue per chat session, created lazily on first use
//! - The front entry is the one currently playing
//! - Atomic enqueue / advance / force-replace / inspect / clear operations
//! - Per-session locking so unrelated chats never stall one another
//!
//! Queues live in memory only and are lost on restart.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::entry::MediaEntry;

/// Identifier for a chat session. Group chats use negative values.
pub type SessionId = i64;

/// Default number of upcoming entries returned by `peek_next`.
pub const DEFAULT_PEEK_COUNT: usize = 2;

/// Minimum allowed default peek window.
pub const MIN_PEEK_COUNT: usize = 1;

/// Maximum allowed default peek window.
pub const MAX_PEEK_COUNT: usize = 10;

/// Configuration for the queue store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueConfig {
    /// Number of upcoming entries `peek_next` returns when the caller does
    /// not pass an explicit count.
    #[serde(default = "default_peek_count")]
    pub peek_count: usize,
}

const fn default_peek_count() -> usize {
    DEFAULT_PEEK_COUNT
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            peek_count: DEFAULT_PEEK_COUNT,
        }
    }
}

impl QueueConfig {
    /// Validate and clamp the `peek_count` value.
    pub fn validate(&mut self) {
        self.peek_count = self.peek_count.clamp(MIN_PEEK_COUNT, MAX_PEEK_COUNT);
    }
}

/// Store-wide statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of sessions the store currently tracks, including empty ones.
    pub sessions: usize,
    /// Total entries across all session queues.
    pub total_entries: usize,
    /// Entries whose media is already fetched and ready to stream.
    pub materialized_entries: usize,
}

/// Queue state for a single session.
///
/// Position 0 is the currently playing entry; positions stay dense at
/// every point a caller can observe.
#[derive(Debug, Default)]
struct SessionQueue {
    entries: VecDeque<MediaEntry>,
}

impl SessionQueue {
    /// Append an entry and return the position it landed at.
    fn add(&mut self, entry: MediaEntry) -> usize {
        self.entries.push_back(entry);
        self.entries.len() - 1
    }

    /// Find the first entry with the given id.
    fn check_item(&self, id: &str) -> Option<(usize, MediaEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.id() == id)
            .map(|(position, entry)| (position, entry.clone()))
    }

    /// Replace the currently playing entry, optionally excising the entry
    /// at `remove_offset` from the new front.
    ///
    /// Offsets of 0 (the just-promoted entry itself) or past the end
    /// perform no extra removal.
    fn force_add(&mut self, entry: MediaEntry, remove_offset: Option<usize>) {
        self.entries.pop_front();
        self.entries.push_front(entry);
        let offset = remove_offset.unwrap_or(0);
        if offset > 0 && offset < self.entries.len() {
            self.entries.remove(offset);
        }
    }

    /// Drop the just-finished front entry and return the new front.
    fn advance(&mut self) -> Option<MediaEntry> {
        self.entries.pop_front()?;
        self.entries.front().cloned()
    }

    /// Up to `count` upcoming entries, excluding the current one.
    fn peek_next(&self, count: usize) -> Vec<MediaEntry> {
        self.entries.iter().skip(1).take(count).cloned().collect()
    }

    /// Full snapshot including the current entry.
    fn snapshot(&self) -> Vec<MediaEntry> {
        self.entries.iter().cloned().collect()
    }
}

/// Shared handle to one session's queue.
type SessionHandle = Arc<RwLock<SessionQueue>>;

/// Concurrency-safe per-session playback queue store.
///
/// Callers driving playback (enqueue commands, track-finished events, skip
/// commands) share one store instance; operations on the same session are
/// serialized by that session's own lock, while the store-wide registry
/// lock is only held long enough to look a session up.
pub struct QueueStore {
    /// Session registry. Sessions are provisioned lazily on first mutation
    /// and survive `clear` so later adds need no special-casing.
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    /// Store configuration.
    config: QueueConfig,
}

impl QueueStore {
    /// Create a new store with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Create a new store with custom configuration.
    #[must_use]
    pub fn with_config(mut config: QueueConfig) -> Self {
        config.validate();
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Get the current configuration.
    #[must_use]
    pub const fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Get the session's queue handle, provisioning an empty one if the
    /// session is new. The existence check is re-done under the write lock
    /// so two tasks racing on a fresh session share one queue.
    async fn session(&self, session: SessionId) -> SessionHandle {
        {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(&session) {
                return Arc::clone(handle);
            }
        }
        let mut sessions = self.sessions.write().await;
        Arc::clone(sessions.entry(session).or_insert_with(|| {
            debug!("Provisioning queue: session={}", session);
            Arc::new(RwLock::new(SessionQueue::default()))
        }))
    }

    /// Get the session's queue handle without provisioning.
    async fn existing_session(&self, session: SessionId) -> Option<SessionHandle> {
        self.sessions.read().await.get(&session).map(Arc::clone)
    }

    /// Append an entry to the tail of the session's queue.
    ///
    /// Returns the zero-based position the entry occupies at the moment of
    /// insertion.
    pub async fn add(&self, session: SessionId, entry: MediaEntry) -> usize {
        let handle = self.session(session).await;
        let mut queue = handle.write().await;
        let id = entry.id().to_owned();
        let position = queue.add(entry);
        info!(
            "Queued entry: session={}, id={}, position={}",
            session, id, position
        );
        position
    }

    /// Find the first entry with the given id in the session's queue.
    ///
    /// Returns the entry's position and a copy of it, or `None` when no
    /// entry matches. The scan runs over a consistent snapshot.
    pub async fn check_item(
        &self,
        session: SessionId,
        id: &str,
    ) -> Option<(usize, MediaEntry)> {
        let handle = self.existing_session(session).await?;
        let queue = handle.read().await;
        queue.check_item(id)
    }

    /// Atomically replace the currently playing entry.
    ///
    /// Drops the front entry if present and pushes `entry` in its place.
    /// When `remove_offset` is `Some(k)` with `0 < k < len`, the entry at
    /// offset `k` from the new front is also removed, order of the rest
    /// preserved. This supports promoting a queued entry to play next
    /// without leaving its old copy behind. `Some(0)`, out-of-range
    /// offsets, and `None` perform no extra removal.
    pub async fn force_add(
        &self,
        session: SessionId,
        entry: MediaEntry,
        remove_offset: Option<usize>,
    ) {
        let handle = self.session(session).await;
        let mut queue = handle.write().await;
        info!(
            "Force-playing entry: session={}, id={}, remove_offset={:?}",
            session,
            entry.id(),
            remove_offset
        );
        queue.force_add(entry, remove_offset);
    }

    /// Get the currently playing entry, if any. Non-mutating.
    pub async fn current(&self, session: SessionId) -> Option<MediaEntry> {
        let handle = self.existing_session(session).await?;
        let queue = handle.read().await;
        queue.entries.front().cloned()
    }

    /// Advance playback, or peek at what would play next.
    ///
    /// With `peek_only` set, returns the entry at position 1 without
    /// mutating anything (`None` when fewer than two entries exist).
    /// Otherwise removes the just-finished front entry and returns the new
    /// front, or `None` when the queue empties. Concurrent adds are never
    /// lost and concurrent reads observe either the pre- or post-advance
    /// state.
    pub async fn get_next(&self, session: SessionId, peek_only: bool) -> Option<MediaEntry> {
        let handle = self.existing_session(session).await?;
        if peek_only {
            let queue = handle.read().await;
            return queue.entries.get(1).cloned();
        }
        let mut queue = handle.write().await;
        let next = queue.advance();
        debug!(
            "Advanced queue: session={}, next={:?}",
            session,
            next.as_ref().map(MediaEntry::id)
        );
        next
    }

    /// Get a snapshot of the full queue, including the current entry.
    ///
    /// Later mutations never alter a previously returned snapshot.
    pub async fn queue(&self, session: SessionId) -> Vec<MediaEntry> {
        match self.existing_session(session).await {
            Some(handle) => handle.read().await.snapshot(),
            None => Vec::new(),
        }
    }

    /// Remove only the currently playing entry, if present.
    pub async fn remove_current(&self, session: SessionId) {
        if let Some(handle) = self.existing_session(session).await {
            let mut queue = handle.write().await;
            if let Some(dropped) = queue.entries.pop_front() {
                debug!(
                    "Removed current entry: session={}, id={}",
                    session,
                    dropped.id()
                );
            }
        }
    }

    /// Empty the session's queue. The session itself is kept, so later
    /// adds work without special-casing.
    pub async fn clear(&self, session: SessionId) {
        if let Some(handle) = self.existing_session(session).await {
            let mut queue = handle.write().await;
            let dropped = queue.entries.len();
            queue.entries.clear();
            info!("Cleared queue: session={}, dropped={}", session, dropped);
        }
    }

    /// Get up to `count` upcoming entries, excluding the current one.
    ///
    /// Returns an empty list for queues with fewer than two entries. When
    /// `count` is `None` the configured default window is used.
    pub async fn peek_next(&self, session: SessionId, count: Option<usize>) -> Vec<MediaEntry> {
        let count = count.unwrap_or(self.config.peek_count);
        match self.existing_session(session).await {
            Some(handle) => handle.read().await.peek_next(count),
            None => Vec::new(),
        }
    }

    /// Number of entries in the session's queue, current entry included.
    pub async fn len(&self, session: SessionId) -> usize {
        match self.existing_session(session).await {
            Some(handle) => handle.read().await.entries.len(),
            None => 0,
        }
    }

    /// Check if the session's queue has no entries.
    pub async fn is_empty(&self, session: SessionId) -> bool {
        self.len(session).await == 0
    }

    /// Calculate store-wide statistics.
    pub async fn stats(&self) -> StoreStats {
        let sessions = self.sessions.read().await;
        let mut stats = StoreStats {
            sessions: sessions.len(),
            ..StoreStats::default()
        };
        for handle in sessions.values() {
            let queue = handle.read().await;
            stats.total_entries += queue.entries.len();
            stats.materialized_entries += queue
                .entries
                .iter()
                .filter(|entry| entry.is_materialized())
                .count();
        }
        stats
    }
}

impl Default for QueueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
