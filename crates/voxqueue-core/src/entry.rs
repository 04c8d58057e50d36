//! Media entry payloads queued for playback.
//!
//! A session queue holds one of two payload shapes: a [`Track`] resolved
//! from a remote streaming source, or a [`Media`] file sent directly in the
//! chat. Both are plain values constructed by the media-resolution
//! collaborator and carried through the store unmodified; the store's own
//! logic only ever inspects the identifier and the materialization flag.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A track resolved from a remote streaming source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Identifier of the track, distinct per enqueue.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Source page or stream URL.
    pub url: String,
    /// Track length in seconds, when the resolver knows it.
    pub duration_secs: Option<u64>,
    /// Display name of the user who requested the track.
    pub requested_by: Option<String>,
    /// Local file once the media has been fetched.
    pub file_path: Option<PathBuf>,
}

impl Track {
    /// Create a new track payload.
    ///
    /// Returns [`Error::EmptyEntryId`] if `id` is empty.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::EmptyEntryId);
        }
        Ok(Self {
            id,
            title: title.into(),
            url: url.into(),
            duration_secs: None,
            requested_by: None,
            file_path: None,
        })
    }

    /// Set the track length in seconds.
    #[must_use]
    pub const fn with_duration_secs(mut self, secs: u64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// Set the requesting user's display name.
    #[must_use]
    pub fn with_requested_by(mut self, user: impl Into<String>) -> Self {
        self.requested_by = Some(user.into());
        self
    }

    /// Set the local file the media was fetched to.
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

/// A media file sent directly in the chat (audio or video attachment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Identifier of the file, distinct per enqueue.
    pub id: String,
    /// Original file name, when the transport reports one.
    pub file_name: Option<String>,
    /// MIME type reported by the transport.
    pub mime_type: Option<String>,
    /// Media length in seconds, when known.
    pub duration_secs: Option<u64>,
    /// Local file once the media has been fetched.
    pub file_path: Option<PathBuf>,
}

impl Media {
    /// Create a new media payload.
    ///
    /// Returns [`Error::EmptyEntryId`] if `id` is empty.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::EmptyEntryId);
        }
        Ok(Self {
            id,
            file_name: None,
            mime_type: None,
            duration_secs: None,
            file_path: None,
        })
    }

    /// Set the original file name.
    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Set the MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    /// Set the media length in seconds.
    #[must_use]
    pub const fn with_duration_secs(mut self, secs: u64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// Set the local file the media was fetched to.
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

/// A queued media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaEntry {
    /// A track resolved from a remote streaming source.
    Track(Track),
    /// A file sent directly in the chat.
    Media(Media),
}

impl MediaEntry {
    /// Get the entry's identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Track(track) => &track.id,
            Self::Media(media) => &media.id,
        }
    }

    /// Get the display name for this entry.
    ///
    /// Tracks display their title, direct files their file name; either
    /// falls back to the raw identifier.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Track(track) if !track.title.is_empty() => &track.title,
            Self::Track(track) => &track.id,
            Self::Media(media) => media.file_name.as_deref().unwrap_or(&media.id),
        }
    }

    /// Get the entry length in seconds, when known.
    #[must_use]
    pub const fn duration_secs(&self) -> Option<u64> {
        match self {
            Self::Track(track) => track.duration_secs,
            Self::Media(media) => media.duration_secs,
        }
    }

    /// Get the local file the media was fetched to, if any.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::Track(track) => track.file_path.as_deref(),
            Self::Media(media) => media.file_path.as_deref(),
        }
    }

    /// Check if the underlying media has already been fetched.
    ///
    /// True iff a non-empty local file path is set.
    #[must_use]
    pub fn is_materialized(&self) -> bool {
        self.file_path()
            .is_some_and(|path| !path.as_os_str().is_empty())
    }
}

impl From<Track> for MediaEntry {
    fn from(track: Track) -> Self {
        Self::Track(track)
    }
}

impl From<Media> for MediaEntry {
    fn from(media: Media) -> Self {
        Self::Media(media)
    }
}

impl std::fmt::Display for MediaEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_new_rejects_empty_id() {
        let result = Track::new("", "Some Title", "https://tube.example/watch?v=abc");
        assert_eq!(result.unwrap_err(), Error::EmptyEntryId);
    }

    #[test]
    fn media_new_rejects_empty_id() {
        let result = Media::new("");
        assert_eq!(result.unwrap_err(), Error::EmptyEntryId);
    }

    #[test]
    fn track_builders_set_optional_fields() {
        let track = Track::new("abc123", "Night Drive", "https://tube.example/watch?v=abc123")
            .unwrap()
            .with_duration_secs(214)
            .with_requested_by("ravi")
            .with_file_path("/var/cache/voxqueue/abc123.m4a");

        assert_eq!(track.duration_secs, Some(214));
        assert_eq!(track.requested_by.as_deref(), Some("ravi"));
        assert_eq!(
            track.file_path.as_deref(),
            Some(Path::new("/var/cache/voxqueue/abc123.m4a"))
        );
    }

    #[test]
    fn entry_not_materialized_without_file_path() {
        let entry: MediaEntry = Track::new("abc", "Title", "https://tube.example/abc")
            .unwrap()
            .into();
        assert!(!entry.is_materialized());
    }

    #[test]
    fn entry_not_materialized_with_empty_file_path() {
        let entry: MediaEntry = Track::new("abc", "Title", "https://tube.example/abc")
            .unwrap()
            .with_file_path("")
            .into();
        assert!(!entry.is_materialized());
    }

    #[test]
    fn entry_materialized_once_file_path_set() {
        let entry: MediaEntry = Media::new("file-9")
            .unwrap()
            .with_file_path("/var/cache/voxqueue/file-9.mp3")
            .into();
        assert!(entry.is_materialized());
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let track: MediaEntry = Track::new("abc", "", "https://tube.example/abc")
            .unwrap()
            .into();
        assert_eq!(track.display_name(), "abc");

        let media: MediaEntry = Media::new("file-1").unwrap().into();
        assert_eq!(media.display_name(), "file-1");

        let named: MediaEntry = Media::new("file-2")
            .unwrap()
            .with_file_name("voice_note.ogg")
            .into();
        assert_eq!(named.display_name(), "voice_note.ogg");
    }

    #[test]
    fn entry_serializes_with_kind_tag() {
        let entry: MediaEntry = Track::new("abc", "Night Drive", "https://tube.example/abc")
            .unwrap()
            .into();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "track");
        assert_eq!(json["id"], "abc");

        let back: MediaEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn display_uses_display_name() {
        let entry: MediaEntry = Track::new("abc", "Night Drive", "https://tube.example/abc")
            .unwrap()
            .into();
        assert_eq!(entry.to_string(), "Night Drive");
    }
}
