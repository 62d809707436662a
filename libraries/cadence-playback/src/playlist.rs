//! Ordered playlist with a current-track cursor
//!
//! The cursor is `None` exactly when the playlist is empty. Navigation wraps
//! in both directions:
//!
//! ```text
//!  previous()            next()
//!  ◄───────  [0] [1] [2]  ───────►
//!   2 ← 0                 2 → 0
//! ```

use crate::error::{PlaybackError, Result};
use crate::types::TrackRef;

/// Playlist store
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<TrackRef>,
    current: Option<usize>,
}

impl Playlist {
    /// Create new empty playlist
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track without moving the cursor
    ///
    /// The first track added to an empty playlist becomes current.
    pub fn add(&mut self, track: TrackRef) {
        self.tracks.push(track);
        if self.current.is_none() {
            self.current = Some(0);
        }
    }

    /// Append a track and make it current; returns its index
    pub fn add_and_select(&mut self, track: TrackRef) -> usize {
        self.tracks.push(track);
        let index = self.tracks.len() - 1;
        self.current = Some(index);
        index
    }

    /// Remove the track at `index`
    ///
    /// Out-of-range indices are ignored. The cursor never auto-advances: it
    /// follows its track when an earlier entry is removed and otherwise keeps
    /// its position, clamped to the new length.
    pub fn remove(&mut self, index: usize) -> Option<TrackRef> {
        if index >= self.tracks.len() {
            return None;
        }

        let removed = self.tracks.remove(index);
        let len = self.tracks.len();

        self.current = match self.current {
            _ if len == 0 => None,
            Some(current) if index < current => Some(current - 1),
            Some(current) => Some(current.min(len - 1)),
            None => Some(0),
        };

        Some(removed)
    }

    /// Move the cursor to `index`
    pub fn select(&mut self, index: usize) -> Result<&TrackRef> {
        let len = self.tracks.len();
        if index >= len {
            return Err(PlaybackError::OutOfRange { index, len });
        }
        self.current = Some(index);
        Ok(&self.tracks[index])
    }

    /// Advance the cursor, wrapping to the start; `None` when empty
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<usize> {
        let current = self.current?;
        let next = (current + 1) % self.tracks.len();
        self.current = Some(next);
        Some(next)
    }

    /// Move the cursor back, wrapping to the end; `None` when empty
    pub fn previous(&mut self) -> Option<usize> {
        let current = self.current?;
        let len = self.tracks.len();
        let previous = (current + len - 1) % len;
        self.current = Some(previous);
        Some(previous)
    }

    /// Cursor position
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<&TrackRef> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&TrackRef> {
        self.tracks.get(index)
    }

    /// All tracks in play order
    pub fn tracks(&self) -> &[TrackRef] {
        &self.tracks
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if playlist is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Remove every track
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current = None;
    }
}
