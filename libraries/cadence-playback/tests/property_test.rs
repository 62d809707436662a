//! Property-based tests for the playlist and position formatting
//!
//! Uses proptest to verify invariants across many random inputs.

use cadence_playback::{format_position, Playlist, TrackRef};
use proptest::prelude::*;
use std::time::Duration;

// ===== Helpers =====

#[derive(Debug, Clone)]
enum PlaylistOp {
    Add,
    AddAndSelect,
    Remove(usize),
    Select(usize),
    Next,
    Previous,
}

fn arbitrary_op() -> impl Strategy<Value = PlaylistOp> {
    prop_oneof![
        Just(PlaylistOp::Add),
        Just(PlaylistOp::AddAndSelect),
        (0usize..20).prop_map(PlaylistOp::Remove),
        (0usize..20).prop_map(PlaylistOp::Select),
        Just(PlaylistOp::Next),
        Just(PlaylistOp::Previous),
    ]
}

fn playlist_of(n: usize) -> Playlist {
    let mut playlist = Playlist::new();
    for i in 0..n {
        playlist.add(TrackRef::new(format!("/music/{i}.flac")));
    }
    playlist
}

// ===== Property Tests =====

proptest! {
    /// Property: The cursor is None exactly when the playlist is empty,
    /// otherwise it points inside the playlist
    #[test]
    fn cursor_invariant_holds(ops in prop::collection::vec(arbitrary_op(), 0..100)) {
        let mut playlist = Playlist::new();
        let mut counter = 0;

        for op in ops {
            match op {
                PlaylistOp::Add => {
                    counter += 1;
                    playlist.add(TrackRef::new(format!("/music/{counter}.mp3")));
                }
                PlaylistOp::AddAndSelect => {
                    counter += 1;
                    let index = playlist.add_and_select(TrackRef::new(format!("/music/{counter}.mp3")));
                    prop_assert_eq!(index, playlist.len() - 1);
                }
                PlaylistOp::Remove(index) => {
                    playlist.remove(index);
                }
                PlaylistOp::Select(index) => {
                    let before = playlist.current_index();
                    if playlist.select(index).is_err() {
                        prop_assert_eq!(playlist.current_index(), before);
                    }
                }
                PlaylistOp::Next => {
                    playlist.next();
                }
                PlaylistOp::Previous => {
                    playlist.previous();
                }
            }

            match playlist.current_index() {
                None => prop_assert!(playlist.is_empty()),
                Some(index) => prop_assert!(index < playlist.len()),
            }
        }
    }

    /// Property: next() repeated len times returns to the starting index
    #[test]
    fn next_cycles_back_to_start(len in 1usize..40, start in 0usize..40) {
        let mut playlist = playlist_of(len);
        let start = start % len;
        playlist.select(start).unwrap();

        for _ in 0..len {
            prop_assert!(playlist.next().is_some());
        }

        prop_assert_eq!(playlist.current_index(), Some(start));
    }

    /// Property: previous() repeated len times returns to the starting index
    #[test]
    fn previous_cycles_back_to_start(len in 1usize..40, start in 0usize..40) {
        let mut playlist = playlist_of(len);
        let start = start % len;
        playlist.select(start).unwrap();

        for _ in 0..len {
            prop_assert!(playlist.previous().is_some());
        }

        prop_assert_eq!(playlist.current_index(), Some(start));
    }

    /// Property: Removing a track before the cursor keeps the same track current
    #[test]
    fn remove_before_cursor_keeps_track(len in 2usize..30, cursor in 1usize..30, removed in 0usize..30) {
        let mut playlist = playlist_of(len);
        let cursor = cursor % len;
        prop_assume!(cursor > 0);
        let removed = removed % cursor;

        playlist.select(cursor).unwrap();
        let current = playlist.current().cloned();
        playlist.remove(removed);

        prop_assert_eq!(playlist.current().cloned(), current);
    }

    /// Property: Formatting never depends on sub-second precision
    #[test]
    fn format_floors_to_seconds(elapsed in 0u64..20_000, total in 0u64..20_000, ms_a in 0u64..1000, ms_b in 0u64..1000) {
        let whole = format_position(Duration::from_secs(elapsed), Duration::from_secs(total));
        let fractional = format_position(
            Duration::from_secs(elapsed) + Duration::from_millis(ms_a),
            Duration::from_secs(total) + Duration::from_millis(ms_b),
        );
        prop_assert_eq!(whole, fractional);
    }

    /// Property: The long form is used exactly when the total spans an hour
    #[test]
    fn long_form_iff_total_has_hours(elapsed in 0u64..20_000, total in 0u64..20_000) {
        let text = format_position(Duration::from_secs(elapsed), Duration::from_secs(total));
        let (left, right) = text.split_once('/').unwrap();

        let expected_fields = if total >= 3600 { 3 } else { 2 };
        prop_assert_eq!(left.split(':').count(), expected_fields);
        prop_assert_eq!(right.split(':').count(), expected_fields);
    }
}
