//! Playback queue resolver.
//!
//! Resolves "what plays next/previous" over the active display list. Shuffle
//! picks a uniformly random index with no shuffle-history exclusion (the
//! current track may repeat); sequential navigation wraps modularly.
//! Previous is always sequential regardless of the shuffle flag. The repeat
//! flag never affects resolution here; it only changes end-of-track handling
//! in the runtime component.

use rand::{rngs::StdRng, RngExt, SeedableRng};

use crate::records::Song;

pub struct QueueResolver {
    // StdRng for thread safety and seedable tests.
    rng: StdRng,
}

impl QueueResolver {
    pub fn new() -> QueueResolver {
        let mut seed = [0u8; 32];
        getrandom::fill(&mut seed).expect("Failed to generate random seed");
        QueueResolver {
            rng: StdRng::from_seed(seed),
        }
    }

    /// Deterministic resolver for tests.
    pub fn from_seed(seed: [u8; 32]) -> QueueResolver {
        QueueResolver {
            rng: StdRng::from_seed(seed),
        }
    }

    /// Index of the current song in the active list, -1 when there is no
    /// current song or it is not part of the list.
    fn current_index(list: &[&Song], current_id: Option<&str>) -> i64 {
        current_id
            .and_then(|id| list.iter().position(|song| song.id == id))
            .map(|index| index as i64)
            .unwrap_or(-1)
    }

    /// Resolves the next track index, or None when the list is empty.
    pub fn next(&mut self, list: &[&Song], current_id: Option<&str>, shuffle: bool) -> Option<usize> {
        if list.is_empty() {
            return None;
        }
        if shuffle {
            return Some(self.rng.random_range(0..list.len()));
        }
        let len = list.len() as i64;
        let index = Self::current_index(list, current_id);
        Some(((index + 1).rem_euclid(len)) as usize)
    }

    /// Resolves the previous track index, or None when the list is empty.
    pub fn previous(&self, list: &[&Song], current_id: Option<&str>) -> Option<usize> {
        if list.is_empty() {
            return None;
        }
        let len = list.len() as i64;
        let index = Self::current_index(list, current_id);
        Some(((index - 1 + len).rem_euclid(len)) as usize)
    }
}

impl Default for QueueResolver {
    fn default() -> Self {
        Self::new()
    }
}
