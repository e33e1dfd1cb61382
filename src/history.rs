//! Recently played tracks, most recent first.

use crate::library::TrackId;

/// Maximum number of entries retained; the oldest is evicted past the cap.
pub const HISTORY_CAP: usize = 50;

#[derive(Default)]
pub struct History {
    entries: Vec<TrackId>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a play. A track already present moves to the front instead of
    /// duplicating; the tail is evicted past [`HISTORY_CAP`].
    pub fn record(&mut self, id: TrackId) {
        self.entries.retain(|existing| existing != &id);
        self.entries.insert(0, id);
        self.entries.truncate(HISTORY_CAP);
    }

    pub fn entries(&self) -> &[TrackId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: usize) -> TrackId {
        TrackId::from(format!("track-{n}"))
    }

    #[test]
    fn record_is_most_recent_first() {
        let mut history = History::new();
        history.record(id(1));
        history.record(id(2));

        assert_eq!(history.entries(), &[id(2), id(1)]);
    }

    #[test]
    fn replaying_a_track_moves_it_to_the_front_without_duplicating() {
        let mut history = History::new();
        history.record(id(1));
        history.record(id(2));
        history.record(id(1));

        assert_eq!(history.entries(), &[id(1), id(2)]);
    }

    #[test]
    fn the_oldest_entry_is_evicted_past_the_cap() {
        let mut history = History::new();
        for n in 0..HISTORY_CAP {
            history.record(id(n));
        }
        assert_eq!(history.len(), HISTORY_CAP);

        history.record(id(HISTORY_CAP));
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history.entries()[0], id(HISTORY_CAP));
        // id(0) was recorded first and is the one dropped.
        assert!(!history.entries().contains(&id(0)));
    }
}
