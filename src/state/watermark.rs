//! High-water mark over observed plays
//!
//! Snapshots repeat the recent play history every tick. The mark remembers
//! the newest timestamp consumed and which plays carried it, so a second
//! play with the same timestamp that shows up a tick later still counts.

use crate::core::types::{CardId, Seconds, Tile};
use crate::state::snapshot::PlayRecord;

#[derive(Debug, Clone, Default)]
pub struct PlayWatermark {
    latest: Option<Seconds>,
    /// Plays already consumed at `latest`
    at_latest: Vec<(CardId, Tile)>,
}

impl PlayWatermark {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<Seconds> {
        self.latest
    }

    /// Not consumed yet: newer than the mark, or a new play at the mark
    pub fn is_new(&self, play: &PlayRecord) -> bool {
        match self.latest {
            None => true,
            Some(latest) if play.timestamp > latest => true,
            Some(latest) if play.timestamp == latest => !self
                .at_latest
                .iter()
                .any(|(card, tile)| *card == play.card && *tile == play.tile),
            Some(_) => false,
        }
    }

    /// Plays in `history` not consumed yet, oldest first
    pub fn fresh<'p>(&self, history: impl IntoIterator<Item = &'p PlayRecord>) -> Vec<&'p PlayRecord> {
        let mut fresh: Vec<&PlayRecord> = history.into_iter().filter(|p| self.is_new(p)).collect();
        fresh.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        fresh
    }

    /// Record `play` as consumed
    pub fn consume(&mut self, play: &PlayRecord) {
        match self.latest {
            Some(latest) if play.timestamp == latest => {}
            Some(latest) if play.timestamp < latest => return,
            _ => {
                self.latest = Some(play.timestamp);
                self.at_latest.clear();
            }
        }
        self.at_latest.push((play.card.clone(), play.tile));
    }
}
