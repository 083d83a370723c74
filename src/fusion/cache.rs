//! Bounded decision cache keyed by snapshot fingerprint

use std::collections::VecDeque;

use ahash::AHashMap;

use crate::fusion::recommendation::FusedAction;
use crate::state::SnapshotFingerprint;

/// FIFO-evicting map from fingerprint to the action emitted for it
#[derive(Debug, Clone, Default)]
pub struct DecisionCache {
    entries: AHashMap<SnapshotFingerprint, FusedAction>,
    order: VecDeque<SnapshotFingerprint>,
    capacity: usize,
    hits: u64,
}

impl DecisionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub fn get(&mut self, fingerprint: &SnapshotFingerprint) -> Option<&FusedAction> {
        let action = self.entries.get(fingerprint)?;
        self.hits += 1;
        Some(action)
    }

    pub fn insert(&mut self, fingerprint: SnapshotFingerprint, action: FusedAction) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(fingerprint.clone(), action).is_none() {
            self.order.push_back(fingerprint);
        }
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::FusionConfig;
    use crate::state::GameSnapshot;

    fn fingerprint(elapsed: f32) -> SnapshotFingerprint {
        SnapshotFingerprint::of(&GameSnapshot::at(elapsed), &FusionConfig::default())
    }

    #[test]
    fn test_oldest_entry_evicted() {
        let mut cache = DecisionCache::new(2);
        cache.insert(fingerprint(1.0), FusedAction::no_viable_action());
        cache.insert(fingerprint(2.0), FusedAction::no_viable_action());
        cache.insert(fingerprint(3.0), FusedAction::no_viable_action());

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&fingerprint(1.0)).is_none());
        assert!(cache.get(&fingerprint(3.0)).is_some());
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let mut cache = DecisionCache::new(0);
        cache.insert(fingerprint(1.0), FusedAction::no_viable_action());
        assert!(cache.is_empty());
    }
}
