//! Subsystem weights, the only state the feedback step mutates

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::advisors::AdvisorKind;
use crate::core::config::WeightTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsystemWeights {
    weights: AHashMap<AdvisorKind, f32>,
    max: f32,
}

impl SubsystemWeights {
    pub fn new(table: &WeightTable, max: f32) -> Self {
        let max = max.max(0.0);
        let weights = AdvisorKind::ALL
            .iter()
            .map(|kind| (*kind, table.get(*kind).clamp(0.0, max)))
            .collect();
        Self { weights, max }
    }

    pub fn get(&self, kind: AdvisorKind) -> f32 {
        self.weights.get(&kind).copied().unwrap_or(0.0)
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Set a weight, clamped to [0, max]; returns the stored value
    pub fn set(&mut self, kind: AdvisorKind, weight: f32) -> f32 {
        let weight = if weight.is_nan() { 0.0 } else { weight.clamp(0.0, self.max) };
        self.weights.insert(kind, weight);
        weight
    }

    pub fn adjust(&mut self, kind: AdvisorKind, delta: f32) -> f32 {
        self.set(kind, self.get(kind) + delta)
    }

    /// Weights in registration order
    pub fn entries(&self) -> Vec<(AdvisorKind, f32)> {
        AdvisorKind::ALL.iter().map(|k| (*k, self.get(*k))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_clamped_to_range() {
        let mut weights = SubsystemWeights::new(&WeightTable::default(), 2.0);
        assert_eq!(weights.get(AdvisorKind::ThreatPrioritizer), 1.2);

        assert_eq!(weights.adjust(AdvisorKind::Economy, -5.0), 0.0);
        assert_eq!(weights.adjust(AdvisorKind::Economy, 10.0), 2.0);
        assert_eq!(weights.set(AdvisorKind::Positioning, f32::NAN), 0.0);
    }

    #[test]
    fn test_entries_follow_registration_order() {
        let weights = SubsystemWeights::new(&WeightTable::default(), 2.0);
        let kinds: Vec<AdvisorKind> = weights.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, AdvisorKind::ALL.to_vec());
    }
}
