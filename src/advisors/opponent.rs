//! Opponent model: bounded memory of enemy plays, next-card prediction and
//! deck archetype

use std::collections::VecDeque;

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::advisors::{Advisor, AdvisorKind, TickContext};
use crate::cards::archetypes::classify;
use crate::cards::{Archetype, CardCatalog, Role};
use crate::core::config::OpponentConfig;
use crate::core::types::{CardId, Side};
use crate::fusion::{ActionRecommendation, Rationale};
use crate::state::{PlayRecord, PlayWatermark};

/// Share of the prediction probability carried over into confidence
const HOLD_CONFIDENCE_SCALE: f32 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub card: CardId,
    pub probability: f32,
}

#[derive(Debug, Clone)]
pub struct OpponentModel {
    config: OpponentConfig,
    /// Retained plays, oldest first
    history: VecDeque<PlayRecord>,
    /// Distinct cards seen, least recently seen first
    seen: VecDeque<CardId>,
    watermark: PlayWatermark,
}

impl OpponentModel {
    pub fn new(config: OpponentConfig) -> Self {
        Self {
            config,
            history: VecDeque::new(),
            seen: VecDeque::new(),
            watermark: PlayWatermark::new(),
        }
    }

    /// Append enemy plays not seen before, evicting the oldest beyond the bound
    ///
    /// Returns how many plays were recorded.
    pub fn record(&mut self, plays: &[PlayRecord]) -> usize {
        let fresh = self
            .watermark
            .fresh(plays.iter().filter(|p| p.owner == Side::Enemy));

        for play in &fresh {
            self.history.push_back((*play).clone());
            while self.history.len() > self.config.history_limit {
                self.history.pop_front();
            }

            if let Some(pos) = self.seen.iter().position(|c| c == &play.card) {
                self.seen.remove(pos);
            }
            self.seen.push_back(play.card.clone());
            while self.seen.len() > self.config.deck_size {
                self.seen.pop_front();
            }

            self.watermark.consume(play);
        }

        fresh.len()
    }

    pub fn history(&self) -> impl Iterator<Item = &PlayRecord> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn seen_cards(&self) -> impl Iterator<Item = &CardId> {
        self.seen.iter()
    }

    /// Recency-weighted frequency over the retained history
    ///
    /// The newest play weighs 1.0 and each older one `recency_decay` times
    /// the next newer. Ties go to the cheaper card, then the card id.
    pub fn predict(&self, catalog: &CardCatalog) -> Vec<Prediction> {
        let mut weights: AHashMap<&CardId, f32> = AHashMap::new();
        let mut total = 0.0;
        for (age, play) in self.history.iter().rev().enumerate() {
            let weight = self.config.recency_decay.powi(age as i32);
            *weights.entry(&play.card).or_insert(0.0) += weight;
            total += weight;
        }

        if total <= 0.0 {
            return Vec::new();
        }

        let mut predictions: Vec<Prediction> = weights
            .into_iter()
            .map(|(card, weight)| Prediction {
                card: card.clone(),
                probability: weight / total,
            })
            .collect();

        predictions.sort_by(|a, b| {
            OrderedFloat(b.probability)
                .cmp(&OrderedFloat(a.probability))
                .then_with(|| {
                    OrderedFloat(catalog.cost(&a.card)).cmp(&OrderedFloat(catalog.cost(&b.card)))
                })
                .then_with(|| a.card.cmp(&b.card))
        });
        predictions
    }

    pub fn archetype(&self, catalog: &CardCatalog) -> Archetype {
        if self.seen.len() < self.config.archetype_min_cards {
            return Archetype::Unknown;
        }
        let seen: Vec<_> = self.seen.iter().filter_map(|c| catalog.get(c)).collect();
        classify(catalog.archetypes(), &seen)
    }
}

impl Advisor for OpponentModel {
    fn kind(&self) -> AdvisorKind {
        AdvisorKind::OpponentModel
    }

    fn advise(&mut self, ctx: &TickContext) -> Vec<ActionRecommendation> {
        let recorded = self.record(&ctx.snapshot.enemy_history);
        if recorded > 0 {
            tracing::debug!(
                "Opponent model recorded {} plays, archetype {}",
                recorded,
                self.archetype(ctx.catalog)
            );
        }

        let predictions = self.predict(ctx.catalog);
        let Some(top) = predictions.first() else {
            return Vec::new();
        };
        if top.probability < self.config.prediction_floor {
            return Vec::new();
        }

        let Some(stats) = ctx.catalog.get(&top.card) else {
            return Vec::new();
        };
        if !stats.has_role(Role::WinCondition) {
            return Vec::new();
        }

        let counter = ctx
            .catalog
            .counters()
            .counters(stats.threat_class())
            .iter()
            .find(|c| ctx.snapshot.has_ready(c));

        match counter {
            Some(counter) => vec![ActionRecommendation::wait(
                AdvisorKind::OpponentModel,
                top.probability * HOLD_CONFIDENCE_SCALE,
                Rationale::HoldCounter {
                    expected: top.card.clone(),
                    counter: counter.clone(),
                },
            )],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisors::PositioningEngine;
    use crate::core::config::EngineConfig;
    use crate::core::types::Tile;
    use crate::fusion::ActionKind;
    use crate::state::GameSnapshot;

    fn play(card: &str, at: f32) -> PlayRecord {
        PlayRecord::new(card, Tile::new(9, 20), at, Side::Enemy)
    }

    #[test]
    fn test_history_bound_evicts_oldest() {
        let mut model = OpponentModel::new(OpponentConfig {
            history_limit: 3,
            ..Default::default()
        });
        let plays: Vec<PlayRecord> = ["knight", "archers", "giant", "zap", "fireball"]
            .iter()
            .enumerate()
            .map(|(i, c)| play(c, i as f32))
            .collect();
        model.record(&plays);

        let kept: Vec<&str> = model.history().map(|p| p.card.as_str()).collect();
        assert_eq!(kept, vec!["giant", "zap", "fireball"]);
    }

    #[test]
    fn test_replayed_history_not_double_counted() {
        let mut model = OpponentModel::new(OpponentConfig::default());
        let plays = vec![play("knight", 1.0), play("hog_rider", 2.0)];
        assert_eq!(model.record(&plays), 2);
        assert_eq!(model.record(&plays), 0);
        assert_eq!(model.history_len(), 2);
    }

    #[test]
    fn test_simultaneous_play_seen_next_tick_is_recorded() {
        let mut model = OpponentModel::new(OpponentConfig::default());
        let hog = PlayRecord::new("hog_rider", Tile::new(14, 18), 50.0, Side::Enemy);
        let spirit = PlayRecord::new("ice_spirit", Tile::new(13, 18), 50.0, Side::Enemy);

        assert_eq!(model.record(&[hog.clone()]), 1);
        assert_eq!(model.record(&[hog, spirit]), 1);

        let kept: Vec<&str> = model.history().map(|p| p.card.as_str()).collect();
        assert_eq!(kept, vec!["hog_rider", "ice_spirit"]);
    }

    #[test]
    fn test_seen_cards_bounded_by_deck_size() {
        let mut model = OpponentModel::new(OpponentConfig {
            deck_size: 2,
            ..Default::default()
        });
        model.record(&[play("knight", 1.0), play("zap", 2.0), play("knight", 3.0), play("giant", 4.0)]);
        let seen: Vec<&str> = model.seen_cards().map(|c| c.as_str()).collect();
        assert_eq!(seen, vec!["knight", "giant"]);
    }

    #[test]
    fn test_prediction_prefers_recent_then_cheaper() {
        let catalog = CardCatalog::standard();
        let mut model = OpponentModel::new(OpponentConfig {
            recency_decay: 1.0,
            ..Default::default()
        });
        model.record(&[play("giant", 1.0), play("skeletons", 2.0)]);

        let predictions = model.predict(&catalog);
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].card, CardId::from("skeletons"));
        assert!((predictions[0].probability - 0.5).abs() < 1e-6);

        let mut decayed = OpponentModel::new(OpponentConfig::default());
        decayed.record(&[play("skeletons", 1.0), play("giant", 2.0)]);
        assert_eq!(decayed.predict(&catalog)[0].card, CardId::from("giant"));
    }

    #[test]
    fn test_empty_history_predicts_nothing() {
        let model = OpponentModel::new(OpponentConfig::default());
        let catalog = CardCatalog::standard();
        assert!(model.predict(&catalog).is_empty());
        assert_eq!(model.archetype(&catalog), Archetype::Unknown);
    }

    #[test]
    fn test_archetype_needs_minimum_cards() {
        let catalog = CardCatalog::standard();
        let mut model = OpponentModel::new(OpponentConfig::default());
        model.record(&[play("x_bow", 1.0), play("tesla", 2.0)]);
        assert_eq!(model.archetype(&catalog), Archetype::Unknown);

        model.record(&[play("archers", 3.0)]);
        assert_eq!(model.archetype(&catalog), Archetype::Siege);
    }

    #[test]
    fn test_holds_counter_for_expected_win_condition() {
        let catalog = CardCatalog::standard();
        let config = EngineConfig::default();
        let positioning = PositioningEngine::default();
        let mut model = OpponentModel::new(OpponentConfig::default());

        let mut snapshot = GameSnapshot::at(80.0).with_hand(&["cannon", "zap"]);
        snapshot.enemy_history = vec![play("hog_rider", 40.0), play("zap", 55.0), play("hog_rider", 70.0)];
        let ctx = TickContext::new(&snapshot, &catalog, &config, &positioning);

        let recs = model.advise(&ctx);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, ActionKind::Wait);
        assert_eq!(
            recs[0].rationale,
            Rationale::HoldCounter {
                expected: CardId::from("hog_rider"),
                counter: CardId::from("cannon"),
            }
        );
    }
}
