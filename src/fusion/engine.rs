//! Decision fusion engine
//!
//! Once per tick: collect recommendations from every enabled advisor, score
//! them by confidence, subsystem weight and phase, merge recommendations for
//! the same action, select the best group (or wait), cache the result by
//! snapshot fingerprint and emit it. Outcomes reported afterwards nudge the
//! weights of the subsystems that contributed to the last action.

use std::collections::VecDeque;

use ahash::AHashSet;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::advisors::{
    phase_for, Advisor, AdvisorKind, AdvisorSet, Intent, Phase, PositioningEngine, Prediction,
    TickContext,
};
use crate::cards::{Archetype, CardCatalog};
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::types::{CardId, Seconds};
use crate::fusion::cache::DecisionCache;
use crate::fusion::recommendation::{ActionKind, ActionRecommendation, FusedAction, ScoredRecommendation};
use crate::fusion::weights::SubsystemWeights;
use crate::state::{GameSnapshot, SnapshotFingerprint};

/// Damage at which the outcome bonus saturates
const DAMAGE_SCALE: f32 = 1000.0;
/// Extra step share for a maximal-damage outcome
const DAMAGE_BONUS: f32 = 0.5;

/// Reported result of an emitted action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub tick: u64,
    pub kind: ActionKind,
    pub card: Option<CardId>,
    pub success: bool,
    pub damage: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboProgress {
    pub name: String,
    pub step: usize,
    pub steps: usize,
    pub started_at: Seconds,
}

/// Snapshot of the engine's internal state for operators and logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub ticks: u64,
    pub elapsed: Seconds,
    pub phase: Phase,
    pub enemy_elixir: f32,
    pub opportunity_window: bool,
    pub archetype: Archetype,
    pub predictions: Vec<Prediction>,
    pub seen_cards: Vec<CardId>,
    pub active_combo: Option<ComboProgress>,
    pub weights: Vec<(AdvisorKind, f32)>,
    pub enabled: Vec<AdvisorKind>,
    pub decisions: usize,
    pub success_rate: f32,
    pub average_damage: f32,
    pub cache_hits: u64,
    pub cache_entries: usize,
}

pub struct DecisionEngine {
    catalog: CardCatalog,
    config: EngineConfig,
    positioning: PositioningEngine,
    advisors: AdvisorSet,
    weights: SubsystemWeights,
    cache: DecisionCache,
    last_action: Option<FusedAction>,
    last_elapsed: Seconds,
    outcomes: VecDeque<OutcomeRecord>,
    ticks: u64,
}

impl DecisionEngine {
    /// Build an engine; catalog and config are validated here, once
    pub fn new(catalog: CardCatalog, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        catalog.validate()?;

        tracing::info!(
            "Decision engine ready: {} cards, {} combos",
            catalog.len(),
            catalog.combos().len()
        );

        Ok(Self {
            advisors: AdvisorSet::new(&config),
            weights: SubsystemWeights::new(&config.weights, config.fusion.weight_max),
            cache: DecisionCache::new(config.fusion.cache_capacity),
            positioning: PositioningEngine::default(),
            last_action: None,
            last_elapsed: 0.0,
            outcomes: VecDeque::new(),
            ticks: 0,
            catalog,
            config,
        })
    }

    /// Engine over the built-in catalog with default config
    pub fn standard() -> Result<Self> {
        Self::new(CardCatalog::standard(), EngineConfig::default())
    }

    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn advisors(&self) -> &AdvisorSet {
        &self.advisors
    }

    pub fn weights(&self) -> &SubsystemWeights {
        &self.weights
    }

    pub fn last_action(&self) -> Option<&FusedAction> {
        self.last_action.as_ref()
    }

    pub fn is_enabled(&self, kind: AdvisorKind) -> bool {
        self.config.toggles.is_enabled(kind)
    }

    /// Turn a subsystem on or off; a disabled subsystem contributes nothing
    pub fn set_enabled(&mut self, kind: AdvisorKind, enabled: bool) {
        self.config.toggles.set(kind, enabled);
        self.cache.clear();
        tracing::info!("Subsystem {} {}", kind, if enabled { "enabled" } else { "disabled" });
    }

    /// Override a subsystem weight; returns the clamped value stored
    pub fn set_weight(&mut self, kind: AdvisorKind, weight: f32) -> f32 {
        let stored = self.weights.set(kind, weight);
        self.cache.clear();
        tracing::info!("Weight of {} set to {:.3}", kind, stored);
        stored
    }

    /// Run one tick and return the single action to execute
    ///
    /// Fails only for malformed snapshots; the tick is then skipped and no
    /// state changes.
    pub fn tick(&mut self, snapshot: &GameSnapshot) -> Result<FusedAction> {
        snapshot.validate()?;
        let (snapshot, clamped) = snapshot.sanitized(self.config.economy.max_elixir);
        if clamped {
            tracing::debug!("Clamped out-of-range values in snapshot at {:.1}s", snapshot.elapsed);
        }

        self.ticks += 1;
        self.last_elapsed = snapshot.elapsed;

        let fingerprint = SnapshotFingerprint::of(&snapshot, &self.config.fusion);
        if let Some(cached) = self.cache.get(&fingerprint) {
            let action = cached.clone();
            tracing::debug!("Cache hit at {:.1}s: {}", snapshot.elapsed, action);
            self.last_action = Some(action.clone());
            return Ok(action);
        }

        let toggles = self.config.toggles;
        let ctx = TickContext::new(&snapshot, &self.catalog, &self.config, &self.positioning);

        let mut recommendations = Vec::new();
        for advisor in self.advisors.iter_mut() {
            if toggles.is_enabled(advisor.kind()) {
                recommendations.extend(advisor.advise(&ctx));
            }
        }

        let scored: Vec<ScoredRecommendation> = recommendations
            .into_iter()
            .filter(|rec| is_viable(rec, &ctx))
            .map(|rec| score(rec, &self.weights, &ctx))
            .collect();

        let groups = merge(scored, self.config.fusion.adjacency);
        let action = select(groups, self.config.fusion.confidence_floor);

        self.cache.insert(fingerprint, action.clone());
        for advisor in self.advisors.iter_mut() {
            if toggles.is_enabled(advisor.kind()) {
                advisor.on_emitted(&action, &ctx);
            }
        }

        tracing::info!("Tick {} at {:.1}s: {}", self.ticks, snapshot.elapsed, action);
        self.last_action = Some(action.clone());
        Ok(action)
    }

    /// Feed back the result of the last emitted action
    ///
    /// Every distinct contributing subsystem moves by
    /// `learning_rate * sign * (1 + min(damage / 1000, 1) * 0.5)`, clamped to
    /// [0, weight_max]. Each action is credited at most once.
    pub fn record_outcome(&mut self, success: bool, damage: f32) {
        let Some(action) = self.last_action.take() else {
            tracing::warn!("Outcome reported without an emitted action, ignoring");
            return;
        };

        let damage = if damage.is_finite() { damage.max(0.0) } else { 0.0 };
        let sign = if success { 1.0 } else { -1.0 };
        let step = self.config.fusion.learning_rate
            * sign
            * (1.0 + (damage / DAMAGE_SCALE).min(1.0) * DAMAGE_BONUS);

        for kind in action.contributors() {
            let before = self.weights.get(kind);
            let after = self.weights.adjust(kind, step);
            tracing::debug!("Weight of {} {:.3} -> {:.3}", kind, before, after);
        }

        self.cache.clear();
        self.outcomes.push_back(OutcomeRecord {
            tick: self.ticks,
            kind: action.kind,
            card: action.card,
            success,
            damage,
        });
        while self.outcomes.len() > self.config.fusion.decision_history {
            self.outcomes.pop_front();
        }
    }

    pub fn status(&self) -> EngineStatus {
        let opponent = &self.advisors.opponent;
        let economy = &self.advisors.economy;

        let decisions = self.outcomes.len();
        let (success_rate, average_damage) = if decisions == 0 {
            (0.0, 0.0)
        } else {
            let successes = self.outcomes.iter().filter(|o| o.success).count();
            let damage: f32 = self.outcomes.iter().map(|o| o.damage).sum();
            (
                successes as f32 / decisions as f32,
                damage / decisions as f32,
            )
        };

        EngineStatus {
            ticks: self.ticks,
            elapsed: self.last_elapsed,
            phase: phase_for(self.last_elapsed),
            enemy_elixir: economy.enemy_elixir(),
            opportunity_window: economy.opportunity_window(),
            archetype: opponent.archetype(&self.catalog),
            predictions: opponent.predict(&self.catalog).into_iter().take(3).collect(),
            seen_cards: opponent.seen_cards().cloned().collect(),
            active_combo: self.advisors.combos.active().map(|a| ComboProgress {
                name: a.combo.name.clone(),
                step: a.step,
                steps: a.combo.len(),
                started_at: a.started_at,
            }),
            weights: self.weights.entries(),
            enabled: AdvisorKind::ALL
                .iter()
                .copied()
                .filter(|k| self.is_enabled(*k))
                .collect(),
            decisions,
            success_rate,
            average_damage,
            cache_hits: self.cache.hits(),
            cache_entries: self.cache.len(),
        }
    }
}

/// Waits are always viable; plays need the card ready and affordable
fn is_viable(rec: &ActionRecommendation, ctx: &TickContext) -> bool {
    match (rec.kind, &rec.card) {
        (ActionKind::Wait, _) => true,
        (ActionKind::PlayCard, Some(card)) if ctx.can_play(card) => true,
        (ActionKind::PlayCard, card) => {
            tracing::debug!(
                "Dropped {} recommendation for unplayable {:?}",
                rec.source,
                card.as_ref().map(CardId::as_str)
            );
            false
        }
    }
}

/// Phase-dependent multiplier for a recommendation
///
/// Offensive intents scale up with aggression, defensive ones down; the
/// result is multiplied by the best role value of the card this phase.
fn phase_factor(rec: &ActionRecommendation, ctx: &TickContext) -> f32 {
    let Some(card) = &rec.card else {
        return 1.0;
    };
    let aggression = ctx.modifiers.aggression;
    let intent_factor = match rec.intent {
        Some(Intent::Offensive | Intent::Flanking) => 0.5 + aggression,
        Some(Intent::Defensive | Intent::Blocking | Intent::Kiting) => 1.5 - 0.5 * aggression,
        Some(Intent::Support) | None => 1.0,
    };
    intent_factor * ctx.modifiers.card_value.best_for(ctx.catalog.roles(card))
}

fn score(rec: ActionRecommendation, weights: &SubsystemWeights, ctx: &TickContext) -> ScoredRecommendation {
    let weight = weights.get(rec.source);
    let phase_factor = phase_factor(&rec, ctx);
    ScoredRecommendation {
        score: rec.confidence * weight * phase_factor,
        recommendation: rec,
        weight,
        phase_factor,
    }
}

/// Recommendations that describe the same action
#[derive(Debug)]
struct Group {
    /// Highest score first
    members: Vec<ScoredRecommendation>,
}

impl Group {
    fn lead(&self) -> &ActionRecommendation {
        &self.members[0].recommendation
    }

    fn score(&self) -> f32 {
        self.members.iter().map(|m| m.score).sum()
    }

    fn best_confidence(&self) -> f32 {
        self.members
            .iter()
            .map(|m| m.recommendation.confidence)
            .fold(0.0, f32::max)
    }

    fn accepts(&self, rec: &ActionRecommendation, adjacency: i32) -> bool {
        let lead = self.lead();
        match (lead.kind, rec.kind) {
            (ActionKind::Wait, ActionKind::Wait) => true,
            (ActionKind::PlayCard, ActionKind::PlayCard) => {
                lead.card == rec.card
                    && match (lead.target, rec.target) {
                        (Some(a), Some(b)) => a.chebyshev(&b) <= adjacency,
                        (None, None) => true,
                        _ => false,
                    }
            }
            _ => false,
        }
    }
}

/// Group recommendations for the same action and sum their scores
///
/// Threat defenses naming the same card collapse to the best one so a
/// defender is never committed twice.
fn merge(mut scored: Vec<ScoredRecommendation>, adjacency: i32) -> Vec<Group> {
    scored.sort_by(|a, b| OrderedFloat(b.score).cmp(&OrderedFloat(a.score)));

    let mut defenders: AHashSet<CardId> = AHashSet::new();
    scored.retain(|s| {
        let rec = &s.recommendation;
        match (&rec.source, &rec.card) {
            (AdvisorKind::ThreatPrioritizer, Some(card)) => defenders.insert(card.clone()),
            _ => true,
        }
    });

    let mut groups: Vec<Group> = Vec::new();
    for s in scored {
        match groups.iter_mut().find(|g| g.accepts(&s.recommendation, adjacency)) {
            Some(group) => group.members.push(s),
            None => groups.push(Group { members: vec![s] }),
        }
    }
    groups
}

/// Highest total score above the confidence floor, else wait
///
/// Ties prefer a play over a wait, then the lower card id, then the group
/// formed first.
fn select(groups: Vec<Group>, floor: f32) -> FusedAction {
    let winner = groups
        .into_iter()
        .enumerate()
        .filter(|(_, g)| g.best_confidence() >= floor)
        .max_by(|(ia, a), (ib, b)| {
            OrderedFloat(a.score())
                .cmp(&OrderedFloat(b.score()))
                .then_with(|| b.lead().kind.cmp(&a.lead().kind))
                .then_with(|| b.lead().card.cmp(&a.lead().card))
                .then_with(|| ib.cmp(ia))
        })
        .map(|(_, g)| g);

    let Some(group) = winner else {
        return FusedAction::no_viable_action();
    };

    let lead = group.lead().clone();
    FusedAction {
        kind: lead.kind,
        card: lead.card,
        target: lead.target,
        intent: lead.intent,
        confidence: group.best_confidence(),
        score: group.score(),
        rationale: lead.rationale.to_string(),
        source: Some(lead.source),
        contributions: group.members,
    }
}
