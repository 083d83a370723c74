//! Economy tracker: elixir estimates and spend/hold windows

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::advisors::phase::Phase;
use crate::advisors::positioning::Intent;
use crate::advisors::{Advisor, AdvisorKind, TickContext};
use crate::cards::{CardCatalog, Role};
use crate::core::config::EconomyConfig;
use crate::core::types::{CardId, Seconds, Side};
use crate::fusion::{ActionRecommendation, Rationale};
use crate::state::{GameSnapshot, PlayWatermark};

/// Own elixir below which the tracker suggests saving up
const CONSERVE_BELOW: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendReason {
    PositiveValue,
    Overflow,
    NegativeValue,
    BetterPending,
    Unaffordable,
}

impl fmt::Display for SpendReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SpendReason::PositiveValue => "positive elixir value",
            SpendReason::Overflow => "elixir about to overflow",
            SpendReason::NegativeValue => "negative elixir value",
            SpendReason::BetterPending => "better-value action pending",
            SpendReason::Unaffordable => "not enough elixir",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpendDecision {
    pub spend: bool,
    pub reason: SpendReason,
    pub value: f32,
}

/// Base value of a play by intent, before the phase multiplier
fn intent_value(intent: Intent) -> f32 {
    match intent {
        Intent::Defensive => 1.2,
        Intent::Blocking => 1.1,
        Intent::Kiting => 1.0,
        Intent::Offensive => 0.9,
        Intent::Support | Intent::Flanking => 0.7,
    }
}

/// Bonus for offensive plays while the enemy cannot answer
const OPPORTUNITY_BONUS: f32 = 0.4;

#[derive(Debug, Clone)]
pub struct EconomyTracker {
    config: EconomyConfig,
    enemy_elixir: f32,
    last_update: Option<Seconds>,
    plays: PlayWatermark,
    /// Cheapest enemy win condition observed so far
    cheapest_win_condition: Option<f32>,
}

impl EconomyTracker {
    pub fn new(config: EconomyConfig) -> Self {
        let enemy_elixir = config.initial_enemy_elixir;
        Self {
            config,
            enemy_elixir,
            last_update: None,
            plays: PlayWatermark::new(),
            cheapest_win_condition: None,
        }
    }

    pub fn enemy_elixir(&self) -> f32 {
        self.enemy_elixir
    }

    /// Elixir regenerated between `from` and `to`, doubled past the boundary
    fn regenerated(&self, from: Seconds, to: Seconds) -> f32 {
        if to <= from {
            return 0.0;
        }
        let rate = self.config.regen_per_second;
        let boundary = self.config.double_elixir_after.clamp(from, to);
        (boundary - from) * rate + (to - boundary) * rate * 2.0
    }

    /// Integrate enemy regeneration and charge newly observed enemy plays
    ///
    /// The first update integrates from the match start. Time running
    /// backwards adds nothing; the estimate always ends inside [0, max].
    pub fn update(&mut self, snapshot: &GameSnapshot, catalog: &CardCatalog) {
        let since = self.last_update.unwrap_or(0.0);
        self.enemy_elixir += self.regenerated(since, snapshot.elapsed);
        self.last_update = Some(snapshot.elapsed.max(since));

        let fresh = self
            .plays
            .fresh(snapshot.enemy_history.iter().filter(|p| p.owner == Side::Enemy));

        for play in fresh {
            self.enemy_elixir -= catalog.cost(&play.card);
            self.plays.consume(play);

            if catalog.roles(&play.card).contains(Role::WinCondition) {
                let cost = catalog.cost(&play.card);
                let cheapest = self.cheapest_win_condition.map_or(cost, |c| c.min(cost));
                self.cheapest_win_condition = Some(cheapest);
            }
        }

        self.enemy_elixir = if self.enemy_elixir.is_nan() {
            tracing::warn!("Enemy elixir estimate was NaN, resetting to zero");
            0.0
        } else {
            self.enemy_elixir.clamp(0.0, self.config.max_elixir)
        };
    }

    pub fn opportunity_threshold(&self) -> f32 {
        self.cheapest_win_condition
            .unwrap_or(self.config.default_opportunity_threshold)
    }

    /// Enemy cannot currently afford their cheapest win condition
    pub fn opportunity_window(&self) -> bool {
        self.enemy_elixir < self.opportunity_threshold()
    }

    fn about_to_leak(&self, own_elixir: f32) -> bool {
        own_elixir >= self.config.max_elixir - self.config.leak_margin
    }

    /// Whether playing `card` with `intent` is worth the elixir right now
    ///
    /// `pending_value` is the value of the best alternative the caller has
    /// in mind; pass 0.0 when there is none.
    pub fn should_spend_now(
        &self,
        card: &CardId,
        intent: Intent,
        ctx: &TickContext,
        pending_value: f32,
    ) -> SpendDecision {
        let own = ctx.snapshot.own_elixir;
        let cost = ctx.catalog.cost(card);
        if cost > own {
            return SpendDecision {
                spend: false,
                reason: SpendReason::Unaffordable,
                value: 0.0,
            };
        }

        let multiplier = ctx.modifiers.card_value.best_for(ctx.catalog.roles(card));
        let mut base = intent_value(intent);
        if intent == Intent::Offensive && self.opportunity_window() {
            base += OPPORTUNITY_BONUS;
        }
        let value = multiplier * base - cost / own.max(1.0);

        let (spend, reason) = if pending_value > value.max(0.0) {
            (false, SpendReason::BetterPending)
        } else if value > 0.0 {
            (true, SpendReason::PositiveValue)
        } else if self.about_to_leak(own) {
            (true, SpendReason::Overflow)
        } else {
            (false, SpendReason::NegativeValue)
        };

        SpendDecision { spend, reason, value }
    }
}

impl Advisor for EconomyTracker {
    fn kind(&self) -> AdvisorKind {
        AdvisorKind::Economy
    }

    fn advise(&mut self, ctx: &TickContext) -> Vec<ActionRecommendation> {
        self.update(ctx.snapshot, ctx.catalog);
        let own = ctx.snapshot.own_elixir;
        let mut recs = Vec::new();

        if self.about_to_leak(own) {
            let cheapest = ctx
                .playable()
                .min_by(|a, b| a.cost.cmp(&b.cost).then_with(|| a.id.cmp(&b.id)));
            if let Some(card) = cheapest {
                if let Some(target) = ctx.positioning.position_for(card, Intent::Support, ctx.snapshot) {
                    recs.push(ActionRecommendation::play(
                        AdvisorKind::Economy,
                        card.id.clone(),
                        target,
                        Intent::Support,
                        0.9,
                        Rationale::ElixirLeak,
                    ));
                }
            }
        }

        if self.opportunity_window() {
            let mut pushers: Vec<_> = ctx
                .playable()
                .filter(|c| c.has_role(Role::WinCondition))
                .collect();
            pushers.sort_by(|a, b| b.cost.cmp(&a.cost).then_with(|| a.id.cmp(&b.id)));

            let pusher = pushers
                .into_iter()
                .find(|c| self.should_spend_now(&c.id, Intent::Offensive, ctx, 0.0).spend);
            if let Some(card) = pusher {
                if let Some(target) = ctx.positioning.position_for(card, Intent::Offensive, ctx.snapshot) {
                    tracing::debug!(
                        "Counter-push window: enemy at {:.1} elixir, pushing {}",
                        self.enemy_elixir,
                        card.id
                    );
                    recs.push(ActionRecommendation::play(
                        AdvisorKind::Economy,
                        card.id.clone(),
                        target,
                        Intent::Offensive,
                        0.75,
                        Rationale::CounterPush {
                            enemy_elixir: self.enemy_elixir,
                        },
                    ));
                }
            }
        }

        if own < CONSERVE_BELOW && ctx.phase != Phase::Overtime {
            recs.push(ActionRecommendation::wait(
                AdvisorKind::Economy,
                0.35,
                Rationale::Conserve,
            ));
        }

        recs
    }
}
