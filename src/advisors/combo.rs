//! Combo sequencer: feasibility ranking and the single active-combo slot
//!
//! A combo starts when its opener is emitted. Each later step fires once the
//! time since the start reaches that step's delay. The slot is freed on
//! completion, on timeout (final delay plus grace period) and on
//! invalidation (a remaining card is no longer ready in hand).

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::advisors::positioning::Intent;
use crate::advisors::{Advisor, AdvisorKind, TickContext};
use crate::cards::{CardCatalog, ComboDefinition, ComboPlacement};
use crate::core::config::ComboConfig;
use crate::core::types::{CardId, Seconds, Tile};
use crate::fusion::{ActionKind, ActionRecommendation, FusedAction, Rationale};
use crate::state::geometry;
use crate::state::GameSnapshot;

/// Confidence of a due combo step
const STEP_CONFIDENCE: f32 = 0.9;

/// The combo currently being executed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveCombo {
    pub combo: ComboDefinition,
    /// Index of the next step to fire
    pub step: usize,
    pub started_at: Seconds,
    /// Where the previous combo card was placed
    pub last_tile: Tile,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComboStart {
    Started,
    /// Another combo is still running; nothing changed
    Rejected { active: String },
}

#[derive(Debug, Clone)]
pub struct ComboSequencer {
    config: ComboConfig,
    active: Option<ActiveCombo>,
    /// Opener recommended on the last tick, started if the engine emits it
    proposed: Option<ComboDefinition>,
    /// Step recommended on the last tick, confirmed if the engine emits it
    due_step: Option<usize>,
}

impl ComboSequencer {
    pub fn new(config: ComboConfig) -> Self {
        Self {
            config,
            active: None,
            proposed: None,
            due_step: None,
        }
    }

    pub fn active(&self) -> Option<&ActiveCombo> {
        self.active.as_ref()
    }

    /// Combos whose cards are all ready in hand and whose trigger holds
    ///
    /// Ranked by effectiveness, then by total elixir (a cheaper combo cycles
    /// back sooner), then by name.
    pub fn feasible_combos<'c>(
        &self,
        snapshot: &GameSnapshot,
        catalog: &'c CardCatalog,
    ) -> Vec<&'c ComboDefinition> {
        let mut feasible: Vec<&ComboDefinition> = catalog
            .combos()
            .iter()
            .filter(|combo| combo.cards.iter().all(|c| snapshot.has_ready(c)))
            .filter(|combo| combo.trigger.is_satisfied(snapshot, catalog))
            .collect();

        feasible.sort_by(|a, b| {
            OrderedFloat(b.effectiveness)
                .cmp(&OrderedFloat(a.effectiveness))
                .then_with(|| {
                    OrderedFloat(a.total_cost(catalog)).cmp(&OrderedFloat(b.total_cost(catalog)))
                })
                .then_with(|| a.name.cmp(&b.name))
        });
        feasible
    }

    /// Begin tracking `combo` whose first card was committed at `now` on `tile`
    pub fn start(&mut self, combo: &ComboDefinition, now: Seconds, tile: Tile) -> ComboStart {
        if let Some(active) = &self.active {
            tracing::debug!(
                "Rejected start of combo {}: {} still active",
                combo.name,
                active.combo.name
            );
            return ComboStart::Rejected {
                active: active.combo.name.clone(),
            };
        }

        tracing::info!("Combo {} started at {:.1}s", combo.name, now);
        self.active = Some(ActiveCombo {
            combo: combo.clone(),
            step: 1,
            started_at: now,
            last_tile: tile,
        });
        self.finish_if_complete();
        ComboStart::Started
    }

    /// Drive the active combo one tick forward
    ///
    /// Returns the recommendation for a step that is due. The step stays
    /// pending until [`ComboSequencer::confirm_step`] reports its card played,
    /// so an unplayed step is proposed again next tick.
    pub fn advance(&mut self, ctx: &TickContext) -> Option<ActionRecommendation> {
        self.due_step = None;
        let snapshot = ctx.snapshot;
        let active = self.active.as_mut()?;
        let since = snapshot.elapsed - active.started_at;

        if since > active.combo.final_delay() + self.config.grace_period {
            tracing::info!("Combo {} timed out at step {}", active.combo.name, active.step);
            self.active = None;
            return None;
        }

        let missing = active.combo.cards[active.step..]
            .iter()
            .find(|c| !snapshot.has_ready(c));
        if let Some(card) = missing {
            tracing::info!(
                "Combo {} invalidated: {} no longer available",
                active.combo.name,
                card
            );
            self.active = None;
            return None;
        }

        if since < active.combo.delays[active.step] {
            return None;
        }

        let card = active.combo.cards[active.step].clone();
        let stats = ctx.catalog.get(&card)?;
        let desired = follow_up_tile(active.combo.placement, active.last_tile);
        let Some(target) = ctx.positioning.place_near(stats, desired, snapshot) else {
            tracing::warn!("Combo {} step {} has no legal tile", active.combo.name, active.step);
            return None;
        };

        let rec = ActionRecommendation::play(
            AdvisorKind::ComboSequencer,
            card,
            target,
            Intent::Support,
            STEP_CONFIDENCE,
            Rationale::ComboStep {
                combo: active.combo.name.clone(),
                step: active.step,
            },
        );

        tracing::debug!("Combo {} step {} due at {}", active.combo.name, active.step, target);
        self.due_step = Some(active.step);
        Some(rec)
    }

    /// Mark the pending step done once its card was played on `tile`
    ///
    /// Returns false when `card` is not the next card of the active combo.
    pub fn confirm_step(&mut self, card: &CardId, tile: Tile) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.combo.cards.get(active.step) != Some(card) {
            return false;
        }

        tracing::debug!("Combo {} step {} played at {}", active.combo.name, active.step, tile);
        active.step += 1;
        active.last_tile = tile;
        self.finish_if_complete();
        true
    }

    fn finish_if_complete(&mut self) {
        if let Some(active) = &self.active {
            if active.step >= active.combo.len() {
                tracing::info!("Combo {} completed", active.combo.name);
                self.active = None;
            }
        }
    }
}

/// Placement of the next combo card relative to the previous one
fn follow_up_tile(placement: ComboPlacement, last: Tile) -> Tile {
    let lane = geometry::lane_of(last);
    match placement {
        ComboPlacement::Behind => last.offset(0, -2),
        ComboPlacement::Ahead => last.offset(0, 1),
        ComboPlacement::Beside => last.offset(geometry::toward_center(lane) * 2, 0),
        ComboPlacement::EnemyTower => geometry::enemy_tower(lane),
    }
}

impl Advisor for ComboSequencer {
    fn kind(&self) -> AdvisorKind {
        AdvisorKind::ComboSequencer
    }

    fn advise(&mut self, ctx: &TickContext) -> Vec<ActionRecommendation> {
        self.proposed = None;
        self.due_step = None;

        if self.active.is_some() {
            return self.advance(ctx).into_iter().collect();
        }

        let Some(combo) = self.feasible_combos(ctx.snapshot, ctx.catalog).into_iter().next() else {
            return Vec::new();
        };
        let Some(opener) = ctx.catalog.get(&combo.cards[0]) else {
            return Vec::new();
        };
        let Some(target) = ctx.positioning.position_for(opener, Intent::Offensive, ctx.snapshot) else {
            return Vec::new();
        };

        self.proposed = Some(combo.clone());
        vec![ActionRecommendation::play(
            AdvisorKind::ComboSequencer,
            opener.id.clone(),
            target,
            Intent::Offensive,
            0.5 + 0.4 * combo.effectiveness,
            Rationale::ComboOpener {
                combo: combo.name.clone(),
            },
        )]
    }

    fn on_emitted(&mut self, action: &FusedAction, ctx: &TickContext) {
        let (ActionKind::PlayCard, Some(card)) = (action.kind, &action.card) else {
            self.proposed = None;
            self.due_step = None;
            return;
        };
        let tile = action.target.unwrap_or_default();

        if self.due_step.take().is_some() {
            self.confirm_step(card, tile);
        }
        if let Some(combo) = self.proposed.take() {
            if combo.cards.first() == Some(card) {
                self.start(&combo, ctx.snapshot.elapsed, tile);
            }
        }
    }
}
