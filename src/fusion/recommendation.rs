//! Recommendation and fused-action types exchanged with the advisors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::advisors::{AdvisorKind, Intent, ThreatTier};
use crate::core::types::{CardId, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    PlayCard,
    Wait,
}

/// Why a subsystem proposed an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Rationale {
    HoldCounter { expected: CardId, counter: CardId },
    ElixirLeak,
    CounterPush { enemy_elixir: f32 },
    Conserve,
    ComboOpener { combo: String },
    ComboStep { combo: String, step: usize },
    DefendThreat { tier: ThreatTier, threat: CardId },
    EscortTank { tank: CardId },
    EarlyConservation,
    OvertimePush,
    NoViableAction,
}

impl fmt::Display for Rationale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rationale::HoldCounter { expected, counter } => {
                write!(f, "hold {} for the expected {}", counter, expected)
            }
            Rationale::ElixirLeak => f.write_str("cycle a cheap card to avoid leaking elixir"),
            Rationale::CounterPush { enemy_elixir } => {
                write!(f, "counter-push while the enemy has {:.1} elixir", enemy_elixir)
            }
            Rationale::Conserve => f.write_str("save elixir"),
            Rationale::ComboOpener { combo } => write!(f, "open combo {}", combo),
            Rationale::ComboStep { combo, step } => write!(f, "combo {} step {}", combo, step + 1),
            Rationale::DefendThreat { tier, threat } => write!(f, "defend {} threat {}", tier, threat),
            Rationale::EscortTank { tank } => write!(f, "support the {} push", tank),
            Rationale::EarlyConservation => f.write_str("early game, build elixir"),
            Rationale::OvertimePush => f.write_str("overtime all-in push"),
            Rationale::NoViableAction => f.write_str("no viable action"),
        }
    }
}

/// One subsystem's proposal for this tick; never mutated after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecommendation {
    pub source: AdvisorKind,
    pub kind: ActionKind,
    pub card: Option<CardId>,
    pub target: Option<Tile>,
    pub intent: Option<Intent>,
    /// Within [0, 1]
    pub confidence: f32,
    pub rationale: Rationale,
}

impl ActionRecommendation {
    pub fn play(
        source: AdvisorKind,
        card: CardId,
        target: Tile,
        intent: Intent,
        confidence: f32,
        rationale: Rationale,
    ) -> Self {
        Self {
            source,
            kind: ActionKind::PlayCard,
            card: Some(card),
            target: Some(target),
            intent: Some(intent),
            confidence: clamp_confidence(confidence),
            rationale,
        }
    }

    pub fn wait(source: AdvisorKind, confidence: f32, rationale: Rationale) -> Self {
        Self {
            source,
            kind: ActionKind::Wait,
            card: None,
            target: None,
            intent: None,
            confidence: clamp_confidence(confidence),
            rationale,
        }
    }
}

fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// A recommendation after weighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecommendation {
    pub recommendation: ActionRecommendation,
    pub weight: f32,
    pub phase_factor: f32,
    pub score: f32,
}

/// The single action emitted per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedAction {
    pub kind: ActionKind,
    pub card: Option<CardId>,
    pub target: Option<Tile>,
    pub intent: Option<Intent>,
    /// Best raw confidence in the winning group
    pub confidence: f32,
    /// Summed weighted score of the winning group
    pub score: f32,
    pub rationale: String,
    /// Subsystem of the best member
    pub source: Option<AdvisorKind>,
    /// Winning group members, highest score first
    pub contributions: Vec<ScoredRecommendation>,
}

impl FusedAction {
    /// The conservative fallback when nothing clears the confidence floor
    pub fn no_viable_action() -> Self {
        Self {
            kind: ActionKind::Wait,
            card: None,
            target: None,
            intent: None,
            confidence: 0.0,
            score: 0.0,
            rationale: Rationale::NoViableAction.to_string(),
            source: None,
            contributions: Vec::new(),
        }
    }

    /// Unweighted action carrying a single recommendation
    pub fn from_recommendation(rec: &ActionRecommendation) -> Self {
        Self {
            kind: rec.kind,
            card: rec.card.clone(),
            target: rec.target,
            intent: rec.intent,
            confidence: rec.confidence,
            score: rec.confidence,
            rationale: rec.rationale.to_string(),
            source: Some(rec.source),
            contributions: vec![ScoredRecommendation {
                recommendation: rec.clone(),
                weight: 1.0,
                phase_factor: 1.0,
                score: rec.confidence,
            }],
        }
    }

    pub fn is_wait(&self) -> bool {
        self.kind == ActionKind::Wait
    }

    /// Distinct subsystems in the winning group, in contribution order
    pub fn contributors(&self) -> Vec<AdvisorKind> {
        let mut kinds = Vec::new();
        for c in &self.contributions {
            if !kinds.contains(&c.recommendation.source) {
                kinds.push(c.recommendation.source);
            }
        }
        kinds
    }
}

impl fmt::Display for FusedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.card, &self.target) {
            (ActionKind::PlayCard, Some(card), Some(target)) => write!(
                f,
                "play {} at {} (score {:.2}): {}",
                card, target, self.score, self.rationale
            ),
            _ => write!(f, "wait: {}", self.rationale),
        }
    }
}
