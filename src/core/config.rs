//! Engine configuration with documented constants
//!
//! Every tunable number the subsystems use lives here, grouped by the
//! subsystem that reads it. Defaults match `data/engine.toml`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::advisors::AdvisorKind;
use crate::core::error::{EngineError, Result};

/// Elixir economy constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Elixir cap for both players
    pub max_elixir: f32,

    /// Regeneration per second in normal time
    ///
    /// One elixir every 2.8 seconds.
    pub regen_per_second: f32,

    /// Match time after which regeneration doubles
    pub double_elixir_after: f32,

    /// Enemy elixir assumed at the first tick
    pub initial_enemy_elixir: f32,

    /// How close to the cap counts as "about to leak"
    ///
    /// At 0.5 the leak prevention kicks in at 9.5 elixir.
    pub leak_margin: f32,

    /// Opportunity threshold used until an enemy win condition has been seen
    ///
    /// Enemy elixir below this value opens the counter-push window.
    pub default_opportunity_threshold: f32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            max_elixir: 10.0,
            regen_per_second: 1.0 / 2.8,
            double_elixir_after: 120.0,
            initial_enemy_elixir: 5.0,
            leak_margin: 0.5,
            default_opportunity_threshold: 4.0,
        }
    }
}

/// Opponent model constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    /// Maximum retained enemy plays (oldest evicted first)
    pub history_limit: usize,

    /// Maximum distinct enemy cards remembered
    pub deck_size: usize,

    /// Weight multiplier applied per step of age
    ///
    /// At 0.75 a play four steps old counts about a third of the newest.
    pub recency_decay: f32,

    /// Distinct cards needed before an archetype is reported
    pub archetype_min_cards: usize,

    /// Minimum prediction probability for the hold-counter recommendation
    pub prediction_floor: f32,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            history_limit: 8,
            deck_size: 8,
            recency_decay: 0.75,
            archetype_min_cards: 3,
            prediction_floor: 0.3,
        }
    }
}

/// Combo sequencer constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    /// Seconds past the final step delay before an unfinished combo times out
    pub grace_period: f32,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self { grace_period: 3.0 }
    }
}

/// Threat prioritizer constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    /// Tiles from an own tower inside which a tank is critical
    pub critical_distance: f32,

    /// How many threats receive an independent counter
    pub top_n: usize,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            critical_distance: 5.0,
            top_n: 2,
        }
    }
}

/// Decision fusion constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Minimum raw confidence a recommendation group needs to be eligible
    ///
    /// Below this the engine waits instead of forcing a low-value play.
    pub confidence_floor: f32,

    /// Chebyshev distance within which two placements count as the same action
    pub adjacency: i32,

    /// Width of the elapsed-time bucket in the snapshot fingerprint (seconds)
    pub time_bucket: f32,

    /// Width of the elixir bucket in the snapshot fingerprint
    pub elixir_bucket: f32,

    /// Maximum cached decisions (oldest evicted first)
    pub cache_capacity: usize,

    /// Weight step per recorded outcome
    ///
    /// At 0.05 a subsystem needs about twenty consecutive failures to
    /// lose a default weight of 1.0.
    pub learning_rate: f32,

    /// Upper clamp for any subsystem weight
    pub weight_max: f32,

    /// Emitted decisions kept for the status report
    pub decision_history: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            confidence_floor: 0.25,
            adjacency: 1,
            time_bucket: 1.0,
            elixir_bucket: 1.0,
            cache_capacity: 64,
            learning_rate: 0.05,
            weight_max: 2.0,
            decision_history: 50,
        }
    }
}

/// Per-subsystem enable flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorToggles {
    pub opponent_model: bool,
    pub economy: bool,
    pub combo_sequencer: bool,
    pub threat_prioritizer: bool,
    pub positioning: bool,
    pub phase_control: bool,
}

impl Default for AdvisorToggles {
    fn default() -> Self {
        Self {
            opponent_model: true,
            economy: true,
            combo_sequencer: true,
            threat_prioritizer: true,
            positioning: true,
            phase_control: true,
        }
    }
}

impl AdvisorToggles {
    pub fn is_enabled(&self, kind: AdvisorKind) -> bool {
        *self.flag(kind)
    }

    pub fn set(&mut self, kind: AdvisorKind, enabled: bool) {
        *self.flag_mut(kind) = enabled;
    }

    fn flag(&self, kind: AdvisorKind) -> &bool {
        match kind {
            AdvisorKind::OpponentModel => &self.opponent_model,
            AdvisorKind::Economy => &self.economy,
            AdvisorKind::ComboSequencer => &self.combo_sequencer,
            AdvisorKind::ThreatPrioritizer => &self.threat_prioritizer,
            AdvisorKind::Positioning => &self.positioning,
            AdvisorKind::PhaseControl => &self.phase_control,
        }
    }

    fn flag_mut(&mut self, kind: AdvisorKind) -> &mut bool {
        match kind {
            AdvisorKind::OpponentModel => &mut self.opponent_model,
            AdvisorKind::Economy => &mut self.economy,
            AdvisorKind::ComboSequencer => &mut self.combo_sequencer,
            AdvisorKind::ThreatPrioritizer => &mut self.threat_prioritizer,
            AdvisorKind::Positioning => &mut self.positioning,
            AdvisorKind::PhaseControl => &mut self.phase_control,
        }
    }
}

/// Initial subsystem weights as written in TOML
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub opponent_model: f32,
    pub economy: f32,
    pub combo_sequencer: f32,
    pub threat_prioritizer: f32,
    pub positioning: f32,
    pub phase_control: f32,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            opponent_model: 0.8,
            economy: 0.9,
            combo_sequencer: 1.0,
            threat_prioritizer: 1.2,
            positioning: 0.7,
            phase_control: 0.6,
        }
    }
}

impl WeightTable {
    pub fn get(&self, kind: AdvisorKind) -> f32 {
        match kind {
            AdvisorKind::OpponentModel => self.opponent_model,
            AdvisorKind::Economy => self.economy,
            AdvisorKind::ComboSequencer => self.combo_sequencer,
            AdvisorKind::ThreatPrioritizer => self.threat_prioritizer,
            AdvisorKind::Positioning => self.positioning,
            AdvisorKind::PhaseControl => self.phase_control,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub economy: EconomyConfig,
    pub opponent: OpponentConfig,
    pub combos: ComboConfig,
    pub threats: ThreatConfig,
    pub fusion: FusionConfig,
    pub toggles: AdvisorToggles,
    pub weights: WeightTable,
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.economy.max_elixir <= 0.0 {
            return Err(EngineError::Config("max_elixir must be positive".into()));
        }

        if self.economy.regen_per_second < 0.0 {
            return Err(EngineError::Config(
                "regen_per_second must not be negative".into(),
            ));
        }

        if self.opponent.history_limit == 0 || self.opponent.deck_size == 0 {
            return Err(EngineError::Config(
                "history_limit and deck_size must be at least 1".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.opponent.recency_decay) {
            return Err(EngineError::Config(format!(
                "recency_decay ({}) must be within [0, 1]",
                self.opponent.recency_decay
            )));
        }

        if self.fusion.time_bucket <= 0.0 || self.fusion.elixir_bucket <= 0.0 {
            return Err(EngineError::Config("fingerprint buckets must be positive".into()));
        }

        if self.fusion.weight_max < 0.0 || self.fusion.learning_rate < 0.0 {
            return Err(EngineError::Config(
                "weight_max and learning_rate must not be negative".into(),
            ));
        }

        for kind in AdvisorKind::ALL {
            let weight = self.weights.get(kind);
            if !(0.0..=self.fusion.weight_max).contains(&weight) {
                return Err(EngineError::Config(format!(
                    "initial weight for {} ({}) must be within [0, {}]",
                    kind, weight, self.fusion.weight_max
                )));
            }
        }

        Ok(())
    }
}

/// Load engine config from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config = EngineConfig::from_toml_str(&contents)?;
    tracing::info!("Loaded engine config from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [fusion]
            learning_rate = 0.1

            [toggles]
            positioning = false
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.fusion.learning_rate, 0.1);
        assert_eq!(config.fusion.cache_capacity, 64);
        assert!(!config.toggles.positioning);
        assert!(config.toggles.economy);
    }

    #[test]
    fn test_weight_above_max_rejected() {
        let result = EngineConfig::from_toml_str(
            r#"
            [weights]
            economy = 5.0
            "#,
        );
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_load_shipped_config() {
        let config = load_config("data/engine.toml").expect("Should load shipped config");
        assert_eq!(config.opponent.history_limit, 8);
        assert_eq!(config.economy.max_elixir, 10.0);
    }

    #[test]
    fn test_toggles_round_trip_by_kind() {
        let mut toggles = AdvisorToggles::default();
        toggles.set(AdvisorKind::ComboSequencer, false);
        assert!(!toggles.is_enabled(AdvisorKind::ComboSequencer));
        assert!(toggles.is_enabled(AdvisorKind::ThreatPrioritizer));
    }
}
