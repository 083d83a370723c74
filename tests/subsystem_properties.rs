//! Property tests for subsystem invariants

use proptest::prelude::*;

use lane_tactician::advisors::{ComboSequencer, ComboStart, EconomyTracker, Intent, OpponentModel, PositioningEngine};
use lane_tactician::cards::{CardCatalog, ComboDefinition, ComboPlacement, ComboTrigger};
use lane_tactician::core::config::{ComboConfig, EconomyConfig, OpponentConfig};
use lane_tactician::core::types::{CardId, Side, Tile};
use lane_tactician::state::{geometry, BoardUnit, PlayRecord};
use lane_tactician::{DecisionEngine, GameSnapshot};

const CARDS: [&str; 10] = [
    "giant", "hog_rider", "knight", "archers", "zap", "fireball", "skeletons", "golem", "x_bow", "minions",
];

fn card_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(CARDS.to_vec())
}

fn board_units() -> impl Strategy<Value = Vec<BoardUnit>> {
    prop::collection::vec((card_name(), any::<bool>(), 0i32..18, 0i32..32), 0..12).prop_map(|units| {
        units
            .into_iter()
            .enumerate()
            .map(|(i, (card, own, x, y))| {
                let side = if own { Side::Own } else { Side::Enemy };
                BoardUnit::new(i as u32, card, side, Tile::new(x, y))
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_history_bounded_and_fifo(
        cards in prop::collection::vec(card_name(), 0..40),
        limit in 1usize..10,
    ) {
        let mut model = OpponentModel::new(OpponentConfig {
            history_limit: limit,
            ..Default::default()
        });
        let plays: Vec<PlayRecord> = cards
            .iter()
            .enumerate()
            .map(|(i, c)| PlayRecord::new(c, Tile::new(9, 20), i as f32, Side::Enemy))
            .collect();

        for chunk in plays.chunks(3) {
            model.record(chunk);
            prop_assert!(model.history_len() <= limit);
        }

        let kept: Vec<f32> = model.history().map(|p| p.timestamp).collect();
        let expected: Vec<f32> = plays
            .iter()
            .skip(plays.len().saturating_sub(limit))
            .map(|p| p.timestamp)
            .collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn test_enemy_elixir_stays_in_range(
        steps in prop::collection::vec((-50.0f32..400.0, prop::option::of(card_name())), 1..30),
    ) {
        let catalog = CardCatalog::standard();
        let config = EconomyConfig::default();
        let max = config.max_elixir;
        let mut tracker = EconomyTracker::new(config);

        let mut snapshot = GameSnapshot::at(0.0);
        for (i, (elapsed, play)) in steps.into_iter().enumerate() {
            snapshot.elapsed = elapsed;
            if let Some(card) = play {
                snapshot
                    .enemy_history
                    .push(PlayRecord::new(card, Tile::new(4, 20), i as f32, Side::Enemy));
            }
            tracker.update(&snapshot, &catalog);
            let estimate = tracker.enemy_elixir();
            prop_assert!((0.0..=max).contains(&estimate), "estimate {} out of range", estimate);
        }
    }

    #[test]
    fn test_weights_stay_in_range(
        outcomes in prop::collection::vec((any::<bool>(), -100.0f32..5000.0), 1..60),
    ) {
        let mut engine = DecisionEngine::standard().expect("engine");
        let max = engine.config().fusion.weight_max;

        for (i, (success, damage)) in outcomes.into_iter().enumerate() {
            let mut snapshot = GameSnapshot::at(61.0 + i as f32)
                .with_hand(&["inferno_tower", "knight", "archers", "zap"]);
            snapshot.own_elixir = 7.0;
            snapshot
                .units
                .push(BoardUnit::new(1, "giant", Side::Enemy, Tile::new(4, 10)));

            engine.tick(&snapshot).expect("tick");
            engine.record_outcome(success, damage);

            for (_, weight) in engine.weights().entries() {
                prop_assert!(weight >= 0.0 && weight <= max);
            }
        }
    }

    #[test]
    fn test_positioning_is_deterministic_and_legal(
        units in board_units(),
        card in card_name(),
        intent in prop::sample::select(vec![
            Intent::Offensive,
            Intent::Defensive,
            Intent::Support,
            Intent::Flanking,
            Intent::Blocking,
            Intent::Kiting,
        ]),
    ) {
        let catalog = CardCatalog::standard();
        let stats = catalog.get(&CardId::from(card)).expect("card in catalog");
        let engine = PositioningEngine::default();
        let mut board = GameSnapshot::at(100.0);
        board.units = units;

        let first = engine.position_for(stats, intent, &board);
        let second = engine.position_for(stats, intent, &board.clone());
        prop_assert_eq!(first, second);

        if let Some(tile) = first {
            if stats.is_spell() {
                prop_assert!(geometry::in_bounds(tile));
            } else {
                prop_assert!(geometry::is_own_half(tile));
                prop_assert!(!board.is_occupied(tile));
            }
        }
    }

    #[test]
    fn test_rejected_start_leaves_active_combo(
        started in 0.0f32..300.0,
        retry_after in 0.0f32..3.0,
    ) {
        let combo = ComboDefinition {
            name: "giant_musketeer".into(),
            cards: vec![CardId::from("giant"), CardId::from("musketeer")],
            delays: vec![0.0, 2.0],
            trigger: ComboTrigger::Always,
            effectiveness: 0.8,
            placement: ComboPlacement::Behind,
        };
        let mut other = combo.clone();
        other.name = "other".into();

        let mut sequencer = ComboSequencer::new(ComboConfig::default());
        prop_assert_eq!(sequencer.start(&combo, started, Tile::new(3, 14)), ComboStart::Started);
        let before = sequencer.active().cloned();

        let result = sequencer.start(&other, started + retry_after, Tile::new(14, 14));
        let rejected = matches!(result, ComboStart::Rejected { .. });
        prop_assert!(rejected);
        prop_assert_eq!(sequencer.active().cloned(), before);
    }
}
