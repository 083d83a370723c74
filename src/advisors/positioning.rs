//! Positioning engine: card + tactical intent -> board tile
//!
//! Placement is a pure function of its inputs. A lane is chosen first, then a
//! reference point and a role-specific offset, then the tile is pulled into
//! the legal region and walked outward to the nearest free tile.

use serde::{Deserialize, Serialize};

use crate::advisors::{Advisor, AdvisorKind, TickContext};
use crate::cards::{CardStats, Role};
use crate::core::types::{Lane, Tile};
use crate::fusion::{ActionRecommendation, Rationale};
use crate::state::geometry;
use crate::state::{BoardUnit, GameSnapshot};

/// Rings searched around the desired tile before giving up
pub const SEARCH_RADIUS: i32 = 4;

/// Tiles within which an own support unit counts as escorting a tank
const ESCORT_RANGE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Offensive,
    Defensive,
    Support,
    Flanking,
    Blocking,
    Kiting,
}

#[derive(Debug, Clone)]
pub struct PositioningEngine {
    search_radius: i32,
}

impl Default for PositioningEngine {
    fn default() -> Self {
        Self {
            search_radius: SEARCH_RADIUS,
        }
    }
}

impl PositioningEngine {
    pub fn new(search_radius: i32) -> Self {
        Self {
            search_radius: search_radius.max(0),
        }
    }

    /// Tile for `card` played with `intent`, or `None` if no legal tile is free
    pub fn position_for(&self, card: &CardStats, intent: Intent, board: &GameSnapshot) -> Option<Tile> {
        let lane = self.select_lane(intent, board);
        self.position_in_lane(card, intent, lane, board)
    }

    /// Same as `position_for` with the lane fixed by the caller
    pub fn position_in_lane(
        &self,
        card: &CardStats,
        intent: Intent,
        lane: Lane,
        board: &GameSnapshot,
    ) -> Option<Tile> {
        let desired = if card.is_spell() {
            self.spell_target(intent, lane, board)
        } else {
            self.troop_target(intent, lane, board)
        };
        self.place_near(card, desired, board)
    }

    /// Nearest legal, unoccupied tile to `desired`
    ///
    /// Spells may land anywhere and on top of units; troops and buildings
    /// stay on the own half and need a free tile.
    pub fn place_near(&self, card: &CardStats, desired: Tile, board: &GameSnapshot) -> Option<Tile> {
        if card.is_spell() {
            return Some(geometry::clamp_to_board(desired));
        }

        let anchor = geometry::clamp_to_own_half(desired);
        for radius in 0..=self.search_radius {
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if dx.abs().max(dy.abs()) != radius {
                        continue;
                    }
                    let tile = anchor.offset(dx, dy);
                    if geometry::is_own_half(tile) && !board.is_occupied(tile) {
                        return Some(tile);
                    }
                }
            }
        }

        tracing::debug!("No free tile for {} near {}", card.id, desired);
        None
    }

    pub fn select_lane(&self, intent: Intent, board: &GameSnapshot) -> Lane {
        match intent {
            Intent::Offensive => weakest_enemy_lane(board),
            Intent::Defensive | Intent::Blocking | Intent::Kiting => threatened_lane(board),
            Intent::Support | Intent::Flanking => escort(board)
                .map(|unit| geometry::lane_of(unit.tile))
                .unwrap_or_else(|| threatened_lane(board)),
        }
    }

    fn troop_target(&self, intent: Intent, lane: Lane, board: &GameSnapshot) -> Tile {
        let inward = geometry::toward_center(lane);
        match intent {
            Intent::Offensive => geometry::bridge(lane).offset(0, -1),
            Intent::Defensive => geometry::own_tower(lane).offset(inward, 3),
            Intent::Blocking => geometry::own_tower(lane).offset(0, 5),
            Intent::Kiting => geometry::own_tower(lane).offset(inward * 4, 2),
            Intent::Support => match escort(board) {
                Some(unit) => unit.tile.offset(0, -2),
                None => geometry::own_tower(lane).offset(0, -3),
            },
            Intent::Flanking => match escort(board) {
                Some(unit) => unit.tile.offset(-inward * 2, 0),
                None => geometry::bridge(lane).offset(-inward, -1),
            },
        }
    }

    fn spell_target(&self, intent: Intent, lane: Lane, board: &GameSnapshot) -> Tile {
        match intent {
            Intent::Offensive | Intent::Flanking => geometry::enemy_tower(lane),
            _ => nearest_intruder(board, Some(lane))
                .map(|unit| unit.tile)
                .unwrap_or_else(|| geometry::own_tower(lane).offset(0, 4)),
        }
    }
}

/// Lane with the fewest enemy units on their own half, then the weaker tower
fn weakest_enemy_lane(board: &GameSnapshot) -> Lane {
    let defenders = |lane: Lane| {
        board
            .enemy_units()
            .filter(|u| geometry::lane_of(u.tile) == lane && geometry::is_enemy_half(u.tile))
            .count()
    };
    let (left, right) = (defenders(Lane::Left), defenders(Lane::Right));
    if left != right {
        return if left < right { Lane::Left } else { Lane::Right };
    }
    if board.towers.enemy_right < board.towers.enemy_left {
        Lane::Right
    } else {
        Lane::Left
    }
}

/// Lane of the enemy unit closest to an own tower, else the weaker own tower
fn threatened_lane(board: &GameSnapshot) -> Lane {
    if let Some(unit) = nearest_intruder(board, None) {
        return geometry::lane_of(unit.tile);
    }
    if board.towers.own_right < board.towers.own_left {
        Lane::Right
    } else {
        Lane::Left
    }
}

fn nearest_intruder(board: &GameSnapshot, lane: Option<Lane>) -> Option<&BoardUnit> {
    board
        .enemy_units()
        .filter(|u| lane.map_or(true, |l| geometry::lane_of(u.tile) == l))
        .min_by(|a, b| {
            let da = geometry::distance_to_own_tower(a.tile);
            let db = geometry::distance_to_own_tower(b.tile);
            da.total_cmp(&db).then_with(|| a.id.cmp(&b.id))
        })
}

/// Most advanced own unit, the one a support card should follow
fn escort(board: &GameSnapshot) -> Option<&BoardUnit> {
    board
        .own_units()
        .max_by(|a, b| a.tile.y.cmp(&b.tile.y).then_with(|| b.id.cmp(&a.id)))
}

/// Recommends backing up an own tank that is pushing alone
#[derive(Debug, Clone, Default)]
pub struct PositioningAdvisor;

impl PositioningAdvisor {
    pub fn new() -> Self {
        Self
    }
}

impl Advisor for PositioningAdvisor {
    fn kind(&self) -> AdvisorKind {
        AdvisorKind::Positioning
    }

    fn advise(&mut self, ctx: &TickContext) -> Vec<ActionRecommendation> {
        let catalog = ctx.catalog;
        let lonely_tank = ctx
            .snapshot
            .own_units()
            .filter(|u| catalog.roles(&u.card).contains(Role::Tank))
            .find(|tank| {
                !ctx.snapshot.own_units().any(|other| {
                    other.id != tank.id
                        && catalog.roles(&other.card).contains(Role::Support)
                        && other.tile.distance(&tank.tile) <= ESCORT_RANGE
                })
            });

        let Some(tank) = lonely_tank else {
            return Vec::new();
        };

        let support = ctx
            .playable()
            .find(|c| c.has_role(Role::Support) && !c.is_spell() && !c.has_role(Role::Tank));
        let Some(support) = support else {
            return Vec::new();
        };

        let desired = tank.tile.offset(0, -2);
        match ctx.positioning.place_near(support, desired, ctx.snapshot) {
            Some(target) => vec![ActionRecommendation::play(
                AdvisorKind::Positioning,
                support.id.clone(),
                target,
                Intent::Support,
                0.6,
                Rationale::EscortTank {
                    tank: tank.card.clone(),
                },
            )],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardCatalog;
    use crate::core::config::EngineConfig;
    use crate::core::types::{CardId, Side};

    fn stats<'a>(catalog: &'a CardCatalog, name: &str) -> &'a CardStats {
        catalog.get(&CardId::from(name)).expect("card in standard catalog")
    }

    #[test]
    fn test_offensive_troop_goes_to_weaker_lane_bridge() {
        let catalog = CardCatalog::standard();
        let engine = PositioningEngine::default();
        let mut board = GameSnapshot::at(30.0);
        board
            .units
            .push(BoardUnit::new(1, "cannon", Side::Enemy, Tile::new(4, 24)));

        let tile = engine.position_for(stats(&catalog, "hog_rider"), Intent::Offensive, &board);
        assert_eq!(tile, Some(Tile::new(14, 14)));
    }

    #[test]
    fn test_defensive_goes_to_threatened_lane() {
        let catalog = CardCatalog::standard();
        let engine = PositioningEngine::default();
        let mut board = GameSnapshot::at(30.0);
        board
            .units
            .push(BoardUnit::new(1, "giant", Side::Enemy, Tile::new(13, 12)));

        let tile = engine.position_for(stats(&catalog, "cannon"), Intent::Defensive, &board);
        assert_eq!(tile, Some(Tile::new(13, 9)));
    }

    #[test]
    fn test_occupied_tile_is_skipped_deterministically() {
        let catalog = CardCatalog::standard();
        let engine = PositioningEngine::default();
        let mut board = GameSnapshot::at(30.0);
        board
            .units
            .push(BoardUnit::new(1, "knight", Side::Own, Tile::new(3, 14)));

        let first = engine.position_for(stats(&catalog, "hog_rider"), Intent::Offensive, &board);
        let second = engine.position_for(stats(&catalog, "hog_rider"), Intent::Offensive, &board);
        assert_eq!(first, second);
        assert_ne!(first, Some(Tile::new(3, 14)));
        assert!(first.map_or(false, geometry::is_own_half));
    }

    #[test]
    fn test_support_goes_behind_escorted_unit() {
        let catalog = CardCatalog::standard();
        let engine = PositioningEngine::default();
        let mut board = GameSnapshot::at(30.0);
        board
            .units
            .push(BoardUnit::new(7, "giant", Side::Own, Tile::new(4, 12)));

        let tile = engine.position_for(stats(&catalog, "musketeer"), Intent::Support, &board);
        assert_eq!(tile, Some(Tile::new(4, 10)));
    }

    #[test]
    fn test_spell_targets_enemy_tower_on_offense() {
        let catalog = CardCatalog::standard();
        let engine = PositioningEngine::default();
        let board = GameSnapshot::at(30.0);
        let tile = engine.position_in_lane(stats(&catalog, "fireball"), Intent::Offensive, Lane::Right, &board);
        assert_eq!(tile, Some(geometry::enemy_tower(Lane::Right)));
    }

    #[test]
    fn test_no_free_tile_returns_none() {
        let catalog = CardCatalog::standard();
        let engine = PositioningEngine::new(0);
        let mut board = GameSnapshot::at(30.0);
        board
            .units
            .push(BoardUnit::new(1, "knight", Side::Own, Tile::new(3, 14)));

        let tile = engine.position_in_lane(stats(&catalog, "hog_rider"), Intent::Offensive, Lane::Left, &board);
        assert_eq!(tile, None);
    }

    #[test]
    fn test_advisor_backs_up_lonely_tank() {
        let catalog = CardCatalog::standard();
        let config = EngineConfig::default();
        let positioning = PositioningEngine::default();
        let mut advisor = PositioningAdvisor::new();

        let mut snapshot = GameSnapshot::at(90.0).with_hand(&["musketeer", "zap"]);
        snapshot.own_elixir = 6.0;
        snapshot
            .units
            .push(BoardUnit::new(3, "giant", Side::Own, Tile::new(14, 13)));

        let ctx = TickContext::new(&snapshot, &catalog, &config, &positioning);
        let recs = advisor.advise(&ctx);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].card, Some(CardId::from("musketeer")));
        assert_eq!(recs[0].target, Some(Tile::new(14, 11)));

        snapshot
            .units
            .push(BoardUnit::new(4, "wizard", Side::Own, Tile::new(14, 11)));
        let ctx = TickContext::new(&snapshot, &catalog, &config, &positioning);
        assert!(advisor.advise(&ctx).is_empty());
    }
}
