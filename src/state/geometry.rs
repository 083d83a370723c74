//! Board geometry
//!
//! 18 x 32 tiles with the origin at the own bottom-left corner. Rows 0..=14
//! are the own half, 15..=16 the river, 17..=31 the enemy half.

use crate::core::types::{Lane, Side, Tile};

pub const BOARD_WIDTH: i32 = 18;
pub const BOARD_HEIGHT: i32 = 32;

/// Last row of the own half
pub const OWN_MAX_ROW: i32 = 14;
/// First row of the enemy half
pub const ENEMY_MIN_ROW: i32 = 17;

pub const OWN_KING: Tile = Tile::new(9, 2);
pub const ENEMY_KING: Tile = Tile::new(9, 29);

pub fn lane_of(tile: Tile) -> Lane {
    if tile.x < BOARD_WIDTH / 2 {
        Lane::Left
    } else {
        Lane::Right
    }
}

/// Column of the lane's princess tower and bridge
pub fn lane_column(lane: Lane) -> i32 {
    match lane {
        Lane::Left => 3,
        Lane::Right => 14,
    }
}

/// Horizontal direction from a lane toward the board center
pub fn toward_center(lane: Lane) -> i32 {
    match lane {
        Lane::Left => 1,
        Lane::Right => -1,
    }
}

pub fn own_tower(lane: Lane) -> Tile {
    Tile::new(lane_column(lane), 6)
}

pub fn enemy_tower(lane: Lane) -> Tile {
    Tile::new(lane_column(lane), 25)
}

pub fn bridge(lane: Lane) -> Tile {
    Tile::new(lane_column(lane), 15)
}

pub fn in_bounds(tile: Tile) -> bool {
    (0..BOARD_WIDTH).contains(&tile.x) && (0..BOARD_HEIGHT).contains(&tile.y)
}

pub fn is_own_half(tile: Tile) -> bool {
    in_bounds(tile) && tile.y <= OWN_MAX_ROW
}

pub fn is_enemy_half(tile: Tile) -> bool {
    in_bounds(tile) && tile.y >= ENEMY_MIN_ROW
}

/// Whether a unit of `side` stands on its opponent's half
pub fn has_crossed(side: Side, tile: Tile) -> bool {
    match side {
        Side::Own => is_enemy_half(tile),
        Side::Enemy => tile.y <= OWN_MAX_ROW,
    }
}

pub fn clamp_to_board(tile: Tile) -> Tile {
    Tile::new(
        tile.x.clamp(0, BOARD_WIDTH - 1),
        tile.y.clamp(0, BOARD_HEIGHT - 1),
    )
}

pub fn clamp_to_own_half(tile: Tile) -> Tile {
    Tile::new(tile.x.clamp(0, BOARD_WIDTH - 1), tile.y.clamp(0, OWN_MAX_ROW))
}

/// Distance to the nearer own princess tower
pub fn distance_to_own_tower(tile: Tile) -> f32 {
    Lane::ALL
        .iter()
        .map(|lane| tile.distance(&own_tower(*lane)))
        .fold(f32::MAX, f32::min)
}
