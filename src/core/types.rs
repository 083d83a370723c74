//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};

/// Match clock in seconds since the start of the match
pub type Seconds = f32;

/// Identity of a card (e.g. "hog_rider")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which player a unit or play belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Own,
    Enemy,
}

/// One of the two attack corridors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    Left,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 2] = [Lane::Left, Lane::Right];
}

/// Board tile coordinate, origin at the own bottom-left corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Chessboard distance, used for "adjacent tile" checks
    pub fn chebyshev(&self, other: &Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            x: (self.x + other.x).div_euclid(2),
            y: (self.y + other.y).div_euclid(2),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_distances() {
        let a = Tile::new(3, 6);
        let b = Tile::new(6, 10);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.chebyshev(&b), 4);
    }

    #[test]
    fn test_midpoint_rounds_down() {
        let a = Tile::new(3, 6);
        let b = Tile::new(4, 13);
        assert_eq!(a.midpoint(&b), Tile::new(3, 9));
    }

    #[test]
    fn test_card_id_serializes_transparently() {
        let id = CardId::from("hog_rider");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"hog_rider\"");
    }
}
