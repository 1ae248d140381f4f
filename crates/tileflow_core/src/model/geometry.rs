//! Tile-space geometry primitives.
//!
//! # Responsibility
//! - Define coordinate, size and rectangle value types shared by the model,
//!   the router and the scene.
//! - Provide bounding-box helpers used by connector path derivation.
//!
//! # Invariants
//! - All values are tile coordinates, never pixels.
//! - `Rect` produced by [`bounding_box`] always has `from <= to` on both axes.
//! - Arithmetic saturates at the `i32` range instead of overflowing.

use serde::{Deserialize, Serialize};

/// Integer position on the diagram tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Coords {
    pub x: i32,
    pub y: i32,
}

impl Coords {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    pub fn add(self, other: Coords) -> Self {
        Self::new(self.x.saturating_add(other.x), self.y.saturating_add(other.y))
    }

    /// `None` when either axis leaves the `i32` range.
    pub fn checked_add(self, other: Coords) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(other.x)?,
            self.y.checked_add(other.y)?,
        ))
    }

    pub fn subtract(self, other: Coords) -> Self {
        Self::new(self.x.saturating_sub(other.x), self.y.saturating_sub(other.y))
    }

    /// Manhattan distance between two tiles, saturating at `u32::MAX`.
    pub fn manhattan_to(self, other: Coords) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }
}

/// Width/height pair in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const fn zero() -> Self {
        Self {
            width: 0,
            height: 0,
        }
    }
}

/// Axis-aligned tile region given by two corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub from: Coords,
    pub to: Coords,
}

impl Rect {
    pub const fn new(from: Coords, to: Coords) -> Self {
        Self { from, to }
    }

    /// Degenerate rectangle at the origin, used for empty connector paths.
    pub const fn zero() -> Self {
        Self {
            from: Coords::zero(),
            to: Coords::zero(),
        }
    }

    /// Inclusive tile extent of this rectangle.
    pub fn size(&self) -> Size {
        Size::new(
            extent(self.from.x, self.to.x),
            extent(self.from.y, self.to.y),
        )
    }
}

fn extent(a: i32, b: i32) -> i32 {
    i32::try_from(a.abs_diff(b))
        .unwrap_or(i32::MAX)
        .saturating_add(1)
}

/// Computes the bounding box of `tiles`, grown by `offset` on every side.
///
/// Returns `None` for an empty tile list.
pub fn bounding_box(tiles: &[Coords], offset: Coords) -> Option<Rect> {
    let first = tiles.first()?;
    let (mut low, mut high) = (*first, *first);
    for tile in &tiles[1..] {
        low.x = low.x.min(tile.x);
        low.y = low.y.min(tile.y);
        high.x = high.x.max(tile.x);
        high.y = high.y.max(tile.y);
    }
    Some(Rect::new(low.subtract(offset), high.add(offset)))
}
