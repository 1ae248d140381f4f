//! Connector path derivation.
//!
//! # Responsibility
//! - Resolve connector anchors to tiles within one view.
//! - Route consecutive anchors and package the result as a `ConnectorPath`.
//!
//! # Invariants
//! - Anchor-to-anchor chains are followed until a tile is found; cycles and
//!   dangling references are reported, never looped on.
//! - Path tiles are relative to `rectangle.from` (the low corner of the
//!   search box).

use crate::config::CONNECTOR_SEARCH_OFFSET;
use crate::model::diagram::{AnchorRef, ConnectorAnchor, View};
use crate::model::geometry::{bounding_box, Coords};
use crate::model::scene::ConnectorPath;
use crate::routing::pathfinder::find_path;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PathResult<T> = Result<T, PathError>;

/// Reasons a connector cannot be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Fewer than two anchors were supplied.
    TooFewAnchors(usize),
    /// Anchor points at an item or anchor that does not exist in the view.
    UnresolvedAnchor(String),
    /// Anchor chain loops back on itself.
    AnchorCycle(String),
}

impl Display for PathError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewAnchors(count) => {
                write!(f, "connector needs at least two anchors, got {count}")
            }
            Self::UnresolvedAnchor(id) => write!(f, "anchor cannot be resolved: {id}"),
            Self::AnchorCycle(id) => write!(f, "anchor reference cycle at: {id}"),
        }
    }
}

impl Error for PathError {}

/// Resolves the tile an anchor sits on.
pub fn get_anchor_tile(anchor: &ConnectorAnchor, view: &View) -> PathResult<Coords> {
    let mut visited = HashSet::new();
    let mut current = anchor;
    loop {
        if !visited.insert(current.id.as_str()) {
            return Err(PathError::AnchorCycle(current.id.clone()));
        }
        match &current.target {
            AnchorRef::Tile(tile) => return Ok(*tile),
            AnchorRef::Item(item_id) => {
                return view
                    .item(item_id)
                    .map(|item| item.tile)
                    .ok_or_else(|| PathError::UnresolvedAnchor(current.id.clone()));
            }
            AnchorRef::Anchor(anchor_id) => {
                current = view
                    .anchor(anchor_id)
                    .map(|(_, next)| next)
                    .ok_or_else(|| PathError::UnresolvedAnchor(current.id.clone()))?;
            }
        }
    }
}

/// Routes a connector through its anchors in order.
pub fn get_connector_path(anchors: &[ConnectorAnchor], view: &View) -> PathResult<ConnectorPath> {
    if anchors.len() < 2 {
        return Err(PathError::TooFewAnchors(anchors.len()));
    }

    let positions = anchors
        .iter()
        .map(|anchor| get_anchor_tile(anchor, view))
        .collect::<PathResult<Vec<_>>>()?;
    let rectangle = bounding_box(&positions, CONNECTOR_SEARCH_OFFSET)
        .ok_or(PathError::TooFewAnchors(0))?;
    let grid_size = rectangle.size();
    let normalised: Vec<Coords> = positions
        .iter()
        .map(|position| position.subtract(rectangle.from))
        .collect();

    let mut tiles: Vec<Coords> = Vec::new();
    for pair in normalised.windows(2) {
        let segment = find_path(grid_size, pair[0], pair[1]);
        // Segments share their joint tile.
        let skip = usize::from(!tiles.is_empty());
        tiles.extend(segment.into_iter().skip(skip));
    }

    Ok(ConnectorPath { tiles, rectangle })
}
