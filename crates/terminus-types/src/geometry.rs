//! Tile geometry: tile coordinates, tile areas, and inclusive rectangles.
//!
//! The world is a grid of tiles addressed by unsigned `(x, y)` pairs. Row
//! and column 0 form the map's void border, which is what lets an empty
//! [`Rect`] use `left == 0` as its sentinel.

use serde::{Deserialize, Serialize};

/// A single tile coordinate on the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileIndex {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl TileIndex {
    /// Create a tile coordinate.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Offset the tile by `(dx, dy)`.
    ///
    /// Returns `None` if the result would leave the unsigned coordinate space.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Self { x, y })
    }

    /// Manhattan (L1) distance between two tiles.
    pub const fn distance_manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }

    /// Chebyshev (L-infinity) distance between two tiles.
    pub const fn distance_max(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }

    /// Column as a signed value for rectangle arithmetic.
    pub fn sx(self) -> i32 {
        i32::try_from(self.x).unwrap_or(i32::MAX)
    }

    /// Row as a signed value for rectangle arithmetic.
    pub fn sy(self) -> i32 {
        i32::try_from(self.y).unwrap_or(i32::MAX)
    }
}

impl core::fmt::Display for TileIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive axis-aligned rectangle in tile coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Leftmost column (inclusive).
    pub left: i32,
    /// Topmost row (inclusive).
    pub top: i32,
    /// Rightmost column (inclusive).
    pub right: i32,
    /// Bottom row (inclusive).
    pub bottom: i32,
}

impl Rect {
    /// Create a rectangle from its four inclusive edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width in tiles (0 if inverted).
    pub const fn width(&self) -> i32 {
        if self.right < self.left {
            return 0;
        }
        self.right.saturating_sub(self.left).saturating_add(1)
    }

    /// Height in tiles (0 if inverted).
    pub const fn height(&self) -> i32 {
        if self.bottom < self.top {
            return 0;
        }
        self.bottom.saturating_sub(self.top).saturating_add(1)
    }
}

/// A rectangular block of tiles anchored at its north (top-left) corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileArea {
    /// North corner of the block.
    pub tile: TileIndex,
    /// Extent along x.
    pub w: u32,
    /// Extent along y.
    pub h: u32,
}

impl TileArea {
    /// Create an area of `w * h` tiles starting at `tile`.
    pub const fn new(tile: TileIndex, w: u32, h: u32) -> Self {
        Self { tile, w, h }
    }

    /// Create the smallest area spanning two corner tiles (in any order).
    pub fn from_corners(a: TileIndex, b: TileIndex) -> Self {
        let tile = TileIndex::new(a.x.min(b.x), a.y.min(b.y));
        Self {
            tile,
            w: a.x.abs_diff(b.x).saturating_add(1),
            h: a.y.abs_diff(b.y).saturating_add(1),
        }
    }

    /// An area with no tiles.
    pub const fn empty() -> Self {
        Self {
            tile: TileIndex::new(0, 0),
            w: 0,
            h: 0,
        }
    }

    /// Whether the area covers no tiles.
    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Number of tiles covered.
    pub fn tile_count(&self) -> usize {
        usize::try_from(u64::from(self.w).saturating_mul(u64::from(self.h))).unwrap_or(usize::MAX)
    }

    /// The south (bottom-right) corner tile, if the area is non-empty.
    pub fn end_tile(&self) -> Option<TileIndex> {
        if self.is_empty() {
            return None;
        }
        Some(TileIndex::new(
            self.tile.x.saturating_add(self.w.saturating_sub(1)),
            self.tile.y.saturating_add(self.h.saturating_sub(1)),
        ))
    }

    /// Whether `tile` lies inside the area.
    pub const fn contains(&self, tile: TileIndex) -> bool {
        tile.x >= self.tile.x
            && tile.y >= self.tile.y
            && tile.x.saturating_sub(self.tile.x) < self.w
            && tile.y.saturating_sub(self.tile.y) < self.h
    }

    /// Grow the area by `radius` tiles on every side, clamped to
    /// `0..=max_x` and `0..=max_y`.
    pub fn expand(&self, radius: u32, max_x: u32, max_y: u32) -> Self {
        let Some(end) = self.end_tile() else {
            return *self;
        };
        let x0 = self.tile.x.saturating_sub(radius);
        let y0 = self.tile.y.saturating_sub(radius);
        let x1 = end.x.saturating_add(radius).min(max_x);
        let y1 = end.y.saturating_add(radius).min(max_y);
        Self::from_corners(TileIndex::new(x0, y0), TileIndex::new(x1, y1))
    }

    /// Iterate over the tiles of the area in row-major order.
    pub const fn iter(&self) -> TileAreaIter {
        TileAreaIter {
            area: *self,
            dx: 0,
            dy: 0,
        }
    }
}

impl IntoIterator for TileArea {
    type Item = TileIndex;
    type IntoIter = TileAreaIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &TileArea {
    type Item = TileIndex;
    type IntoIter = TileAreaIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Row-major iterator over the tiles of a [`TileArea`].
#[derive(Debug, Clone)]
pub struct TileAreaIter {
    area: TileArea,
    dx: u32,
    dy: u32,
}

impl Iterator for TileAreaIter {
    type Item = TileIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.area.is_empty() || self.dy >= self.area.h {
            return None;
        }
        let tile = TileIndex::new(
            self.area.tile.x.saturating_add(self.dx),
            self.area.tile.y.saturating_add(self.dy),
        );
        self.dx = self.dx.saturating_add(1);
        if self.dx >= self.area.w {
            self.dx = 0;
            self.dy = self.dy.saturating_add(1);
        }
        Some(tile)
    }
}
