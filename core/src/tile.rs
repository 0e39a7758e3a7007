use std::fmt;

use crate::grid::{BoardSpec, GridPos};

/// Stable identity of a tile: its row-major slice index. Survives
/// reordering of the board's draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Sub-rectangle of the source image, in image pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceRect {
    pub sx: f64,
    pub sy: f64,
    pub sw: f64,
    pub sh: f64,
}

/// One puzzle piece. The slice it shows is fixed at creation; `pos` is the
/// live cell and `prev` the last accepted one. Placement rules live on
/// `Board`, which is the only writer of the positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    piece_col: u32,
    piece_row: u32,
    pos: GridPos,
    prev: GridPos,
}

impl Tile {
    pub fn new(id: TileId, piece_col: u32, piece_row: u32, pos: GridPos) -> Self {
        Self {
            id,
            piece_col,
            piece_row,
            pos,
            prev: pos,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn piece_col(&self) -> u32 {
        self.piece_col
    }

    pub fn piece_row(&self) -> u32 {
        self.piece_row
    }

    pub fn pos(&self) -> GridPos {
        self.pos
    }

    pub fn prev(&self) -> GridPos {
        self.prev
    }

    pub fn pixel_origin(&self, cell: f64) -> (f64, f64) {
        (self.pos.gx as f64 * cell, self.pos.gy as f64 * cell)
    }

    /// Edges are inclusive on both sides.
    pub fn contains(&self, x: f64, y: f64, cell: f64) -> bool {
        let (left, top) = self.pixel_origin(cell);
        x >= left && x <= left + cell && y >= top && y <= top + cell
    }

    pub fn source_rect(&self, image: ImageSize, spec: &BoardSpec) -> SourceRect {
        let sw = image.width as f64 / spec.zone_cols.max(1) as f64;
        let sh = image.height as f64 / spec.zone_rows.max(1) as f64;
        SourceRect {
            sx: self.piece_col as f64 * sw,
            sy: self.piece_row as f64 * sh,
            sw,
            sh,
        }
    }

    pub fn target(&self, spec: &BoardSpec) -> GridPos {
        spec.target_for(self.piece_col, self.piece_row)
    }

    pub(crate) fn move_live(&mut self, pos: GridPos) {
        self.pos = pos;
    }

    pub(crate) fn place(&mut self, pos: GridPos) {
        self.pos = pos;
        self.prev = pos;
    }

    pub(crate) fn remember_current(&mut self) {
        self.prev = self.pos;
    }

    pub(crate) fn roll_back(&mut self) {
        self.pos = self.prev;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_rect_slices_image_evenly() {
        let spec = BoardSpec::new(6, 6, 4, 4).unwrap();
        let tile = Tile::new(TileId(6), 2, 1, GridPos::new(0, 0));
        let rect = tile.source_rect(ImageSize::new(800, 600), &spec);
        assert_eq!(rect, SourceRect { sx: 400.0, sy: 150.0, sw: 200.0, sh: 150.0 });
    }

    #[test]
    fn contains_is_inclusive_of_edges() {
        let tile = Tile::new(TileId(0), 0, 0, GridPos::new(2, 1));
        assert!(tile.contains(100.0, 50.0, 50.0));
        assert!(tile.contains(150.0, 100.0, 50.0));
        assert!(tile.contains(120.0, 75.0, 50.0));
        assert!(!tile.contains(99.9, 75.0, 50.0));
        assert!(!tile.contains(120.0, 100.1, 50.0));
    }

    #[test]
    fn roll_back_restores_last_accepted_cell() {
        let mut tile = Tile::new(TileId(0), 0, 0, GridPos::new(2, 1));
        tile.move_live(GridPos::new(4, 4));
        assert_eq!(tile.prev(), GridPos::new(2, 1));
        tile.roll_back();
        assert_eq!(tile.pos(), GridPos::new(2, 1));
        tile.move_live(GridPos::new(3, 3));
        tile.remember_current();
        assert_eq!(tile.prev(), GridPos::new(3, 3));
    }
}
