use std::collections::HashMap;

use rand::Rng;

use crate::drag::DropOutcome;
use crate::grid::{BoardSpec, GridPos};
use crate::tile::{Tile, TileId};

/// Tiles in draw order (last is topmost) plus the authoritative occupancy
/// map of accepted cells. While a tile is dragged its live cell may overlap
/// another tile; its accepted cell stays reserved until the drop resolves.
#[derive(Clone, Debug)]
pub struct Board {
    spec: BoardSpec,
    tiles: Vec<Tile>,
    occupancy: HashMap<GridPos, TileId>,
    dragged: Option<TileId>,
}

impl Board {
    pub fn empty(spec: BoardSpec) -> Self {
        Self {
            spec,
            tiles: Vec::new(),
            occupancy: HashMap::new(),
            dragged: None,
        }
    }

    /// Creates one tile per image slice, in row-major slice order, each on a
    /// distinct random cell anywhere in the grid.
    pub fn new_random<R: Rng + ?Sized>(spec: BoardSpec, rng: &mut R) -> Self {
        let mut cells = spec.cells();
        fisher_yates(&mut cells, rng);
        let mut tiles = Vec::with_capacity(spec.tile_count());
        let mut slots = cells.into_iter();
        for piece_row in 0..spec.zone_rows {
            for piece_col in 0..spec.zone_cols {
                let Some(cell) = slots.next() else {
                    break;
                };
                let id = TileId(piece_row * spec.zone_cols + piece_col);
                tiles.push(Tile::new(id, piece_col, piece_row, cell));
            }
        }
        let mut board = Self {
            spec,
            tiles,
            occupancy: HashMap::new(),
            dragged: None,
        };
        board.rebuild_occupancy();
        board
    }

    /// Deals the existing tiles onto fresh distinct cells. Image slices and
    /// draw order are kept; any drag in progress is dropped.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut cells = self.spec.cells();
        fisher_yates(&mut cells, rng);
        for (tile, cell) in self.tiles.iter_mut().zip(cells) {
            tile.place(cell);
        }
        self.dragged = None;
        self.rebuild_occupancy();
    }

    pub fn spec(&self) -> &BoardSpec {
        &self.spec
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.id() == id)
    }

    fn index_of(&self, id: TileId) -> Option<usize> {
        self.tiles.iter().position(|tile| tile.id() == id)
    }

    pub fn dragged(&self) -> Option<TileId> {
        self.dragged
    }

    pub fn dragged_tile(&self) -> Option<&Tile> {
        self.dragged.and_then(|id| self.tile(id))
    }

    /// Tile whose accepted cell is `pos`, if any.
    pub fn occupant(&self, pos: GridPos) -> Option<TileId> {
        self.occupancy.get(&pos).copied()
    }

    /// Topmost tile under a logical pixel.
    pub fn hit_test(&self, x: f64, y: f64, cell: f64) -> Option<TileId> {
        self.tiles
            .iter()
            .rev()
            .find(|tile| tile.contains(x, y, cell))
            .map(Tile::id)
    }

    /// Engages `id` for dragging: remembers its cell for rollback and moves
    /// it to the top of the draw order.
    pub(crate) fn begin_drag(&mut self, id: TileId) -> bool {
        if self.dragged.is_some() {
            return false;
        }
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let mut tile = self.tiles.remove(index);
        tile.remember_current();
        self.tiles.push(tile);
        self.dragged = Some(id);
        true
    }

    /// Live preview of the dragged tile. No collision check happens here.
    pub(crate) fn move_dragged(&mut self, pos: GridPos) -> bool {
        let Some(id) = self.dragged else {
            return false;
        };
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let tile = &mut self.tiles[index];
        if tile.pos() == pos {
            return false;
        }
        tile.move_live(pos);
        true
    }

    /// Resolves the drag: the tile keeps its clamped live cell when no other
    /// tile has accepted it, otherwise it snaps back. Earlier tiles are never
    /// displaced.
    pub(crate) fn drop_dragged(&mut self) -> Option<DropOutcome> {
        let id = self.dragged.take()?;
        let index = self.index_of(id)?;
        let spec = self.spec;
        let tile = &mut self.tiles[index];
        let target = spec.clamp(tile.pos());
        tile.move_live(target);
        match self.occupancy.get(&target).copied() {
            Some(blocker) if blocker != id => {
                tile.roll_back();
                Some(DropOutcome::Rejected {
                    tile: id,
                    restored: tile.pos(),
                    blocked_by: blocker,
                })
            }
            _ => {
                let from = tile.prev();
                tile.remember_current();
                if self.occupancy.get(&from) == Some(&id) {
                    self.occupancy.remove(&from);
                }
                self.occupancy.insert(target, id);
                Some(DropOutcome::Placed {
                    tile: id,
                    from,
                    to: target,
                })
            }
        }
    }

    /// Abandons the drag and returns the tile to its press-time cell.
    pub(crate) fn cancel_dragged(&mut self) -> Option<DropOutcome> {
        let id = self.dragged.take()?;
        let index = self.index_of(id)?;
        let tile = &mut self.tiles[index];
        tile.roll_back();
        Some(DropOutcome::Cancelled {
            tile: id,
            restored: tile.pos(),
        })
    }

    /// Pulls every tile back inside the grid. Only matters if the board shape
    /// ever shrinks; positions are otherwise untouched.
    pub fn clamp_to_grid(&mut self) {
        let spec = self.spec;
        let mut changed = false;
        for tile in &mut self.tiles {
            let clamped = spec.clamp(tile.prev());
            if clamped != tile.prev() || clamped != tile.pos() {
                tile.place(clamped);
                changed = true;
            }
        }
        if changed {
            self.rebuild_occupancy();
        }
    }

    /// True iff every tile sits on its own cell inside the target zone.
    pub fn is_solved(&self) -> bool {
        !self.tiles.is_empty()
            && self
                .tiles
                .iter()
                .all(|tile| tile.pos() == tile.target(&self.spec))
    }

    /// Whether any two tiles share a live cell.
    #[cfg(test)]
    pub(crate) fn has_collisions(&self) -> bool {
        let mut seen = HashMap::with_capacity(self.tiles.len());
        self.tiles
            .iter()
            .any(|tile| seen.insert(tile.pos(), tile.id()).is_some())
    }

    fn rebuild_occupancy(&mut self) {
        self.occupancy.clear();
        for tile in &self.tiles {
            self.occupancy.insert(tile.prev(), tile.id());
        }
    }
}

/// Uniform in-place shuffle.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spec() -> BoardSpec {
        BoardSpec::new(6, 6, 4, 4).unwrap()
    }

    #[test]
    fn tiles_are_created_in_row_major_slice_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = Board::new_random(spec(), &mut rng);
        assert_eq!(board.len(), 16);
        for (index, tile) in board.tiles().iter().enumerate() {
            assert_eq!(tile.id(), TileId(index as u32));
            assert_eq!(tile.piece_col(), index as u32 % 4);
            assert_eq!(tile.piece_row(), index as u32 / 4);
            assert_eq!(tile.pos(), tile.prev());
            assert_eq!(board.occupant(tile.pos()), Some(tile.id()));
        }
    }

    #[test]
    fn begin_drag_raises_tile_to_top() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut board = Board::new_random(spec(), &mut rng);
        assert!(board.begin_drag(TileId(2)));
        assert_eq!(board.tiles().last().map(Tile::id), Some(TileId(2)));
        assert_eq!(board.dragged(), Some(TileId(2)));
        assert!(!board.begin_drag(TileId(5)));
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut board = Board::new_random(spec(), &mut rng);
        let under = board.tiles()[0].id();
        let over = board.tiles()[1].id();
        let target = board.tiles()[0].pos();
        board.begin_drag(over);
        board.move_dragged(target);
        let (x, y) = (target.gx as f64 * 50.0 + 10.0, target.gy as f64 * 50.0 + 10.0);
        assert_eq!(board.hit_test(x, y, 50.0), Some(over));
        board.cancel_dragged();
        assert_eq!(board.hit_test(x, y, 50.0), Some(under));
    }

    #[test]
    fn fisher_yates_keeps_every_item() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut items: Vec<u32> = (0..36).collect();
        fisher_yates(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..36).collect::<Vec<_>>());
    }

    #[test]
    fn empty_board_is_never_solved() {
        let board = Board::empty(spec());
        assert!(!board.is_solved());
        assert!(!board.has_collisions());
    }
}
