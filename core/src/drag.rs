use crate::board::Board;
use crate::grid::GridPos;
use crate::layout::Geometry;
use crate::tile::TileId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveDrag {
    pub tile: TileId,
    /// Cell at press time; the rollback target.
    pub origin: GridPos,
    /// Pointer position relative to the tile's top-left corner at press.
    pub grab_dx: f64,
    pub grab_dy: f64,
    pub pointer_id: Option<i32>,
}

/// Pointer interaction state machine: `Idle` -> `Dragging` -> `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Placed {
        tile: TileId,
        from: GridPos,
        to: GridPos,
    },
    Rejected {
        tile: TileId,
        restored: GridPos,
        blocked_by: TileId,
    },
    Cancelled {
        tile: TileId,
        restored: GridPos,
    },
}

impl DropOutcome {
    pub fn tile(&self) -> TileId {
        match *self {
            DropOutcome::Placed { tile, .. }
            | DropOutcome::Rejected { tile, .. }
            | DropOutcome::Cancelled { tile, .. } => tile,
        }
    }

    pub fn final_pos(&self) -> GridPos {
        match *self {
            DropOutcome::Placed { to, .. } => to,
            DropOutcome::Rejected { restored, .. } | DropOutcome::Cancelled { restored, .. } => {
                restored
            }
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, DropOutcome::Placed { .. })
    }
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        match self {
            DragState::Idle => None,
            DragState::Dragging(drag) => Some(drag),
        }
    }

    /// A known pointer id only matches the pointer that started the drag.
    pub fn accepts_pointer(&self, pointer_id: Option<i32>) -> bool {
        match (self.active().and_then(|drag| drag.pointer_id), pointer_id) {
            (Some(active), Some(incoming)) => active == incoming,
            _ => self.is_dragging(),
        }
    }

    /// Picks the topmost tile under `(x, y)` and starts dragging it.
    pub fn press(
        &mut self,
        board: &mut Board,
        geometry: &Geometry,
        x: f64,
        y: f64,
        pointer_id: Option<i32>,
    ) -> Option<TileId> {
        if self.is_dragging() {
            return None;
        }
        let id = board.hit_test(x, y, geometry.cell)?;
        let tile = board.tile(id)?;
        let origin = tile.pos();
        let (left, top) = tile.pixel_origin(geometry.cell);
        if !board.begin_drag(id) {
            return None;
        }
        *self = DragState::Dragging(ActiveDrag {
            tile: id,
            origin,
            grab_dx: x - left,
            grab_dy: y - top,
            pointer_id,
        });
        Some(id)
    }

    /// Moves the dragged tile to the cell nearest to its clamped pixel
    /// position. Returns whether the live cell changed.
    pub fn motion(
        &mut self,
        board: &mut Board,
        geometry: &Geometry,
        x: f64,
        y: f64,
        pointer_id: Option<i32>,
    ) -> bool {
        if !self.accepts_pointer(pointer_id) {
            return false;
        }
        let Some(drag) = self.active().copied() else {
            return false;
        };
        let (left, top) = geometry.clamp_tile_origin(x - drag.grab_dx, y - drag.grab_dy);
        board.move_dragged(geometry.nearest_cell(left, top))
    }

    pub fn release(&mut self, board: &mut Board, pointer_id: Option<i32>) -> Option<DropOutcome> {
        if !self.accepts_pointer(pointer_id) {
            return None;
        }
        *self = DragState::Idle;
        board.drop_dragged()
    }

    pub fn cancel(&mut self, board: &mut Board) -> Option<DropOutcome> {
        if !self.is_dragging() {
            return None;
        }
        *self = DragState::Idle;
        board.cancel_dragged()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BoardSpec;
    use crate::layout::{compute_geometry, Viewport};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (Board, Geometry) {
        let spec = BoardSpec::new(6, 6, 4, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let board = Board::new_random(spec, &mut rng);
        // 100px cells
        let geometry = compute_geometry(&spec, Viewport::new(635.0, 1000.0, 1.0));
        assert_eq!(geometry.cell, 100.0);
        (board, geometry)
    }

    #[test]
    fn press_on_empty_cell_stays_idle() {
        let (mut board, geometry) = setup();
        let empty = board
            .spec()
            .cells()
            .into_iter()
            .find(|cell| board.occupant(*cell).is_none())
            .unwrap();
        let mut state = DragState::default();
        let (x, y) = geometry.cell_origin(empty);
        assert_eq!(state.press(&mut board, &geometry, x + 50.0, y + 50.0, Some(1)), None);
        assert_eq!(state, DragState::Idle);
    }

    #[test]
    fn grab_offset_keeps_tile_from_jumping() {
        let (mut board, geometry) = setup();
        let tile = board.tiles()[0];
        let (x, y) = geometry.cell_origin(tile.pos());
        let mut state = DragState::default();
        assert_eq!(state.press(&mut board, &geometry, x + 80.0, y + 10.0, None), Some(tile.id()));
        let active = *state.active().unwrap();
        assert_eq!((active.grab_dx, active.grab_dy), (80.0, 10.0));
        // a 20px nudge rounds back to the same cell
        assert!(!state.motion(&mut board, &geometry, x + 100.0, y + 30.0, None));
        assert_eq!(board.tile(tile.id()).unwrap().pos(), tile.pos());
    }

    #[test]
    fn foreign_pointer_cannot_end_drag() {
        let (mut board, geometry) = setup();
        let tile = board.tiles()[0];
        let (x, y) = geometry.cell_origin(tile.pos());
        let mut state = DragState::default();
        state.press(&mut board, &geometry, x + 5.0, y + 5.0, Some(7));
        assert_eq!(state.release(&mut board, Some(8)), None);
        assert!(state.is_dragging());
        assert!(state.release(&mut board, Some(7)).is_some());
        assert!(!state.is_dragging());
        assert_eq!(board.dragged(), None);
    }

    #[test]
    fn second_press_during_drag_is_ignored() {
        let (mut board, geometry) = setup();
        let first = board.tiles()[0];
        let second = board.tiles()[1];
        let mut state = DragState::default();
        let (x, y) = geometry.cell_origin(first.pos());
        state.press(&mut board, &geometry, x + 1.0, y + 1.0, Some(1));
        let (x2, y2) = geometry.cell_origin(second.pos());
        assert_eq!(state.press(&mut board, &geometry, x2 + 1.0, y2 + 1.0, Some(2)), None);
        assert_eq!(state.active().map(|drag| drag.tile), Some(first.id()));
    }
}
