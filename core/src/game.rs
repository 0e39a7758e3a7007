use rand::Rng;

use crate::action::GameAction;
use crate::board::Board;
use crate::drag::{DragState, DropOutcome};
use crate::grid::BoardSpec;
use crate::layout::{compute_geometry, Geometry, Viewport};
use crate::scene::{build_scene, Scene};
use crate::tile::{ImageSize, TileId};

/// Whole puzzle session: board, layout and drag state.
///
/// The board stays empty until `start` is called with the loaded image
/// size; the grid and zone are still laid out so they can be painted while
/// the image loads.
#[derive(Clone, Debug)]
pub struct Game {
    spec: BoardSpec,
    viewport: Viewport,
    geometry: Geometry,
    board: Board,
    drag: DragState,
    image: Option<ImageSize>,
}

impl Game {
    pub fn new(spec: BoardSpec, viewport: Viewport) -> Self {
        Self {
            spec,
            viewport,
            geometry: compute_geometry(&spec, viewport),
            board: Board::empty(spec),
            drag: DragState::Idle,
            image: None,
        }
    }

    pub fn spec(&self) -> &BoardSpec {
        &self.spec
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn image(&self) -> Option<ImageSize> {
        self.image
    }

    pub fn is_started(&self) -> bool {
        self.image.is_some()
    }

    /// Creates the tiles once the image is known. A second call is a no-op
    /// so a duplicate load event cannot reshuffle a game in progress.
    pub fn start<R: Rng + ?Sized>(&mut self, image: ImageSize, rng: &mut R) -> bool {
        if self.image.is_some() {
            return false;
        }
        self.image = Some(image);
        self.board = Board::new_random(self.spec, rng);
        self.drag = DragState::Idle;
        true
    }

    /// Deals every tile onto fresh random cells. Any drag is abandoned.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<DropOutcome> {
        let cancelled = self.drag.cancel(&mut self.board);
        if self.board.is_empty() {
            return cancelled;
        }
        self.board.reshuffle(rng);
        cancelled
    }

    /// Recomputes the layout. Grid coordinates are resolution independent,
    /// so tiles keep their cells; a drag in progress is cancelled since its
    /// grab offset is in stale pixels.
    pub fn resize(&mut self, viewport: Viewport) -> Option<DropOutcome> {
        let cancelled = self.drag.cancel(&mut self.board);
        self.viewport = viewport;
        self.geometry = compute_geometry(&self.spec, viewport);
        self.board.clamp_to_grid();
        cancelled
    }

    pub fn press(&mut self, x: f64, y: f64, pointer_id: Option<i32>) -> Option<TileId> {
        self.drag
            .press(&mut self.board, &self.geometry, x, y, pointer_id)
    }

    pub fn drag_to(&mut self, x: f64, y: f64, pointer_id: Option<i32>) -> bool {
        self.drag
            .motion(&mut self.board, &self.geometry, x, y, pointer_id)
    }

    pub fn release(&mut self, pointer_id: Option<i32>) -> Option<DropOutcome> {
        self.drag.release(&mut self.board, pointer_id)
    }

    pub fn cancel(&mut self) -> Option<DropOutcome> {
        self.drag.cancel(&mut self.board)
    }

    /// Returns whether the board changed visibly.
    pub fn apply(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Press { x, y, pointer_id } => self.press(x, y, pointer_id).is_some(),
            GameAction::Move { x, y, pointer_id } => self.drag_to(x, y, pointer_id),
            GameAction::Release { pointer_id } => self.release(pointer_id).is_some(),
            GameAction::Cancel => self.cancel().is_some(),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn is_solved(&self) -> bool {
        self.board.is_solved()
    }

    pub fn scene(&self) -> Scene {
        build_scene(&self.board, &self.geometry, self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game() -> Game {
        let spec = BoardSpec::new(6, 6, 4, 4).unwrap();
        Game::new(spec, Viewport::new(635.0, 1000.0, 1.0))
    }

    #[test]
    fn board_is_empty_until_image_arrives() {
        let mut game = game();
        assert!(game.board().is_empty());
        assert!(!game.apply(GameAction::Press { x: 10.0, y: 10.0, pointer_id: None }));
        assert_eq!(game.scene().tiles.len(), 0);
        assert_eq!(game.scene().grid_lines.len(), 14);

        let mut rng = StdRng::seed_from_u64(4);
        assert!(game.start(ImageSize::new(600, 600), &mut rng));
        assert_eq!(game.board().len(), 16);
        let before: Vec<_> = game.board().tiles().iter().map(|tile| tile.pos()).collect();
        assert!(!game.start(ImageSize::new(600, 600), &mut rng));
        let after: Vec<_> = game.board().tiles().iter().map(|tile| tile.pos()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn restart_cancels_drag_and_keeps_tiles_distinct() {
        let mut game = game();
        let mut rng = StdRng::seed_from_u64(8);
        game.start(ImageSize::new(400, 400), &mut rng);
        let tile = game.board().tiles()[0];
        let (x, y) = game.geometry().cell_origin(tile.pos());
        game.press(x + 10.0, y + 10.0, Some(1));
        assert!(game.is_dragging());
        let outcome = game.restart(&mut rng);
        assert!(matches!(outcome, Some(DropOutcome::Cancelled { .. })));
        assert!(!game.is_dragging());
        assert!(game.board().dragged().is_none());
        assert!(!game.board().has_collisions());
        assert_eq!(game.board().len(), 16);
    }

    #[test]
    fn drag_state_and_board_agree_on_the_dragged_tile() {
        let mut game = game();
        let mut rng = StdRng::seed_from_u64(21);
        game.start(ImageSize::new(400, 400), &mut rng);
        let tile = game.board().tiles()[4];
        let (x, y) = game.geometry().cell_origin(tile.pos());

        assert_eq!(game.press(x + 5.0, y + 5.0, Some(3)), Some(tile.id()));
        assert_eq!(game.board().dragged(), Some(tile.id()));
        assert_eq!(game.drag().active().map(|drag| drag.tile), game.board().dragged());
        assert_eq!(game.press(x + 5.0, y + 5.0, Some(8)), None);
        assert_eq!(game.board().dragged(), Some(tile.id()));

        assert!(game.apply(GameAction::Release { pointer_id: Some(3) }));
        assert_eq!(game.board().dragged(), None);
        assert!(game.drag().active().is_none());
    }

    #[test]
    fn resize_cancels_drag_and_rescales_pixels() {
        let mut game = game();
        let mut rng = StdRng::seed_from_u64(13);
        game.start(ImageSize::new(400, 400), &mut rng);
        let tile = game.board().tiles()[2];
        let (x, y) = game.geometry().cell_origin(tile.pos());
        game.press(x + 1.0, y + 1.0, None);
        let outcome = game.resize(Viewport::new(1000.0, 800.0, 2.0));
        assert_eq!(
            outcome,
            Some(DropOutcome::Cancelled { tile: tile.id(), restored: tile.pos() })
        );
        assert_eq!(game.geometry().cell, 104.0);
        assert_eq!(game.geometry().buffer_width, 1248);
        assert_eq!(game.board().tile(tile.id()).unwrap().pos(), tile.pos());
    }
}
