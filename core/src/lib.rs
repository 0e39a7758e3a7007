pub mod action;
pub mod board;
pub mod catalog;
pub mod drag;
pub mod game;
pub mod grid;
pub mod layout;
pub mod scene;
pub mod tile;

pub use action::GameAction;
pub use board::{fisher_yates, Board};
pub use catalog::{pick_puzzle, PuzzleCatalogEntry, BOARD_SPEC, PUZZLE_CATALOG};
pub use drag::{ActiveDrag, DragState, DropOutcome};
pub use game::Game;
pub use grid::{BoardSpec, BoardSpecError, GridPos};
pub use layout::{compute_geometry, Geometry, Viewport};
pub use scene::{build_scene, Line, RoundRect, Scene, TileSprite};
pub use tile::{ImageSize, SourceRect, Tile, TileId};
