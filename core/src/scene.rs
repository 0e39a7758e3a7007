use crate::board::Board;
use crate::layout::Geometry;
use crate::tile::{ImageSize, SourceRect, TileId};

pub const GRID_LINE_COLOR: &str = "rgba(0,0,0,0.08)";
pub const GRID_LINE_WIDTH: f64 = 1.0;
pub const ZONE_STROKE_COLOR: &str = "#1fa42a";
pub const ZONE_LINE_WIDTH: f64 = 4.0;
pub const ZONE_RADIUS_MAX: f64 = 20.0;
pub const ZONE_RADIUS_RATIO: f64 = 0.2;
pub const TILE_BORDER_COLOR: &str = "rgba(0,0,0,0.12)";
pub const TILE_BORDER_WIDTH: f64 = 1.0;
pub const TILE_RADIUS_MAX: f64 = 12.0;
pub const TILE_RADIUS_RATIO: f64 = 0.15;
pub const DRAG_SHADOW_COLOR: &str = "rgba(0,0,0,0.35)";
pub const DRAG_SHADOW_BLUR_RATIO: f64 = 0.12;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
}

impl RoundRect {
    /// Radius limited so opposite corners never overlap.
    pub fn effective_radius(&self) -> f64 {
        self.radius
            .min(self.width * 0.5)
            .min(self.height * 0.5)
            .max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileSprite {
    pub tile: TileId,
    pub frame: RoundRect,
    pub border: RoundRect,
    pub source: Option<SourceRect>,
    pub dragging: bool,
}

/// Everything one frame paints, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub grid_lines: Vec<Line>,
    pub zone: RoundRect,
    pub tiles: Vec<TileSprite>,
}

pub fn build_scene(board: &Board, geometry: &Geometry, image: Option<ImageSize>) -> Scene {
    let spec = board.spec();
    let cell = geometry.cell;
    let mut grid_lines = Vec::with_capacity((spec.rows + spec.cols + 2) as usize);
    for row in 0..=spec.rows {
        let y = row as f64 * cell + 0.5;
        grid_lines.push(Line {
            x0: 0.0,
            y0: y,
            x1: geometry.width,
            y1: y,
        });
    }
    for col in 0..=spec.cols {
        let x = col as f64 * cell + 0.5;
        grid_lines.push(Line {
            x0: x,
            y0: 0.0,
            x1: x,
            y1: geometry.height,
        });
    }

    let zone = RoundRect {
        x: geometry.zone_x,
        y: geometry.zone_y,
        width: geometry.zone_width,
        height: geometry.zone_height,
        radius: ZONE_RADIUS_MAX.min(cell * ZONE_RADIUS_RATIO),
    };

    let radius = TILE_RADIUS_MAX.min(cell * TILE_RADIUS_RATIO);
    let image = image.filter(|size| !size.is_empty());
    let dragged = board.dragged();
    let sprite = |tile: &crate::tile::Tile, dragging: bool| {
        let (x, y) = tile.pixel_origin(cell);
        TileSprite {
            tile: tile.id(),
            frame: RoundRect {
                x,
                y,
                width: cell,
                height: cell,
                radius,
            },
            border: RoundRect {
                x: x + 0.5,
                y: y + 0.5,
                width: cell - 1.0,
                height: cell - 1.0,
                radius,
            },
            source: image.map(|size| tile.source_rect(size, spec)),
            dragging,
        }
    };
    let mut tiles: Vec<TileSprite> = board
        .tiles()
        .iter()
        .filter(|tile| Some(tile.id()) != dragged)
        .map(|tile| sprite(tile, false))
        .collect();
    if let Some(tile) = board.dragged_tile() {
        tiles.push(sprite(tile, true));
    }

    Scene {
        width: geometry.width,
        height: geometry.height,
        grid_lines,
        zone,
        tiles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{BoardSpec, GridPos};
    use crate::layout::{compute_geometry, Viewport};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn grid_lines_run_rows_then_columns() {
        let spec = BoardSpec::new(6, 6, 4, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let board = Board::new_random(spec, &mut rng);
        let geometry = compute_geometry(&spec, Viewport::new(1000.0, 800.0, 1.0));
        let scene = build_scene(&board, &geometry, None);
        assert_eq!(scene.grid_lines.len(), 14);
        assert_eq!(scene.grid_lines[0].y0, 0.5);
        assert_eq!(scene.grid_lines[6].y0, 624.5);
        assert_eq!(scene.grid_lines[7].x0, 0.5);
        assert_eq!(scene.zone.x, 104.0);
        assert_eq!(scene.zone.radius, 20.0);
        assert!(scene.tiles.iter().all(|sprite| sprite.source.is_none()));
        assert_eq!(scene.tiles.len(), 16);
    }

    #[test]
    fn dragged_tile_is_painted_last() {
        let spec = BoardSpec::new(6, 6, 4, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut board = Board::new_random(spec, &mut rng);
        board.begin_drag(crate::tile::TileId(3));
        board.move_dragged(GridPos::new(0, 0));
        let geometry = compute_geometry(&spec, Viewport::new(1000.0, 800.0, 1.0));
        let scene = build_scene(&board, &geometry, Some(ImageSize::new(400, 400)));
        let last = scene.tiles.last().unwrap();
        assert_eq!(last.tile, crate::tile::TileId(3));
        assert!(last.dragging);
        assert_eq!((last.frame.x, last.frame.y), (0.0, 0.0));
        assert_eq!(scene.tiles.iter().filter(|sprite| sprite.dragging).count(), 1);
        let source = last.source.unwrap();
        assert_eq!((source.sx, source.sy, source.sw), (300.0, 0.0, 100.0));
    }

    #[test]
    fn effective_radius_never_exceeds_half_side() {
        let rect = RoundRect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 30.0,
            radius: 12.0,
        };
        assert_eq!(rect.effective_radius(), 5.0);
    }
}
