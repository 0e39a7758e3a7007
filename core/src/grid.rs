use std::fmt;

/// A cell coordinate in grid units. Signed so that live drag previews and
/// unclamped inputs can be represented before they are clamped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub gx: i32,
    pub gy: i32,
}

impl GridPos {
    pub const fn new(gx: i32, gy: i32) -> Self {
        Self { gx, gy }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            gx: self.gx + dx,
            gy: self.gy + dy,
        }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.gx, self.gy)
    }
}

/// Fixed board shape: a `cols` x `rows` grid with a centered
/// `zone_cols` x `zone_rows` target zone. The zone size is also the number
/// of slices the source image is cut into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardSpec {
    pub cols: u32,
    pub rows: u32,
    pub zone_cols: u32,
    pub zone_rows: u32,
}

impl BoardSpec {
    pub fn new(cols: u32, rows: u32, zone_cols: u32, zone_rows: u32) -> Result<Self, BoardSpecError> {
        let spec = Self {
            cols,
            rows,
            zone_cols,
            zone_rows,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), BoardSpecError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(BoardSpecError::EmptyGrid);
        }
        if self.zone_cols == 0 || self.zone_rows == 0 {
            return Err(BoardSpecError::EmptyZone);
        }
        if self.zone_cols > self.cols {
            return Err(BoardSpecError::ZoneTooWide {
                zone_cols: self.zone_cols,
                cols: self.cols,
            });
        }
        if self.zone_rows > self.rows {
            return Err(BoardSpecError::ZoneTooTall {
                zone_rows: self.zone_rows,
                rows: self.rows,
            });
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn tile_count(&self) -> usize {
        self.zone_cols as usize * self.zone_rows as usize
    }

    /// Every cell of the grid in row-major order.
    pub fn cells(&self) -> Vec<GridPos> {
        let mut cells = Vec::with_capacity(self.cell_count());
        for gy in 0..self.rows as i32 {
            for gx in 0..self.cols as i32 {
                cells.push(GridPos::new(gx, gy));
            }
        }
        cells
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.gx >= 0 && pos.gy >= 0 && pos.gx < self.cols as i32 && pos.gy < self.rows as i32
    }

    pub fn clamp(&self, pos: GridPos) -> GridPos {
        let max_x = (self.cols as i32 - 1).max(0);
        let max_y = (self.rows as i32 - 1).max(0);
        GridPos::new(pos.gx.clamp(0, max_x), pos.gy.clamp(0, max_y))
    }

    /// Top-left cell of the centered target zone.
    pub fn zone_origin(&self) -> GridPos {
        GridPos::new(
            (self.cols.saturating_sub(self.zone_cols) / 2) as i32,
            (self.rows.saturating_sub(self.zone_rows) / 2) as i32,
        )
    }

    /// The cell a slice must occupy for the picture to be complete.
    pub fn target_for(&self, piece_col: u32, piece_row: u32) -> GridPos {
        self.zone_origin().offset(piece_col as i32, piece_row as i32)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardSpecError {
    EmptyGrid,
    EmptyZone,
    ZoneTooWide { zone_cols: u32, cols: u32 },
    ZoneTooTall { zone_rows: u32, rows: u32 },
}

impl fmt::Display for BoardSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardSpecError::EmptyGrid => write!(f, "grid must have at least one column and row"),
            BoardSpecError::EmptyZone => write!(f, "target zone must have at least one column and row"),
            BoardSpecError::ZoneTooWide { zone_cols, cols } => {
                write!(f, "target zone is {zone_cols} columns wide but the grid has {cols}")
            }
            BoardSpecError::ZoneTooTall { zone_rows, rows } => {
                write!(f, "target zone is {zone_rows} rows tall but the grid has {rows}")
            }
        }
    }
}

impl std::error::Error for BoardSpecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zone_larger_than_grid() {
        assert_eq!(
            BoardSpec::new(3, 6, 4, 4),
            Err(BoardSpecError::ZoneTooWide { zone_cols: 4, cols: 3 })
        );
        assert_eq!(
            BoardSpec::new(6, 3, 4, 4),
            Err(BoardSpecError::ZoneTooTall { zone_rows: 4, rows: 3 })
        );
        assert_eq!(BoardSpec::new(0, 6, 0, 4), Err(BoardSpecError::EmptyGrid));
        assert_eq!(BoardSpec::new(6, 6, 0, 4), Err(BoardSpecError::EmptyZone));
    }

    #[test]
    fn cells_are_row_major() {
        let spec = BoardSpec::new(3, 2, 2, 1).unwrap();
        let cells = spec.cells();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], GridPos::new(0, 0));
        assert_eq!(cells[1], GridPos::new(1, 0));
        assert_eq!(cells[3], GridPos::new(0, 1));
        assert_eq!(cells[5], GridPos::new(2, 1));
    }

    #[test]
    fn zone_is_centered_with_floor() {
        let spec = BoardSpec::new(6, 6, 4, 4).unwrap();
        assert_eq!(spec.zone_origin(), GridPos::new(1, 1));
        assert_eq!(spec.target_for(0, 0), GridPos::new(1, 1));
        assert_eq!(spec.target_for(3, 3), GridPos::new(4, 4));

        let odd = BoardSpec::new(7, 5, 4, 2).unwrap();
        assert_eq!(odd.zone_origin(), GridPos::new(1, 1));
    }

    #[test]
    fn clamp_pulls_into_range() {
        let spec = BoardSpec::new(6, 6, 4, 4).unwrap();
        assert_eq!(spec.clamp(GridPos::new(-2, 9)), GridPos::new(0, 5));
        assert!(spec.contains(GridPos::new(5, 5)));
        assert!(!spec.contains(GridPos::new(6, 0)));
        assert!(!spec.contains(GridPos::new(0, -1)));
    }
}
