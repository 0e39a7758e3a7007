use rand::Rng;

use crate::grid::BoardSpec;

/// One bundled puzzle image, generated from `puzzles/catalog.toml`.
#[derive(Clone, Copy, Debug)]
pub struct PuzzleCatalogEntry {
    pub label: &'static str,
    pub slug: &'static str,
    pub src: &'static str,
}

include!(concat!(env!("OUT_DIR"), "/puzzle_catalog.rs"));

/// Uniform pick over the whole catalog.
pub fn pick_puzzle<R: Rng + ?Sized>(rng: &mut R) -> Option<&'static PuzzleCatalogEntry> {
    if PUZZLE_CATALOG.is_empty() {
        return None;
    }
    PUZZLE_CATALOG.get(rng.random_range(0..PUZZLE_CATALOG.len()))
}
