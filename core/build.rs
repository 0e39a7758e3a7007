use std::collections::HashSet;
use std::env;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULT_CATALOG: &str = "puzzles/catalog.toml";

#[derive(Deserialize)]
struct CatalogFile {
    board: BoardEntry,
    puzzles: Vec<PuzzleEntry>,
}

#[derive(Deserialize)]
struct BoardEntry {
    cols: u32,
    rows: u32,
    zone_cols: u32,
    zone_rows: u32,
}

#[derive(Deserialize)]
struct PuzzleEntry {
    label: String,
    slug: String,
    src: String,
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("missing CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    for name in [".env.local", ".env"] {
        let path = workspace_root.join(name);
        let _ = dotenvy::from_filename(&path);
        println!("cargo:rerun-if-changed={}", path.display());
    }
    println!("cargo:rerun-if-env-changed=PUZZLE_CATALOG_PATH");

    let catalog_path = resolve_catalog_path(workspace_root);
    println!("cargo:rerun-if-changed={}", catalog_path.display());
    let catalog = read_catalog(&catalog_path);

    let problems = catalog_problems(&catalog, workspace_root);
    if !problems.is_empty() {
        panic!(
            "invalid puzzle catalog {}:\n  {}",
            catalog_path.display(),
            problems.join("\n  ")
        );
    }

    for entry in &catalog.puzzles {
        println!("cargo:rerun-if-changed={}", image_path(entry, workspace_root).display());
    }

    let out_path = PathBuf::from(env::var("OUT_DIR").expect("missing OUT_DIR")).join("puzzle_catalog.rs");
    fs::write(&out_path, render_catalog(&catalog))
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_path.display()));
}

fn resolve_catalog_path(workspace_root: &Path) -> PathBuf {
    let raw_path = env::var("PUZZLE_CATALOG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG));
    if raw_path.is_relative() {
        workspace_root.join(raw_path)
    } else {
        raw_path
    }
}

fn read_catalog(path: &Path) -> CatalogFile {
    let contents = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read puzzle catalog at {}: {err}", path.display()));
    toml::from_str(&contents)
        .unwrap_or_else(|err| panic!("failed to parse puzzle catalog at {}: {err}", path.display()))
}

fn image_path(entry: &PuzzleEntry, workspace_root: &Path) -> PathBuf {
    workspace_root.join(entry.src.trim_start_matches('/'))
}

/// Every reason the catalog cannot be shipped, so one build reports them all.
fn catalog_problems(catalog: &CatalogFile, workspace_root: &Path) -> Vec<String> {
    let mut problems = Vec::new();
    let board = &catalog.board;
    if board.cols == 0 || board.rows == 0 {
        problems.push("board grid cannot be empty".to_string());
    }
    if board.zone_cols == 0 || board.zone_rows == 0 {
        problems.push("board zone cannot be empty".to_string());
    }
    if board.zone_cols > board.cols || board.zone_rows > board.rows {
        problems.push(format!(
            "board zone {}x{} does not fit grid {}x{}",
            board.zone_cols, board.zone_rows, board.cols, board.rows
        ));
    }

    if catalog.puzzles.is_empty() {
        problems.push("no [[puzzles]] entries".to_string());
    }
    let mut slugs = HashSet::new();
    let mut srcs = HashSet::new();
    for entry in &catalog.puzzles {
        if entry.slug.trim().is_empty() {
            problems.push(format!("puzzle '{}' has an empty slug", entry.label));
        } else if !slugs.insert(entry.slug.as_str()) {
            problems.push(format!("duplicate puzzle slug '{}'", entry.slug));
        }
        if entry.src.trim().is_empty() {
            problems.push(format!("puzzle '{}' has an empty src", entry.slug));
            continue;
        }
        if !srcs.insert(entry.src.as_str()) {
            problems.push(format!("duplicate puzzle src '{}'", entry.src));
        }
        if entry.src.contains("://") || entry.src.starts_with("data:") {
            // Remote images taint the canvas; only bundled files are allowed.
            problems.push(format!("puzzle '{}' src must be a bundled file", entry.slug));
        } else if !image_path(entry, workspace_root).is_file() {
            problems.push(format!("puzzle '{}' image {} is missing", entry.slug, entry.src));
        }
    }
    problems
}

fn render_catalog(catalog: &CatalogFile) -> String {
    let board = &catalog.board;
    let mut output = String::new();
    let _ = writeln!(
        output,
        "pub const BOARD_SPEC: BoardSpec = BoardSpec {{ cols: {}, rows: {}, zone_cols: {}, zone_rows: {} }};\n",
        board.cols, board.rows, board.zone_cols, board.zone_rows
    );
    let _ = writeln!(output, "pub const PUZZLE_CATALOG: &[PuzzleCatalogEntry] = &[");
    for entry in &catalog.puzzles {
        let _ = writeln!(
            output,
            "    PuzzleCatalogEntry {{ label: {:?}, slug: {:?}, src: {:?} }},",
            entry.label, entry.slug, entry.src
        );
    }
    let _ = writeln!(output, "];");
    output
}
