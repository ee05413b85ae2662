/// Level loading.
///
/// ## Sources:
///   1. `[general] level` in config.toml: a `.json` path is read as a
///      Tiled map, anything else as a text level
///   2. Built-in embedded level
///
/// ## Text format (`.txt`):
///   Line 1: `# Level Name` (optional)
///   Lines: map rows, one character per tile
///
/// ## Tile legend:
///   '=' = Floor       '#' = Brick
///   'H' = Ladder      'T' = Ladder top (solid cap)
///   'P' = Player spawn (empty tile)
///   ' ' = Empty
///
/// ## Tiled JSON:
///   Tile layer `layerMain`, row-major `data`. Indices 2 floor, 8 brick,
///   9 ladder, 3 ladder top; everything else is empty. The spawn cell comes
///   from the map properties `spawnX` / `spawnY` when present.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::tile::TileKind;

/// Name of the Tiled tile layer holding the level.
pub const MAIN_LAYER: &str = "layerMain";

/// Spawn cell used for Tiled maps without spawn properties. Feet rest on
/// the top edge of row 12.
pub const DEFAULT_TILED_SPAWN: (usize, usize) = (2, 11);

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not read level {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid Tiled map: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Tiled map has no tile layer named `{0}`")]
    MissingLayer(String),
    #[error("layer `{layer}` holds {actual} tiles, expected {expected}")]
    SizeMismatch {
        layer: String,
        expected: usize,
        actual: usize,
    },
    #[error("level has no rows")]
    Empty,
    #[error("map size {width}x{height} is too large")]
    Oversized { width: usize, height: usize },
    #[error("level has no spawn marker 'P'")]
    MissingSpawn,
}

/// A parsed level, ready for `World::from_level`.
#[derive(Clone, Debug)]
pub struct LevelDef {
    pub name: String,
    pub rows: Vec<Vec<TileKind>>,
    /// Cell the player stands in at start; feet rest on the row below.
    pub spawn: (usize, usize),
}

impl LevelDef {
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Load a level file. `.json` is Tiled, anything else is text.
pub fn load(path: &Path) -> Result<LevelDef, LevelError> {
    let content = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let def = if path.extension().map_or(false, |e| e.eq_ignore_ascii_case("json")) {
        let name = path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        parse_tiled(&content, &name)?
    } else {
        parse_text(&content)?
    };

    info!(
        path = %path.display(),
        name = %def.name,
        width = def.width(),
        height = def.height(),
        "level loaded"
    );
    Ok(def)
}

/// Load `path` if given, falling back to the embedded level on any error.
pub fn load_or_embedded(path: Option<&Path>) -> LevelDef {
    match path {
        Some(p) => match load(p) {
            Ok(def) => def,
            Err(e) => {
                warn!(error = %e, "level load failed, using embedded level");
                embedded()
            }
        },
        None => embedded(),
    }
}

// ══════════════════════════════════════════════════════════════
// Text levels
// ══════════════════════════════════════════════════════════════

/// Parse a text level.
pub fn parse_text(content: &str) -> Result<LevelDef, LevelError> {
    let mut name = String::new();
    let mut lines: Vec<&str> = vec![];

    for (i, line) in content.lines().enumerate() {
        if i == 0 && is_name_line(line) {
            name = line[1..].trim().to_string();
        } else {
            lines.push(line);
        }
    }

    while lines.last().map_or(false, |r| r.trim().is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        return Err(LevelError::Empty);
    }

    let (rows, spawn) = parse_rows(&lines);
    let spawn = spawn.ok_or(LevelError::MissingSpawn)?;

    if name.is_empty() {
        name = "Unnamed Level".to_string();
    }

    Ok(LevelDef { name, rows, spawn })
}

/// Distinguish `# Level Name` from a row of bricks.
/// A name line starts with `#` and contains at least one letter.
fn is_name_line(line: &str) -> bool {
    line.starts_with('#') && line[1..].chars().any(|c| c.is_alphabetic())
}

/// Convert map rows to tile kinds. Short rows are padded with empty tiles.
fn parse_rows(lines: &[&str]) -> (Vec<Vec<TileKind>>, Option<(usize, usize)>) {
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let mut spawn = None;
    let mut unknown = 0usize;

    let rows = lines
        .iter()
        .enumerate()
        .map(|(y, line)| {
            let mut row: Vec<TileKind> = line
                .chars()
                .enumerate()
                .map(|(x, ch)| match ch {
                    '=' => TileKind::Floor,
                    '#' => TileKind::Brick,
                    'H' => TileKind::Ladder,
                    'T' => TileKind::LadderTop,
                    'P' => {
                        spawn.get_or_insert((x, y));
                        TileKind::Empty
                    }
                    ' ' | '.' => TileKind::Empty,
                    _ => {
                        unknown += 1;
                        TileKind::Empty
                    }
                })
                .collect();
            row.resize(width, TileKind::Empty);
            row
        })
        .collect();

    if unknown > 0 {
        warn!(count = unknown, "unknown tile characters treated as empty");
    }
    (rows, spawn)
}

// ══════════════════════════════════════════════════════════════
// Tiled JSON
// ══════════════════════════════════════════════════════════════

#[derive(Deserialize, Debug)]
struct TiledMap {
    width: usize,
    height: usize,
    layers: Vec<TiledLayer>,
    #[serde(default)]
    properties: Vec<TiledProperty>,
}

#[derive(Deserialize, Debug)]
struct TiledLayer {
    name: String,
    #[serde(default)]
    data: Option<Vec<u32>>,
}

#[derive(Deserialize, Debug)]
struct TiledProperty {
    name: String,
    value: serde_json::Value,
}

impl TiledMap {
    fn property_usize(&self, name: &str) -> Option<usize> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.value.as_u64())
            .map(|v| v as usize)
    }
}

/// Parse a Tiled JSON map.
pub fn parse_tiled(content: &str, name: &str) -> Result<LevelDef, LevelError> {
    let map: TiledMap = serde_json::from_str(content)?;

    let data = map
        .layers
        .iter()
        .find(|l| l.name == MAIN_LAYER)
        .and_then(|l| l.data.as_ref())
        .ok_or_else(|| LevelError::MissingLayer(MAIN_LAYER.to_string()))?;

    let expected = map.width.checked_mul(map.height).ok_or(LevelError::Oversized {
        width: map.width,
        height: map.height,
    })?;
    if expected == 0 {
        return Err(LevelError::Empty);
    }
    if data.len() != expected {
        return Err(LevelError::SizeMismatch {
            layer: MAIN_LAYER.to_string(),
            expected,
            actual: data.len(),
        });
    }

    let mut unknown = 0usize;
    let rows: Vec<Vec<TileKind>> = data
        .chunks(map.width)
        .map(|chunk| {
            chunk
                .iter()
                .map(|&index| {
                    let kind = TileKind::from_index(index);
                    if kind == TileKind::Empty && index != 0 {
                        unknown += 1;
                    }
                    kind
                })
                .collect()
        })
        .collect();

    if unknown > 0 {
        warn!(count = unknown, layer = MAIN_LAYER, "unknown tile indices treated as empty");
    }

    let spawn = match (map.property_usize("spawnX"), map.property_usize("spawnY")) {
        (Some(x), Some(y)) => (x, y),
        _ => DEFAULT_TILED_SPAWN,
    };

    Ok(LevelDef { name: name.to_string(), rows, spawn })
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback level
// ══════════════════════════════════════════════════════════════

const EMBEDDED_NAME: &str = "Ladder Yard";

const EMBEDDED_MAP: &[&str] = &[
    "                ",
    "                ",
    "  =====T====    ",
    "       H        ",
    "       H        ",
    "       H    =T= ",
    "       H     H  ",
    "  #    H     H  ",
    "  #==T===    H  ",
    "     H       H  ",
    "     H       H  ",
    "     H       H  ",
    "  P  H       H  ",
    "================",
];

pub fn embedded() -> LevelDef {
    let (rows, spawn) = parse_rows(EMBEDDED_MAP);
    LevelDef {
        name: EMBEDDED_NAME.to_string(),
        rows,
        spawn: spawn.unwrap_or(DEFAULT_TILED_SPAWN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_level_with_name_and_spawn() {
        let def = parse_text("# Test Level\n  T \nP H \n====\n").expect("parse");
        assert_eq!(def.name, "Test Level");
        assert_eq!(def.height(), 3);
        assert_eq!(def.width(), 4);
        assert_eq!(def.spawn, (0, 1));
        assert_eq!(def.rows[0][2], TileKind::LadderTop);
        assert_eq!(def.rows[1][2], TileKind::Ladder);
        assert_eq!(def.rows[2][0], TileKind::Floor);
    }

    #[test]
    fn brick_row_is_not_a_name() {
        let def = parse_text("####\nP   \n====").expect("parse");
        assert_eq!(def.name, "Unnamed Level");
        assert_eq!(def.rows[0], vec![TileKind::Brick; 4]);
    }

    #[test]
    fn ragged_rows_are_padded() {
        let def = parse_text("P\n====\n").expect("parse");
        assert_eq!(def.rows[0].len(), 4);
        assert_eq!(def.rows[0][3], TileKind::Empty);
    }

    #[test]
    fn unknown_characters_are_empty() {
        let def = parse_text("P$?\n===").expect("parse");
        assert_eq!(def.rows[0][1], TileKind::Empty);
        assert_eq!(def.rows[0][2], TileKind::Empty);
    }

    #[test]
    fn text_errors() {
        assert!(matches!(parse_text(""), Err(LevelError::Empty)));
        assert!(matches!(parse_text("# Only Name\n\n"), Err(LevelError::Empty)));
        assert!(matches!(parse_text("  \n===="), Err(LevelError::MissingSpawn)));
    }

    #[test]
    fn tiled_map_maps_indices() {
        let json = r#"{
            "width": 3, "height": 2,
            "layers": [
                { "name": "background", "data": [1,1,1,1,1,1] },
                { "name": "layerMain", "data": [0,3,7, 2,9,8] }
            ],
            "properties": [
                { "name": "spawnX", "type": "int", "value": 0 },
                { "name": "spawnY", "type": "int", "value": 0 }
            ]
        }"#;
        let def = parse_tiled(json, "tiny").expect("parse");
        assert_eq!(def.name, "tiny");
        assert_eq!(
            def.rows,
            vec![
                vec![TileKind::Empty, TileKind::LadderTop, TileKind::Empty],
                vec![TileKind::Floor, TileKind::Ladder, TileKind::Brick],
            ]
        );
        assert_eq!(def.spawn, (0, 0));
    }

    #[test]
    fn tiled_map_default_spawn() {
        let json = r#"{ "width": 1, "height": 1, "layers": [ { "name": "layerMain", "data": [2] } ] }"#;
        assert_eq!(parse_tiled(json, "x").expect("parse").spawn, DEFAULT_TILED_SPAWN);
    }

    #[test]
    fn tiled_default_spawn_stands_on_row_twelve() {
        let (x, y) = DEFAULT_TILED_SPAWN;
        let c = crate::domain::entity::Character::spawn_at_cell(x, y);
        assert_eq!(c.feet_y(), 12.0 * 16.0);
        assert_eq!(c.position.y, 176.0);
    }

    #[test]
    fn tiled_size_overflow_is_an_error() {
        let huge = r#"{ "width": 18446744073709551615, "height": 2, "layers": [ { "name": "layerMain", "data": [2] } ] }"#;
        assert!(matches!(
            parse_tiled(huge, "x"),
            Err(LevelError::Oversized { height: 2, .. })
        ));
    }

    #[test]
    fn tiled_errors() {
        assert!(matches!(parse_tiled("{", "x"), Err(LevelError::Json(_))));

        let no_layer = r#"{ "width": 1, "height": 1, "layers": [ { "name": "other", "data": [2] } ] }"#;
        assert!(matches!(parse_tiled(no_layer, "x"), Err(LevelError::MissingLayer(_))));

        let object_layer = r#"{ "width": 1, "height": 1, "layers": [ { "name": "layerMain", "objects": [] } ] }"#;
        assert!(matches!(parse_tiled(object_layer, "x"), Err(LevelError::MissingLayer(_))));

        let short = r#"{ "width": 2, "height": 2, "layers": [ { "name": "layerMain", "data": [2,2,2] } ] }"#;
        assert!(matches!(
            parse_tiled(short, "x"),
            Err(LevelError::SizeMismatch { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load(Path::new("definitely/not/here.txt")).expect_err("missing");
        assert!(matches!(err, LevelError::Io { .. }));
        assert!(err.to_string().contains("here.txt"));
    }

    #[test]
    fn embedded_level_is_well_formed() {
        let def = embedded();
        assert_eq!(def.width(), 16);
        assert_eq!(def.height(), 14);
        assert_eq!(def.spawn, (2, 12));
        assert!(def.rows.iter().all(|r| r.len() == 16));
        // Every ladder cap has ladder below it
        for (y, row) in def.rows.iter().enumerate() {
            for (x, kind) in row.iter().enumerate() {
                if *kind == TileKind::LadderTop {
                    assert_eq!(def.rows[y + 1][x], TileKind::Ladder, "cap at {x},{y}");
                }
            }
        }
    }

    #[test]
    fn load_or_embedded_falls_back() {
        let def = load_or_embedded(Some(Path::new("nope.json")));
        assert_eq!(def.name, EMBEDDED_NAME);
        assert_eq!(load_or_embedded(None).name, EMBEDDED_NAME);
    }
}
