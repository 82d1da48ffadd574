use std::fmt;

use serde::{Deserialize, Serialize};

use lavaleap_core::assets::AssetStore;
use lavaleap_core::surface::DrawSurface;

use crate::cell::{Cell, CellKind, Drawable, EMPTY_SYMBOL};

/// Errors raised while turning a schema into cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A symbol outside `G L P C .`.
    UnknownSymbol { row: usize, col: usize, symbol: char },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSymbol { row, col, symbol } => {
                write!(f, "unknown map symbol {symbol:?} at row {row}, column {col}")
            },
        }
    }
}

impl std::error::Error for MapError {}

/// Check every symbol of a schema. `.` is a defined empty tile.
pub fn validate<S: AsRef<str>>(schema: &[S]) -> Result<(), MapError> {
    for (row, line) in schema.iter().enumerate() {
        for (col, symbol) in line.as_ref().chars().enumerate() {
            if symbol != EMPTY_SYMBOL && CellKind::from_symbol(symbol).is_none() {
                return Err(MapError::UnknownSymbol { row, col, symbol });
            }
        }
    }
    Ok(())
}

/// Grid capacity of a viewport: `(cols, rows)`.
///
/// Columns round up so the right edge is always covered; rows round down so
/// no row is cut off at the bottom.
pub fn grid_capacity(viewport_width: f32, viewport_height: f32, tile_size: f32) -> (usize, usize) {
    assert!(tile_size > 0.0, "tile size must be positive, got {tile_size}");
    let cols = (viewport_width / tile_size).ceil().max(0.0) as usize;
    let rows = (viewport_height / tile_size).floor().max(0.0) as usize;
    (cols, rows)
}

/// Fit a schema to the viewport grid.
///
/// Every row is padded or truncated to exactly `cols` symbols. The last
/// schema row is padded with ground so the floor continues to the right
/// edge; other rows are padded with empty tiles. Missing rows are prepended
/// as empty rows so terrain sits at the bottom of the screen.
pub fn normalize<S: AsRef<str>>(
    schema: &[S],
    viewport_width: f32,
    viewport_height: f32,
    tile_size: f32,
) -> Vec<String> {
    let (cols, rows) = grid_capacity(viewport_width, viewport_height, tile_size);
    if schema.is_empty() {
        return Vec::new();
    }

    let last = schema.len() - 1;
    let mut normalized: Vec<String> = schema
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let row = row.as_ref();
            let len = row.chars().count();
            if len >= cols {
                row.chars().take(cols).collect()
            } else {
                let fill = if i == last {
                    CellKind::Ground.symbol()
                } else {
                    EMPTY_SYMBOL
                };
                let mut padded = String::with_capacity(cols);
                padded.push_str(row);
                padded.extend(std::iter::repeat_n(fill, cols - len));
                padded
            }
        })
        .collect();

    if normalized.len() < rows {
        let missing = rows - normalized.len();
        let empty_row: String = std::iter::repeat_n(EMPTY_SYMBOL, cols).collect();
        normalized.splice(0..0, std::iter::repeat_n(empty_row, missing));
    }

    normalized
}

/// Cells of a built level, split by how the actor interacts with them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelMap {
    /// Solid tiles: ground and platforms.
    pub platforms: Vec<Cell>,
    /// Lethal tiles: lava.
    pub hazards: Vec<Cell>,
    /// Passable pickups: coins.
    pub collectibles: Vec<Cell>,
    pub tile_size: f32,
    pub cols: usize,
    pub rows: usize,
}

impl LevelMap {
    pub fn cell_count(&self) -> usize {
        self.platforms.len() + self.hazards.len() + self.collectibles.len()
    }

    /// Every cell, platforms first, then hazards, then collectibles.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.platforms
            .iter()
            .chain(self.hazards.iter())
            .chain(self.collectibles.iter())
    }
}

/// Builds [`LevelMap`]s from a schema sized to the current surface.
#[derive(Debug, Clone)]
pub struct MapGenerator {
    schema: Vec<String>,
    tile_size: f32,
}

impl MapGenerator {
    pub fn new<S: AsRef<str>>(schema: &[S], tile_size: f32) -> Self {
        assert!(tile_size > 0.0, "tile size must be positive, got {tile_size}");
        Self {
            schema: schema.iter().map(|r| r.as_ref().to_string()).collect(),
            tile_size,
        }
    }

    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Instantiate every cell of the normalized grid, drawing each as it is
    /// created.
    ///
    /// A cell at `(row, col)` is placed at `x = col * tile`,
    /// `y = row * tile + tile`.
    pub fn generate_map(
        &self,
        surface: &mut dyn DrawSurface,
        assets: &dyn AssetStore,
    ) -> Result<LevelMap, MapError> {
        validate(&self.schema)?;

        let tile = self.tile_size;
        let (cols, rows) = grid_capacity(surface.width(), surface.height(), tile);
        let grid = normalize(&self.schema, surface.width(), surface.height(), tile);

        let mut map = LevelMap {
            tile_size: tile,
            cols,
            rows: grid.len().max(rows),
            ..Default::default()
        };

        for (row, line) in grid.iter().enumerate() {
            for (col, symbol) in line.chars().enumerate() {
                let Some(kind) = CellKind::from_symbol(symbol) else {
                    continue;
                };
                let x = col as f32 * tile;
                let y = row as f32 * tile + tile;
                let cell = Cell::new(kind, x, y, tile, tile);
                cell.draw(surface, assets);
                match kind {
                    CellKind::Ground | CellKind::Platform => map.platforms.push(cell),
                    CellKind::Lava => map.hazards.push(cell),
                    CellKind::Coin => map.collectibles.push(cell),
                }
            }
        }

        tracing::debug!(
            cols,
            rows = map.rows,
            platforms = map.platforms.len(),
            hazards = map.hazards.len(),
            collectibles = map.collectibles.len(),
            "Generated level map"
        );
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lavaleap_core::surface::RecordingSurface;
    use lavaleap_core::test_helpers::{StaticAssets, rectangles};

    #[test]
    fn pads_narrow_rows_to_cols() {
        let schema = ["..P", "GG"];
        let out = normalize(&schema, 200.0, 80.0, 40.0);
        assert_eq!(out, vec!["..P..", "GGGGG"]);
    }

    #[test]
    fn single_row_is_last_row_and_gets_ground() {
        // cols = 4, rows = 1
        let out = normalize(&["G."], 160.0, 40.0, 40.0);
        assert_eq!(out, vec!["G.GG"]);
    }

    #[test]
    fn truncates_to_exactly_cols() {
        let out = normalize(&["GLPCGLPC", "........"], 120.0, 80.0, 40.0);
        assert_eq!(out, vec!["GLP", "..."]);
    }

    #[test]
    fn partial_column_rounds_up() {
        // 130 / 40 = 3.25 → 4 columns
        let out = normalize(&["G"], 130.0, 40.0, 40.0);
        assert_eq!(out, vec!["GGGG"]);
    }

    #[test]
    fn prepends_missing_rows_at_top() {
        let out = normalize(&["C..", "GGG"], 120.0, 160.0, 40.0);
        assert_eq!(out, vec!["...", "...", "C..", "GGG"]);
    }

    #[test]
    fn no_prepend_when_rows_match() {
        let out = normalize(&["...", "GGG"], 120.0, 80.0, 40.0);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], "...");
    }

    #[test]
    fn taller_schema_is_kept() {
        let schema = ["P..", "...", "GGG"];
        let out = normalize(&schema, 120.0, 40.0, 40.0);
        assert_eq!(out, vec!["P..", "...", "GGG"]);
    }

    #[test]
    fn empty_schema_normalizes_to_empty() {
        let schema: [&str; 0] = [];
        assert!(normalize(&schema, 800.0, 600.0, 40.0).is_empty());
    }

    #[test]
    #[should_panic(expected = "tile size must be positive")]
    fn zero_tile_size_panics() {
        normalize(&["G"], 100.0, 100.0, 0.0);
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let err = validate(&["G..", "G$G"]).unwrap_err();
        assert_eq!(
            err,
            MapError::UnknownSymbol {
                row: 1,
                col: 1,
                symbol: '$'
            }
        );
        assert_eq!(
            err.to_string(),
            "unknown map symbol '$' at row 1, column 1"
        );
    }

    #[test]
    fn generate_places_cells_one_tile_below_row() {
        let mut surface = RecordingSurface::new(120.0, 80.0);
        let generator = MapGenerator::new(&["..C", "GLP"], 40.0);
        let map = generator
            .generate_map(&mut surface, &StaticAssets::loading())
            .unwrap();

        assert_eq!(map.cols, 3);
        assert_eq!(map.rows, 2);
        assert_eq!(map.collectibles.len(), 1);
        assert_eq!(map.collectibles[0].position(), (80.0, 40.0));
        assert_eq!(map.hazards.len(), 1);
        assert_eq!(map.hazards[0].position(), (40.0, 80.0));
        assert_eq!(map.platforms.len(), 2);
        assert_eq!(map.platforms[0].kind, CellKind::Ground);
        assert_eq!(map.platforms[0].position(), (0.0, 80.0));
        assert_eq!(map.platforms[1].kind, CellKind::Platform);
        assert_eq!(map.platforms[1].rect.width, 40.0);
    }

    #[test]
    fn generate_draws_every_cell() {
        let mut surface = RecordingSurface::new(160.0, 80.0);
        let generator = MapGenerator::new(&["P..C", "GGLL"], 40.0);
        let map = generator
            .generate_map(&mut surface, &StaticAssets::loading())
            .unwrap();
        assert_eq!(map.cell_count(), 6);
        assert_eq!(rectangles(&surface), 6);
    }

    #[test]
    fn generate_fails_fast_on_unknown_symbol() {
        let mut surface = RecordingSurface::new(160.0, 80.0);
        let generator = MapGenerator::new(&["..*."], 40.0);
        let result = generator.generate_map(&mut surface, &StaticAssets::loading());
        assert!(matches!(
            result,
            Err(MapError::UnknownSymbol { symbol: '*', .. })
        ));
        assert!(surface.commands().is_empty(), "nothing drawn on failure");
    }

    #[test]
    fn empty_schema_builds_empty_map() {
        let mut surface = RecordingSurface::new(160.0, 80.0);
        let schema: [&str; 0] = [];
        let map = MapGenerator::new(&schema, 40.0)
            .generate_map(&mut surface, &StaticAssets::loading())
            .unwrap();
        assert_eq!(map.cell_count(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn schema_strategy() -> impl Strategy<Value = Vec<String>> {
            proptest::collection::vec("[GLPC.]{0,30}", 1..15)
        }

        proptest! {
            #[test]
            fn every_row_has_exactly_cols(
                schema in schema_strategy(),
                width in 1.0f32..2000.0,
                height in 1.0f32..1200.0,
                tile in 8.0f32..80.0,
            ) {
                let (cols, rows) = grid_capacity(width, height, tile);
                let out = normalize(&schema, width, height, tile);
                prop_assert!(out.len() >= rows);
                prop_assert!(out.len() >= schema.len());
                for row in &out {
                    prop_assert_eq!(row.chars().count(), cols);
                }
            }

            #[test]
            fn schema_symbols_are_preserved(
                schema in schema_strategy(),
                tile in 8.0f32..80.0,
            ) {
                let out = normalize(&schema, 1000.0, 600.0, tile);
                let (cols, _) = grid_capacity(1000.0, 600.0, tile);
                let offset = out.len() - schema.len();
                for (i, row) in schema.iter().enumerate() {
                    let kept: String = row.chars().take(cols).collect();
                    prop_assert!(out[offset + i].starts_with(&kept));
                }
            }
        }
    }
}
