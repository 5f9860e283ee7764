use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::palette::ColorId;

pub const DEFAULT_CELL_SIZE: f64 = 64.0;
/// Largest grid a level may describe, in cells.
pub const MAX_CELLS: usize = 16_384;

/// Starting piece: grid slot plus color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceSpec {
    pub x: u32,
    pub y: u32,
    pub color: ColorId,
}

/// Board dimensions and starting pieces, as stored in `levels/*.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub cols: u32,
    pub rows: u32,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    #[serde(default)]
    pub pieces: Vec<PieceSpec>,
}

fn default_cell_size() -> f64 {
    DEFAULT_CELL_SIZE
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("invalid level json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level grid must have at least one cell, got {cols}x{rows}")]
    EmptyGrid { cols: u32, rows: u32 },
    #[error("level grid {cols}x{rows} exceeds {max} cells", max = MAX_CELLS)]
    TooLarge { cols: u32, rows: u32 },
    #[error("cell size must be positive, got {0}")]
    CellSize(f64),
    #[error("piece at ({x}, {y}) lies outside the {cols}x{rows} grid")]
    OutOfBounds { x: u32, y: u32, cols: u32, rows: u32 },
    #[error("more than one piece starts at ({x}, {y})")]
    Occupied { x: u32, y: u32 },
}

impl Level {
    pub fn from_json(text: &str) -> Result<Level, LevelError> {
        let level: Level = serde_json::from_str(text)?;
        level.validate()?;
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(LevelError::EmptyGrid {
                cols: self.cols,
                rows: self.rows,
            });
        }
        let cells = (self.cols as usize).checked_mul(self.rows as usize);
        if cells.is_none_or(|n| n > MAX_CELLS) {
            return Err(LevelError::TooLarge {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.cell_size.is_nan() || self.cell_size <= 0.0 {
            return Err(LevelError::CellSize(self.cell_size));
        }
        let mut seen = HashSet::new();
        for p in &self.pieces {
            if p.x >= self.cols || p.y >= self.rows {
                return Err(LevelError::OutOfBounds {
                    x: p.x,
                    y: p.y,
                    cols: self.cols,
                    rows: self.rows,
                });
            }
            if !seen.insert((p.x, p.y)) {
                return Err(LevelError::Occupied { x: p.x, y: p.y });
            }
        }
        Ok(())
    }

    /// Level shipped with the game, used when no other level loads.
    pub fn bundled() -> Level {
        let text = include_str!("../../levels/default.json");
        match Level::from_json(text) {
            Ok(level) => level,
            Err(e) => {
                log::warn!("bundled level rejected: {e}");
                Level {
                    cols: 1,
                    rows: 1,
                    cell_size: DEFAULT_CELL_SIZE,
                    pieces: Vec::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_level_with_default_cell_size() {
        let l = Level::from_json(r#"{"cols":3,"rows":2,"pieces":[{"x":1,"y":1,"color":"yellow_two"}]}"#)
            .unwrap();
        assert_eq!(l.cell_size, DEFAULT_CELL_SIZE);
        assert_eq!(
            l.pieces,
            vec![PieceSpec {
                x: 1,
                y: 1,
                color: ColorId::YellowTwo
            }]
        );
    }

    #[test]
    fn rejects_piece_outside_grid() {
        let err = Level::from_json(r#"{"cols":2,"rows":2,"pieces":[{"x":2,"y":0,"color":"red"}]}"#)
            .unwrap_err();
        assert!(matches!(err, LevelError::OutOfBounds { x: 2, y: 0, .. }));
    }

    #[test]
    fn rejects_stacked_pieces() {
        let err = Level::from_json(
            r#"{"cols":2,"rows":2,"pieces":[{"x":0,"y":0,"color":"red"},{"x":0,"y":0,"color":"blue"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LevelError::Occupied { x: 0, y: 0 }));
    }

    #[test]
    fn rejects_empty_grid_and_bad_json() {
        assert!(matches!(
            Level::from_json(r#"{"cols":0,"rows":4}"#),
            Err(LevelError::EmptyGrid { .. })
        ));
        assert!(matches!(
            Level::from_json(r#"{"cols":2,"rows":2,"cell_size":0}"#),
            Err(LevelError::CellSize(_))
        ));
        assert!(matches!(Level::from_json("{"), Err(LevelError::Parse(_))));
        assert!(matches!(
            Level::from_json(r#"{"cols":1,"rows":1,"pieces":[{"x":0,"y":0,"color":"green"}]}"#),
            Err(LevelError::Parse(_))
        ));
    }

    #[test]
    fn rejects_oversized_grid() {
        assert!(matches!(
            Level::from_json(r#"{"cols":4294967295,"rows":2,"pieces":[]}"#),
            Err(LevelError::TooLarge {
                cols: 4294967295,
                rows: 2
            })
        ));
        assert!(matches!(
            Level::from_json(r#"{"cols":200,"rows":200}"#),
            Err(LevelError::TooLarge { .. })
        ));
        assert!(Level::from_json(r#"{"cols":128,"rows":128}"#).is_ok());
    }

    #[test]
    fn bundled_level_is_valid() {
        let l = Level::bundled();
        assert!(l.validate().is_ok());
        assert!(!l.pieces.is_empty());
    }
}
