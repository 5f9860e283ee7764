//! Application-wide numeric constants, in CSS pixels unless noted otherwise.

/// Space kept around the board when fitting it to the canvas.
pub const VIEW_MARGIN_PX: f64 = 20.0;
/// Outline width for the selected piece.
pub const SELECT_LINE_PX: f64 = 3.0;
/// Smallest and largest cell size accepted from the `size` query parameter.
pub const MIN_CELL_SIZE: f64 = 8.0;
pub const MAX_CELL_SIZE: f64 = 512.0;
