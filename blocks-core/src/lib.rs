//! Game logic for the block tile game: color palette, draggable pieces and
//! the board that tracks which cell each piece sits on. Nothing here touches
//! the browser; `blocks-wasm` feeds input in and draws what comes out.

pub mod board;
pub mod draggable;
pub mod level;
pub mod palette;

pub use board::{Board, Tile};
pub use draggable::{
    CellId, DragPhase, GameObject, InputEvent, Listener, Notice, Point, Sprite, Z_NORMAL, Z_RAISED,
};
pub use level::{Level, LevelError, PieceSpec};
pub use palette::{ColorId, Hue, ResourceHandle, resource_for};
