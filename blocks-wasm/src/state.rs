use std::cell::RefCell;
use std::rc::Rc;

use blocks_core::Board;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::assets::Textures;

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub board: Board,
    pub textures: Textures,
    /// Canvas pixels per board pixel.
    pub scale: f64,
    /// Screen position of the board origin.
    pub offset: (f64, f64),
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
