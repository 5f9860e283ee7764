use std::cell::RefCell;
use std::rc::Rc;

use blocks_core::{Board, InputEvent, Level, Point};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent, TouchEvent};

mod assets;
mod canvas;
mod constants;
mod state;
mod utils;

use crate::assets::Textures;
use crate::canvas::draw;
use crate::constants::{MAX_CELL_SIZE, MIN_CELL_SIZE};
use crate::state::{STATE, State};
use crate::utils::{
    asset_url, client_to_canvas, fetch_text_with_fallbacks, from_screen, get_query_param,
};

fn init_canvas(
    document: &Document,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let cv = document
        .get_element_by_id("cv")
        .ok_or_else(|| JsValue::from_str("canvas #cv not found"))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((cv, ctx))
}

/// Cell size from `?size=`, clamped to a usable range.
fn size_override(search: &str) -> Option<f64> {
    let raw = get_query_param(search, "size")?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v.clamp(MIN_CELL_SIZE, MAX_CELL_SIZE)),
        _ => {
            log::warn!("ignoring size={raw}");
            None
        }
    }
}

fn apply_size(mut level: Level, size: Option<f64>) -> Level {
    if let Some(s) = size {
        level.cell_size = s;
    }
    level
}

/// Board-space pointer position for a client coordinate.
fn board_point(s: &State, client_x: i32, client_y: i32) -> Point {
    let (x, y) = client_to_canvas(f64::from(client_x), f64::from(client_y), &s.canvas);
    from_screen(x, y, s.scale, s.offset)
}

fn first_touch_point(s: &State, e: &TouchEvent) -> Option<Point> {
    let t = e.changed_touches().get(0)?;
    Some(board_point(s, t.client_x(), t.client_y()))
}

fn set_cursor(s: &State, cursor: &str) {
    if let Err(e) = s.canvas.style().set_property("cursor", cursor) {
        log::warn!("set cursor: {e:?}");
    }
}

/// Feed a host-named input to one piece. Unmapped names are dropped.
fn forward(s: &mut State, idx: usize, name: &str, global: Point) {
    match InputEvent::from_host(name, global) {
        Some(event) => s.board.dispatch(idx, event),
        None => log::warn!("no drag input for {name}"),
    }
}

fn attach_input(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let canvas = state.borrow().canvas.clone();
    let window = state.borrow().window.clone();

    // Mouse: a press toggles, so a press on a dragging piece also ends it.
    {
        let st = state.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let global = board_point(&s, e.client_x(), e.client_y());
            let target = s.board.active().or_else(|| s.board.piece_at(global));
            if let Some(idx) = target {
                forward(&mut s, idx, "pointerdown", global);
                draw(&mut s);
            }
        }));
        canvas.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }
    {
        let st = state.clone();
        let mousemove = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let global = board_point(&s, e.client_x(), e.client_y());
            if let Some(idx) = s.board.active() {
                forward(&mut s, idx, "pointermove", global);
                draw(&mut s);
            } else {
                let cursor = if s.board.piece_at(global).is_some() {
                    "pointer"
                } else {
                    "default"
                };
                set_cursor(&s, cursor);
            }
        }));
        canvas.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }
    {
        // on the window so a release outside the canvas still ends the drag
        let st = state.clone();
        let mouseup = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            if let Some(idx) = s.board.active() {
                let global = board_point(&s, e.client_x(), e.client_y());
                forward(&mut s, idx, "pointerup", global);
                draw(&mut s);
            }
        }));
        window.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
        mouseup.forget();
    }

    // Touch. A press is forwarded as a pointer press so the piece is
    // selected as its drag begins.
    {
        let st = state.clone();
        let touchstart = Closure::<dyn FnMut(TouchEvent)>::wrap(Box::new(move |e: TouchEvent| {
            e.prevent_default();
            let mut s = st.borrow_mut();
            if s.board.active().is_some() {
                return;
            }
            let Some(global) = first_touch_point(&s, &e) else {
                return;
            };
            if let Some(idx) = s.board.piece_at(global) {
                forward(&mut s, idx, "pointerdown", global);
                draw(&mut s);
            }
        }));
        canvas
            .add_event_listener_with_callback("touchstart", touchstart.as_ref().unchecked_ref())?;
        touchstart.forget();
    }
    {
        let st = state.clone();
        let touchmove = Closure::<dyn FnMut(TouchEvent)>::wrap(Box::new(move |e: TouchEvent| {
            e.prevent_default();
            let mut s = st.borrow_mut();
            if let Some(idx) = s.board.active()
                && let Some(global) = first_touch_point(&s, &e)
            {
                forward(&mut s, idx, "touchmove", global);
                draw(&mut s);
            }
        }));
        canvas.add_event_listener_with_callback("touchmove", touchmove.as_ref().unchecked_ref())?;
        touchmove.forget();
    }
    for (dom_name, host_name) in [("touchend", "touchend"), ("touchcancel", "touchendoutside")] {
        let st = state.clone();
        let touchend = Closure::<dyn FnMut(TouchEvent)>::wrap(Box::new(move |e: TouchEvent| {
            e.prevent_default();
            let mut s = st.borrow_mut();
            if let Some(idx) = s.board.active() {
                let global = first_touch_point(&s, &e).unwrap_or_default();
                forward(&mut s, idx, host_name, global);
                draw(&mut s);
            }
        }));
        canvas.add_event_listener_with_callback(dom_name, touchend.as_ref().unchecked_ref())?;
        touchend.forget();
    }

    {
        let st = state.clone();
        let onresize = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            draw(&mut st.borrow_mut());
        }));
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }
    Ok(())
}

/// Replace the bundled level with `levels/<name>.json` once it arrives.
async fn fetch_and_load_level(name: String, size: Option<f64>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let rel = format!("levels/{name}.json");
    let urls = [asset_url(&rel), rel.clone(), format!("./{rel}")];
    let text = fetch_text_with_fallbacks(&window, &urls)
        .await
        .ok_or_else(|| JsValue::from_str(&format!("level '{name}' not found")))?;
    let level = Level::from_json(&text).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let level = apply_size(level, size);
    STATE.with(|st| {
        if let Some(st_rc) = st.borrow().as_ref() {
            let mut s = st_rc.borrow_mut();
            s.board = Board::from_level(&level);
            draw(&mut s);
        }
    });
    log::info!("loaded level '{name}' ({}x{})", level.cols, level.rows);
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
    }

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let (canvas, ctx) = init_canvas(&document)?;

    let search = window.location().search().unwrap_or_default();
    let size = size_override(&search);
    let board = Board::from_level(&apply_size(Level::bundled(), size));

    // If URL param level is set, fetch levels/<level>.json; the bundled level
    // stays in place until it arrives
    if let Some(name) = get_query_param(&search, "level") {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = fetch_and_load_level(name.clone(), size).await {
                log::error!("failed to load level '{name}': {err:?}");
            }
        });
    }

    let state = Rc::new(RefCell::new(State {
        window,
        canvas,
        ctx,
        board,
        textures: Textures::load_all()?,
        scale: 1.0,
        offset: (0.0, 0.0),
    }));
    STATE.with(|st| st.replace(Some(state.clone())));

    attach_input(state.clone())?;
    set_cursor(&state.borrow(), "default");
    draw(&mut state.borrow_mut());
    Ok(())
}
