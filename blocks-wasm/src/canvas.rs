use blocks_core::{ColorId, Hue, Sprite, resource_for};

use crate::constants::{SELECT_LINE_PX, VIEW_MARGIN_PX};
use crate::state::State;
use crate::utils::{sync_canvas_size, to_screen};

/// Flat color shown while a block texture is still loading.
fn fallback_fill(color: ColorId) -> &'static str {
    match (color.hue(), color.shade()) {
        (Some(Hue::Red), Some(1)) => "#f28b82",
        (Some(Hue::Red), Some(2)) => "#e53935",
        (Some(Hue::Red), _) => "#8e1c1c",
        (Some(Hue::Yellow), Some(1)) => "#fff59d",
        (Some(Hue::Yellow), Some(2)) => "#fdd835",
        (Some(Hue::Yellow), _) => "#c49000",
        (Some(Hue::Blue), Some(1)) => "#90caf9",
        (Some(Hue::Blue), Some(2)) => "#1e88e5",
        (Some(Hue::Blue), _) => "#0d3c7a",
        (None, _) => "#e0e0e0",
    }
}

/// Fit the board into the canvas, centred, keeping square cells.
fn update_viewport(state: &mut State) {
    let canvas_w = f64::from(state.canvas.width());
    let canvas_h = f64::from(state.canvas.height());
    let (board_w, board_h) = state.board.extent();
    let scale_x = (canvas_w - 2.0 * VIEW_MARGIN_PX) / board_w.max(1.0);
    let scale_y = (canvas_h - 2.0 * VIEW_MARGIN_PX) / board_h.max(1.0);
    let scale = scale_x.min(scale_y).max(0.1);
    state.scale = scale;
    state.offset = (
        (canvas_w - board_w * scale) / 2.0,
        (canvas_h - board_h * scale) / 2.0,
    );
}

fn draw_block(state: &State, sprite: &Sprite, color: ColorId) {
    let (cx, cy) = to_screen(sprite.position, state.scale, state.offset);
    let w = sprite.width * state.scale;
    let h = sprite.height * state.scale;
    let (x, y) = (cx - w / 2.0, cy - h / 2.0);
    match state.textures.ready(sprite.resource) {
        Some(img) => {
            if let Err(e) = state
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)
            {
                log::warn!("draw_image failed: {e:?}");
            }
        }
        None => {
            state.ctx.set_fill_style_str(fallback_fill(color));
            state.ctx.fill_rect(x, y, w, h);
            state.ctx.set_stroke_style_str("#555");
            state.ctx.set_line_width(1.0);
            state.ctx.stroke_rect(x, y, w, h);
        }
    }
}

/// Repaint the whole scene: empty tiles, then pieces in stacking order.
pub fn draw(state: &mut State) {
    sync_canvas_size(state);
    update_viewport(state);
    let width = f64::from(state.canvas.width());
    let height = f64::from(state.canvas.height());
    state.ctx.clear_rect(0.0, 0.0, width, height);

    let state: &State = state;
    let size = state.board.cell_size();
    for tile in state.board.tiles() {
        let empty = Sprite {
            resource: resource_for(ColorId::Empty),
            position: state.board.cell_centre(tile.id),
            width: size,
            height: size,
            z_index: 0,
        };
        draw_block(state, &empty, ColorId::Empty);
    }

    let mut order: Vec<usize> = (0..state.board.pieces().len()).collect();
    order.sort_by_key(|&i| state.board.pieces()[i].sprite().z_index);
    for i in order {
        let piece = &state.board.pieces()[i];
        draw_block(state, piece.sprite(), piece.color());
    }

    if let Some(i) = state.board.selected() {
        let sprite = state.board.pieces()[i].sprite();
        let (cx, cy) = to_screen(sprite.position, state.scale, state.offset);
        let w = sprite.width * state.scale;
        let h = sprite.height * state.scale;
        state.ctx.set_stroke_style_str("#fff");
        state.ctx.set_line_width(SELECT_LINE_PX);
        state.ctx.stroke_rect(cx - w / 2.0, cy - h / 2.0, w, h);
    }
}
