use blocks_core::Point;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, Response, Window};

use crate::state::State;

/// Backing-store pixels for a CSS length at the given pixel ratio.
fn backing_px(css: f64, dpr: f64) -> u32 {
    (css.max(1.0) * dpr).round().clamp(1.0, 10_000.0) as u32
}

/// Resize the canvas backing store to its on-screen size times the device
/// pixel ratio, so cells stay square and sharp.
pub fn sync_canvas_size(state: &mut State) {
    let dpr = state.window.device_pixel_ratio();
    let rect = state.canvas.get_bounding_client_rect();
    let (w, h) = (backing_px(rect.width(), dpr), backing_px(rect.height(), dpr));
    if (state.canvas.width(), state.canvas.height()) != (w, h) {
        state.canvas.set_width(w);
        state.canvas.set_height(h);
    }
}

/// Board-space point to canvas pixels.
pub fn to_screen(p: Point, scale: f64, offset: (f64, f64)) -> (f64, f64) {
    (p.x * scale + offset.0, p.y * scale + offset.1)
}

/// Canvas pixels to board space.
pub fn from_screen(x: f64, y: f64, scale: f64, offset: (f64, f64)) -> Point {
    Point::new((x - offset.0) / scale, (y - offset.1) / scale)
}

/// Client (viewport) coordinates to canvas pixels, accounting for CSS
/// scaling of the element.
pub fn client_to_canvas(client_x: f64, client_y: f64, cv: &HtmlCanvasElement) -> (f64, f64) {
    let rect = cv.get_bounding_client_rect();
    let x = (client_x - rect.left()) * f64::from(cv.width()) / rect.width().max(1.0);
    let y = (client_y - rect.top()) * f64::from(cv.height()) / rect.height().max(1.0);
    (x, y)
}

/// Resolve a site-relative asset path against `window.__BASE_URL` (set by
/// the host page), defaulting to `/`.
pub fn asset_url(path: &str) -> String {
    let path = path.trim();
    if ["http://", "https://", "data:"]
        .iter()
        .any(|scheme| path.starts_with(scheme))
    {
        return path.to_string();
    }
    let base = web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("__BASE_URL")).ok())
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

async fn fetch_text(window: &Window, url: &str) -> Result<String, JsValue> {
    let resp: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("status {}", resp.status())));
    }
    JsFuture::from(resp.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}

/// First URL in `urls` that answers with a text body.
pub async fn fetch_text_with_fallbacks(window: &Window, urls: &[String]) -> Option<String> {
    for url in urls {
        match fetch_text(window, url).await {
            Ok(text) => return Some(text),
            Err(e) => log::debug!("fetch {url}: {e:?}"),
        }
    }
    None
}

/// Percent-decoded value of `key` in a `?a=b&c=d` query string.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| {
            percent_encoding::percent_decode_str(v)
                .decode_utf8_lossy()
                .into_owned()
        })
}
