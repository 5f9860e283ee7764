use std::collections::HashMap;

use blocks_core::{ColorId, ResourceHandle, resource_for};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

use crate::canvas::draw;
use crate::state::STATE;
use crate::utils::asset_url;

/// Block images keyed by palette handle.
pub struct Textures {
    images: HashMap<ResourceHandle, HtmlImageElement>,
}

impl Textures {
    /// Start loading one image per color. Each finished load triggers a
    /// redraw; until then the board falls back to flat fills.
    pub fn load_all() -> Result<Textures, JsValue> {
        let mut images = HashMap::new();
        for color in ColorId::ALL {
            let handle = resource_for(color);
            if images.contains_key(&handle) {
                continue;
            }
            let img = HtmlImageElement::new()?;
            let onload = Closure::<dyn FnMut()>::wrap(Box::new(redraw));
            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();
            let path = handle.path();
            let onerror = Closure::<dyn FnMut()>::wrap(Box::new(move || {
                log::warn!("failed to load texture {path}");
            }));
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
            img.set_src(&asset_url(path));
            images.insert(handle, img);
        }
        Ok(Textures { images })
    }

    /// Image for a handle once it has decoded.
    pub fn ready(&self, handle: ResourceHandle) -> Option<&HtmlImageElement> {
        self.images
            .get(&handle)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }
}

fn redraw() {
    STATE.with(|st| {
        if let Some(st_rc) = st.borrow().as_ref()
            && let Ok(mut s) = st_rc.try_borrow_mut()
        {
            draw(&mut s);
        }
    });
}
