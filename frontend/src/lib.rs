//! Dataset release controls, compiled to WebAssembly and mounted onto
//! host-rendered markup.
//!
//! The host page instantiates each component explicitly once the document is
//! ready, passing the root element that carries the `data-*` configuration:
//!
//! - [`mount_release_controls`] wires the create/update/delete/revert
//!   gestures and returns a handle whose `unbind` removes the listeners;
//! - [`mount_release_list`] fetches the release collection and renders the
//!   host table;
//! - [`mount_release_selector`] fills a `<select>` with one option per
//!   release plus, optionally, the synthetic "current live" option.

mod actions;
mod config;
mod gestures;
mod platform;
mod release_list;
mod selector;
mod views;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlSelectElement, Window};

use actions::{gesture_channel, ReleaseActions};
use config::{ControlsConfig, ListConfig, SelectorConfig};
use gestures::GestureBindings;
use platform::web::{BrowserPage, FetchApi};
use release_list::ReleaseListLoader;
use selector::ReleaseSelector;
use views::{inject_link_resources_notice, DomListView, DomSelectorView};

#[wasm_bindgen(start)]
fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn browser_window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Keeps the action controller's DOM listeners alive. The host drops it (or
/// calls `unbind`) when the controls leave the page.
#[wasm_bindgen]
pub struct ReleaseControlsHandle {
    bindings: Option<GestureBindings>,
}

#[wasm_bindgen]
impl ReleaseControlsHandle {
    pub fn unbind(&mut self) {
        self.bindings.take();
    }
}

#[wasm_bindgen]
pub fn mount_release_controls(root: Element) -> Result<ReleaseControlsHandle, JsValue> {
    let window = browser_window()?;
    let config = ControlsConfig::from_lookup(|name| root.get_attribute(name)).map_err(to_js)?;

    if config.link_resources {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        match root.query_selector(".modal-body")? {
            Some(dialog_body) => {
                if let Err(e) = inject_link_resources_notice(&document, &dialog_body) {
                    log::error!("could not inject linked-resources notice: {e}");
                }
            }
            None => log::warn!("link_resources set but no dialog body found under root"),
        }
    }

    let (sender, receiver) = gesture_channel();
    let bindings = GestureBindings::bind(&root, sender);

    let api = FetchApi::new(window.clone(), config.api_url.clone());
    let page = BrowserPage::new(window);
    spawn_local(ReleaseActions::new(api, page, config).run(receiver));

    Ok(ReleaseControlsHandle {
        bindings: Some(bindings),
    })
}

#[wasm_bindgen]
pub fn mount_release_list(root: Element) -> Result<(), JsValue> {
    let window = browser_window()?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document available"))?;
    let config = ListConfig::from_lookup(|name| root.get_attribute(name)).map_err(to_js)?;

    let view = DomListView::from_root(document, &root).map_err(to_js)?;
    let api = FetchApi::new(window, config.api_url.clone());
    let loader = ReleaseListLoader::new(api, view);
    spawn_local(async move { loader.load(&config.dataset_id).await });
    Ok(())
}

#[wasm_bindgen]
pub fn mount_release_selector(select: HtmlSelectElement) -> Result<(), JsValue> {
    let window = browser_window()?;
    let config = SelectorConfig::from_lookup(|name| select.get_attribute(name)).map_err(to_js)?;

    let view = DomSelectorView::new(select);
    let api = FetchApi::new(window, config.api_url.clone());
    let selector = ReleaseSelector::new(api, view, config);
    spawn_local(async move { selector.populate().await });
    Ok(())
}
