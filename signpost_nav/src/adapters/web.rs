// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser adapter over `web-sys`.
//!
//! ## Feature
//!
//! Enable with `web`; compiled for `wasm32` targets only.
//!
//! ## Notes
//!
//! - [`BrowserHistory`] drives `history.pushState` / `replaceState` / `go`.
//!   Traversals complete asynchronously and arrive as `popstate` events.
//! - [`BrowserHead`] upserts head elements with `querySelector` lookups.
//! - [`BrowserTree`] walks element ancestry for the link interceptor.
//! - [`WasmSpawner`] runs metadata futures on the browser's microtask queue.
//! - [`install`] attaches the document click listener and the window
//!   `popstate` listener; dropping the returned [`Listeners`] detaches them.
//!
//! Browser API failures are logged at warn level and otherwise ignored.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::LocalFutureObj;
use futures::task::{LocalSpawn, SpawnError};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

use crate::head::{HeadSink, MetaTag, STRUCTURED_DATA_TYPE};
use crate::history::HistoryBackend;
use crate::intercept::{Activation, LinkInterceptor};
use crate::location::{Location, Origin};
use crate::store::NavigationStore;
use crate::types::{Anchor, AnchorLookup, Modifiers, ParentLookup, PointerButton};

fn warn_js(what: &str, err: &JsValue) {
    tracing::warn!(error = ?err, "{what} failed");
}

fn current_location(window: &web_sys::Window) -> Location {
    let loc = window.location();
    let path = loc.pathname().unwrap_or_else(|_| String::from("/"));
    let query = loc.search().unwrap_or_default();
    let fragment = loc.hash().unwrap_or_default();
    Location::new(&path, &query, &fragment)
}

/// History backend over `window.history`.
#[derive(Debug)]
pub struct BrowserHistory {
    window: web_sys::Window,
    origin: Origin,
}

impl BrowserHistory {
    /// Bind to the global window. `None` outside a browser or for non-HTTP origins.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let origin = Origin::parse(&window.location().origin().ok()?)?;
        Some(Self { window, origin })
    }

    fn history(&self) -> Option<web_sys::History> {
        match self.window.history() {
            Ok(h) => Some(h),
            Err(err) => {
                warn_js("window.history", &err);
                None
            }
        }
    }
}

impl HistoryBackend for BrowserHistory {
    fn origin(&self) -> Origin {
        self.origin.clone()
    }

    fn location(&self) -> Location {
        current_location(&self.window)
    }

    fn push(&mut self, location: &Location) {
        if let Some(history) = self.history()
            && let Err(err) =
                history.push_state_with_url(&JsValue::NULL, "", Some(&location.href()))
        {
            warn_js("history.pushState", &err);
        }
    }

    fn replace(&mut self, location: &Location) {
        if let Some(history) = self.history()
            && let Err(err) =
                history.replace_state_with_url(&JsValue::NULL, "", Some(&location.href()))
        {
            warn_js("history.replaceState", &err);
        }
    }

    fn go(&mut self, delta: isize) -> Option<Location> {
        let delta = i32::try_from(delta).ok()?;
        if let Some(history) = self.history()
            && let Err(err) = history.go_with_delta(delta)
        {
            warn_js("history.go", &err);
        }
        None
    }

    fn scroll_to_origin(&mut self) {
        self.window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

/// Head sink over `document.head`.
#[derive(Debug)]
pub struct BrowserHead {
    document: web_sys::Document,
}

impl BrowserHead {
    /// Bind to the global document.
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    fn upsert(
        &self,
        selector: &str,
        create: impl FnOnce(&web_sys::Element) -> Result<(), JsValue>,
    ) -> Option<web_sys::Element> {
        let found = match self.document.query_selector(selector) {
            Ok(found) => found,
            Err(err) => {
                warn_js("querySelector", &err);
                return None;
            }
        };
        if let Some(el) = found {
            return Some(el);
        }
        let head = self.document.head()?;
        let tag = selector.split('[').next().unwrap_or("meta");
        let created = self.document.create_element(tag).and_then(|el| {
            create(&el)?;
            head.append_child(&el)?;
            Ok(el)
        });
        match created {
            Ok(el) => Some(el),
            Err(err) => {
                warn_js("head element creation", &err);
                None
            }
        }
    }
}

impl HeadSink for BrowserHead {
    fn set_title(&mut self, title: &str) {
        self.document.set_title(title);
    }

    fn upsert_meta(&mut self, tag: MetaTag, content: &str) {
        let (attr, key) = (tag.key_attribute(), tag.key());
        let selector = format!("meta[{attr}=\"{key}\"]");
        if let Some(el) = self.upsert(&selector, |el| el.set_attribute(attr, key))
            && let Err(err) = el.set_attribute("content", content)
        {
            warn_js("meta content", &err);
        }
    }

    fn replace_structured_data(&mut self, json: Option<&str>) {
        let selector = format!("script[type=\"{STRUCTURED_DATA_TYPE}\"]");
        match self.document.query_selector_all(&selector) {
            Ok(nodes) => {
                for i in 0..nodes.length() {
                    if let Some(node) = nodes.item(i)
                        && let Ok(el) = node.dyn_into::<web_sys::Element>()
                    {
                        el.remove();
                    }
                }
            }
            Err(err) => warn_js("querySelectorAll", &err),
        }
        let Some(json) = json else {
            return;
        };
        let created = self.upsert(&selector, |el| {
            el.set_attribute("type", STRUCTURED_DATA_TYPE)
        });
        if let Some(el) = created {
            el.set_text_content(Some(json));
        }
    }
}

/// Parent and anchor lookups over live DOM elements.
#[derive(Copy, Clone, Debug, Default)]
pub struct BrowserTree;

impl ParentLookup<web_sys::Element> for BrowserTree {
    fn parent_of(&self, node: &web_sys::Element) -> Option<web_sys::Element> {
        node.parent_element()
    }
}

impl AnchorLookup<web_sys::Element> for BrowserTree {
    fn anchor_of(&self, node: &web_sys::Element) -> Option<Anchor> {
        let tag = node.tag_name();
        if !(tag.eq_ignore_ascii_case("a") || tag.eq_ignore_ascii_case("area")) {
            return None;
        }
        Some(Anchor {
            href: node.get_attribute("href")?,
            target: node.get_attribute("target"),
            download: node.has_attribute("download"),
        })
    }
}

/// Spawns local futures with `wasm-bindgen-futures`.
#[derive(Copy, Clone, Debug, Default)]
pub struct WasmSpawner;

impl LocalSpawn for WasmSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

/// The store type the browser listeners drive.
pub type BrowserStore = NavigationStore<BrowserHistory, BrowserHead, WasmSpawner>;

/// Attached browser listeners. Dropping this detaches them.
pub struct Listeners {
    document: web_sys::Document,
    window: web_sys::Window,
    click: Closure<dyn FnMut(web_sys::MouseEvent)>,
    popstate: Closure<dyn FnMut(web_sys::Event)>,
}

impl core::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listeners").finish_non_exhaustive()
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        let _ = self
            .document
            .remove_event_listener_with_callback("click", self.click.as_ref().unchecked_ref());
        let _ = self.window.remove_event_listener_with_callback(
            "popstate",
            self.popstate.as_ref().unchecked_ref(),
        );
    }
}

/// Attach the document click listener and the window `popstate` listener to `store`.
pub fn install(store: Rc<RefCell<BrowserStore>>) -> Result<Listeners, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let interceptor: LinkInterceptor<web_sys::Element, BrowserTree, BrowserTree> =
        LinkInterceptor::with_parent(BrowserTree, BrowserTree);
    let click_store = Rc::clone(&store);
    let click = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |event: web_sys::MouseEvent| {
        let Some(target) = event
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        else {
            return;
        };
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::CTRL, event.ctrl_key());
        modifiers.set(Modifiers::META, event.meta_key());
        modifiers.set(Modifiers::SHIFT, event.shift_key());
        modifiers.set(Modifiers::ALT, event.alt_key());
        let activation = Activation {
            target,
            button: PointerButton::from_index(event.button()),
            modifiers,
            default_prevented: event.default_prevented(),
        };
        let outcome = click_store
            .borrow_mut()
            .activate_link(&interceptor, &activation);
        if outcome.prevents_default() {
            event.prevent_default();
        }
    });
    document.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;

    let popstate_window = window.clone();
    let popstate = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
        let location = current_location(&popstate_window);
        store.borrow_mut().history_popped(location);
    });
    window.add_event_listener_with_callback("popstate", popstate.as_ref().unchecked_ref())?;

    Ok(Listeners {
        document,
        window,
        click,
        popstate,
    })
}
