//! Browser Bindings
//!
//! `History` over `window.history` and a microtask-backed `TaskQueue`.

use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::base::BaseUrl;
use crate::error::{RouterError, RouterResult};
use crate::history::{History, Listener, ListenerId, Listeners, Location};
use crate::schedule::{Task, TaskQueue};

fn js_err(e: JsValue) -> RouterError {
    RouterError::Browser(format!("{:?}", e))
}

fn window() -> RouterResult<web_sys::Window> {
    web_sys::window().ok_or_else(|| RouterError::Browser("no window".to_string()))
}

fn read_location(window: &web_sys::Window) -> Location {
    let location = window.location();
    Location {
        pathname: location.pathname().unwrap_or_else(|_| "/".to_string()),
        search: location.search().unwrap_or_default(),
        hash: location.hash().unwrap_or_default(),
    }
}

/// `BaseUrl` for the page's own origin
pub fn browser_base_url(base_path: &str) -> RouterResult<BaseUrl> {
    let origin = window()?.location().origin().map_err(js_err)?;
    BaseUrl::new(&origin, base_path)
}

/// `History` backed by `window.history`
///
/// Listeners fire after this object's own push/replace and on `popstate`.
pub struct BrowserHistory {
    window: web_sys::Window,
    listeners: Rc<Listeners>,
    on_popstate: Closure<dyn FnMut(web_sys::Event)>,
}

impl BrowserHistory {
    pub fn new() -> RouterResult<Self> {
        let window = window()?;
        let listeners = Rc::new(Listeners::default());

        let popstate_window = window.clone();
        let popstate_listeners = listeners.clone();
        let on_popstate = Closure::<dyn FnMut(web_sys::Event)>::new(move |_ev: web_sys::Event| {
            popstate_listeners.notify(&read_location(&popstate_window));
        });
        window
            .add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())
            .map_err(js_err)?;

        Ok(Self {
            window,
            listeners,
            on_popstate,
        })
    }

    fn write(&self, url: &str, state: Option<Value>, replace: bool) {
        let state = match state {
            Some(state) => state.serialize(&Serializer::json_compatible()).unwrap_or_else(|e| {
                log::warn!("history state not serializable: {}", e);
                JsValue::NULL
            }),
            None => JsValue::NULL,
        };
        let result = self.window.history().and_then(|history| {
            if replace {
                history.replace_state_with_url(&state, "", Some(url))
            } else {
                history.push_state_with_url(&state, "", Some(url))
            }
        });
        match result {
            Ok(()) => self.listeners.notify(&read_location(&self.window)),
            Err(e) => log::error!("history write to {} failed: {:?}", url, e),
        }
    }
}

impl History for BrowserHistory {
    fn location(&self) -> Location {
        read_location(&self.window)
    }

    fn push(&self, url: &str, state: Option<Value>) {
        self.write(url, state, false)
    }

    fn replace(&self, url: &str, state: Option<Value>) {
        self.write(url, state, true)
    }

    fn listen(&self, listener: Listener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.remove(id)
    }
}

impl Drop for BrowserHistory {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("popstate", self.on_popstate.as_ref().unchecked_ref());
    }
}

/// Runs tasks on the microtask queue
#[derive(Debug, Clone, Copy, Default)]
pub struct Microtasks;

impl TaskQueue for Microtasks {
    fn post(&self, task: Task) {
        leptos::task::spawn_local(async move { task() });
    }
}
