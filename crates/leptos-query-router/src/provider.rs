//! Router Provider
//!
//! Owns the history subscription and the query synchronizer, and hands them
//! to descendants through Leptos context.

use std::rc::Rc;

use leptos::prelude::*;
use url::Url;

use crate::base::BaseUrl;
use crate::browser::Microtasks;
use crate::history::{History, Location, RouterHistory};
use crate::query_sync::QuerySync;
use crate::schedule::TaskQueue;

/// Non-reactive router state shared by all hooks
pub struct RouterRuntime {
    pub history: Rc<dyn History>,
    pub router_history: RouterHistory,
    pub base: BaseUrl,
    pub queue: Rc<dyn TaskQueue>,
    pub query: Rc<QuerySync>,
}

/// Router handle provided via context
#[derive(Clone, Copy)]
pub struct RouterContext {
    runtime: StoredValue<Rc<RouterRuntime>, LocalStorage>,
    /// Current history entry, updated after every navigation
    pub location: RwSignal<Location>,
}

impl RouterContext {
    pub fn runtime(&self) -> Rc<RouterRuntime> {
        self.runtime.get_value()
    }

    pub fn base(&self) -> BaseUrl {
        self.runtime().base.clone()
    }

    /// Absolute current URL (tracked)
    pub fn current_url(&self) -> Option<Url> {
        let location = self.location.get();
        self.runtime().base.current_url(&location).ok()
    }
}

/// Get the router from context
pub fn use_router() -> RouterContext {
    use_context::<RouterContext>().expect("no <RouterProvider /> was found")
}

/// Context-preserving push/replace
pub fn use_history() -> RouterHistory {
    use_router().runtime().router_history.clone()
}

pub fn use_location() -> ReadSignal<Location> {
    use_router().location.read_only()
}

/// Build the router runtime over `history` and provide it to the current
/// owner
///
/// `queue` defaults to the browser microtask queue. The history subscription
/// ends when the owner is cleaned up.
pub fn provide_router(history: Rc<dyn History>, base: BaseUrl, queue: Option<Rc<dyn TaskQueue>>) -> RouterContext {
    let queue: Rc<dyn TaskQueue> = queue.unwrap_or_else(|| Rc::new(Microtasks));

    // Subscribed first so shadows are reset before the location signal fires.
    let query = QuerySync::attach(history.clone(), base.clone(), queue.clone());

    let location = RwSignal::new(history.location());
    let listener = history.listen(Rc::new(move |loc: &Location| {
        log::debug!("navigated to {}{}", loc.pathname, loc.search);
        let _ = location.try_set(loc.clone());
    }));

    let runtime = StoredValue::new_local(Rc::new(RouterRuntime {
        router_history: RouterHistory::new(history.clone(), base.clone()),
        history,
        base,
        queue,
        query,
    }));

    on_cleanup(move || {
        let _ = runtime.try_with_value(|rt| {
            rt.history.unlisten(listener);
            rt.query.detach();
        });
    });

    let ctx = RouterContext { runtime, location };
    provide_context(ctx);
    ctx
}

/// Provides routing to its children
///
/// `queue` defaults to the browser microtask queue.
#[component]
pub fn RouterProvider(
    history: Rc<dyn History>,
    base: BaseUrl,
    #[prop(optional)] queue: Option<Rc<dyn TaskQueue>>,
    children: Children,
) -> impl IntoView {
    provide_router(history, base, queue);
    children()
}
