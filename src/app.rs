//! Todo PWA App
//!
//! Startup wiring (routes, storage, router) and the page switch.

use std::fmt::Display;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_query_router::{
    browser_base_url, use_route_table, use_router, BrowserHistory, EmptyParams, History, Redirect, RouteRegistry,
    RouteTable, RouterProvider, RouterResult,
};
use reactive_stores::Store;

use crate::components::{DemoCounter, PageMain, Subpage};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::routes::{app_href, AppRoutes, TodosSearch};
use crate::storage::{BrowserStorage, KeyValueStore, MemoryStorage, StorageKeys};
use crate::store::TodosState;
use crate::todos::TodoStore;

/// What a matched route renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    RedirectToTodos,
    DemoRoot,
    DemoCounter,
    Main(Subpage),
}

/// Page of every declared route, first match wins
pub fn route_table(routes: &AppRoutes, registry: &RouteRegistry) -> RouterResult<RouteTable<Page>> {
    RouteTable::new(registry)
        .add(routes.root, Page::RedirectToTodos)?
        .add(routes.demo_root, Page::DemoRoot)?
        .add(routes.demo_counter, Page::DemoCounter)?
        .add(routes.todos, Page::Main(Subpage::Todos))?
        .add(routes.reminders, Page::Main(Subpage::Reminders))?
        .add(routes.calendar, Page::Main(Subpage::Calendar))?
        .add(routes.extras, Page::Main(Subpage::Extras))?
        .finish()
}

/// Startup failures cannot be recovered from
fn fatal<T, E: Display>(what: &str, result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::error!("{}: {}", what, e);
            panic!("{}: {}", what, e);
        }
    }
}

fn open_storage() -> Rc<dyn KeyValueStore> {
    match BrowserStorage::local() {
        Ok(storage) => Rc::new(storage),
        Err(e) => {
            log::warn!("{}; todos are kept in memory only", e);
            Rc::new(MemoryStorage::new())
        }
    }
}

fn render_page(page: Page, routes: &AppRoutes) -> AnyView {
    match page {
        Page::RedirectToTodos => match app_href(routes.todos, &EmptyParams {}, &TodosSearch::default()) {
            Some(to) => view! { <Redirect to=to /> }.into_any(),
            None => ().into_any(),
        },
        Page::DemoRoot => view! { <div class="not-implemented">"not implemented"</div> }.into_any(),
        Page::DemoCounter => view! { <DemoCounter /> }.into_any(),
        Page::Main(subpage) => view! { <PageMain subpage=subpage /> }.into_any(),
    }
}

/// Page switch under the router
#[component]
fn Router(table: RouteTable<Page>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let router = use_router();
    let page = use_route_table(table);
    let at_bare_base = Memo::new(move |_| {
        router
            .current_url()
            .is_some_and(|url| router.base().is_bare_base(&url))
    });

    move || {
        if at_bare_base.get() {
            return match app_href(ctx.routes.root, &EmptyParams {}, &EmptyParams {}) {
                Some(to) => view! { <Redirect to=to /> }.into_any(),
                None => ().into_any(),
            };
        }
        match page.get() {
            Some((_, page)) => render_page(page, &ctx.routes),
            None => view! { <div class="not-found">"404 not found"</div> }.into_any(),
        }
    }
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let mut registry = RouteRegistry::new();
    let routes = fatal("route declaration failed", AppRoutes::declare(&mut registry));
    let table = fatal("route table is incomplete", route_table(&routes, &registry));

    let mut keys = StorageKeys::new();
    let todos = fatal("todo storage failed", TodoStore::new(open_storage(), &mut keys));

    let store = Store::new(TodosState::default());
    provide_context(store);
    let ctx = AppContext::new(routes, todos, store, config.build.clone());
    provide_context(ctx);
    ctx.reload();

    let history: Rc<dyn History> = Rc::new(fatal("history unavailable", BrowserHistory::new()));
    let base = fatal("bad base path", browser_base_url(&config.base_path));
    log::info!("[{}] serving under {}", config.build.commit_sha_short, base.base_href());

    view! {
        <RouterProvider history=history base=base>
            <Router table=table />
        </RouterProvider>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos_query_router::{BaseUrl, RouterError};
    use url::Url;

    fn setup() -> (AppRoutes, RouteTable<Page>, BaseUrl) {
        let mut registry = RouteRegistry::with_checks(true);
        let routes = AppRoutes::declare(&mut registry).unwrap();
        let table = route_table(&routes, &registry).unwrap();
        (routes, table, BaseUrl::new("https://example.com", "/todo-pwa").unwrap())
    }

    fn resolve(table: &RouteTable<Page>, base: &BaseUrl, url: &str) -> Option<Page> {
        table.resolve(base, &Url::parse(url).unwrap()).map(|(_, page)| *page)
    }

    #[test]
    fn test_every_route_configured() {
        let (_, table, _) = setup();
        assert_eq!(table.len(), 7);
    }

    #[test]
    fn test_missing_route_reported() {
        let mut registry = RouteRegistry::with_checks(true);
        let routes = AppRoutes::declare(&mut registry).unwrap();
        let err = RouteTable::new(&registry)
            .add(routes.root, Page::RedirectToTodos)
            .unwrap()
            .finish()
            .err()
            .unwrap();
        assert_eq!(err, RouterError::RouteNotConfigured("/demo".to_string()));
    }

    #[test]
    fn test_pages_resolve() {
        let (_, table, base) = setup();
        assert_eq!(resolve(&table, &base, "https://example.com/todo-pwa/"), Some(Page::RedirectToTodos));
        assert_eq!(resolve(&table, &base, "https://example.com/todo-pwa/demo/counter?params=e30%3D"), Some(Page::DemoCounter));
        assert_eq!(
            resolve(&table, &base, "https://example.com/todo-pwa/extras"),
            Some(Page::Main(Subpage::Extras))
        );
        assert_eq!(resolve(&table, &base, "https://example.com/todo-pwa/nope"), None);
        assert_eq!(resolve(&table, &base, "https://example.com/todos"), None);
    }

    #[test]
    fn test_bare_base_detected() {
        let (_, _, base) = setup();
        assert!(base.is_bare_base(&Url::parse("https://example.com/todo-pwa").unwrap()));
        assert!(!base.is_bare_base(&Url::parse("https://example.com/todo-pwa/").unwrap()));
    }
}
