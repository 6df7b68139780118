//! App Routes
//!
//! Every page route of the app, declared once at startup.

use leptos::prelude::*;
use leptos_query_router::{
    use_route_context, use_router, EmptyParams, PathParamsShape, QueryParamSetter, Route, RouteHref,
    RouteRegistry, RouterResult,
};
use serde::{Deserialize, Serialize};

use crate::models::TodoFilter;

/// Search params of the todos page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodosSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab: Option<TodoFilter>,
}

/// Search params of the counter demo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
}

pub type PageRoute = Route<EmptyParams, EmptyParams>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppRoutes {
    pub root: PageRoute,
    pub demo_root: PageRoute,
    pub demo_counter: Route<EmptyParams, CounterSearch>,
    pub todos: Route<EmptyParams, TodosSearch>,
    pub reminders: PageRoute,
    pub calendar: PageRoute,
    pub extras: PageRoute,
}

impl AppRoutes {
    pub fn declare(registry: &mut RouteRegistry) -> RouterResult<Self> {
        Ok(Self {
            root: registry.declare("/")?,
            demo_root: registry.declare("/demo")?,
            demo_counter: registry.declare("/demo/counter")?,
            todos: registry.declare("/todos")?,
            reminders: registry.declare("/reminders")?,
            calendar: registry.declare("/calendar")?,
            extras: registry.declare("/extras")?,
        })
    }
}

/// Href of a route instance under the current base
///
/// Failures are logged and render as a link without href.
pub fn app_href<P, S>(route: Route<P, S>, path_params: &P, search_params: &S) -> Option<RouteHref>
where
    P: PathParamsShape,
    S: Serialize,
{
    let base = use_router().base();
    match base.create_route_href(&route, path_params, search_params) {
        Ok(href) => Some(href),
        Err(e) => {
            log::error!("href for \"{}\" failed: {}", route.pattern(), e);
            None
        }
    }
}

/// Fields kept in the cross-route `context` query entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppContextField {
    /// Last visited todo tab, restored when coming back from other pages
    LastTodoTab,
}

impl AppContextField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppContextField::LastTodoTab => "lastTodoTab",
        }
    }
}

/// One field of the app's route context
pub fn use_app_route_context<T>(field: AppContextField, default: T) -> (Signal<T>, QueryParamSetter<T>)
where
    T: Serialize + for<'de> Deserialize<'de> + Clone + Send + Sync + 'static,
{
    use_route_context(field.as_str(), default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos_query_router::{BaseUrl, RouterError};
    use url::Url;

    #[test]
    fn test_declare_all_routes() {
        let mut registry = RouteRegistry::with_checks(true);
        let routes = AppRoutes::declare(&mut registry).unwrap();
        assert_eq!(registry.routes().len(), 7);
        assert_eq!(routes.todos.pattern(), "/todos");
        assert_eq!(routes.demo_counter.pattern(), "/demo/counter");
    }

    #[test]
    fn test_declare_twice_rejected() {
        let mut registry = RouteRegistry::with_checks(true);
        AppRoutes::declare(&mut registry).unwrap();
        let err = AppRoutes::declare(&mut registry).unwrap_err();
        assert_eq!(err, RouterError::DuplicatePattern("/".to_string()));
    }

    #[test]
    fn test_todos_tab_href() {
        let routes = AppRoutes::declare(&mut RouteRegistry::with_checks(true)).unwrap();
        let base = BaseUrl::new("https://example.com", "/app").unwrap();

        let plain = base
            .create_route_href(&routes.todos, &EmptyParams {}, &TodosSearch::default())
            .unwrap();
        assert_eq!(plain.as_str(), "https://example.com/app/todos");

        let href = base
            .create_route_href(&routes.todos, &EmptyParams {}, &TodosSearch { tab: Some(TodoFilter::All) })
            .unwrap();
        let url = Url::parse(href.as_str()).unwrap();
        let matched = base.match_route(&routes.todos, &url).unwrap();
        let encoded = leptos_query_router::get_query_encoded(&matched.search).params.unwrap();
        let search: TodosSearch = leptos_query_router::decode_search_param(&encoded).unwrap();
        assert_eq!(search.tab, Some(TodoFilter::All));
    }
}
