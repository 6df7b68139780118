//! Router Hooks
//!
//! Reactive reads of the current route plus setters that go through the
//! coalescing writers.

use std::rc::Rc;

use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::base::RouteMatch;
use crate::codec::QueryKey;
use crate::path_sync::PathParamWriter;
use crate::provider::{use_router, RouterContext};
use crate::route::{AnyRoute, Route};
use crate::table::RouteTable;

fn match_now(ctx: &RouterContext, route: AnyRoute) -> Option<RouteMatch> {
    let location = ctx.location.get();
    let rt = ctx.runtime();
    let url = rt.base.current_url(&location).ok()?;
    rt.base.match_pattern(route.pattern(), &url)
}

fn assert_route_matched(ctx: &RouterContext, route: AnyRoute) {
    let matched = untrack(|| match_now(ctx, route));
    if matched.is_none() {
        panic!("route \"{}\" not matched", route.pattern());
    }
}

/// Match of `route` against the current URL
pub fn use_route_match<P, S>(route: Route<P, S>) -> Memo<Option<RouteMatch>> {
    let ctx = use_router();
    let route = route.erase();
    Memo::new(move |_| match_now(&ctx, route))
}

/// First entry of `table` matching the current URL
pub fn use_route_table<T>(table: RouteTable<T>) -> Memo<Option<(AnyRoute, T)>>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let ctx = use_router();
    let table = StoredValue::new(table);
    Memo::new(move |_| {
        let url = ctx.current_url()?;
        let base = ctx.base();
        table.with_value(|t| t.resolve(&base, &url).map(|(route, entry)| (route, entry.clone())))
    })
}

fn read_field<T: DeserializeOwned>(value: Option<Value>, field: &str) -> Option<T> {
    let field_value = value?.get(field)?.clone();
    serde_json::from_value(field_value).ok()
}

/// Setter for one field of a reserved query entry
pub struct QueryParamSetter<T: Send + Sync + 'static> {
    ctx: RouterContext,
    key: QueryKey,
    field: &'static str,
    default: StoredValue<T>,
}

impl<T: Send + Sync + 'static> Clone for QueryParamSetter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for QueryParamSetter<T> {}

impl<T> QueryParamSetter<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn set(&self, value: T) {
        self.update(move |_| value);
    }

    pub fn update(&self, f: impl FnOnce(T) -> T) {
        let default = self.default.get_value();
        let field = self.field;
        let query = self.ctx.runtime().query.clone();
        query.set_query_param(self.key, move |current| {
            let mut object = match current {
                Some(Value::Object(map)) => map,
                _ => Map::new(),
            };
            let prev = object
                .get(field)
                .cloned()
                .and_then(|v| serde_json::from_value::<T>(v).ok())
                .unwrap_or(default);
            match serde_json::to_value(f(prev)) {
                Ok(next) => {
                    object.insert(field.to_string(), next);
                }
                Err(e) => log::warn!("query field `{}` not serializable: {}", field, e),
            }
            Some(Value::Object(object))
        });
    }
}

fn use_query_param<T>(key: QueryKey, field: &'static str, default: T) -> (Signal<T>, QueryParamSetter<T>)
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    let ctx = use_router();
    let fallback = default.clone();
    let value = Signal::derive(move || {
        ctx.location.track();
        read_field(ctx.runtime().query.decoded(key), field).unwrap_or_else(|| fallback.clone())
    });
    let setter = QueryParamSetter {
        ctx,
        key,
        field,
        default: StoredValue::new(default),
    };
    (value, setter)
}

/// One field of the route's `params` query entry
///
/// Panics when `route` does not match the current URL.
pub fn use_route_search_param<P, S, T>(
    route: Route<P, S>,
    field: &'static str,
    default: T,
) -> (Signal<T>, QueryParamSetter<T>)
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    assert_route_matched(&use_router(), route.erase());
    use_query_param(QueryKey::Params, field, default)
}

/// One field of the cross-route `context` query entry
pub fn use_route_context<T>(field: &'static str, default: T) -> (Signal<T>, QueryParamSetter<T>)
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    use_query_param(QueryKey::Context, field, default)
}

/// Setter for one path placeholder of a route
#[derive(Clone, Copy)]
pub struct PathParamSetter {
    writer: StoredValue<Rc<PathParamWriter>, LocalStorage>,
    default: StoredValue<String>,
}

impl PathParamSetter {
    pub fn set(&self, value: impl Into<String>) {
        let value = value.into();
        self.update(move |_| value);
    }

    pub fn update(&self, f: impl FnOnce(String) -> String) {
        let writer = self.writer.get_value();
        let default = self.default.get_value();
        writer.set(&default, f);
    }
}

/// One `:placeholder` of the route's pathname
///
/// Panics when `route` does not match the current URL.
pub fn use_route_path_param<P, S>(
    route: Route<P, S>,
    key: &'static str,
    default: &str,
) -> (Signal<String>, PathParamSetter) {
    let ctx = use_router();
    assert_route_matched(&ctx, route.erase());

    let matched = use_route_match(route);
    let fallback = default.to_string();
    let value = Signal::derive(move || {
        matched
            .get()
            .and_then(|m| m.path_params.get(key).cloned())
            .unwrap_or_else(|| fallback.clone())
    });

    let rt = ctx.runtime();
    let writer = PathParamWriter::new(rt.history.clone(), rt.base.clone(), rt.queue.clone(), route.erase(), key);
    let setter = PathParamSetter {
        writer: StoredValue::new_local(writer),
        default: StoredValue::new(default.to_string()),
    };
    (value, setter)
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::base::BaseUrl;
    use crate::codec::{decode_search_param, encode_search_param, get_query_encoded};
    use crate::history::{History, MemoryHistory};
    use crate::provider::{provide_router, use_history};
    use crate::route::{declare_route, EmptyParams, PathParams, RouteRegistry};
    use crate::schedule::{ManualQueue, TaskQueue};

    fn with_router(initial: &str, f: impl FnOnce(Rc<MemoryHistory>, Rc<ManualQueue>)) {
        let owner = Owner::new();
        owner.with(|| {
            let history = Rc::new(MemoryHistory::new(initial));
            let queue = Rc::new(ManualQueue::new());
            let base = BaseUrl::new("https://app.test", "").unwrap();
            provide_router(history.clone(), base, Some(queue.clone() as Rc<dyn TaskQueue>));
            f(history, queue);
        });
    }

    fn with_params(pathname: &str, params: &Value) -> String {
        format!("{}?params={}", pathname, encode_search_param(params).unwrap())
    }

    fn url_entry(history: &MemoryHistory, key: QueryKey) -> Option<Value> {
        let encoded = get_query_encoded(&history.location().search);
        decode_search_param(encoded.get(key)?).ok()
    }

    fn todos_route() -> Route<EmptyParams, Value> {
        declare_route("/todos")
    }

    #[test]
    fn test_search_param_merges_one_field() {
        let initial = with_params("/todos", &json!({"tab": "all", "page": 3}));
        with_router(&initial, |history, queue| {
            let (tab, set_tab) = use_route_search_param(todos_route(), "tab", "active".to_string());
            assert_eq!(tab.get_untracked(), "all");

            set_tab.set("completed".to_string());
            queue.run_pending();

            assert_eq!(history.replace_count(), 1);
            assert_eq!(url_entry(&history, QueryKey::Params), Some(json!({"tab": "completed", "page": 3})));
            assert_eq!(tab.get_untracked(), "completed");
        });
    }

    #[test]
    fn test_missing_field_uses_default() {
        with_router("/todos", |history, queue| {
            let (page, set_page) = use_route_search_param(todos_route(), "page", 1u32);
            assert_eq!(page.get_untracked(), 1);

            set_page.update(|prev| {
                assert_eq!(prev, 1);
                prev + 1
            });
            set_page.update(|prev| prev + 1);
            queue.run_pending();

            assert_eq!(history.replace_count(), 1);
            assert_eq!(url_entry(&history, QueryKey::Params), Some(json!({"page": 3})));
        });
    }

    #[test]
    fn test_non_object_entry_replaced() {
        let initial = with_params("/todos", &json!([1, 2]));
        with_router(&initial, |history, queue| {
            let (tab, set_tab) = use_route_search_param(todos_route(), "tab", "active".to_string());
            assert_eq!(tab.get_untracked(), "active");

            set_tab.set("all".to_string());
            queue.run_pending();
            assert_eq!(url_entry(&history, QueryKey::Params), Some(json!({"tab": "all"})));
        });
    }

    #[test]
    fn test_setter_may_read_other_values() {
        with_router("/todos", |history, queue| {
            let (last, set_last) = use_route_context("lastTab", Some("completed".to_string()));
            let (_, set_tab) = use_route_search_param(todos_route(), "tab", None::<String>);

            set_last.set(Some("all".to_string()));
            set_tab.update(|_| last.get_untracked());
            queue.run_pending();

            assert_eq!(url_entry(&history, QueryKey::Params), Some(json!({"tab": "all"})));
            assert_eq!(url_entry(&history, QueryKey::Context), Some(json!({"lastTab": "all"})));
        });
    }

    #[test]
    fn test_context_survives_navigation() {
        with_router("/todos", |history, queue| {
            let (theme, set_theme) = use_route_context("theme", "light".to_string());
            set_theme.set("dark".to_string());
            queue.run_pending();
            assert_eq!(url_entry(&history, QueryKey::Context), Some(json!({"theme": "dark"})));

            let extras = declare_route::<EmptyParams, EmptyParams>("/extras");
            let href = use_router().base().create_route_href(&extras, &EmptyParams {}, &EmptyParams {}).unwrap();
            use_history().push(&href, None).unwrap();

            assert_eq!(history.location().pathname, "/extras");
            assert_eq!(theme.get_untracked(), "dark");
        });
    }

    #[test]
    #[should_panic(expected = "route \"/todos\" not matched")]
    fn test_search_param_on_other_route_panics() {
        with_router("/extras", |_, _| {
            use_route_search_param(todos_route(), "tab", "active".to_string());
        });
    }

    #[test]
    #[should_panic(expected = "route \"/items/:id\" not matched")]
    fn test_path_param_on_other_route_panics() {
        with_router("/extras", |_, _| {
            use_route_path_param(declare_route::<PathParams, EmptyParams>("/items/:id"), "id", "0");
        });
    }

    #[test]
    fn test_path_param_write() {
        with_router("/items/7?keep=1", |history, queue| {
            let route = declare_route::<PathParams, EmptyParams>("/items/:id");
            let (id, set_id) = use_route_path_param(route, "id", "0");
            assert_eq!(id.get_untracked(), "7");

            set_id.update(|prev| format!("{}1", prev));
            set_id.update(|prev| format!("{}2", prev));
            queue.run_pending();

            let location = history.location();
            assert_eq!(location.pathname, "/items/712");
            assert_eq!(location.search, "?keep=1");
            assert_eq!(history.replace_count(), 1);
            assert_eq!(id.get_untracked(), "712");
        });
    }

    #[test]
    fn test_path_param_default() {
        with_router("/items/7", |_, _| {
            let route = declare_route::<PathParams, EmptyParams>("/items/:id");
            let (slug, set_slug) = use_route_path_param(route, "slug", "none");
            assert_eq!(slug.get_untracked(), "none");

            set_slug.update(|prev| {
                assert_eq!(prev, "none");
                prev
            });
        });
    }

    #[test]
    fn test_route_table_memo() {
        with_router("/extras", |history, _| {
            let mut registry = RouteRegistry::with_checks(true);
            let todos = registry.declare::<EmptyParams, EmptyParams>("/todos").unwrap();
            let extras = registry.declare::<EmptyParams, EmptyParams>("/extras").unwrap();
            let table = RouteTable::new(&registry)
                .add(todos, "todos")
                .unwrap()
                .add(extras, "extras")
                .unwrap()
                .finish()
                .unwrap();

            let page = use_route_table(table);
            assert_eq!(page.get_untracked().map(|(_, p)| p), Some("extras"));

            history.push("/todos", None);
            assert_eq!(page.get_untracked().map(|(_, p)| p), Some("todos"));

            history.push("/nowhere", None);
            assert_eq!(page.get_untracked(), None);
        });
    }
}
