//! Leptos Query Router
//!
//! Typed route declarations for client-side rendered Leptos apps, with
//! per-route and cross-route state kept in the URL query string as
//! base64-encoded JSON (`params` and `context` keys).
//!
//! The core (`route`, `base`, `codec`, `history`, `query_sync`, `path_sync`,
//! `table`) is plain Rust over the `History` and `TaskQueue` traits; the
//! Leptos layer (`provider`, `hooks`, `components`) wires it to signals.

mod base;
mod browser;
mod codec;
mod components;
mod error;
mod history;
mod hooks;
mod path_sync;
mod provider;
mod query_sync;
mod route;
mod schedule;
mod table;

pub use base::{calc_pathname, BaseUrl, RouteHref, RouteMatch};
pub use browser::{browser_base_url, BrowserHistory, Microtasks};
pub use codec::{decode_search_param, encode_search_param, get_query_encoded, update_query_key, EncodedQuery, QueryKey};
pub use components::{Redirect, RouteLink};
pub use error::{RouterError, RouterResult};
pub use history::{History, HistoryAction, Listener, ListenerId, Location, MemoryHistory, RouterHistory};
pub use hooks::{
    use_route_context, use_route_match, use_route_path_param, use_route_search_param, use_route_table,
    PathParamSetter, QueryParamSetter,
};
pub use path_sync::PathParamWriter;
pub use provider::{provide_router, use_history, use_location, use_router, RouterContext, RouterProvider, RouterRuntime};
pub use query_sync::QuerySync;
pub use route::{declare_route, AnyRoute, EmptyParams, PathParams, PathParamsShape, Route, RouteRegistry};
pub use schedule::{ManualQueue, Task, TaskQueue};
pub use table::RouteTable;
