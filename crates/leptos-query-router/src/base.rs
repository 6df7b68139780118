//! Route Matcher & Href Builder
//!
//! Everything that needs the deployment origin and base path.

use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::codec::{encode_search_param, update_query_key, QueryKey};
use crate::error::{RouterError, RouterResult};
use crate::history::Location;
use crate::route::{PathParams, PathParamsShape, Route};

/// Opaque, fully qualified href of a route instance
///
/// Only the href builder and the router's own rewrites construct one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteHref(String);

impl RouteHref {
    pub(crate) fn from_url(url: &Url) -> Self {
        RouteHref(url.as_str().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_url(&self) -> RouterResult<Url> {
        parse_url(&self.0)
    }
}

impl std::fmt::Display for RouteHref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<RouteHref> for String {
    fn from(href: RouteHref) -> Self {
        href.0
    }
}

/// Result of a successful route match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub path_params: PathParams,
    /// Raw query string of the matched URL, without `?`
    pub search: String,
}

impl RouteMatch {
    pub fn params<P: PathParamsShape>(&self) -> Option<P> {
        P::from_path_params(&self.path_params)
    }
}

/// Substitute every `:key` placeholder with its value
///
/// Literal text replacement, not URL-encoding aware. Longer names go first so
/// `:id` cannot eat the front of `:idx`.
pub fn calc_pathname(pattern: &str, path_params: &PathParams) -> String {
    let mut entries: Vec<(&String, &String)> = path_params.iter().collect();
    entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

    entries.into_iter().fold(pattern.to_string(), |acc, (key, value)| {
        acc.replace(&format!(":{}", key), value)
    })
}

fn parse_url(input: &str) -> RouterResult<Url> {
    Url::parse(input).map_err(|e| RouterError::InvalidUrl {
        url: input.to_string(),
        reason: e.to_string(),
    })
}

/// Deployment origin plus base path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    origin: Url,
    base_path: String,
}

impl BaseUrl {
    /// `origin` like `https://host:port`; `base_path` like `/app` (a trailing
    /// `/` is stripped, empty means the site root)
    pub fn new(origin: &str, base_path: &str) -> RouterResult<Self> {
        let mut origin = parse_url(origin)?;
        origin.set_path("");
        origin.set_query(None);
        origin.set_fragment(None);

        let trimmed = base_path.trim_end_matches('/');
        let base_path = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };
        Ok(Self { origin, base_path })
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Origin followed by the base path, no trailing slash
    pub fn base_href(&self) -> String {
        format!("{}{}", self.origin.origin().ascii_serialization(), self.base_path)
    }

    /// Pattern with the base path prepended
    pub fn full_pattern(&self, pattern: &str) -> String {
        format!("{}{}", self.base_path, pattern)
    }

    /// Absolute URL for `pathname` against the origin
    pub fn resolve(&self, pathname: &str) -> RouterResult<Url> {
        self.origin.join(pathname).map_err(|e| RouterError::InvalidUrl {
            url: pathname.to_string(),
            reason: e.to_string(),
        })
    }

    /// Absolute URL of a history location
    pub fn current_url(&self, location: &Location) -> RouterResult<Url> {
        let mut url = self.resolve(&location.pathname)?;
        let search = location.search.strip_prefix('?').unwrap_or(&location.search);
        url.set_query(if search.is_empty() { None } else { Some(search) });
        let hash = location.hash.strip_prefix('#').unwrap_or(&location.hash);
        url.set_fragment(if hash.is_empty() { None } else { Some(hash) });
        Ok(url)
    }

    /// True when `url` is exactly the bare base URL (non-empty base path)
    pub fn is_bare_base(&self, url: &Url) -> bool {
        !self.base_path.is_empty()
            && url.query().is_none()
            && url.fragment().is_none()
            && self.same_origin(url)
            && url.path() == self.base_path
    }

    fn same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin.origin()
    }

    /// Match `url` against the route's pattern (same origin only)
    pub fn match_route<P, S>(&self, route: &Route<P, S>, url: &Url) -> Option<RouteMatch> {
        self.match_pattern(route.pattern(), url)
    }

    pub fn match_pattern(&self, pattern: &str, url: &Url) -> Option<RouteMatch> {
        if !self.same_origin(url) {
            return None;
        }

        let full = self.full_pattern(pattern);
        let expected: Vec<&str> = full.split('/').collect();
        let actual: Vec<&str> = url.path().split('/').collect();
        if expected.len() != actual.len() {
            return None;
        }

        let mut path_params = PathParams::new();
        for (want, got) in expected.iter().zip(actual.iter()) {
            match want.strip_prefix(':') {
                Some(name) if !name.is_empty() => {
                    if got.is_empty() {
                        return None;
                    }
                    let decoded = percent_decode_str(got).decode_utf8_lossy().into_owned();
                    path_params.insert(name.to_string(), decoded);
                }
                _ => {
                    if want != got {
                        return None;
                    }
                }
            }
        }

        Some(RouteMatch {
            path_params,
            search: url.query().unwrap_or("").to_string(),
        })
    }

    /// Build the href of a route instance
    ///
    /// Search params are stored under `params` only when they serialize to
    /// something other than `null` or `{}`.
    pub fn create_route_href<P, S>(
        &self,
        route: &Route<P, S>,
        path_params: &P,
        search_params: &S,
    ) -> RouterResult<RouteHref>
    where
        P: PathParamsShape,
        S: Serialize,
    {
        let pathname = calc_pathname(&self.full_pattern(route.pattern()), &path_params.to_path_params());
        let mut url = self.resolve(&pathname)?;

        let search = serde_json::to_value(search_params)?;
        let is_empty = match &search {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if !is_empty {
            let encoded = encode_search_param(&search)?;
            url = update_query_key(&url, QueryKey::Params, Some(&encoded));
        }

        Ok(RouteHref::from_url(&url))
    }

    /// Copy `href`, carrying over the `context` entry of `search`
    pub fn with_context(&self, href: &RouteHref, search: &str) -> RouterResult<RouteHref> {
        let url = href.to_url()?;
        let context = crate::codec::get_query_encoded(search).context;
        let url = update_query_key(&url, QueryKey::Context, context.as_deref());
        Ok(RouteHref::from_url(&url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_search_param, get_query_encoded};
    use crate::route::{declare_route, EmptyParams};
    use serde::Deserialize;

    fn params(pairs: &[(&str, &str)]) -> PathParams {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn base() -> BaseUrl {
        BaseUrl::new("https://app.test", "").unwrap()
    }

    #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
    struct Search {
        #[serde(skip_serializing_if = "Option::is_none")]
        tab: Option<String>,
    }

    #[test]
    fn test_calc_pathname() {
        assert_eq!(calc_pathname("/items/:id", &params(&[("id", "42")])), "/items/42");
        assert_eq!(calc_pathname("/a/:x/:y", &params(&[("x", "1"), ("y", "2")])), "/a/1/2");
        assert_eq!(calc_pathname("/a/:x/b/:x", &params(&[("x", "7")])), "/a/7/b/7");
    }

    #[test]
    fn test_calc_pathname_prefix_names() {
        let p = params(&[("id", "1"), ("idx", "2")]);
        assert_eq!(calc_pathname("/x/:idx/:id", &p), "/x/2/1");
    }

    #[test]
    fn test_match_round_trip() {
        let base = base();
        let route = declare_route::<PathParams, EmptyParams>("/boards/:board/items/:item");
        let p = params(&[("board", "inbox"), ("item", "a b")]);

        let href = base.create_route_href(&route, &p, &EmptyParams {}).unwrap();
        let matched = base.match_route(&route, &href.to_url().unwrap()).unwrap();
        assert_eq!(matched.path_params, p);
    }

    #[test]
    fn test_match_rejects_other_paths() {
        let base = base();
        let route = declare_route::<EmptyParams, EmptyParams>("/todos");
        let url = |s: &str| Url::parse(s).unwrap();

        assert!(base.match_route(&route, &url("https://app.test/todos?x=1")).is_some());
        assert!(base.match_route(&route, &url("https://app.test/todos/")).is_none());
        assert!(base.match_route(&route, &url("https://app.test/todo")).is_none());
        assert!(base.match_route(&route, &url("https://other.test/todos")).is_none());

        let item = declare_route::<PathParams, EmptyParams>("/items/:id");
        assert!(base.match_route(&item, &url("https://app.test/items/")).is_none());
    }

    #[test]
    fn test_match_keeps_search() {
        let base = base();
        let route = declare_route::<EmptyParams, EmptyParams>("/todos");
        let url = Url::parse("https://app.test/todos?params=e30%3D&z=1").unwrap();
        let matched = base.match_route(&route, &url).unwrap();
        assert_eq!(matched.search, "params=e30%3D&z=1");
    }

    #[test]
    fn test_base_path_is_applied() {
        let base = BaseUrl::new("https://app.test", "/pwa/").unwrap();
        let root = declare_route::<EmptyParams, EmptyParams>("/");
        let todos = declare_route::<EmptyParams, EmptyParams>("/todos");

        let href = base.create_route_href(&todos, &EmptyParams {}, &EmptyParams {}).unwrap();
        assert_eq!(href.as_str(), "https://app.test/pwa/todos");
        assert!(base.match_route(&root, &Url::parse("https://app.test/pwa/").unwrap()).is_some());
        assert!(base.match_route(&todos, &Url::parse("https://app.test/todos").unwrap()).is_none());

        assert_eq!(base.base_href(), "https://app.test/pwa");
        assert!(base.is_bare_base(&Url::parse("https://app.test/pwa").unwrap()));
        assert!(!base.is_bare_base(&Url::parse("https://app.test/pwa/").unwrap()));
    }

    #[test]
    fn test_empty_search_params_leave_no_query() {
        let base = base();
        let route = declare_route::<EmptyParams, Search>("/todos");
        let href = base.create_route_href(&route, &EmptyParams {}, &Search::default()).unwrap();
        assert_eq!(href.as_str(), "https://app.test/todos");
        assert!(href.to_url().unwrap().query().is_none());
    }

    #[test]
    fn test_search_params_encoded_under_params() {
        let base = base();
        let route = declare_route::<EmptyParams, Search>("/todos");
        let search = Search { tab: Some("all".to_string()) };
        let href = base.create_route_href(&route, &EmptyParams {}, &search).unwrap();

        let url = href.to_url().unwrap();
        let encoded = get_query_encoded(url.query().unwrap()).params.unwrap();
        let decoded: Search = decode_search_param(&encoded).unwrap();
        assert_eq!(decoded, search);
    }

    #[test]
    fn test_with_context_copies_or_drops_context() {
        let base = base();
        let route = declare_route::<EmptyParams, EmptyParams>("/extras");
        let href = base.create_route_href(&route, &EmptyParams {}, &EmptyParams {}).unwrap();

        let carried = base.with_context(&href, "?context=abc&params=zzz").unwrap();
        assert_eq!(carried.as_str(), "https://app.test/extras?context=abc");

        let dropped = base.with_context(&carried, "").unwrap();
        assert_eq!(dropped.as_str(), "https://app.test/extras");
    }

    #[test]
    fn test_current_url_from_location() {
        let base = base();
        let location = Location::new("/todos", "?a=1", "#top");
        let url = base.current_url(&location).unwrap();
        assert_eq!(url.as_str(), "https://app.test/todos?a=1#top");
    }
}
