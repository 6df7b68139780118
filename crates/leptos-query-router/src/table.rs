//! Route Table
//!
//! Caller-ordered (route, entry) list resolved by first match. When the
//! registry runs with checks, every declared route must be configured exactly
//! once before `finish`.

use std::collections::HashSet;

use url::Url;

use crate::base::BaseUrl;
use crate::error::{RouterError, RouterResult};
use crate::route::{AnyRoute, RouteRegistry};

pub struct RouteTable<T> {
    entries: Vec<(AnyRoute, T)>,
    unconfigured: Option<Vec<AnyRoute>>,
}

impl<T> RouteTable<T> {
    pub fn new(registry: &RouteRegistry) -> Self {
        let unconfigured = registry.checks_enabled().then(|| {
            let mut seen = HashSet::new();
            registry
                .routes()
                .iter()
                .copied()
                .filter(|r| seen.insert(*r))
                .collect()
        });
        Self {
            entries: Vec::new(),
            unconfigured,
        }
    }

    pub fn add(mut self, route: impl Into<AnyRoute>, entry: T) -> RouterResult<Self> {
        let route = route.into();
        if let Some(waiting) = self.unconfigured.as_mut() {
            let Some(pos) = waiting.iter().position(|r| *r == route) else {
                return Err(RouterError::RouteAlreadyConfigured(route.pattern().to_string()));
            };
            waiting.remove(pos);
        }
        self.entries.push((route, entry));
        Ok(self)
    }

    pub fn finish(self) -> RouterResult<Self> {
        if let Some(first) = self.unconfigured.as_ref().and_then(|w| w.first()) {
            return Err(RouterError::RouteNotConfigured(first.pattern().to_string()));
        }
        Ok(self)
    }

    /// First entry whose route matches `url`
    pub fn resolve(&self, base: &BaseUrl, url: &Url) -> Option<(AnyRoute, &T)> {
        self.entries
            .iter()
            .find(|(route, _)| base.match_pattern(route.pattern(), url).is_some())
            .map(|(route, entry)| (*route, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
