//! Route Declarations
//!
//! Typed route values and the registry that keeps their patterns unique.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::error::{RouterError, RouterResult};

/// Placeholder name -> decoded path segment
pub type PathParams = BTreeMap<String, String>;

/// Conversion between a typed path-parameter shape and its string map
pub trait PathParamsShape: Sized {
    fn to_path_params(&self) -> PathParams;
    fn from_path_params(params: &PathParams) -> Option<Self>;
}

/// Shape for routes without path or search parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyParams {}

impl PathParamsShape for EmptyParams {
    fn to_path_params(&self) -> PathParams {
        PathParams::new()
    }

    fn from_path_params(_params: &PathParams) -> Option<Self> {
        Some(EmptyParams {})
    }
}

impl PathParamsShape for PathParams {
    fn to_path_params(&self) -> PathParams {
        self.clone()
    }

    fn from_path_params(params: &PathParams) -> Option<Self> {
        Some(params.clone())
    }
}

/// A URL pattern with phantom path (`P`) and search (`S`) parameter shapes
///
/// The pattern is relative to the deployment base path; `BaseUrl` applies the
/// prefix when matching and building hrefs.
pub struct Route<P, S> {
    pattern: &'static str,
    _shape: PhantomData<fn() -> (P, S)>,
}

// Manual impls: derives would demand `P: Clone`, `S: Clone`.
impl<P, S> Clone for Route<P, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, S> Copy for Route<P, S> {}

impl<P, S> PartialEq for Route<P, S> {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl<P, S> Eq for Route<P, S> {}

impl<P, S> fmt::Debug for Route<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route").field("pattern", &self.pattern).finish()
    }
}

impl<P, S> Route<P, S> {
    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    /// Drop the parameter shapes, keeping only the pattern
    pub fn erase(&self) -> AnyRoute {
        AnyRoute { pattern: self.pattern }
    }
}

/// Route with its parameter shapes erased, used in heterogeneous lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnyRoute {
    pattern: &'static str,
}

impl AnyRoute {
    pub fn pattern(&self) -> &'static str {
        self.pattern
    }
}

impl<P, S> From<Route<P, S>> for AnyRoute {
    fn from(route: Route<P, S>) -> Self {
        route.erase()
    }
}

/// Pure route construction; does not register anything
pub fn declare_route<P, S>(pattern: &'static str) -> Route<P, S> {
    Route {
        pattern,
        _shape: PhantomData,
    }
}

/// Registry of declared patterns
///
/// Duplicate detection is a debug-build check. With checks off, duplicates are
/// accepted and the first declared route wins in first-match resolution.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    checks: bool,
    seen: HashSet<&'static str>,
    declared: Vec<AnyRoute>,
}

impl Default for RouteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::with_checks(cfg!(debug_assertions))
    }

    pub fn with_checks(checks: bool) -> Self {
        Self {
            checks,
            seen: HashSet::new(),
            declared: Vec::new(),
        }
    }

    pub fn checks_enabled(&self) -> bool {
        self.checks
    }

    pub fn declare<P, S>(&mut self, pattern: &'static str) -> RouterResult<Route<P, S>> {
        if self.checks && !self.seen.insert(pattern) {
            return Err(RouterError::DuplicatePattern(pattern.to_string()));
        }
        let route = declare_route::<P, S>(pattern);
        self.declared.push(route.erase());
        Ok(route)
    }

    /// Declared routes in declaration order
    pub fn routes(&self) -> &[AnyRoute] {
        &self.declared
    }
}
