//! History Collaborator
//!
//! The router only talks to history through the `History` trait.
//! `MemoryHistory` is the in-process implementation (tests, non-browser use);
//! the browser one lives in `browser.rs`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;

use crate::base::{BaseUrl, RouteHref};
use crate::error::RouterResult;

/// Snapshot of the current history entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    /// Includes the leading `?` when non-empty
    pub search: String,
    /// Includes the leading `#` when non-empty
    pub hash: String,
}

impl Location {
    pub fn new(pathname: &str, search: &str, hash: &str) -> Self {
        Self {
            pathname: pathname.to_string(),
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }

    /// Parse a path-absolute (`/a?b#c`) or absolute (`https://h/a?b#c`) URL
    pub fn parse(input: &str) -> Self {
        let rest = match input.find("://") {
            Some(scheme_end) => {
                let after = &input[scheme_end + 3..];
                after.find('/').map(|i| &after[i..]).unwrap_or("/")
            }
            None => input,
        };
        let (rest, hash) = match rest.find('#') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };
        let (pathname, search) = match rest.find('?') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };
        let search = if search == "?" { "" } else { search };
        let hash = if hash == "#" { "" } else { hash };
        Self::new(if pathname.is_empty() { "/" } else { pathname }, search, hash)
    }
}

/// Handle returned by `History::listen`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub type Listener = Rc<dyn Fn(&Location)>;

/// Injected navigation history
///
/// Listeners fire after every navigation: push, replace, back/forward.
pub trait History {
    fn location(&self) -> Location;
    fn push(&self, url: &str, state: Option<Value>);
    fn replace(&self, url: &str, state: Option<Value>);
    fn listen(&self, listener: Listener) -> ListenerId;
    fn unlisten(&self, id: ListenerId);
}

/// Listener bookkeeping shared by history implementations
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(ListenerId, Listener)>>,
}

impl Listeners {
    pub(crate) fn add(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) {
        self.entries.borrow_mut().retain(|(entry_id, _)| *entry_id != id);
    }

    /// Call every listener; the list is copied first so listeners may
    /// navigate or (un)subscribe re-entrantly
    pub(crate) fn notify(&self, location: &Location) {
        let snapshot: Vec<Listener> = self.entries.borrow().iter().map(|(_, l)| l.clone()).collect();
        for listener in snapshot {
            listener(location);
        }
    }
}

/// Recorded navigation call
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryAction {
    Push(String),
    Replace(String),
    Back,
    Forward,
}

/// In-memory history with an entry stack
pub struct MemoryHistory {
    entries: RefCell<Vec<(Location, Option<Value>)>>,
    index: Cell<usize>,
    actions: RefCell<Vec<HistoryAction>>,
    listeners: Listeners,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            entries: RefCell::new(vec![(Location::parse(initial), None)]),
            index: Cell::new(0),
            actions: RefCell::new(Vec::new()),
            listeners: Listeners::default(),
        }
    }

    /// Every push/replace/back/forward seen so far
    pub fn actions(&self) -> Vec<HistoryAction> {
        self.actions.borrow().clone()
    }

    pub fn replace_count(&self) -> usize {
        self.actions
            .borrow()
            .iter()
            .filter(|a| matches!(a, HistoryAction::Replace(_)))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn state(&self) -> Option<Value> {
        self.entries.borrow()[self.index.get()].1.clone()
    }

    pub fn back(&self) {
        if self.index.get() == 0 {
            return;
        }
        self.index.set(self.index.get() - 1);
        self.actions.borrow_mut().push(HistoryAction::Back);
        self.listeners.notify(&self.location());
    }

    pub fn forward(&self) {
        if self.index.get() + 1 >= self.len() {
            return;
        }
        self.index.set(self.index.get() + 1);
        self.actions.borrow_mut().push(HistoryAction::Forward);
        self.listeners.notify(&self.location());
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        self.entries.borrow()[self.index.get()].0.clone()
    }

    fn push(&self, url: &str, state: Option<Value>) {
        {
            let mut entries = self.entries.borrow_mut();
            entries.truncate(self.index.get() + 1);
            entries.push((Location::parse(url), state));
            self.index.set(entries.len() - 1);
        }
        self.actions.borrow_mut().push(HistoryAction::Push(url.to_string()));
        self.listeners.notify(&self.location());
    }

    fn replace(&self, url: &str, state: Option<Value>) {
        self.entries.borrow_mut()[self.index.get()] = (Location::parse(url), state);
        self.actions.borrow_mut().push(HistoryAction::Replace(url.to_string()));
        self.listeners.notify(&self.location());
    }

    fn listen(&self, listener: Listener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.remove(id)
    }
}

/// History wrapper used by links and redirects
///
/// Carries the current `context` query entry over to the target href.
#[derive(Clone)]
pub struct RouterHistory {
    history: Rc<dyn History>,
    base: BaseUrl,
}

impl RouterHistory {
    pub fn new(history: Rc<dyn History>, base: BaseUrl) -> Self {
        Self { history, base }
    }

    pub fn location(&self) -> Location {
        self.history.location()
    }

    fn route_url(&self, to: &RouteHref) -> RouterResult<RouteHref> {
        self.base.with_context(to, &self.history.location().search)
    }

    pub fn push(&self, to: &RouteHref, state: Option<Value>) -> RouterResult<()> {
        let href = self.route_url(to)?;
        log::debug!("push {}", href);
        self.history.push(href.as_str(), state);
        Ok(())
    }

    pub fn replace(&self, to: &RouteHref, state: Option<Value>) -> RouterResult<()> {
        let href = self.route_url(to)?;
        log::debug!("replace {}", href);
        self.history.replace(href.as_str(), state);
        Ok(())
    }
}
