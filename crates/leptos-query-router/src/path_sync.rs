//! Path-Parameter Writer
//!
//! Rewrites one `:placeholder` of a route's pathname. Rapid updates in one
//! turn collapse into a single `History::replace`; the flush re-reads the live
//! location so query string and hash are preserved.

use std::cell::RefCell;
use std::rc::Rc;

use crate::base::{calc_pathname, BaseUrl};
use crate::history::History;
use crate::route::AnyRoute;
use crate::schedule::TaskQueue;

pub struct PathParamWriter {
    history: Rc<dyn History>,
    base: BaseUrl,
    queue: Rc<dyn TaskQueue>,
    route: AnyRoute,
    key: String,
    pending: RefCell<Option<String>>,
}

impl PathParamWriter {
    pub fn new(
        history: Rc<dyn History>,
        base: BaseUrl,
        queue: Rc<dyn TaskQueue>,
        route: AnyRoute,
        key: &str,
    ) -> Rc<Self> {
        Rc::new(Self {
            history,
            base,
            queue,
            route,
            key: key.to_string(),
            pending: RefCell::new(None),
        })
    }

    /// Value of the placeholder in the live URL
    pub fn current(&self) -> Option<String> {
        let url = self.base.current_url(&self.history.location()).ok()?;
        let matched = self.base.match_pattern(self.route.pattern(), &url)?;
        matched.path_params.get(&self.key).cloned()
    }

    /// Value the next flush will write, if any
    pub fn pending(&self) -> Option<String> {
        self.pending.borrow().clone()
    }

    /// Apply `f` to the pending (or live) value and schedule a flush
    pub fn set<F>(self: &Rc<Self>, default: &str, f: F)
    where
        F: FnOnce(String) -> String,
    {
        let planned = self.pending.borrow().is_some();
        let current = self
            .pending()
            .or_else(|| self.current())
            .unwrap_or_else(|| default.to_string());
        *self.pending.borrow_mut() = Some(f(current));

        if !planned {
            let weak = Rc::downgrade(self);
            self.queue.post(Box::new(move || {
                if let Some(writer) = weak.upgrade() {
                    writer.flush();
                }
            }));
        }
    }

    pub fn flush(&self) {
        let Some(value) = self.pending.borrow_mut().take() else {
            return;
        };

        let location = self.history.location();
        let matched = self
            .base
            .current_url(&location)
            .ok()
            .and_then(|url| self.base.match_pattern(self.route.pattern(), &url));
        let Some(matched) = matched else {
            log::warn!("route \"{}\" no longer matches, dropping path update", self.route.pattern());
            return;
        };

        let mut params = matched.path_params;
        params.insert(self.key.clone(), value);
        let pathname = calc_pathname(&self.base.full_pattern(self.route.pattern()), &params);

        let mut url = match self.base.resolve(&pathname) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("dropping path update: {}", e);
                return;
            }
        };
        let search = location.search.strip_prefix('?').unwrap_or(&location.search);
        url.set_query(if search.is_empty() { None } else { Some(search) });
        let hash = location.hash.strip_prefix('#').unwrap_or(&location.hash);
        url.set_fragment(if hash.is_empty() { None } else { Some(hash) });

        log::debug!("path flush -> {}", url);
        self.history.replace(url.as_str(), None);
    }
}
