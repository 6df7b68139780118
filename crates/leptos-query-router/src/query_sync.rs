//! Query-Param State Synchronizer
//!
//! Keeps a decoded shadow of the `context` and `params` query entries.
//! Local edits are batched: the first edit in a turn posts one flush, and the
//! flush writes every dirty key into the live URL with a single
//! `History::replace`. Any navigation resets both shadows from the URL.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::base::BaseUrl;
use crate::codec::{decode_search_param, encode_search_param, get_query_encoded, update_query_key, EncodedQuery, QueryKey};
use crate::history::{History, ListenerId, Location};
use crate::schedule::TaskQueue;

#[derive(Debug, Default)]
struct Slot {
    value: Option<Value>,
    dirty: bool,
}

#[derive(Debug, Default)]
struct SyncState {
    context: Slot,
    params: Slot,
    flush_pending: bool,
    listener: Option<ListenerId>,
}

impl SyncState {
    fn slot(&mut self, key: QueryKey) -> &mut Slot {
        match key {
            QueryKey::Context => &mut self.context,
            QueryKey::Params => &mut self.params,
        }
    }
}

/// Decode one reserved entry, failing closed to "absent"
fn decode_entry(encoded: &EncodedQuery, key: QueryKey) -> Option<Value> {
    let raw = encoded.get(key)?;
    match decode_search_param::<Value>(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("ignoring malformed `{}` query entry: {}", key.as_str(), e);
            None
        }
    }
}

pub struct QuerySync {
    history: Rc<dyn History>,
    base: BaseUrl,
    queue: Rc<dyn TaskQueue>,
    state: RefCell<SyncState>,
}

impl QuerySync {
    /// Create the synchronizer and subscribe it to `history`
    pub fn attach(history: Rc<dyn History>, base: BaseUrl, queue: Rc<dyn TaskQueue>) -> Rc<Self> {
        let sync = Rc::new(Self {
            history: history.clone(),
            base,
            queue,
            state: RefCell::new(SyncState::default()),
        });
        sync.reset(&history.location());

        let weak: Weak<Self> = Rc::downgrade(&sync);
        let id = history.listen(Rc::new(move |location: &Location| {
            if let Some(sync) = weak.upgrade() {
                sync.reset(location);
            }
        }));
        sync.state.borrow_mut().listener = Some(id);
        sync
    }

    /// Stop following history notifications
    pub fn detach(&self) {
        let id = self.state.borrow_mut().listener.take();
        if let Some(id) = id {
            self.history.unlisten(id);
        }
    }

    /// Navigation transition: both shadows are replaced by what `location`
    /// encodes, discarding edits that were not flushed yet
    pub fn reset(&self, location: &Location) {
        let encoded = get_query_encoded(&location.search);
        let mut state = self.state.borrow_mut();
        state.context = Slot {
            value: decode_entry(&encoded, QueryKey::Context),
            dirty: false,
        };
        state.params = Slot {
            value: decode_entry(&encoded, QueryKey::Params),
            dirty: false,
        };
    }

    /// Current shadow value of `key`
    pub fn decoded(&self, key: QueryKey) -> Option<Value> {
        let state = self.state.borrow();
        match key {
            QueryKey::Context => state.context.value.clone(),
            QueryKey::Params => state.params.value.clone(),
        }
    }

    pub fn is_flush_pending(&self) -> bool {
        self.state.borrow().flush_pending
    }

    /// Local mutation: apply `f` to the shadow of `key` and schedule a flush
    pub fn set_query_param<F>(self: &Rc<Self>, key: QueryKey, f: F)
    where
        F: FnOnce(Option<Value>) -> Option<Value>,
    {
        // `f` may read the synchronizer, so it runs with no borrow held.
        let next = f(self.decoded(key));

        let schedule = {
            let mut state = self.state.borrow_mut();
            let slot = state.slot(key);
            slot.value = next;
            slot.dirty = true;

            let schedule = !state.flush_pending;
            state.flush_pending = true;
            schedule
        };

        if schedule {
            let weak = Rc::downgrade(self);
            self.queue.post(Box::new(move || {
                if let Some(sync) = weak.upgrade() {
                    sync.flush();
                }
            }));
        }
    }

    /// Write dirty shadows into the live URL with one history replace
    pub fn flush(&self) {
        let location = self.history.location();
        let url = match self.base.current_url(&location) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("skipping query flush: {}", e);
                self.state.borrow_mut().flush_pending = false;
                return;
            }
        };

        let next = {
            let mut state = self.state.borrow_mut();
            state.flush_pending = false;

            let mut url = url;
            let mut changed = false;
            for key in QueryKey::ALL {
                let slot = state.slot(key);
                if !slot.dirty {
                    continue;
                }
                slot.dirty = false;
                changed = true;

                let encoded = match slot.value.as_ref().map(encode_search_param::<Value>).transpose() {
                    Ok(encoded) => encoded,
                    Err(e) => {
                        log::warn!("dropping `{}` query entry: {}", key.as_str(), e);
                        None
                    }
                };
                url = update_query_key(&url, key, encoded.as_deref());
            }
            changed.then_some(url)
        };

        // Borrow released: replace notifies listeners, which re-enter `reset`.
        if let Some(url) = next {
            log::debug!("query flush -> {}", url);
            self.history.replace(url.as_str(), None);
        }
    }
}

impl Drop for QuerySync {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{HistoryAction, MemoryHistory};
    use crate::schedule::ManualQueue;
    use serde_json::json;

    struct Fixture {
        history: Rc<MemoryHistory>,
        queue: Rc<ManualQueue>,
        sync: Rc<QuerySync>,
    }

    fn setup(initial: &str) -> Fixture {
        let history = Rc::new(MemoryHistory::new(initial));
        let queue = Rc::new(ManualQueue::new());
        let base = BaseUrl::new("https://app.test", "").unwrap();
        let sync = QuerySync::attach(history.clone(), base, queue.clone());
        Fixture { history, queue, sync }
    }

    fn encoded(value: &Value) -> String {
        encode_search_param(value).unwrap()
    }

    fn url_params(history: &MemoryHistory) -> Option<Value> {
        let raw = get_query_encoded(&history.location().search).params?;
        decode_search_param(&raw).ok()
    }

    #[test]
    fn test_initial_decode() {
        let ctx = json!({"theme": "dark"});
        let f = setup(&format!("/todos?context={}", encoded(&ctx)));
        assert_eq!(f.sync.decoded(QueryKey::Context), Some(ctx));
        assert_eq!(f.sync.decoded(QueryKey::Params), None);
    }

    #[test]
    fn test_malformed_entry_reads_as_absent() {
        let f = setup("/todos?params=%25%25%25&context=e29vcHM%3D");
        assert_eq!(f.sync.decoded(QueryKey::Params), None);
        assert_eq!(f.sync.decoded(QueryKey::Context), None);
    }

    #[test]
    fn test_two_sets_one_replace() {
        let f = setup("/todos?keep=1");

        f.sync.set_query_param(QueryKey::Params, |_| Some(json!({"n": 1})));
        f.sync.set_query_param(QueryKey::Params, |prev| {
            let n = prev.and_then(|v| v["n"].as_i64()).unwrap_or(0);
            Some(json!({"n": n + 1}))
        });
        assert_eq!(f.queue.pending(), 1);
        assert_eq!(f.history.replace_count(), 0);

        f.queue.run_pending();

        assert_eq!(f.history.replace_count(), 1);
        assert_eq!(url_params(&f.history), Some(json!({"n": 2})));
        assert!(f.history.location().search.starts_with("?keep=1&"));
        assert!(!f.sync.is_flush_pending());
    }

    #[test]
    fn test_flush_uses_value_at_flush_time() {
        let f = setup("/todos");
        f.sync.set_query_param(QueryKey::Context, |_| Some(json!("first")));
        f.sync.set_query_param(QueryKey::Params, |_| Some(json!({"a": true})));
        f.sync.set_query_param(QueryKey::Context, |_| Some(json!("last")));
        f.queue.run_pending();

        let query = get_query_encoded(&f.history.location().search);
        assert_eq!(decode_search_param::<Value>(&query.context.unwrap()).unwrap(), json!("last"));
        assert_eq!(decode_search_param::<Value>(&query.params.unwrap()).unwrap(), json!({"a": true}));
        assert_eq!(f.history.replace_count(), 1);
    }

    #[test]
    fn test_flush_reads_live_url() {
        let f = setup("/todos");
        f.sync.set_query_param(QueryKey::Params, |_| Some(json!(1)));
        // unrelated navigation between schedule and flush
        f.history.push("/extras?other=x", None);
        f.sync.set_query_param(QueryKey::Params, |_| Some(json!(2)));
        f.queue.run_pending();

        let location = f.history.location();
        assert_eq!(location.pathname, "/extras");
        assert!(location.search.contains("other=x"));
        assert_eq!(url_params(&f.history), Some(json!(2)));
    }

    #[test]
    fn test_navigation_discards_unflushed_value() {
        let f = setup("/todos");
        f.sync.set_query_param(QueryKey::Params, |_| Some(json!({"tab": "all"})));
        f.sync.set_query_param(QueryKey::Context, |_| Some(json!({"x": 1})));

        let fresh = json!({"tab": "completed"});
        f.history.push(&format!("/todos?params={}", encoded(&fresh)), None);

        assert_eq!(f.sync.decoded(QueryKey::Params), Some(fresh.clone()));
        assert_eq!(f.sync.decoded(QueryKey::Context), None);

        // the pending flush has nothing left to write
        f.queue.run_pending();
        assert_eq!(f.history.replace_count(), 0);
        assert_eq!(url_params(&f.history), Some(fresh));
    }

    #[test]
    fn test_back_resets_shadow() {
        let f = setup("/todos");
        f.sync.set_query_param(QueryKey::Params, |_| Some(json!({"page": 2})));
        f.queue.run_pending();
        f.history.push("/extras", None);
        assert_eq!(f.sync.decoded(QueryKey::Params), None);

        f.history.back();
        assert_eq!(f.sync.decoded(QueryKey::Params), Some(json!({"page": 2})));
    }

    #[test]
    fn test_none_deletes_key() {
        let f = setup(&format!("/todos?params={}&z=1", encoded(&json!({"a": 1}))));
        f.sync.set_query_param(QueryKey::Params, |_| None);
        f.queue.run_pending();
        assert_eq!(f.history.location().search, "?z=1");
        assert_eq!(f.history.actions().last(), Some(&HistoryAction::Replace("https://app.test/todos?z=1".to_string())));
    }

    #[test]
    fn test_updater_may_read_state() {
        let ctx = json!({"theme": "dark"});
        let f = setup(&format!("/todos?context={}", encoded(&ctx)));

        let reader = f.sync.clone();
        f.sync.set_query_param(QueryKey::Params, move |prev| {
            let theme = reader.decoded(QueryKey::Context);
            assert_eq!(prev, reader.decoded(QueryKey::Params));
            Some(json!({"ctx": theme}))
        });
        f.queue.run_pending();

        assert_eq!(url_params(&f.history), Some(json!({"ctx": {"theme": "dark"}})));
        assert_eq!(f.history.replace_count(), 1);
    }

    #[test]
    fn test_detach_stops_following_history() {
        let f = setup("/todos");
        f.sync.detach();
        f.history.push(&format!("/todos?params={}", encoded(&json!(5))), None);
        assert_eq!(f.sync.decoded(QueryKey::Params), None);
    }
}
