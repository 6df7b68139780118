//! Task Queue
//!
//! Deferred single-shot callbacks used to coalesce history writes.
//! In the browser this is the microtask queue (`browser::Microtasks`).

use std::cell::RefCell;
use std::collections::VecDeque;

pub type Task = Box<dyn FnOnce()>;

pub trait TaskQueue {
    /// Run `task` after the current synchronous turn
    fn post(&self, task: Task);
}

/// Queue drained explicitly by the caller
#[derive(Default)]
pub struct ManualQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl ManualQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Run queued tasks, including ones queued while draining; returns how many ran
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

impl TaskQueue for ManualQueue {
    fn post(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}
