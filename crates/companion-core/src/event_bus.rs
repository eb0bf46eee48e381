//! Event bus between controllers and the app shell.
//!
//! Single-threaded (WASM constraint), shared through `Rc<RefCell<_>>`.
//! Controllers push toasts and navigation requests; the app drains them
//! once per frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use companion_types::event::{CompanionEvent, Notification};

/// Shared event bus, cheap to clone.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<VecDeque<CompanionEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn emit(&self, event: CompanionEvent) {
        self.inner.borrow_mut().push_back(event);
    }

    /// Shorthand for `emit(CompanionEvent::Notify(..))`
    pub fn notify(&self, notification: Notification) {
        self.emit(CompanionEvent::Notify(notification));
    }

    /// Drain all pending events. Called by the app each frame.
    pub fn drain(&self) -> Vec<CompanionEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
