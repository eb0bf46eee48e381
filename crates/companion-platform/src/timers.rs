//! Cancellable timers on top of gloo-timers.
//!
//! Dropping a [`Ticker`] or [`Delay`] cancels it, so a controller's timer
//! lives exactly as long as the slot that holds it.

use gloo_timers::callback::{Interval, Timeout};
use gloo_timers::future::TimeoutFuture;

/// A repeating timer
pub struct Ticker {
    _interval: Interval,
}

impl Ticker {
    pub fn start<F>(period_ms: u32, on_tick: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self {
            _interval: Interval::new(period_ms, on_tick),
        }
    }
}

/// A one-shot timer
pub struct Delay {
    timeout: Option<Timeout>,
}

impl Delay {
    pub fn start<F>(delay_ms: u32, callback: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            timeout: Some(Timeout::new(delay_ms, callback)),
        }
    }

    /// Let the callback fire even after this handle is dropped.
    pub fn detach(mut self) {
        if let Some(timeout) = self.timeout.take() {
            timeout.forget();
        }
    }
}

/// Resolve after `ms` milliseconds.
pub async fn sleep(ms: u32) {
    TimeoutFuture::new(ms).await;
}
