use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Trailing-edge debouncer. Scheduling again drops the pending timer, so
/// only the latest callback fires; dropping the timer cancels it.
#[derive(Clone, Copy)]
pub struct Debouncer {
    pending: StoredValue<Option<Timeout>, LocalStorage>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self {
            pending: StoredValue::new_local(None),
        }
    }

    pub fn schedule(&self, delay_ms: u32, callback: impl FnOnce() + 'static) {
        self.pending
            .set_value(Some(Timeout::new(delay_ms, callback)));
    }

    pub fn cancel(&self) {
        self.pending.set_value(None);
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}
