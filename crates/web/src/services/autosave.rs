//! Autosave notification hook.
//!
//! The request store fires this hook once after every successful mutation.
//! It carries no payload beyond "a save should occur now": the collaborator
//! decides what and how to persist. With persistence out of scope, the
//! default implementation only logs, but the seam is where a real backend
//! would attach.

use almacen_core::RequestCode;

/// Receiver for "the request changed, save it" notifications.
pub trait AutosaveHook: Send + Sync {
    /// Called once per successful mutating operation on a request.
    fn request_changed(&self, code: RequestCode);
}

/// Default hook: records the autosave in the log and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAutosave;

impl AutosaveHook for LogAutosave {
    fn request_changed(&self, code: RequestCode) {
        tracing::debug!(request = %code, "autosave triggered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counting hook for tests.
    pub struct CountingHook(pub AtomicUsize);

    impl AutosaveHook for CountingHook {
        fn request_changed(&self, _code: RequestCode) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn counting_hook_counts() {
        let hook = CountingHook(AtomicUsize::new(0));
        hook.request_changed(RequestCode::new(1234));
        hook.request_changed(RequestCode::new(1234));
        assert_eq!(hook.0.load(Ordering::SeqCst), 2);
    }
}
