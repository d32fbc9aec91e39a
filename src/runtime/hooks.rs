use crate::runtime::progress::BatchProgress;
use std::fmt;

pub type BatchSuccessCallback<'h, K> = Box<dyn FnMut(&K, &BatchProgress) + Send + 'h>;
pub type BatchErrorCallback<'h, E> = Box<dyn FnMut(Option<&E>) + Send + 'h>;

/// Success callback plus the copy it needs: the reducer consumes the result before the
/// callback sees it.
struct SuccessHook<'h, K> {
    retain: fn(&K) -> K,
    callback: BatchSuccessCallback<'h, K>,
}

/// Optional user callbacks fired by the runners.
///
/// Callbacks run on the run's own task and must be `Send` so a run future holding them can be
/// handed to `tokio::spawn`. A panic inside one unwinds through the run.
pub struct BatchHooks<'h, K, E> {
    on_success: Option<SuccessHook<'h, K>>,
    on_error: Option<BatchErrorCallback<'h, E>>,
}

impl<'h, K, E> BatchHooks<'h, K, E> {
    pub fn new() -> Self {
        Self {
            on_success: None,
            on_error: None,
        }
    }

    /// Registers the success callback. It fires after the result has been folded, so it is
    /// handed a clone taken just before the reducer runs.
    pub fn with_success<F>(mut self, callback: F) -> Self
    where
        K: Clone,
        F: FnMut(&K, &BatchProgress) + Send + 'h,
    {
        self.on_success = Some(SuccessHook {
            retain: K::clone,
            callback: Box::new(callback),
        });
        self
    }

    pub fn with_error<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Option<&E>) + Send + 'h,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Copy of `result` for the success callback, or `None` when no callback is registered.
    pub(crate) fn retain_success(&self, result: &K) -> Option<K> {
        self.on_success.as_ref().map(|hook| (hook.retain)(result))
    }

    pub(crate) fn batch_succeeded(&mut self, result: &K, progress: &BatchProgress) {
        if let Some(hook) = self.on_success.as_mut() {
            (hook.callback)(result, progress);
        }
    }

    pub(crate) fn batch_failed(&mut self, error: Option<&E>) {
        if let Some(callback) = self.on_error.as_mut() {
            callback(error);
        }
    }
}

impl<K, E> Default for BatchHooks<'_, K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> fmt::Debug for BatchHooks<'_, K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchHooks")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
