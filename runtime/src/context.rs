//! Context channels.
//!
//! A [`Context`] carries one value from a provider to every consumer below it.
//! Consumers read the innermost provided value, or the context's default when
//! nothing is provided. Providing returns a [`ProvideGuard`]; dropping the
//! guard withdraws exactly that value, whatever the drop order.
//!
//! # Example
//!
//! ```
//! use bridged_store_runtime::context::Context;
//!
//! let theme = Context::new("light");
//! assert_eq!(theme.current(), "light");
//!
//! let outer = theme.provide("dark");
//! {
//!     let _inner = theme.provide("contrast");
//!     assert_eq!(theme.current(), "contrast");
//! }
//! assert_eq!(theme.current(), "dark");
//!
//! drop(outer);
//! assert_eq!(theme.current(), "light");
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A value channel with a default and a stack of providers
pub struct Context<T> {
    inner: Arc<ContextInner<T>>,
}

struct ContextInner<T> {
    default: T,
    providers: Mutex<Vec<(u64, T)>>,
    next_id: AtomicU64,
}

impl<T> ContextInner<T> {
    fn providers(&self) -> MutexGuard<'_, Vec<(u64, T)>> {
        self.providers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Context<T> {
    /// Create a context whose consumers see `default` until something is provided
    #[must_use]
    pub fn new(default: T) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                default,
                providers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Provide `value` to consumers until the returned guard is dropped
    #[must_use = "the value is withdrawn as soon as the guard is dropped"]
    pub fn provide(&self, value: T) -> ProvideGuard<T> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.providers().push((id, value));

        ProvideGuard {
            context: Arc::clone(&self.inner),
            id,
        }
    }

    /// The innermost provided value, or the default
    #[must_use]
    pub fn current(&self) -> T {
        self.inner
            .providers()
            .last()
            .map_or_else(|| self.inner.default.clone(), |(_, value)| value.clone())
    }

    /// `true` if at least one provider is mounted
    #[must_use]
    pub fn is_provided(&self) -> bool {
        !self.inner.providers().is_empty()
    }

    /// The value consumers see when nothing is provided
    #[must_use]
    pub fn default_value(&self) -> &T {
        &self.inner.default
    }
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("providers", &self.inner.providers().len())
            .finish_non_exhaustive()
    }
}

/// Keeps a provided value mounted; dropping it unmounts the value
pub struct ProvideGuard<T> {
    context: Arc<ContextInner<T>>,
    id: u64,
}

impl<T> Drop for ProvideGuard<T> {
    fn drop(&mut self) {
        let mut providers = self.context.providers();
        if let Some(index) = providers.iter().rposition(|(id, _)| *id == self.id) {
            providers.remove(index);
        }
    }
}

impl<T> std::fmt::Debug for ProvideGuard<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvideGuard").field("id", &self.id).finish()
    }
}
