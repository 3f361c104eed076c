//! Single-slot memoized selectors.
//!
//! A [`Selector`] derives a value from the full state. A [`SelectorCache`]
//! belongs to one call site and remembers exactly one `{selector, value}` pair.
//!
//! # Cache rules
//!
//! 1. Same selector identity as the previous call: the cached value is returned
//!    as is. The selector is **not** re-run, even if the state changed since.
//! 2. Different selector: the selector runs. If the new value is equal to the
//!    cached one under the cache's predicate (shallow by default), the cached
//!    value is returned so that its identity survives.
//! 3. Whatever was returned becomes the new cache entry.
//!
//! Rule 1 means a long-lived selector observes the state at its first use
//! only. Consumers that need fresh slices pass a new selector (or call
//! [`SelectorCache::clear`]) whenever the state changes. This is a known quirk
//! kept for compatibility with existing consumers; changing it needs product
//! sign-off.

use crate::equality::{ShallowEq, shallow_eq};
use std::fmt;
use std::sync::Arc;

/// A slice function with identity
///
/// Identity is the allocation behind the function: clones are the same
/// selector, two calls to [`Selector::new`] never are.
pub struct Selector<S, T> {
    f: Arc<dyn Fn(&S) -> T + Send + Sync>,
}

impl<S, T> Selector<S, T> {
    /// Create a selector with a fresh identity
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Run the selector against `state`
    pub fn select(&self, state: &S) -> T {
        (self.f)(state)
    }

    /// `true` if both handles refer to the same selector
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

impl<S, T> Clone for Selector<S, T> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<S, T> fmt::Debug for Selector<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("id", &Arc::as_ptr(&self.f).cast::<()>())
            .finish()
    }
}

/// Equality predicate used by a [`SelectorCache`]
pub type Equality<T> = fn(&T, &T) -> bool;

/// The single `{selector, value}` slot for one call site
pub struct SelectorCache<S, T> {
    last_selector: Option<Selector<S, T>>,
    last_value: Option<T>,
    eq: Equality<T>,
}

impl<S, T: ShallowEq> SelectorCache<S, T> {
    /// Create an empty cache comparing values with [`shallow_eq`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_equality(shallow_eq::<T>)
    }
}

impl<S, T: ShallowEq> Default for SelectorCache<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, T> SelectorCache<S, T> {
    /// Create an empty cache with a caller-provided equality predicate
    #[must_use]
    pub const fn with_equality(eq: Equality<T>) -> Self {
        Self {
            last_selector: None,
            last_value: None,
            eq,
        }
    }

    /// `true` if nothing has been cached yet
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.last_value.is_none()
    }

    /// Forget the cached pair
    pub fn clear(&mut self) {
        self.last_selector = None;
        self.last_value = None;
    }

    /// The cached value, if any
    #[must_use]
    pub const fn cached(&self) -> Option<&T> {
        self.last_value.as_ref()
    }

    /// Derive a value from `state` through `selector`, applying the cache rules
    pub fn select(&mut self, selector: &Selector<S, T>, state: &S) -> T
    where
        T: Clone,
    {
        let unchanged = self
            .last_selector
            .as_ref()
            .is_some_and(|last| last.same_identity(selector));

        let value = match &self.last_value {
            Some(last) if unchanged => last.clone(),
            last => {
                let next = selector.select(state);
                match last {
                    Some(last) if (self.eq)(last, &next) => last.clone(),
                    _ => next,
                }
            },
        };

        self.last_selector = Some(selector.clone());
        self.last_value = Some(value.clone());
        value
    }
}

impl<S, T: fmt::Debug> fmt::Debug for SelectorCache<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorCache")
            .field("last_selector", &self.last_selector)
            .field("last_value", &self.last_value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone)]
    struct State {
        a: i32,
        b: i32,
    }

    #[test]
    fn test_first_select_runs_selector() {
        let mut cache = SelectorCache::new();
        let sel = Selector::new(|s: &State| s.a);

        assert!(cache.is_empty());
        assert_eq!(cache.select(&sel, &State { a: 1, b: 2 }), 1);
        assert_eq!(cache.cached(), Some(&1));
    }

    #[test]
    fn test_same_selector_returns_cached_value_after_state_change() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let sel = Selector::new(move |s: &State| {
            counted.fetch_add(1, Ordering::SeqCst);
            s.a
        });
        let mut cache = SelectorCache::new();

        assert_eq!(cache.select(&sel, &State { a: 1, b: 0 }), 1);
        // State moved on, selector identity didn't: stale value by design.
        assert_eq!(cache.select(&sel.clone(), &State { a: 99, b: 0 }), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_new_selector_recomputes() {
        let mut cache = SelectorCache::new();
        let first = Selector::new(|s: &State| s.a);
        let second = Selector::new(|s: &State| s.b);

        assert_eq!(cache.select(&first, &State { a: 1, b: 2 }), 1);
        assert_eq!(cache.select(&second, &State { a: 1, b: 2 }), 2);
    }

    #[test]
    fn test_shallow_equal_result_keeps_previous_identity() {
        let mut cache = SelectorCache::new();
        let state = State { a: 1, b: 2 };

        let first = Selector::new(|s: &State| Arc::new(BTreeMap::from([("a", s.a)])));
        let previous = cache.select(&first, &state);

        let second = Selector::new(|s: &State| Arc::new(BTreeMap::from([("a", s.a)])));
        let current = cache.select(&second, &state);

        assert!(Arc::ptr_eq(&previous, &current));
    }

    #[test]
    fn test_different_result_replaces_cache() {
        let mut cache = SelectorCache::new();
        let first = Selector::new(|s: &State| Arc::new(vec![s.a]));
        let previous = cache.select(&first, &State { a: 1, b: 0 });

        let second = Selector::new(|s: &State| Arc::new(vec![s.a]));
        let current = cache.select(&second, &State { a: 2, b: 0 });

        assert!(!Arc::ptr_eq(&previous, &current));
        assert_eq!(*current, vec![2]);
    }

    #[test]
    fn test_custom_equality_predicate() {
        fn same_parity(a: &i32, b: &i32) -> bool {
            a % 2 == b % 2
        }

        let mut cache = SelectorCache::with_equality(same_parity);
        let first = Selector::new(|s: &State| s.a);
        let second = Selector::new(|s: &State| s.b);

        assert_eq!(cache.select(&first, &State { a: 1, b: 3 }), 1);
        assert_eq!(cache.select(&second, &State { a: 1, b: 3 }), 1);
    }

    #[test]
    fn test_clear_forces_recompute() {
        let mut cache = SelectorCache::new();
        let sel = Selector::new(|s: &State| s.a);

        cache.select(&sel, &State { a: 1, b: 0 });
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.select(&sel, &State { a: 5, b: 0 }), 5);
    }
}
