//! # Bridged Store Core
//!
//! Core traits and types for Bridged Store.
//!
//! This crate provides the building blocks that do not depend on any runtime:
//!
//! - **Reducer**: Pure function `(State, Action) → Result<State, Error>`
//! - **Selector**: A slice function with identity, memoized in a single slot
//! - **Equality**: Shallow, one-level comparison used by the selector cache
//! - **Devtools**: The wire contract with an optional debugging extension
//!
//! ## Example
//!
//! ```
//! use bridged_store_core::reducer::{FnReducer, Reducer};
//! use bridged_store_core::selector::{Selector, SelectorCache};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! let reducer = FnReducer::infallible(|state: &Counter, delta: i64| Counter {
//!     count: state.count + delta,
//! });
//!
//! let next = reducer.reduce(&Counter { count: 1 }, 2).unwrap_or_else(|e| match e {});
//! assert_eq!(next.count, 3);
//!
//! let count = Selector::new(|state: &Counter| state.count);
//! let mut cache = SelectorCache::new();
//! assert_eq!(cache.select(&count, &next), 3);
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};

/// Shallow equality for the selector cache
pub mod equality;

/// Single-slot memoized selectors
pub mod selector;

/// Debugging extension protocol
pub mod devtools;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action) → Result<State, Error>`.
///
/// They receive the current state by reference and produce the next state.
/// Returning `Err` leaves the current state untouched; the error is handed back
/// to whoever dispatched the action.
pub mod reducer {
    use std::convert::Infallible;
    use std::fmt;
    use std::marker::PhantomData;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Error`: What the reducer reports when it rejects an action
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for TodoReducer {
    ///     type State = TodoState;
    ///     type Action = TodoAction;
    ///     type Error = TodoError;
    ///
    ///     fn reduce(&self, state: &TodoState, action: TodoAction) -> Result<TodoState, TodoError> {
    ///         match action {
    ///             TodoAction::Add(title) => Ok(state.with_item(title)),
    ///             TodoAction::Remove(id) if !state.contains(id) => Err(TodoError::Missing(id)),
    ///             TodoAction::Remove(id) => Ok(state.without(id)),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The error returned when an action is rejected
        type Error;

        /// Reduce an action into the next state
        ///
        /// # Errors
        ///
        /// Returns `Self::Error` when the action cannot be applied to `state`.
        /// Callers must treat the current state as unchanged in that case.
        ///
        /// Stores call this while holding their dispatch lock: a reducer may
        /// read from its store but must not dispatch to it.
        fn reduce(&self, state: &Self::State, action: Self::Action)
        -> Result<Self::State, Self::Error>;
    }

    /// Adapter turning a closure into a [`Reducer`]
    ///
    /// Closures can't implement [`Reducer`] directly because their state and
    /// action types only appear in argument position.
    pub struct FnReducer<F, S, A, E> {
        f: F,
        _types: PhantomData<fn(&S, A) -> Result<S, E>>,
    }

    impl<F, S, A, E> FnReducer<F, S, A, E>
    where
        F: Fn(&S, A) -> Result<S, E>,
    {
        /// Wrap a fallible reducer function
        #[must_use]
        pub const fn new(f: F) -> Self {
            Self {
                f,
                _types: PhantomData,
            }
        }
    }

    impl<G, S, A> FnReducer<InfallibleFn<G>, S, A, Infallible>
    where
        G: Fn(&S, A) -> S,
    {
        /// Wrap a reducer function that never rejects an action
        #[must_use]
        pub const fn infallible(f: G) -> Self {
            Self {
                f: InfallibleFn(f),
                _types: PhantomData,
            }
        }
    }

    /// Closure wrapper used by [`FnReducer::infallible`]
    #[derive(Clone, Copy)]
    pub struct InfallibleFn<G>(G);

    impl<F, S, A, E> Reducer for FnReducer<F, S, A, E>
    where
        F: ReduceFn<S, A, E>,
    {
        type State = S;
        type Action = A;
        type Error = E;

        fn reduce(&self, state: &S, action: A) -> Result<S, E> {
            self.f.call(state, action)
        }
    }

    /// Callable shape accepted by [`FnReducer`]
    pub trait ReduceFn<S, A, E> {
        /// Apply the function
        ///
        /// # Errors
        ///
        /// Whatever the wrapped function reports.
        fn call(&self, state: &S, action: A) -> Result<S, E>;
    }

    impl<F, S, A, E> ReduceFn<S, A, E> for F
    where
        F: Fn(&S, A) -> Result<S, E>,
    {
        fn call(&self, state: &S, action: A) -> Result<S, E> {
            self(state, action)
        }
    }

    impl<G, S, A> ReduceFn<S, A, Infallible> for InfallibleFn<G>
    where
        G: Fn(&S, A) -> S,
    {
        fn call(&self, state: &S, action: A) -> Result<S, Infallible> {
            Ok((self.0)(state, action))
        }
    }

    impl<F: Clone, S, A, E> Clone for FnReducer<F, S, A, E> {
        fn clone(&self) -> Self {
            Self {
                f: self.f.clone(),
                _types: PhantomData,
            }
        }
    }

    impl<F, S, A, E> fmt::Debug for FnReducer<F, S, A, E> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FnReducer").finish_non_exhaustive()
        }
    }

    /// Apply `actions` to `state` from left to right
    ///
    /// Stops at the first rejected action.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by the reducer.
    pub fn fold<R, I>(reducer: &R, state: R::State, actions: I) -> Result<R::State, R::Error>
    where
        R: Reducer,
        I: IntoIterator<Item = R::Action>,
    {
        actions
            .into_iter()
            .try_fold(state, |state, action| reducer.reduce(&state, action))
    }
}
