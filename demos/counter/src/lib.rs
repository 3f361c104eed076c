//! # Counter Example
//!
//! A simple counter demonstrating Bridged Store.
//!
//! This example showcases:
//! - A reducer that can reject actions
//! - A container and its provider
//! - Memoized selectors
//! - Mirroring dispatches into a devtools extension
//!
//! ## Example
//!
//! ```
//! use counter::{CounterAction, counter_container};
//!
//! let container = counter_container("counter");
//! let _provider = container.provider();
//!
//! let dispatch = container.use_dispatch();
//! dispatch.dispatch(CounterAction::Increment).unwrap();
//! dispatch.dispatch(CounterAction::Add(4)).unwrap();
//! assert_eq!(container.use_state().count, 5);
//! ```

use bridged_store_core::reducer::Reducer;
use bridged_store_core::selector::Selector;
use bridged_store_runtime::{Container, create_container};
use serde::{Deserialize, Serialize};

/// Counter state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    /// Current count value
    pub count: i64,
    /// Number of actions applied since the last reset
    pub changes: u64,
}

/// Counter actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterAction {
    /// Increment the counter by 1
    Increment,
    /// Decrement the counter by 1
    Decrement,
    /// Add an arbitrary amount
    Add(i64),
    /// Reset the counter to 0
    Reset,
}

/// Why the counter rejected an action
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CounterError {
    /// The count would leave the `i64` range
    #[error("count {count} cannot change by {delta}")]
    Overflow {
        /// Count before the action
        count: i64,
        /// Requested change
        delta: i64,
    },
}

/// Counter reducer
///
/// Rejects any action that would overflow the count; the state is left
/// untouched and the error goes back to the dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterReducer;

impl CounterReducer {
    /// Create a new counter reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn shift(state: &CounterState, delta: i64) -> Result<CounterState, CounterError> {
        let count = state
            .count
            .checked_add(delta)
            .ok_or(CounterError::Overflow {
                count: state.count,
                delta,
            })?;

        Ok(CounterState {
            count,
            changes: state.changes + 1,
        })
    }
}

impl Reducer for CounterReducer {
    type State = CounterState;
    type Action = CounterAction;
    type Error = CounterError;

    fn reduce(&self, state: &CounterState, action: CounterAction) -> Result<CounterState, CounterError> {
        match action {
            CounterAction::Increment => Self::shift(state, 1),
            CounterAction::Decrement => Self::shift(state, -1),
            CounterAction::Add(delta) => Self::shift(state, delta),
            CounterAction::Reset => Ok(CounterState::default()),
        }
    }
}

/// A counter container using the global devtools handle
#[must_use]
pub fn counter_container(name: &str) -> Container<CounterReducer> {
    create_container(CounterReducer::new(), CounterState::default(), name)
}

/// Selects the count
#[must_use]
pub fn count() -> Selector<CounterState, i64> {
    Selector::new(|state: &CounterState| state.count)
}

/// Selects whether the count is even
#[must_use]
pub fn is_even() -> Selector<CounterState, bool> {
    Selector::new(|state: &CounterState| state.count % 2 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridged_store_testing::ReducerTest;

    #[test]
    fn test_increment() {
        ReducerTest::new(CounterReducer::new())
            .given_state(CounterState::default())
            .when_action(CounterAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
                assert_eq!(state.changes, 1);
            })
            .run();
    }

    #[test]
    fn test_decrement_below_zero() {
        ReducerTest::new(CounterReducer::new())
            .given_state(CounterState::default())
            .when_actions([CounterAction::Decrement, CounterAction::Decrement])
            .then_state(|state| assert_eq!(state.count, -2))
            .run();
    }

    #[test]
    fn test_reset() {
        ReducerTest::new(CounterReducer::new())
            .given_state(CounterState {
                count: 42,
                changes: 7,
            })
            .when_action(CounterAction::Reset)
            .then_state(|state| assert_eq!(*state, CounterState::default()))
            .run();
    }

    #[test]
    fn test_overflow_is_rejected() {
        ReducerTest::new(CounterReducer::new())
            .given_state(CounterState {
                count: i64::MAX - 1,
                changes: 0,
            })
            .when_actions([CounterAction::Increment, CounterAction::Increment])
            .then_error(|error| {
                assert_eq!(
                    *error,
                    CounterError::Overflow {
                        count: i64::MAX,
                        delta: 1,
                    }
                );
            })
            .run();
    }

    #[test]
    fn test_selectors_have_stable_identity_per_instance() {
        let selector = count();
        assert!(selector.same_identity(&selector.clone()));
        assert!(!selector.same_identity(&count()));
        assert!(is_even().select(&CounterState::default()));
    }
}
