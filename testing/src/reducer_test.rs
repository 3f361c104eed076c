//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use bridged_store_core::reducer::{Reducer, fold};
use std::fmt::Debug;

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for error assertion functions
type ErrorAssertion<E> = Box<dyn FnOnce(&E)>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// Several `when_action` calls are applied left to right. The test expects
/// the sequence to succeed unless `then_error` is used.
///
/// # Example
///
/// ```ignore
/// use bridged_store_testing::ReducerTest;
///
/// ReducerTest::new(CounterReducer)
///     .given_state(CounterState { count: 0 })
///     .when_action(CounterAction::Increment)
///     .then_state(|state| {
///         assert_eq!(state.count, 1);
///     })
///     .run();
///
/// ReducerTest::new(CounterReducer)
///     .given_state(CounterState { count: 0 })
///     .when_action(CounterAction::Decrement)
///     .then_error(|error| assert_eq!(*error, CounterError::Underflow))
///     .run();
/// ```
pub struct ReducerTest<R: Reducer> {
    reducer: R,
    initial_state: Option<R::State>,
    actions: Vec<R::Action>,
    state_assertions: Vec<StateAssertion<R::State>>,
    error_assertions: Vec<ErrorAssertion<R::Error>>,
}

impl<R> ReducerTest<R>
where
    R: Reducer,
    R::State: Debug,
    R::Error: Debug,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            error_assertions: Vec::new(),
        }
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: R::State) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Queue an action to apply (When)
    #[must_use]
    pub fn when_action(mut self, action: R::Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Queue several actions to apply in order (When)
    #[must_use]
    pub fn when_actions<I>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = R::Action>,
    {
        self.actions.extend(actions);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&R::State) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Expect the reducer to reject an action, and inspect the error (Then)
    #[must_use]
    pub fn then_error<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&R::Error) + 'static,
    {
        self.error_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if the initial state or action is not set, if the outcome
    /// (state or error) is not the expected one, or if any assertion fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "Action must be set with when_action()"
        );

        let expects_error = !self.error_assertions.is_empty();

        match fold(&self.reducer, state, self.actions) {
            Ok(state) => {
                assert!(
                    !expects_error,
                    "Expected the reducer to reject an action, but it produced {state:?}"
                );
                for assertion in self.state_assertions {
                    assertion(&state);
                }
            },
            Err(error) => {
                assert!(
                    expects_error,
                    "Reducer rejected an action unexpectedly: {error:?}"
                );
                for assertion in self.error_assertions {
                    assertion(&error);
                }
            },
        }
    }
}

/// Helper assertions for reducer outcomes
pub mod assertions {
    use bridged_store_core::reducer::Reducer;
    use std::fmt::Debug;

    /// Assert that `action` leaves nothing to observe: the reducer returns a
    /// state equal to the input
    ///
    /// # Panics
    ///
    /// Panics if the reducer fails or changes the state.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_unchanged<R>(reducer: &R, state: &R::State, action: R::Action)
    where
        R: Reducer,
        R::State: PartialEq + Debug,
        R::Error: Debug,
    {
        match reducer.reduce(state, action) {
            Ok(next) => assert_eq!(&next, state, "Expected the state to be unchanged"),
            Err(error) => panic!("Reducer rejected an action unexpectedly: {error:?}"),
        }
    }

    /// Assert that `action` is rejected with `expected`
    ///
    /// # Panics
    ///
    /// Panics if the reducer accepts the action or reports another error.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_rejects<R>(reducer: &R, state: &R::State, action: R::Action, expected: &R::Error)
    where
        R: Reducer,
        R::State: Debug,
        R::Error: PartialEq + Debug,
    {
        match reducer.reduce(state, action) {
            Ok(next) => panic!("Expected {expected:?}, but the reducer produced {next:?}"),
            Err(error) => assert_eq!(&error, expected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridged_store_core::reducer::Reducer;

    #[derive(Clone, Debug, PartialEq)]
    struct TestState {
        count: u32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Decrement,
        Noop,
    }

    #[derive(Debug, PartialEq)]
    enum TestError {
        Underflow,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Error = TestError;

        fn reduce(&self, state: &TestState, action: TestAction) -> Result<TestState, TestError> {
            match action {
                TestAction::Increment => Ok(TestState {
                    count: state.count + 1,
                }),
                TestAction::Decrement => state
                    .count
                    .checked_sub(1)
                    .map(|count| TestState { count })
                    .ok_or(TestError::Underflow),
                TestAction::Noop => Ok(state.clone()),
            }
        }
    }

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_sequence() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 5 })
            .when_actions([TestAction::Decrement, TestAction::Decrement])
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 4);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_error() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Decrement)
            .then_error(|error| assert_eq!(*error, TestError::Underflow))
            .run();
    }

    #[test]
    #[should_panic(expected = "rejected an action unexpectedly")]
    fn test_reducer_test_unexpected_error_panics() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Decrement)
            .run();
    }

    #[test]
    fn test_assertions() {
        assertions::assert_unchanged(&TestReducer, &TestState { count: 3 }, TestAction::Noop);
        assertions::assert_rejects(
            &TestReducer,
            &TestState { count: 0 },
            TestAction::Decrement,
            &TestError::Underflow,
        );
    }
}
