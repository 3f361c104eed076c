//! # Bridged Store Testing
//!
//! Testing utilities and helpers for Bridged Store.
//!
//! This crate provides:
//! - Mock devtools extensions that record or reject every call
//! - A Given-When-Then helper for reducers
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use bridged_store_testing::mocks::RecordingExtension;
//!
//! let extension = RecordingExtension::new();
//! let container = Container::with_config(
//!     TodoReducer,
//!     TodoState::default(),
//!     "todos",
//!     ContainerConfig::default().with_extension(extension.handle()),
//! );
//! let _provider = container.provider();
//!
//! container.use_dispatch().dispatch(TodoAction::Add("milk".into()))?;
//! assert_eq!(extension.sends().len(), 1);
//! ```

/// Fluent reducer tests
pub mod reducer_test;

pub use reducer_test::ReducerTest;

/// Mock implementations of the devtools protocol
///
/// Mock implementations for testing.
pub mod mocks {
    use bridged_store_core::devtools::{
        ConnectOptions, DevtoolsError, DevtoolsExtension, DevtoolsSession,
    };
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    /// One call received by a [`RecordingExtension`]
    #[derive(Debug, Clone, PartialEq)]
    pub enum DevtoolsCall {
        /// `connect(options)`
        Connect(ConnectOptions),
        /// `session.init(state)`; sessions are numbered in connect order
        Init {
            /// Index of the session
            session: usize,
            /// The initial state
            state: serde_json::Value,
        },
        /// `session.send(action, state)`
        Send {
            /// Index of the session
            session: usize,
            /// The dispatched action
            action: serde_json::Value,
            /// The state it produced
            state: serde_json::Value,
        },
    }

    type CallLog = Arc<Mutex<Vec<DevtoolsCall>>>;

    fn lock(log: &CallLog) -> MutexGuard<'_, Vec<DevtoolsCall>> {
        log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Extension recording every call, in order
    ///
    /// Clones share the same log.
    ///
    /// # Example
    ///
    /// ```
    /// use bridged_store_core::devtools::ConnectOptions;
    /// use bridged_store_testing::mocks::RecordingExtension;
    ///
    /// let extension = RecordingExtension::new();
    /// let mut session = extension.handle().connect(&ConnectOptions::named("demo")).unwrap();
    /// session.init(serde_json::json!(0)).unwrap();
    /// session.send(serde_json::json!("inc"), serde_json::json!(1)).unwrap();
    ///
    /// assert_eq!(extension.sessions(), vec!["demo".to_string()]);
    /// assert_eq!(extension.sends(), vec![(serde_json::json!("inc"), serde_json::json!(1))]);
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct RecordingExtension {
        log: CallLog,
    }

    impl RecordingExtension {
        /// Create an extension with an empty log
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// This extension as a shareable handle
        #[must_use]
        pub fn handle(&self) -> Arc<dyn DevtoolsExtension> {
            Arc::new(self.clone())
        }

        /// Every call so far
        #[must_use]
        pub fn calls(&self) -> Vec<DevtoolsCall> {
            lock(&self.log).clone()
        }

        /// Options of every `connect` call
        #[must_use]
        pub fn connects(&self) -> Vec<ConnectOptions> {
            lock(&self.log)
                .iter()
                .filter_map(|call| match call {
                    DevtoolsCall::Connect(options) => Some(options.clone()),
                    _ => None,
                })
                .collect()
        }

        /// Names of the sessions opened so far
        #[must_use]
        pub fn sessions(&self) -> Vec<String> {
            self.connects().into_iter().map(|options| options.name).collect()
        }

        /// States passed to `init`, in order
        #[must_use]
        pub fn inits(&self) -> Vec<serde_json::Value> {
            lock(&self.log)
                .iter()
                .filter_map(|call| match call {
                    DevtoolsCall::Init { state, .. } => Some(state.clone()),
                    _ => None,
                })
                .collect()
        }

        /// `(action, state)` pairs passed to `send`, in order
        #[must_use]
        pub fn sends(&self) -> Vec<(serde_json::Value, serde_json::Value)> {
            lock(&self.log)
                .iter()
                .filter_map(|call| match call {
                    DevtoolsCall::Send { action, state, .. } => {
                        Some((action.clone(), state.clone()))
                    },
                    _ => None,
                })
                .collect()
        }

        /// Forget every recorded call
        pub fn clear(&self) {
            lock(&self.log).clear();
        }
    }

    impl DevtoolsExtension for RecordingExtension {
        fn connect(
            &self,
            options: &ConnectOptions,
        ) -> Result<Box<dyn DevtoolsSession>, DevtoolsError> {
            let mut log = lock(&self.log);
            let session = log
                .iter()
                .filter(|call| matches!(call, DevtoolsCall::Connect(_)))
                .count();
            log.push(DevtoolsCall::Connect(options.clone()));

            Ok(Box::new(RecordingSession {
                session,
                log: Arc::clone(&self.log),
            }))
        }
    }

    struct RecordingSession {
        session: usize,
        log: CallLog,
    }

    impl DevtoolsSession for RecordingSession {
        fn init(&mut self, state: serde_json::Value) -> Result<(), DevtoolsError> {
            lock(&self.log).push(DevtoolsCall::Init {
                session: self.session,
                state,
            });
            Ok(())
        }

        fn send(
            &mut self,
            action: serde_json::Value,
            state: serde_json::Value,
        ) -> Result<(), DevtoolsError> {
            lock(&self.log).push(DevtoolsCall::Send {
                session: self.session,
                action,
                state,
            });
            Ok(())
        }
    }

    /// Where a [`FailingExtension`] fails
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailurePoint {
        /// `connect` returns an error
        Connect,
        /// `init` returns an error
        Init,
        /// `send` returns an error; `connect` and `init` succeed
        Send,
    }

    /// Extension that fails at a chosen point
    #[derive(Debug, Clone, Copy)]
    pub struct FailingExtension {
        point: FailurePoint,
    }

    impl FailingExtension {
        /// Fail at `point`
        #[must_use]
        pub const fn new(point: FailurePoint) -> Self {
            Self { point }
        }

        /// Refuse every connection
        #[must_use]
        pub const fn on_connect() -> Self {
            Self::new(FailurePoint::Connect)
        }

        /// Accept connections, fail `init`
        #[must_use]
        pub const fn on_init() -> Self {
            Self::new(FailurePoint::Init)
        }

        /// Accept connections and `init`, fail every `send`
        #[must_use]
        pub const fn on_send() -> Self {
            Self::new(FailurePoint::Send)
        }
    }

    impl DevtoolsExtension for FailingExtension {
        fn connect(
            &self,
            options: &ConnectOptions,
        ) -> Result<Box<dyn DevtoolsSession>, DevtoolsError> {
            if self.point == FailurePoint::Connect {
                return Err(DevtoolsError::Connect(format!(
                    "refusing session {}",
                    options.name
                )));
            }
            Ok(Box::new(FailingSession { point: self.point }))
        }
    }

    struct FailingSession {
        point: FailurePoint,
    }

    impl DevtoolsSession for FailingSession {
        fn init(&mut self, _state: serde_json::Value) -> Result<(), DevtoolsError> {
            if self.point == FailurePoint::Init {
                return Err(DevtoolsError::Transport("init rejected".into()));
            }
            Ok(())
        }

        fn send(
            &mut self,
            _action: serde_json::Value,
            _state: serde_json::Value,
        ) -> Result<(), DevtoolsError> {
            Err(DevtoolsError::Transport("send rejected".into()))
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a `fmt` subscriber writing to the test output
    ///
    /// Honors `RUST_LOG`; defaults to `debug` for the bridged store crates.
    /// Safe to call from every test: only the first call installs anything.
    pub fn init_tracing() {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "bridged_store_runtime=debug,bridged_store::devtools=info".into()
        });

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use mocks::{DevtoolsCall, FailingExtension, RecordingExtension};
