//! The devtools bridge.
//!
//! [`BridgedReducer`] owns a piece of state driven by a [`Reducer`] and mirrors
//! every dispatched action, with the state it produced, into a debugging
//! extension when one is available.
//!
//! # Lifecycle
//!
//! 1. [`BridgedReducer::mount`] publishes the initial state, then opens a
//!    session named after the container and initializes it with the initial
//!    state. Without an extension this step does nothing.
//! 2. [`BridgedReducer::dispatch`] stores the action in a one-slot holder, runs
//!    the reducer, publishes the next state and then forwards
//!    `(last action, next state)` to the session.
//! 3. [`BridgedReducer::reinitialize`] opens a fresh session for new init
//!    inputs. The current state is kept.
//! 4. Dropping the [`BridgedReducer`] unmounts it. The state sender and the
//!    session go away with it; dispatchers handed out earlier discard every
//!    action from then on.
//!
//! A session is never closed and never re-opened after a failure. Extension
//! errors are logged and skipped; they never fail a dispatch.
//!
//! Dispatches are serialized by one lock held across the reducer and the
//! session `send`. Reducers and sessions may read [`BridgedReducer::name`],
//! [`BridgedReducer::session_state`] and [`BridgedReducer::state`], but must
//! not dispatch to the bridge that is calling them.

use crate::metrics::{DEVTOOLS_FAILED, DEVTOOLS_MESSAGES, DISPATCH_FAILED, DISPATCH_TOTAL};
use bridged_store_core::devtools::{
    ConnectOptions, DevtoolsError, DevtoolsExtension, DevtoolsSession,
};
use bridged_store_core::reducer::Reducer;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use tokio::sync::watch;

/// Whether the bridge holds a devtools session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No extension was found, or connecting failed
    NotEstablished,
    /// A session is open and receives every dispatch
    Established,
}

/// Stable handle for dispatching actions
///
/// Clones share identity. The handle of a provider stays the same for the
/// provider's whole life.
pub struct Dispatcher<A, E> {
    f: Arc<dyn Fn(A) -> Result<(), E> + Send + Sync>,
}

impl<A: 'static, E: 'static> Dispatcher<A, E> {
    /// A dispatcher that drops every action and always succeeds
    #[must_use]
    pub fn noop() -> Self {
        Self {
            f: Arc::new(|_| Ok(())),
        }
    }

    fn from_fn<F>(f: F) -> Self
    where
        F: Fn(A) -> Result<(), E> + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }
}

impl<A, E> Dispatcher<A, E> {
    /// Dispatch `action`
    ///
    /// # Errors
    ///
    /// Returns the reducer's error unchanged if it rejects the action.
    pub fn dispatch(&self, action: A) -> Result<(), E> {
        (self.f)(action)
    }

    /// `true` if both handles dispatch to the same place
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

impl<A, E> Clone for Dispatcher<A, E> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<A, E> fmt::Debug for Dispatcher<A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("id", &Arc::as_ptr(&self.f).cast::<()>())
            .finish()
    }
}

/// A reducer-driven state mirrored into a devtools session
pub struct BridgedReducer<R: Reducer> {
    shared: Arc<Shared<R>>,
    dispatcher: Dispatcher<R::Action, R::Error>,
}

struct Shared<R: Reducer> {
    reducer: R,
    state: watch::Sender<Arc<R::State>>,
    bridge: Mutex<Bridge<R::Action>>,
    // Mirrors of `bridge` readable while a dispatch holds the lock.
    name: RwLock<String>,
    established: AtomicBool,
}

struct Bridge<A> {
    options: ConnectOptions,
    extension: Option<Arc<dyn DevtoolsExtension>>,
    session: Option<Box<dyn DevtoolsSession>>,
    last_action: Option<A>,
}

impl<R> BridgedReducer<R>
where
    R: Reducer + Send + Sync + 'static,
    R::State: Serialize + Send + Sync + 'static,
    R::Action: Serialize + Clone + Send + 'static,
    R::Error: 'static,
{
    /// Mount a bridged reducer and open its devtools session
    ///
    /// # Arguments
    ///
    /// - `reducer`: Computes the next state for every action
    /// - `initial_state`: The state before any dispatch
    /// - `name`: Session name shown by the extension
    /// - `extension`: Where to open the session; `None` disables the bridge
    #[must_use]
    pub fn mount(
        reducer: R,
        initial_state: R::State,
        name: impl Into<String>,
        extension: Option<Arc<dyn DevtoolsExtension>>,
    ) -> Self {
        Self::mount_with_options(
            reducer,
            Arc::new(initial_state),
            ConnectOptions::named(name),
            extension,
        )
    }

    /// Mount with explicit connect options and a shared initial state
    #[must_use]
    pub fn mount_with_options(
        reducer: R,
        initial_state: Arc<R::State>,
        options: ConnectOptions,
        extension: Option<Arc<dyn DevtoolsExtension>>,
    ) -> Self {
        let (state, _) = watch::channel(Arc::clone(&initial_state));

        let shared = Arc::new(Shared {
            reducer,
            state,
            name: RwLock::new(options.name.clone()),
            bridge: Mutex::new(Bridge {
                options,
                extension,
                session: None,
                last_action: None,
            }),
            established: AtomicBool::new(false),
        });

        // Render is done; run the session effect.
        shared.establish(initial_state.as_ref());

        let dispatcher = {
            let shared = Arc::downgrade(&shared);
            Dispatcher::from_fn(move |action| match Weak::upgrade(&shared) {
                Some(shared) => shared.dispatch(action),
                None => {
                    tracing::trace!("Discarding action dispatched after unmount");
                    Ok(())
                },
            })
        };

        Self { shared, dispatcher }
    }

    /// Dispatch an action
    ///
    /// # Errors
    ///
    /// Returns the reducer's error unchanged. The state is left as it was and
    /// nothing is sent to the devtools session.
    pub fn dispatch(&self, action: R::Action) -> Result<(), R::Error> {
        self.shared.dispatch(action)
    }

    /// Open a fresh session for new init inputs
    ///
    /// The extension is initialized with `initial_state` under `name`. The
    /// state currently held by this bridge is not touched.
    pub fn reinitialize(&self, initial_state: &R::State, name: impl Into<String>) {
        let name = name.into();
        *self
            .shared
            .name
            .write()
            .unwrap_or_else(PoisonError::into_inner) = name.clone();
        self.shared.lock().options.name = name;
        self.shared.establish(initial_state);
    }
}

impl<R: Reducer> BridgedReducer<R> {
    /// The current state
    #[must_use]
    pub fn state(&self) -> Arc<R::State> {
        Arc::clone(&self.shared.state.borrow())
    }

    /// A receiver notified on every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<R::State>> {
        self.shared.state.subscribe()
    }

    /// The stable dispatch handle
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher<R::Action, R::Error> {
        self.dispatcher.clone()
    }

    /// The session name
    #[must_use]
    pub fn name(&self) -> String {
        self.shared
            .name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a devtools session is open
    #[must_use]
    pub fn session_state(&self) -> SessionState {
        if self.shared.established.load(Ordering::Acquire) {
            SessionState::Established
        } else {
            SessionState::NotEstablished
        }
    }
}

impl<R: Reducer> Drop for BridgedReducer<R> {
    fn drop(&mut self) {
        tracing::debug!(container = %self.name(), "Bridge unmounted");
    }
}

impl<R: Reducer> fmt::Debug for BridgedReducer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgedReducer")
            .field("name", &self.name())
            .field("session", &self.session_state())
            .finish_non_exhaustive()
    }
}

impl<R: Reducer> Shared<R> {
    fn lock(&self) -> MutexGuard<'_, Bridge<R::Action>> {
        self.bridge.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn establish<S: Serialize>(&self, initial_state: &S)
    where
        R::Action: Serialize,
    {
        let mut bridge = self.lock();
        bridge.establish(initial_state);
        self.established
            .store(bridge.session.is_some(), Ordering::Release);
    }
}

impl<R> Shared<R>
where
    R: Reducer,
    R::State: Serialize,
    R::Action: Serialize + Clone,
{
    #[tracing::instrument(skip_all, name = "bridged_dispatch")]
    fn dispatch(&self, action: R::Action) -> Result<(), R::Error> {
        // Held across the reducer so concurrent dispatches apply one at a time.
        let mut bridge = self.lock();
        let name = bridge.options.name.clone();

        metrics::counter!(DISPATCH_TOTAL, "container" => name.clone()).increment(1);
        bridge.last_action = Some(action.clone());

        let current = Arc::clone(&self.state.borrow());
        let next = match self.reducer.reduce(&current, action) {
            Ok(next) => Arc::new(next),
            Err(error) => {
                metrics::counter!(DISPATCH_FAILED, "container" => name.clone()).increment(1);
                tracing::debug!(container = %name, "Reducer rejected action");
                return Err(error);
            },
        };

        self.state.send_replace(Arc::clone(&next));
        tracing::debug!(container = %name, "State updated");

        bridge.forward(next.as_ref());
        Ok(())
    }
}

impl<A: Serialize> Bridge<A> {
    fn establish<S: Serialize>(&mut self, initial_state: &S) {
        let Some(extension) = self.extension.clone() else {
            tracing::trace!(session = %self.options.name, "No devtools extension present");
            return;
        };

        let opened = extension.connect(&self.options).and_then(|mut session| {
            session.init(serde_json::to_value(initial_state)?)?;
            Ok(session)
        });

        match opened {
            Ok(session) => {
                metrics::counter!(DEVTOOLS_MESSAGES, "message" => "init").increment(1);
                tracing::info!(session = %self.options.name, "Devtools session established");
                self.session = Some(session);
            },
            Err(error) => {
                metrics::counter!(DEVTOOLS_FAILED, "message" => "init").increment(1);
                tracing::warn!(
                    session = %self.options.name,
                    error = %error,
                    "Failed to establish devtools session"
                );
            },
        }
    }

    fn forward<S: Serialize>(&mut self, state: &S) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let sent = serde_json::to_value(&self.last_action)
            .and_then(|action| Ok((action, serde_json::to_value(state)?)))
            .map_err(DevtoolsError::from)
            .and_then(|(action, state)| session.send(action, state));

        match sent {
            Ok(()) => {
                metrics::counter!(DEVTOOLS_MESSAGES, "message" => "send").increment(1);
            },
            Err(error) => {
                metrics::counter!(DEVTOOLS_FAILED, "message" => "send").increment(1);
                tracing::warn!(
                    session = %self.options.name,
                    error = %error,
                    "Failed to send to devtools session"
                );
            },
        }
    }
}
