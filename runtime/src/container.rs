//! Containers: shareable, observable state bound to one reducer.
//!
//! [`create_container`] returns a [`Container`] holding two context channels,
//! one for the state and one for the dispatcher. Mounting a [`Provider`]
//! creates the [`BridgedReducer`] that owns the state and provides it through
//! both channels until the provider is dropped.
//!
//! Keeping state and dispatch in separate channels lets consumers that only
//! dispatch hold a [`Dispatcher`] without observing state changes.
//!
//! # Example
//!
//! ```
//! use bridged_store_core::reducer::FnReducer;
//! use bridged_store_core::selector::{Selector, SelectorCache};
//! use bridged_store_runtime::container::create_container;
//!
//! let container = create_container(
//!     FnReducer::infallible(|count: &i64, delta: i64| count + delta),
//!     0_i64,
//!     "counter",
//! );
//!
//! // Nothing mounted yet: the initial state and a no-op dispatcher.
//! assert_eq!(*container.use_state(), 0);
//! assert!(container.use_dispatch().dispatch(5).is_ok());
//! assert_eq!(*container.use_state(), 0);
//!
//! let provider = container.provider();
//! assert!(container.use_dispatch().dispatch(5).is_ok());
//! assert_eq!(*container.use_state(), 5);
//!
//! let doubled = Selector::new(|count: &i64| count * 2);
//! let mut cache = SelectorCache::new();
//! assert_eq!(container.use_selector(&mut cache, &doubled), 10);
//!
//! drop(provider);
//! assert_eq!(*container.use_state(), 0);
//! ```

use crate::bridge::{BridgedReducer, Dispatcher};
use crate::config::ContainerConfig;
use crate::context::{Context, ProvideGuard};
use bridged_store_core::devtools::ConnectOptions;
use bridged_store_core::reducer::Reducer;
use bridged_store_core::selector::{Selector, SelectorCache};
use futures::Stream;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Context value carrying the state
pub type StateContext<S> = Context<watch::Receiver<Arc<S>>>;

/// Context value carrying the dispatcher
pub type DispatchContext<A, E> = Context<Dispatcher<A, E>>;

/// Create a container for `reducer`, starting from `initial_state`
///
/// Uses [`ContainerConfig::default`]: providers connect to the global devtools
/// extension if one is registered when they mount.
#[must_use]
pub fn create_container<R>(reducer: R, initial_state: R::State, name: impl Into<String>) -> Container<R>
where
    R: Reducer + Clone + Send + Sync + 'static,
    R::State: Serialize + Send + Sync + 'static,
    R::Action: Serialize + Clone + Send + 'static,
    R::Error: 'static,
{
    Container::with_config(reducer, initial_state, name, ContainerConfig::default())
}

/// Accessors for one reducer/state pair
pub struct Container<R: Reducer> {
    name: String,
    reducer: R,
    initial_state: Arc<R::State>,
    config: ContainerConfig,
    state_context: StateContext<R::State>,
    dispatch_context: DispatchContext<R::Action, R::Error>,
}

impl<R> Container<R>
where
    R: Reducer + Clone + Send + Sync + 'static,
    R::State: Serialize + Send + Sync + 'static,
    R::Action: Serialize + Clone + Send + 'static,
    R::Error: 'static,
{
    /// Create a container with custom configuration
    #[must_use]
    pub fn with_config(
        reducer: R,
        initial_state: R::State,
        name: impl Into<String>,
        config: ContainerConfig,
    ) -> Self {
        let initial_state = Arc::new(initial_state);
        // The sender is dropped: consumers outside any provider see a state
        // that never changes.
        let (_, default_state) = watch::channel(Arc::clone(&initial_state));

        Self {
            name: name.into(),
            reducer,
            initial_state,
            config,
            state_context: Context::new(default_state),
            dispatch_context: Context::new(Dispatcher::noop()),
        }
    }

    /// Mount a provider
    ///
    /// Instantiates one [`BridgedReducer`] and provides its state and
    /// dispatcher to every consumer of this container until the returned
    /// [`Provider`] is dropped. The devtools extension is resolved here, once.
    #[must_use = "the provider unmounts as soon as it is dropped"]
    pub fn provider(&self) -> Provider<R> {
        let options =
            ConnectOptions::named(self.name.clone()).with_serialize(self.config.serialize);

        let bridge = BridgedReducer::mount_with_options(
            self.reducer.clone(),
            Arc::clone(&self.initial_state),
            options,
            self.config.devtools.resolve(),
        );

        tracing::debug!(container = %self.name, "Provider mounted");

        Provider {
            _dispatch: self.dispatch_context.provide(bridge.dispatcher()),
            _state: self.state_context.provide(bridge.subscribe()),
            bridge,
        }
    }
}

impl<R: Reducer> Container<R> {
    /// The container name, also used as the devtools session name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configuration providers are mounted with
    #[must_use]
    pub const fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// The current state of the innermost provider, or the initial state
    #[must_use]
    pub fn use_state(&self) -> Arc<R::State> {
        Arc::clone(&self.state_context.current().borrow())
    }

    /// The dispatcher of the innermost provider, or a no-op
    #[must_use]
    pub fn use_dispatch(&self) -> Dispatcher<R::Action, R::Error> {
        self.dispatch_context.current()
    }

    /// Derive a slice of [`use_state`](Self::use_state) through `selector`
    ///
    /// `cache` is the slot of the calling site. See
    /// [`selector`](bridged_store_core::selector) for the cache rules,
    /// including the stale-value behaviour for an unchanged selector.
    pub fn use_selector<T: Clone>(
        &self,
        cache: &mut SelectorCache<R::State, T>,
        selector: &Selector<R::State, T>,
    ) -> T {
        let state = self.use_state();
        cache.select(selector, &state)
    }

    /// A receiver on the innermost provider's state
    ///
    /// The receiver starts marked as seen; [`watch::Receiver::changed`]
    /// resolves on the next dispatch. Outside any provider it never changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<R::State>> {
        let mut receiver = self.state_context.current();
        receiver.borrow_and_update();
        receiver
    }

    /// Stream of states published after this call
    ///
    /// Ends when the provider it observes unmounts.
    pub fn changes(&self) -> impl Stream<Item = Arc<R::State>> + use<R> {
        futures::stream::unfold(self.subscribe(), |mut receiver| async move {
            receiver.changed().await.ok()?;
            let state = Arc::clone(&receiver.borrow_and_update());
            Some((state, receiver))
        })
    }

    /// The context carrying the state
    #[must_use]
    pub const fn state_context(&self) -> &StateContext<R::State> {
        &self.state_context
    }

    /// The context carrying the dispatcher
    #[must_use]
    pub const fn dispatch_context(&self) -> &DispatchContext<R::Action, R::Error> {
        &self.dispatch_context
    }
}

impl<R: Reducer> fmt::Debug for Container<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("mounted", &self.state_context.is_provided())
            .finish_non_exhaustive()
    }
}

/// A mounted provider
///
/// Dropping it unmounts the provider: consumers fall back to the next provider
/// out, or to the container defaults. Dispatchers obtained while it was
/// mounted discard every later action, and change streams on it end.
pub struct Provider<R: Reducer> {
    _dispatch: ProvideGuard<Dispatcher<R::Action, R::Error>>,
    _state: ProvideGuard<watch::Receiver<Arc<R::State>>>,
    bridge: BridgedReducer<R>,
}

impl<R: Reducer> Provider<R> {
    /// The bridged reducer owned by this provider
    #[must_use]
    pub const fn bridge(&self) -> &BridgedReducer<R> {
        &self.bridge
    }

    /// The current state held by this provider
    #[must_use]
    pub fn state(&self) -> Arc<R::State> {
        self.bridge.state()
    }

    /// The dispatcher of this provider
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher<R::Action, R::Error> {
        self.bridge.dispatcher()
    }
}

impl<R: Reducer> fmt::Debug for Provider<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("bridge", &self.bridge)
            .finish_non_exhaustive()
    }
}
