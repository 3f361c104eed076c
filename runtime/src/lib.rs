//! # Bridged Store Runtime
//!
//! Runtime implementation for Bridged Store.
//!
//! This crate turns a reducer into a shareable, observable state container and
//! mirrors its activity into a debugging extension when one is available.
//!
//! ## Core Components
//!
//! - **Container**: Accessors for one reducer/state pair (`use_state`,
//!   `use_dispatch`, `use_selector`, `provider`)
//! - **Provider**: A mounted container instance, owning the state
//! - **`BridgedReducer`**: Drives the state and forwards every dispatch to the
//!   devtools session
//! - **Context**: The channels carrying state and dispatcher to consumers
//!
//! ## Example
//!
//! ```ignore
//! use bridged_store_runtime::{create_container, devtools::TracingExtension};
//!
//! bridged_store_runtime::devtools::register_extension(Arc::new(TracingExtension::new()));
//!
//! let todos = create_container(TodoReducer, TodoState::default(), "todos");
//! let _provider = todos.provider();
//!
//! todos.use_dispatch().dispatch(TodoAction::Add("milk".into()))?;
//! let count = todos.use_selector(&mut cache, &item_count);
//! ```

/// Reducer bridge mirroring dispatches into a devtools session
pub mod bridge;

/// Container configuration
pub mod config;

/// Containers and providers
pub mod container;

/// Context channels
pub mod context;

/// Global devtools handle and a `tracing`-backed extension
pub mod devtools;

/// Metric names for observability
pub mod metrics;

pub use bridge::{BridgedReducer, Dispatcher, SessionState};
pub use config::{ContainerConfig, DevtoolsMode};
pub use container::{Container, Provider, create_container};
pub use context::{Context, ProvideGuard};
