//! Debugging extension protocol.
//!
//! An extension is optional and located at runtime. When present, a container
//! opens one named session with it, initializes the session with the initial
//! state and then reports every dispatched action together with the state it
//! produced:
//!
//! ```text
//! connect({ name, serialize: true }) -> session
//! session.init(initial_state)
//! session.send(last_action, state)   // once per dispatch
//! ```
//!
//! States and actions cross this boundary as `serde_json::Value`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known name of the global extension handle
pub const EXTENSION_GLOBAL: &str = "__REDUX_DEVTOOLS_EXTENSION__";

/// Options passed to [`DevtoolsExtension::connect`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectOptions {
    /// Session name shown by the extension
    pub name: String,
    /// Ask the extension to serialize values it receives
    pub serialize: bool,
}

impl ConnectOptions {
    /// Options for a named session with serialization enabled
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            serialize: true,
        }
    }

    /// Override the serialize flag
    #[must_use]
    pub const fn with_serialize(mut self, serialize: bool) -> Self {
        self.serialize = serialize;
        self
    }
}

/// Errors reported by an extension or while preparing values for it
#[derive(Error, Debug)]
pub enum DevtoolsError {
    /// The extension refused or failed to open a session
    #[error("Failed to connect to devtools extension: {0}")]
    Connect(String),

    /// A state or action could not be converted to JSON
    #[error("Failed to serialize value for devtools: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The session could not deliver a message
    #[error("Devtools transport error: {0}")]
    Transport(String),
}

/// A debugging extension able to open sessions
pub trait DevtoolsExtension: Send + Sync {
    /// Open a new session
    ///
    /// # Errors
    ///
    /// Returns [`DevtoolsError::Connect`] if no session can be opened.
    fn connect(&self, options: &ConnectOptions) -> Result<Box<dyn DevtoolsSession>, DevtoolsError>;
}

/// An open debugging session
pub trait DevtoolsSession: Send {
    /// Record the initial state
    ///
    /// # Errors
    ///
    /// Returns [`DevtoolsError::Transport`] if the message can't be delivered.
    fn init(&mut self, state: serde_json::Value) -> Result<(), DevtoolsError>;

    /// Record an action and the state it produced
    ///
    /// Called while the dispatching store is locked. Implementations must not
    /// dispatch back into that store.
    ///
    /// # Errors
    ///
    /// Returns [`DevtoolsError::Transport`] if the message can't be delivered.
    fn send(
        &mut self,
        action: serde_json::Value,
        state: serde_json::Value,
    ) -> Result<(), DevtoolsError>;
}
