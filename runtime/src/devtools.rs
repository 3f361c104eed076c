//! The global extension handle and a `tracing`-backed extension.
//!
//! Containers configured with [`DevtoolsMode::Global`](crate::config::DevtoolsMode)
//! look up the extension registered here when their provider mounts. The
//! lookup happens once per mount; registering an extension later does not
//! attach it to providers that are already mounted.

use bridged_store_core::devtools::{
    ConnectOptions, DevtoolsError, DevtoolsExtension, DevtoolsSession, EXTENSION_GLOBAL,
};
use std::sync::{Arc, PoisonError, RwLock};

static GLOBAL_EXTENSION: RwLock<Option<Arc<dyn DevtoolsExtension>>> = RwLock::new(None);

/// Install `extension` as the global handle, returning the previous one
pub fn register_extension(
    extension: Arc<dyn DevtoolsExtension>,
) -> Option<Arc<dyn DevtoolsExtension>> {
    tracing::debug!(handle = EXTENSION_GLOBAL, "Registering devtools extension");
    GLOBAL_EXTENSION
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(extension)
}

/// Remove the global handle, returning it if one was installed
pub fn unregister_extension() -> Option<Arc<dyn DevtoolsExtension>> {
    tracing::debug!(handle = EXTENSION_GLOBAL, "Unregistering devtools extension");
    GLOBAL_EXTENSION
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

/// The currently registered global handle
#[must_use]
pub fn global_extension() -> Option<Arc<dyn DevtoolsExtension>> {
    GLOBAL_EXTENSION
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Extension that reports sessions as structured `tracing` events
///
/// Every session logs `init` and `send` at `INFO` under the
/// `bridged_store::devtools` target, with the session name, the action and the
/// state rendered as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingExtension;

impl TracingExtension {
    /// Create the extension
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DevtoolsExtension for TracingExtension {
    fn connect(&self, options: &ConnectOptions) -> Result<Box<dyn DevtoolsSession>, DevtoolsError> {
        tracing::info!(
            target: "bridged_store::devtools",
            session = %options.name,
            serialize = options.serialize,
            "Session opened"
        );
        Ok(Box::new(TracingSession {
            name: options.name.clone(),
            sent: 0,
        }))
    }
}

struct TracingSession {
    name: String,
    sent: u64,
}

impl DevtoolsSession for TracingSession {
    fn init(&mut self, state: serde_json::Value) -> Result<(), DevtoolsError> {
        tracing::info!(
            target: "bridged_store::devtools",
            session = %self.name,
            %state,
            "init"
        );
        Ok(())
    }

    fn send(
        &mut self,
        action: serde_json::Value,
        state: serde_json::Value,
    ) -> Result<(), DevtoolsError> {
        self.sent += 1;
        tracing::info!(
            target: "bridged_store::devtools",
            session = %self.name,
            seq = self.sent,
            %action,
            %state,
            "send"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_extension_accepts_messages() {
        let extension = TracingExtension::new();
        let session = extension.connect(&ConnectOptions::named("test"));
        assert!(session.is_ok());

        if let Ok(mut session) = session {
            assert!(session.init(serde_json::json!({ "count": 0 })).is_ok());
            assert!(
                session
                    .send(serde_json::json!("Increment"), serde_json::json!({ "count": 1 }))
                    .is_ok()
            );
        }
    }
}
