//! Container configuration.

use bridged_store_core::devtools::DevtoolsExtension;
use std::sync::Arc;

/// Where a provider finds its debugging extension
#[derive(Clone, Default)]
pub enum DevtoolsMode {
    /// Look up the global handle when the provider mounts
    #[default]
    Global,

    /// Never connect to an extension
    Disabled,

    /// Use this extension regardless of the global handle
    Explicit(Arc<dyn DevtoolsExtension>),
}

impl DevtoolsMode {
    /// Resolve the extension a mounting provider should use
    #[must_use]
    pub fn resolve(&self) -> Option<Arc<dyn DevtoolsExtension>> {
        match self {
            Self::Global => crate::devtools::global_extension(),
            Self::Disabled => None,
            Self::Explicit(extension) => Some(Arc::clone(extension)),
        }
    }
}

impl std::fmt::Debug for DevtoolsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "DevtoolsMode::Global"),
            Self::Disabled => write!(f, "DevtoolsMode::Disabled"),
            Self::Explicit(_) => write!(f, "DevtoolsMode::Explicit(<extension>)"),
        }
    }
}

/// Configuration for containers
///
/// # Example
///
/// ```ignore
/// let config = ContainerConfig::default()
///     .with_extension(Arc::new(TracingExtension::new()))
///     .with_serialize(false);
///
/// let container = Container::with_config(reducer, initial_state, "todos", config);
/// ```
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// How the debugging extension is located
    pub devtools: DevtoolsMode,
    /// Value of the `serialize` flag sent when connecting
    pub serialize: bool,
}

impl ContainerConfig {
    /// Create a configuration with custom values
    #[must_use]
    pub const fn new(devtools: DevtoolsMode, serialize: bool) -> Self {
        Self {
            devtools,
            serialize,
        }
    }

    /// Set how the debugging extension is located
    #[must_use]
    pub fn with_devtools(mut self, devtools: DevtoolsMode) -> Self {
        self.devtools = devtools;
        self
    }

    /// Inject an extension instead of using the global handle
    #[must_use]
    pub fn with_extension(self, extension: Arc<dyn DevtoolsExtension>) -> Self {
        self.with_devtools(DevtoolsMode::Explicit(extension))
    }

    /// Never connect to an extension
    #[must_use]
    pub fn without_devtools(self) -> Self {
        self.with_devtools(DevtoolsMode::Disabled)
    }

    /// Set the `serialize` flag sent when connecting
    #[must_use]
    pub const fn with_serialize(mut self, serialize: bool) -> Self {
        self.serialize = serialize;
        self
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            devtools: DevtoolsMode::Global,
            serialize: true,
        }
    }
}
