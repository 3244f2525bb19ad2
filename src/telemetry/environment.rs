//! Host capabilities injected into the recorder at construction.

use std::fmt;
use std::sync::Arc;

use crate::config::RuntimeMode;

/// Supplies the host's current location (route, URL, request path) at record time.
pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> Option<String>;
}

impl<F> LocationProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn current_location(&self) -> Option<String> {
        self()
    }
}

/// What the hosting environment can do for the recorder.
#[derive(Clone, Default)]
pub struct HostEnvironment {
    development: bool,
    location: Option<Arc<dyn LocationProvider>>,
}

impl HostEnvironment {
    pub fn new(mode: RuntimeMode) -> Self {
        Self {
            development: mode.is_development(),
            location: None,
        }
    }

    pub fn development() -> Self {
        Self::new(RuntimeMode::Development)
    }

    pub fn with_location<P>(mut self, provider: P) -> Self
    where
        P: LocationProvider + 'static,
    {
        self.location = Some(Arc::new(provider));
        self
    }

    pub fn is_development(&self) -> bool {
        self.development
    }

    pub fn current_location(&self) -> Option<String> {
        self.location
            .as_ref()
            .and_then(|provider| provider.current_location())
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("development", &self.development)
            .field("has_location", &self.location.is_some())
            .finish()
    }
}
