//! Service container for dependency injection
//!
//! Wires up the tree service with its settings, pacer and value source.

use std::sync::Arc;

use crate::application::services::{PacedObserver, TreeService};
use crate::config::Settings;
use crate::domain::TreeObserver;
use crate::infrastructure::traits::{NoPacer, Pacer, ThreadRngSource, ThreadSleepPacer, ValueSource};

/// Container holding shared dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Step pacing
    pub pacer: Arc<dyn Pacer>,

    /// Random value source
    pub values: Arc<dyn ValueSource>,
}

impl ServiceContainer {
    /// Create a container with real implementations.
    ///
    /// `animate` selects the sleeping pacer; otherwise steps are not delayed.
    pub fn new(settings: Settings, animate: bool) -> Self {
        let pacer: Arc<dyn Pacer> = if animate {
            Arc::new(ThreadSleepPacer)
        } else {
            Arc::new(NoPacer)
        };
        Self::with_deps(settings, pacer, Arc::new(ThreadRngSource))
    }

    /// Create a container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        pacer: Arc<dyn Pacer>,
        values: Arc<dyn ValueSource>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            pacer,
            values,
        }
    }

    /// Fresh service over an empty tree.
    pub fn tree_service(&self) -> TreeService {
        TreeService::new(Arc::clone(&self.settings), Arc::clone(&self.values))
    }

    /// Wrap `inner` so every step is paced with the configured delays.
    pub fn paced<'a>(&'a self, inner: &'a mut dyn TreeObserver) -> PacedObserver<'a> {
        PacedObserver::new(self.pacer.as_ref(), self.settings.animation.clone(), inner)
    }
}
