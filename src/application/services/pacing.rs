//! Observer adapter that paces engine steps.
//!
//! The engine only emits events; this adapter forwards each one to the
//! wrapped observer and then blocks for the configured delay.

use std::time::Duration;

use crate::config::AnimationConfig;
use crate::domain::{TreeEvent, TreeObserver};
use crate::infrastructure::traits::Pacer;

pub struct PacedObserver<'a> {
    pacer: &'a dyn Pacer,
    timing: AnimationConfig,
    inner: &'a mut dyn TreeObserver,
}

impl<'a> PacedObserver<'a> {
    pub fn new(pacer: &'a dyn Pacer, timing: AnimationConfig, inner: &'a mut dyn TreeObserver) -> Self {
        Self {
            pacer,
            timing,
            inner,
        }
    }

    fn delay_for(&self, event: &TreeEvent) -> Duration {
        match event {
            TreeEvent::NodeVisited { .. } => Duration::from_millis(self.timing.visit_delay_ms),
            TreeEvent::RotationStep { .. } | TreeEvent::StructureChanged => {
                Duration::from_millis(self.timing.rotation_delay_ms)
            }
            _ => Duration::ZERO,
        }
    }
}

impl TreeObserver for PacedObserver<'_> {
    fn on_event(&mut self, event: &TreeEvent) {
        self.inner.on_event(event);
        let delay = self.delay_for(event);
        if !delay.is_zero() {
            self.pacer.pause(delay);
        }
    }
}
