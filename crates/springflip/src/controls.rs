//! Per-step spring controls
//!
//! The control surface handed to a descriptor's update factory. It lets the
//! update callback steer or stop its own spring without holding the spring
//! handle itself.

use crate::lifecycle::FlipLifecycle;
use springflip_engine::SpringHandle;
use std::rc::Rc;

type EndValueObserver = Rc<dyn Fn(f32)>;

/// Controls bound to one descriptor's spring
#[derive(Clone)]
pub struct SpringControls {
    spring: SpringHandle,
    lifecycle: Rc<FlipLifecycle>,
    observer: Option<EndValueObserver>,
}

impl SpringControls {
    pub(crate) fn new(spring: SpringHandle, lifecycle: Rc<FlipLifecycle>) -> Self {
        Self {
            spring,
            lifecycle,
            observer: None,
        }
    }

    /// Call `observer` with every end value before it reaches the spring
    pub(crate) fn with_end_value_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(f32) + 'static,
    {
        self.observer = Some(match self.observer.take() {
            Some(previous) => Rc::new(move |value| {
                previous(value);
                observer(value);
            }),
            None => Rc::new(observer),
        });
        self
    }

    /// Destroy the spring; returns false if it was already gone
    pub fn stop(&self) -> bool {
        self.spring.destroy()
    }

    pub fn set_end_value(&self, end_value: f32) {
        if let Some(observer) = &self.observer {
            observer(end_value);
        }
        self.spring.set_end_value(end_value);
    }

    pub fn set_velocity(&self, velocity: f32) {
        self.spring.set_velocity(velocity);
    }

    /// Report the animation as finished (runs `on_animation_end` at most once)
    pub fn on_animation_end(&self) {
        self.lifecycle.end();
    }
}

impl std::fmt::Debug for SpringControls {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpringControls")
            .field("spring", &self.spring.id())
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}
