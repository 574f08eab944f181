//! Spring lifecycle listeners
//!
//! Listeners are notified by the [`SpringSystem`](crate::SpringSystem) while
//! it steps a spring. No engine borrow is held during a notification, so a
//! listener may freely create, retarget or destroy springs, including the one
//! it is attached to.

use crate::spring::Spring;

/// Receives lifecycle notifications for a single spring
///
/// Per step the order is: activate (only on the first step after rest),
/// update, at-rest (only on the step that came to rest).
pub trait SpringListener {
    fn on_spring_activate(&mut self, _spring: &Spring) {}

    fn on_spring_update(&mut self, _spring: &Spring) {}

    fn on_spring_at_rest(&mut self, _spring: &Spring) {}
}

/// Boxed spring callback
pub type SpringCallback = Box<dyn FnMut(&Spring)>;

/// Closure-based [`SpringListener`]
///
/// ```ignore
/// let listener = SpringCallbacks::new()
///     .on_update(|spring| apply(spring.value()))
///     .on_at_rest(|_| finished());
/// spring.add_listener(listener);
/// ```
#[derive(Default)]
pub struct SpringCallbacks {
    on_activate: Option<SpringCallback>,
    on_update: Option<SpringCallback>,
    on_at_rest: Option<SpringCallback>,
}

impl SpringCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_activate<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Spring) + 'static,
    {
        self.on_activate = Some(Box::new(f));
        self
    }

    pub fn on_update<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Spring) + 'static,
    {
        self.on_update = Some(Box::new(f));
        self
    }

    /// Same as [`on_update`](Self::on_update) for an already boxed callback
    pub fn on_update_boxed(mut self, f: SpringCallback) -> Self {
        self.on_update = Some(f);
        self
    }

    pub fn on_at_rest<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Spring) + 'static,
    {
        self.on_at_rest = Some(Box::new(f));
        self
    }
}

impl SpringListener for SpringCallbacks {
    fn on_spring_activate(&mut self, spring: &Spring) {
        if let Some(f) = self.on_activate.as_mut() {
            f(spring);
        }
    }

    fn on_spring_update(&mut self, spring: &Spring) {
        if let Some(f) = self.on_update.as_mut() {
            f(spring);
        }
    }

    fn on_spring_at_rest(&mut self, spring: &Spring) {
        if let Some(f) = self.on_at_rest.as_mut() {
            f(spring);
        }
    }
}

impl std::fmt::Debug for SpringCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpringCallbacks")
            .field("on_activate", &self.on_activate.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_at_rest", &self.on_at_rest.is_some())
            .finish()
    }
}
