//! Per-descriptor lifecycle
//!
//! Holds a descriptor's activation and completion callbacks and guarantees
//! each runs exactly once, whichever path (spring listener, driver, gesture
//! controls) reaches it first.

use std::cell::{Cell, RefCell};

/// One-shot lifecycle callback
pub type FlipCallback = Box<dyn FnOnce()>;

/// Where a descriptor is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipPhase {
    /// Waiting for its spring to start
    Pending,
    /// `on_spring_activate` has run
    Running,
    /// `on_animation_end` has run; terminal
    Ended,
}

/// Exactly-once activation and completion for one descriptor
pub struct FlipLifecycle {
    phase: Cell<FlipPhase>,
    on_activate: RefCell<Option<FlipCallback>>,
    on_end: RefCell<Option<FlipCallback>>,
}

impl FlipLifecycle {
    pub fn new(on_activate: FlipCallback, on_end: FlipCallback) -> Self {
        Self {
            phase: Cell::new(FlipPhase::Pending),
            on_activate: RefCell::new(Some(on_activate)),
            on_end: RefCell::new(Some(on_end)),
        }
    }

    pub fn phase(&self) -> FlipPhase {
        self.phase.get()
    }

    /// Run the activation callback if it has not run yet
    ///
    /// Returns true if this call ran it.
    pub fn activate(&self) -> bool {
        if self.phase.get() != FlipPhase::Pending {
            tracing::trace!(phase = ?self.phase.get(), "activation already delivered");
            return false;
        }
        self.phase.set(FlipPhase::Running);
        let callback = self.on_activate.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
        true
    }

    /// Run the completion callback if it has not run yet
    ///
    /// Ending a descriptor that never activated runs activation first.
    /// Returns true if this call ran the completion callback.
    pub fn end(&self) -> bool {
        match self.phase.get() {
            FlipPhase::Ended => {
                tracing::trace!("animation end already delivered");
                return false;
            }
            FlipPhase::Pending => {
                tracing::debug!("ending a flip that never activated");
                self.activate();
            }
            FlipPhase::Running => {}
        }
        debug_assert!(
            self.on_activate.borrow().is_none(),
            "flip ended with its activation callback still pending"
        );
        self.phase.set(FlipPhase::Ended);
        let callback = self.on_end.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
        true
    }
}

impl std::fmt::Debug for FlipLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlipLifecycle")
            .field("phase", &self.phase.get())
            .finish()
    }
}
