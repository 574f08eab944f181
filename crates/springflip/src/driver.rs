//! Flip animator
//!
//! Entry point for running flip descriptors on a spring system. A single
//! descriptor either animates on its own toward 1 or waits for a gesture to
//! drive its end value; groups go through the stagger scheduler
//! (see [`FlipAnimator::staggered_springs`]).

use crate::data::FlipData;
use crate::suspended::{create_suspended_spring, SuspendedFlip};
use springflip_engine::{spring_system, SpringHandle, SystemHandle};

/// Runs flip descriptors on a spring system
///
/// # Example
///
/// ```ignore
/// let system = SpringSystem::new();
/// let animator = FlipAnimator::new(system.handle());
///
/// animator.create_spring(flip, false);
///
/// // each frame
/// system.tick();
/// ```
#[derive(Clone, Debug)]
pub struct FlipAnimator {
    system: SystemHandle,
}

impl FlipAnimator {
    pub fn new(system: SystemHandle) -> Self {
        Self { system }
    }

    /// Animator on the current thread's shared spring system
    pub fn global() -> Self {
        Self::new(spring_system().handle())
    }

    pub fn system(&self) -> &SystemHandle {
        &self.system
    }

    /// Create an idle spring for `flip`; see [`create_suspended_spring`]
    pub fn create_suspended_spring(
        &self,
        flip: FlipData,
        is_gesture_controlled: bool,
    ) -> SuspendedFlip {
        create_suspended_spring(&self.system, flip, is_gesture_controlled)
    }

    /// Create and start one descriptor's spring
    ///
    /// - gesture-controlled: `on_spring_activate` runs now and the spring
    ///   waits for the gesture to set its end value
    /// - otherwise the spring animates toward 1 on its own
    /// - no-op descriptors activate and finish immediately
    ///
    /// Returns the spring, if one was created.
    pub fn create_spring(
        &self,
        flip: FlipData,
        is_gesture_controlled: bool,
    ) -> Option<SpringHandle> {
        let suspended = self.create_suspended_spring(flip, is_gesture_controlled);

        if is_gesture_controlled {
            suspended.activate();
        }

        match suspended.spring() {
            Some(spring) if !is_gesture_controlled => {
                spring.set_end_value(1.0);
            }
            Some(_) => {}
            None => {
                // Nothing will move, but activation may kick off nested flips
                suspended.activate();
                suspended.finish();
            }
        }

        suspended.into_spring()
    }
}
