//! Suspended springs
//!
//! Turns one descriptor into one idle spring with its listeners wired. The
//! spring does not move until something sets its end value.

use crate::controls::SpringControls;
use crate::data::FlipData;
use crate::lifecycle::{FlipLifecycle, FlipPhase};
use springflip_engine::{SpringCallbacks, SpringHandle, SystemHandle};
use std::rc::Rc;

/// A descriptor whose spring has been created but not started
///
/// No-op descriptors have no spring; the caller still activates them through
/// [`activate`](Self::activate).
#[derive(Debug)]
pub struct SuspendedFlip {
    spring: Option<SpringHandle>,
    lifecycle: Rc<FlipLifecycle>,
}

impl SuspendedFlip {
    pub fn spring(&self) -> Option<&SpringHandle> {
        self.spring.as_ref()
    }

    pub fn into_spring(self) -> Option<SpringHandle> {
        self.spring
    }

    pub fn is_no_op(&self) -> bool {
        self.spring.is_none()
    }

    pub fn phase(&self) -> FlipPhase {
        self.lifecycle.phase()
    }

    /// Run `on_spring_activate` unless it already ran
    pub fn activate(&self) -> bool {
        self.lifecycle.activate()
    }

    /// Run `on_animation_end` unless it already ran
    pub fn finish(&self) -> bool {
        self.lifecycle.end()
    }
}

/// Create an idle spring for `flip` and wire its listeners
///
/// - activate runs `on_spring_activate`
/// - update runs the callback built by `get_on_update_func`
/// - at rest, unless gesture-controlled, destroys the spring and runs
///   `on_animation_end`
///
/// Gesture-controlled springs are never destroyed here; a gesture may move the
/// spring again after it rests, so whoever ends the gesture calls `stop`.
pub fn create_suspended_spring(
    system: &SystemHandle,
    flip: FlipData,
    is_gesture_controlled: bool,
) -> SuspendedFlip {
    let FlipData {
        spring_config,
        no_op,
        on_spring_activate,
        get_on_update_func,
        on_animation_end,
    } = flip;
    let lifecycle = Rc::new(FlipLifecycle::new(on_spring_activate, on_animation_end));

    if no_op {
        return SuspendedFlip {
            spring: None,
            lifecycle,
        };
    }

    let config = spring_config.unwrap_or_default();
    let Some(spring) = system.create_spring(config.stiffness, config.damping) else {
        tracing::warn!("spring system dropped, flip will not animate");
        return SuspendedFlip {
            spring: None,
            lifecycle,
        };
    };
    spring.set_overshoot_clamping(config.overshoot_clamping);

    let on_update = get_on_update_func(SpringControls::new(spring.clone(), lifecycle.clone()));

    let activate = lifecycle.clone();
    let mut callbacks = SpringCallbacks::new()
        .on_activate(move |_| {
            activate.activate();
        })
        .on_update_boxed(on_update);

    if !is_gesture_controlled {
        let own = spring.clone();
        let end = lifecycle.clone();
        callbacks = callbacks.on_at_rest(move |_| {
            // Release the spring so the pool does not keep stepping it
            own.destroy();
            end.end();
        });
    }

    spring.add_listener(callbacks);
    tracing::trace!(id = ?spring.id(), is_gesture_controlled, "suspended spring created");

    SuspendedFlip {
        spring: Some(spring),
        lifecycle,
    }
}
