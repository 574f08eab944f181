//! Staggered cascades
//!
//! Runs a group of descriptors as a cascade: each spring pulls the next one
//! along once its own progress crosses a threshold, so the group ripples
//! instead of moving in lockstep.
//!
//! ```text
//!  leader value ──► crosses 1/clamp(len, 10, 100) ──► next.set_end_value(min(v * speed, 1))
//! ```
//!
//! Under gesture control nothing starts on its own. Every end value the
//! gesture sets also updates the shared cascade direction: 1 means forward,
//! 0 means backward, fractions leave it alone.

use crate::controls::SpringControls;
use crate::data::{FlipDataArray, OnUpdate, OnUpdateFactory};
use crate::driver::FlipAnimator;
use serde::{Deserialize, Serialize};
use springflip_engine::{Spring, SpringHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Speed multiplier used when a stagger config sets no speed
pub const DEFAULT_STAGGER_SPEED: f32 = 1.1;

/// Group sizes are clamped into this range before computing the threshold
pub const MIN_CASCADE_STEPS: usize = 10;
pub const MAX_CASCADE_STEPS: usize = 100;

/// Stagger options for one group
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaggerConfig {
    /// Cascade from the last descriptor to the first
    pub reverse: bool,
    /// How hard each spring pulls the next one, 0 to 1
    pub speed: Option<f32>,
}

impl StaggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Multiplier applied to a leader's value to get its follower's end value
    ///
    /// `1 + clamp(speed, 0, 1)`, so always within [1, 2]. An unset, zero or
    /// NaN speed gives [`DEFAULT_STAGGER_SPEED`].
    pub fn normalized_speed(&self) -> f32 {
        match self.speed {
            Some(speed) if speed != 0.0 && !speed.is_nan() => 1.0 + speed.clamp(0.0, 1.0),
            _ => DEFAULT_STAGGER_SPEED,
        }
    }
}

/// Leader progress a spring must pass before it starts its follower
pub fn next_threshold(group_len: usize) -> f32 {
    1.0 / group_len.clamp(MIN_CASCADE_STEPS, MAX_CASCADE_STEPS) as f32
}

/// Which way a cascade is travelling
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CascadeDirection {
    /// Values growing toward 1
    #[default]
    Forward,
    /// Values shrinking toward 0
    Backward,
}

impl CascadeDirection {
    /// Direction implied by an end value; only exactly 0 and 1 count
    pub fn from_end_value(end_value: f32) -> Option<Self> {
        if end_value == 1.0 {
            Some(CascadeDirection::Forward)
        } else if end_value == 0.0 {
            Some(CascadeDirection::Backward)
        } else {
            None
        }
    }

    /// Whether a leader at `value` should pull its follower
    pub fn crosses(self, value: f32, threshold: f32) -> bool {
        match self {
            CascadeDirection::Forward => value > threshold,
            CascadeDirection::Backward => threshold > value,
        }
    }
}

/// Cascade direction shared by every spring in a group
#[derive(Clone, Debug, Default)]
pub struct DirectionFlag(Rc<Cell<CascadeDirection>>);

impl DirectionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> CascadeDirection {
        self.0.get()
    }

    /// Update from an end value; fractional values are ignored
    pub fn set_from_end_value(&self, end_value: f32) {
        if let Some(direction) = CascadeDirection::from_end_value(end_value) {
            self.0.set(direction);
        }
    }
}

/// Springs of a cascade, indexed in cascade order
///
/// Filled while the group is being created; read by index on every step.
#[derive(Clone, Debug, Default)]
pub struct CascadeChain {
    springs: Rc<RefCell<Vec<SpringHandle>>>,
}

impl CascadeChain {
    fn push(&self, spring: SpringHandle) {
        self.springs.borrow_mut().push(spring);
    }

    pub fn get(&self, index: usize) -> Option<SpringHandle> {
        self.springs.borrow().get(index).cloned()
    }

    pub fn first(&self) -> Option<SpringHandle> {
        self.get(0)
    }

    pub fn len(&self) -> usize {
        self.springs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_vec(&self) -> Vec<SpringHandle> {
        self.springs.borrow().clone()
    }
}

/// One spring's view of its cascade
struct CascadeLink {
    index: usize,
    chain: CascadeChain,
    direction: DirectionFlag,
    threshold: f32,
    speed: f32,
}

impl CascadeLink {
    fn on_step(&self, value: f32) {
        if !self.direction.get().crosses(value, self.threshold) {
            return;
        }
        if let Some(next) = self.chain.get(self.index + 1) {
            let end_value = (value * self.speed).min(1.0);
            tracing::trace!(leader = self.index, value, end_value, "cascade pulls follower");
            next.set_end_value(end_value);
        }
    }

    /// Wrap a descriptor's update factory with the cascade trigger
    fn wrap(self, factory: OnUpdateFactory, is_gesture_controlled: bool) -> OnUpdateFactory {
        Box::new(move |controls: SpringControls| -> OnUpdate {
            let controls = if is_gesture_controlled {
                let direction = self.direction.clone();
                controls.with_end_value_observer(move |end_value| {
                    direction.set_from_end_value(end_value)
                })
            } else {
                controls
            };
            let mut on_update = factory(controls);
            Box::new(move |spring: &Spring| {
                self.on_step(spring.value());
                on_update(spring);
            })
        })
    }
}

impl FlipAnimator {
    /// Run a group of descriptors as a staggered cascade
    ///
    /// No-op descriptors take no part in the cascade; they activate and
    /// finish straight away. Outside gesture control the first spring is
    /// started toward 1 and the rest follow it.
    ///
    /// Returns the cascade's springs in cascade order.
    pub fn staggered_springs(
        &self,
        group: FlipDataArray,
        config: &StaggerConfig,
        is_gesture_controlled: bool,
    ) -> CascadeChain {
        let chain = CascadeChain::default();
        if group.is_empty() {
            return chain;
        }

        let mut group = group;
        if config.reverse {
            group.reverse();
        }

        let speed = config.normalized_speed();
        let threshold = next_threshold(group.len());
        let direction = DirectionFlag::new();

        let (cascading, no_ops): (FlipDataArray, FlipDataArray) =
            group.into_iter().partition(|flip| !flip.no_op);

        tracing::debug!(
            springs = cascading.len(),
            no_ops = no_ops.len(),
            speed,
            threshold,
            reverse = config.reverse,
            is_gesture_controlled,
            "scheduling staggered springs"
        );

        for flip in no_ops {
            self.create_spring(flip, is_gesture_controlled);
        }

        for (index, flip) in cascading.into_iter().enumerate() {
            let link = CascadeLink {
                index,
                chain: chain.clone(),
                direction: direction.clone(),
                threshold,
                speed,
            };
            let flip = flip.map_on_update(|factory| link.wrap(factory, is_gesture_controlled));
            let suspended = self.create_suspended_spring(flip, is_gesture_controlled);
            match suspended.spring() {
                Some(spring) => chain.push(spring.clone()),
                None => {
                    suspended.activate();
                    suspended.finish();
                }
            }
        }

        if !is_gesture_controlled {
            if let Some(first) = chain.first() {
                first.set_end_value(1.0);
            }
        }

        chain
    }
}
