//! Spring physics
//!
//! RK4-integrated springs that pull a scalar toward an end value and report
//! when they come to rest. Parameters can be given directly or converted from
//! the origami stiffness/damping scale used by layout transitions.

/// Largest frame delta a single advance will integrate (seconds)
pub const MAX_FRAME_DELTA: f32 = 0.064;

/// Upper bound on a single integration sub-step (seconds)
pub const SOLVER_STEP: f32 = 0.001;

/// Default speed below which a spring may be considered at rest
pub const DEFAULT_REST_SPEED: f32 = 0.001;

/// Default distance from the end value below which a spring may be considered at rest
pub const DEFAULT_REST_DISPLACEMENT: f32 = 0.001;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    /// Create a new spring configuration
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Convert origami-scale stiffness and damping into physical parameters
    ///
    /// Origami values are the designer-facing scale (e.g. stiffness 200,
    /// damping 26). Negative results are clamped to zero.
    pub fn from_origami(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness: stiffness_from_origami(stiffness),
            damping: damping_from_origami(damping),
            mass: 1.0,
        }
    }

    /// The origami default (stiffness 40, damping 7)
    pub fn origami_default() -> Self {
        Self::from_origami(40.0, 7.0)
    }

    /// A gentle, slow spring
    pub fn gentle() -> Self {
        Self::from_origami(120.0, 14.0)
    }

    /// A wobbly spring with visible overshoot
    pub fn wobbly() -> Self {
        Self::from_origami(180.0, 12.0)
    }

    /// A stiff, snappy spring
    pub fn stiff() -> Self {
        Self::from_origami(260.0, 26.0)
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::origami_default()
    }
}

fn stiffness_from_origami(value: f32) -> f32 {
    ((value - 30.0) * 3.62 + 194.0).max(0.0)
}

fn damping_from_origami(value: f32) -> f32 {
    ((value - 8.0) * 3.0 + 25.0).max(0.0)
}

/// What happened during one call to [`Spring::advance`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// The spring left rest on this step
    pub activated: bool,
    /// The spring came to rest on this step
    pub at_rest: bool,
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    start: f32,
    target: f32,
    overshoot_clamping: bool,
    rest_speed: f32,
    rest_displacement: f32,
    was_at_rest: bool,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            start: initial,
            target: initial,
            overshoot_clamping: false,
            rest_speed: DEFAULT_REST_SPEED,
            rest_displacement: DEFAULT_REST_DISPLACEMENT,
            was_at_rest: true,
        }
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Value the spring was at when its current end value was set
    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn overshoot_clamping(&self) -> bool {
        self.overshoot_clamping
    }

    pub fn set_overshoot_clamping(&mut self, enabled: bool) {
        self.overshoot_clamping = enabled;
    }

    /// Retarget the spring
    ///
    /// Returns `false` when the spring is already resting at `target`, in
    /// which case nothing changes.
    pub fn set_target(&mut self, target: f32) -> bool {
        if self.target == target && self.is_at_rest() {
            return false;
        }
        self.start = self.value;
        self.target = target;
        true
    }

    /// Jump to `value` and rest there
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
        self.start = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Returns `false` when the velocity is unchanged
    pub fn set_velocity(&mut self, velocity: f32) -> bool {
        if self.velocity == velocity {
            return false;
        }
        self.velocity = velocity;
        true
    }

    /// Check if the spring is within the rest thresholds of its end value
    pub fn is_at_rest(&self) -> bool {
        self.velocity.abs() < self.rest_speed
            && ((self.target - self.value).abs() <= self.rest_displacement
                || self.config.stiffness == 0.0)
    }

    /// Check if the spring has passed its end value on the way from its start
    pub fn is_overshooting(&self) -> bool {
        self.config.stiffness > 0.0
            && ((self.start < self.target && self.value > self.target)
                || (self.start > self.target && self.value < self.target))
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Returns `None` if the spring was already resting and stays that way.
    /// A spring that reaches rest (or overshoots while clamped) snaps to its
    /// end value with zero velocity.
    pub fn advance(&mut self, dt: f32) -> Option<StepOutcome> {
        let mut at_rest = self.is_at_rest();
        if at_rest && self.was_at_rest {
            return None;
        }

        if !at_rest {
            let dt = dt.clamp(0.0, MAX_FRAME_DELTA);
            let steps = (dt / SOLVER_STEP).ceil().max(1.0) as u32;
            let h = dt / steps as f32;
            for _ in 0..steps {
                self.step(h);
            }
        }

        if self.is_at_rest() || (self.overshoot_clamping && self.is_overshooting()) {
            self.start = self.target;
            self.value = self.target;
            self.velocity = 0.0;
            at_rest = true;
        }

        let activated = std::mem::replace(&mut self.was_at_rest, false);
        if at_rest {
            self.was_at_rest = true;
        }

        Some(StepOutcome { activated, at_rest })
    }

    /// Integrate one RK4 step without any rest handling
    pub fn step(&mut self, dt: f32) {
        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}
