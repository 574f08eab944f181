//! Flip descriptors
//!
//! A [`FlipData`] describes one element's pending transition: the spring to
//! run, whether there is anything to animate at all, and the callbacks that
//! apply the animated value and report progress.

use crate::controls::SpringControls;
use crate::lifecycle::FlipCallback;
use crate::presets::FlipSpringConfig;
use springflip_engine::Spring;

/// Per-step callback; reads the live spring and applies its value
pub type OnUpdate = Box<dyn FnMut(&Spring)>;

/// Builds a descriptor's per-step callback from its spring controls
///
/// Called once, when the descriptor's spring is created.
pub type OnUpdateFactory = Box<dyn FnOnce(SpringControls) -> OnUpdate>;

/// Ordered group of descriptors; order is cascade order
pub type FlipDataArray = Vec<FlipData>;

/// One element's pending animation
///
/// ```ignore
/// let flip = FlipData::new(SpringPreset::Gentle, |_controls| {
///     Box::new(move |spring| element.set_progress(spring.value()))
/// })
/// .on_spring_activate(|| element.show())
/// .on_animation_end(|| element.clear_transform());
/// ```
pub struct FlipData {
    /// Spring parameters; `None` on no-op descriptors
    pub spring_config: Option<FlipSpringConfig>,
    /// Nothing moved, so no spring is needed
    pub no_op: bool,
    pub on_spring_activate: FlipCallback,
    pub get_on_update_func: OnUpdateFactory,
    pub on_animation_end: FlipCallback,
}

impl FlipData {
    /// Create a descriptor animated by a spring
    pub fn new<C, F>(spring_config: C, get_on_update_func: F) -> Self
    where
        C: Into<FlipSpringConfig>,
        F: FnOnce(SpringControls) -> OnUpdate + 'static,
    {
        Self {
            spring_config: Some(spring_config.into()),
            no_op: false,
            on_spring_activate: Box::new(|| {}),
            get_on_update_func: Box::new(get_on_update_func),
            on_animation_end: Box::new(|| {}),
        }
    }

    /// Create a descriptor with nothing to animate
    pub fn no_op() -> Self {
        Self {
            spring_config: None,
            no_op: true,
            on_spring_activate: Box::new(|| {}),
            get_on_update_func: ignore_updates(),
            on_animation_end: Box::new(|| {}),
        }
    }

    pub fn on_spring_activate<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.on_spring_activate = Box::new(f);
        self
    }

    pub fn on_animation_end<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.on_animation_end = Box::new(f);
        self
    }

    /// Replace the update factory with one built around the current one
    pub fn map_on_update<F>(mut self, f: F) -> Self
    where
        F: FnOnce(OnUpdateFactory) -> OnUpdateFactory,
    {
        let current = std::mem::replace(&mut self.get_on_update_func, ignore_updates());
        self.get_on_update_func = f(current);
        self
    }
}

fn ignore_updates() -> OnUpdateFactory {
    Box::new(|_| Box::new(|_: &Spring| {}))
}

impl std::fmt::Debug for FlipData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlipData")
            .field("spring_config", &self.spring_config)
            .field("no_op", &self.no_op)
            .finish_non_exhaustive()
    }
}
