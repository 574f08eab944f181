//! Stagger groups
//!
//! Collects the descriptors produced by one layout change, grouped by stagger
//! key, and starts them all at once. Descriptors without a key animate on
//! their own; each keyed group runs as one cascade using the stagger
//! configuration registered for its key.

use crate::data::{FlipData, FlipDataArray};
use crate::driver::FlipAnimator;
use crate::settings::{FlipSettings, DEFAULT_STAGGER_KEY};
use crate::stagger::CascadeChain;
use indexmap::IndexMap;
use springflip_engine::SpringHandle;

/// Springs started by [`StaggerGroups::start`]
#[derive(Debug, Default)]
pub struct StartedFlips {
    /// Springs of descriptors without a stagger key, in insertion order
    pub individual: Vec<SpringHandle>,
    /// One cascade per stagger key, in the order keys were first seen
    pub cascades: IndexMap<String, CascadeChain>,
}

/// Pending descriptors for one layout change
#[derive(Debug, Default)]
pub struct StaggerGroups {
    individual: FlipDataArray,
    groups: IndexMap<String, FlipDataArray>,
}

impl StaggerGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor that animates on its own
    pub fn push(&mut self, flip: FlipData) {
        self.individual.push(flip);
    }

    /// Add a descriptor to the cascade for `key`
    pub fn push_staggered(&mut self, key: impl Into<String>, flip: FlipData) {
        self.groups.entry(key.into()).or_default().push(flip);
    }

    /// Add a descriptor to the default cascade
    pub fn push_default_staggered(&mut self, flip: FlipData) {
        self.push_staggered(DEFAULT_STAGGER_KEY, flip);
    }

    pub fn len(&self) -> usize {
        self.individual.len() + self.groups.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start every pending descriptor
    pub fn start(
        self,
        animator: &FlipAnimator,
        settings: &FlipSettings,
        is_gesture_controlled: bool,
    ) -> StartedFlips {
        tracing::debug!(
            individual = self.individual.len(),
            groups = self.groups.len(),
            is_gesture_controlled,
            "starting flips"
        );

        let individual = self
            .individual
            .into_iter()
            .map(|flip| with_default_spring(flip, settings))
            .filter_map(|flip| animator.create_spring(flip, is_gesture_controlled))
            .collect();

        let cascades = self
            .groups
            .into_iter()
            .map(|(key, group)| {
                let config = settings.stagger(&key);
                let group = group
                    .into_iter()
                    .map(|flip| with_default_spring(flip, settings))
                    .collect();
                let chain = animator.staggered_springs(group, &config, is_gesture_controlled);
                (key, chain)
            })
            .collect();

        StartedFlips {
            individual,
            cascades,
        }
    }
}

/// Give a descriptor without its own spring the settings' default spring
fn with_default_spring(mut flip: FlipData, settings: &FlipSettings) -> FlipData {
    if !flip.no_op && flip.spring_config.is_none() {
        flip.spring_config = Some(settings.spring_config());
    }
    flip
}
