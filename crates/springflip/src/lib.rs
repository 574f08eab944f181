//! Springflip
//!
//! Spring-driven FLIP transitions: elements are measured before and after a
//! layout change and a spring animates each visual delta back to zero. This
//! crate decides when each spring starts, how groups cascade, and when
//! springs are released back to the pool.
//!
//! # Features
//!
//! - **Suspended Springs**: One idle spring per descriptor with lifecycle-correct listeners
//! - **Autonomous or Gesture-driven**: Springs run to rest on their own or follow live input
//! - **Staggered Cascades**: Each spring pulls the next one along once it passes a threshold
//! - **Exactly-once Callbacks**: Activation and completion fire once on every path
//! - **Settings**: Spring presets and named stagger configurations from TOML

pub mod controls;
pub mod data;
pub mod driver;
pub mod error;
pub mod groups;
pub mod lifecycle;
pub mod presets;
pub mod settings;
pub mod stagger;
pub mod suspended;

pub use controls::SpringControls;
pub use data::{FlipData, FlipDataArray, OnUpdate, OnUpdateFactory};
pub use driver::FlipAnimator;
pub use error::{FlipError, Result};
pub use groups::{StaggerGroups, StartedFlips};
pub use lifecycle::{FlipCallback, FlipLifecycle, FlipPhase};
pub use presets::{FlipSpringConfig, SpringPreset};
pub use settings::{FlipSettings, SpringSetting, DEFAULT_STAGGER_KEY};
pub use stagger::{
    next_threshold, CascadeChain, CascadeDirection, DirectionFlag, StaggerConfig,
    DEFAULT_STAGGER_SPEED,
};
pub use suspended::{create_suspended_spring, SuspendedFlip};

pub use springflip_engine::{
    spring_system, Spring, SpringHandle, SpringState, SpringSystem, SystemHandle,
};
