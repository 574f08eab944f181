//! Springflip Engine
//!
//! Pooled spring physics for layout transitions.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//! - **Origami Parameters**: Designer-scale stiffness/damping conversion
//! - **Overshoot Clamping**: Springs can stop at their end value instead of oscillating
//! - **Lifecycle Listeners**: Activate, update and at-rest notifications per spring
//! - **Shared Pool**: One system per thread steps every active spring on a single clock

pub mod listener;
pub mod spring;
pub mod system;

pub use listener::{SpringCallback, SpringCallbacks, SpringListener};
pub use spring::{Spring, SpringConfig, StepOutcome};
pub use system::{
    is_spring_system_initialized, spring_system, try_spring_system, SpringHandle, SpringId,
    SpringState, SpringSystem, SystemHandle,
};
