//! # Controller Module
//!
//! Input conditioning and control dispatch.
//!
//! This module handles:
//! - Debounce, edge-trigger and gate conditioners over button signals
//! - Actions that turn conditioned presses into robot commands
//! - Mapping stick pairs to 6-DOF servo increments
//! - The dual-trigger stop
//! - Profiles binding all of the above to gamepad inputs

pub mod action;
pub mod conditioner;
pub mod motion;
pub mod trigger_stop;
pub mod binding;
pub mod profile;

pub use action::{Action, ActionContext, MotionParameters};
pub use conditioner::{Debounce, EdgeTrigger, Gate, Stage};
pub use motion::{AxisControl, MotionMapper};
pub use profile::{ControlLayout, LayoutSettings, Profile};
