//! # Control Profiles
//!
//! Button and axis layouts gated behind the armed session.
//!
//! ## `servo` profile (pairs with analog triggers)
//!
//! | Input | Function |
//! |-------|----------|
//! | X / Y | Speed −step / +step |
//! | LB / RB | Gripper to open / close position |
//! | Left stick | DOF 0 (horizontal), DOF 1 (vertical) |
//! | Right stick | DOF 2 (horizontal), DOF 5 (vertical) |
//! | Cross pad | DOF 4 (horizontal), DOF 3 (vertical) |
//! | LT + RT | Servo end and stop motion |
//!
//! ## `gripper` profile (pairs with all-digital buttons)
//!
//! | Input | Function |
//! |-------|----------|
//! | Cross Y = 1 / −1 | Speed −step / +step |
//! | Cross X = 1 / −1 | Gripper speed −step / +step |
//! | LB / RB | Gripper force −step / +step |
//! | X / Y | Gripper to open / close position |
//!
//! START and SELECT are owned by the session and are not part of a profile.

use serde::Deserialize;

use super::action::Action;
use super::binding::{ButtonBinding, Signal};
use super::conditioner::Stage;
use super::motion::{AxisControl, MotionMapper};
use super::trigger_stop::TriggerStop;
use crate::input::{AxisPair, ButtonId};

/// Which layout the session drives while armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Continuous servo motion from the sticks
    #[default]
    Servo,
    /// Discrete gripper and speed tuning, no stick motion
    Gripper,
}

impl Profile {
    /// Gripper close position used when the configuration leaves it unset.
    #[must_use]
    pub fn default_close_position(self) -> u8 {
        match self {
            Profile::Servo => 90,
            Profile::Gripper => 80,
        }
    }
}

/// Numeric knobs of a layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    pub debounce_ms: u64,
    pub speed_step: i32,
    pub servo_mode: u8,
    pub stick_gain: f64,
    pub gripper_step: i32,
    pub open_position: u8,
    pub close_position: u8,
    pub stop_trigger_threshold: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            speed_step: 5,
            servo_mode: 2,
            stick_gain: 0.5,
            gripper_step: 5,
            open_position: 0,
            close_position: 90,
            stop_trigger_threshold: 0.7,
        }
    }
}

/// Everything fed while the session is armed, in feed order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControlLayout {
    pub buttons: Vec<ButtonBinding>,
    pub axes: Vec<AxisControl>,
    pub trigger_stop: Option<TriggerStop>,
}

impl ControlLayout {
    #[must_use]
    pub fn build(profile: Profile, settings: &LayoutSettings) -> Self {
        match profile {
            Profile::Servo => Self::servo(settings),
            Profile::Gripper => Self::gripper(settings),
        }
    }

    fn servo(s: &LayoutSettings) -> Self {
        let bind = |signal, action| {
            ButtonBinding::new(signal, Stage::debounced_press(action, s.debounce_ms))
        };
        let buttons = vec![
            bind(
                Signal::Button(ButtonId::X),
                Action::AdjustSpeed { delta: -s.speed_step },
            ),
            bind(
                Signal::Button(ButtonId::Y),
                Action::AdjustSpeed { delta: s.speed_step },
            ),
            bind(
                Signal::Button(ButtonId::LB),
                Action::MoveGripper { position: s.open_position },
            ),
            bind(
                Signal::Button(ButtonId::RB),
                Action::MoveGripper { position: s.close_position },
            ),
        ];

        let axis = |pair, horizontal, vertical| {
            let mapper = MotionMapper::single_axes(horizontal, vertical, s.stick_gain);
            AxisControl::new(pair, s.servo_mode, mapper)
        };
        let axes = vec![
            axis(AxisPair::LeftStick, 0, 1),
            axis(AxisPair::RightStick, 2, 5),
            axis(AxisPair::CrossPad, 4, 3),
        ];

        Self {
            buttons,
            axes,
            trigger_stop: Some(TriggerStop::new(s.stop_trigger_threshold)),
        }
    }

    fn gripper(s: &LayoutSettings) -> Self {
        let bind = |signal, action| {
            ButtonBinding::new(signal, Stage::debounced_press(action, s.debounce_ms))
        };
        let speed = |delta| Action::AdjustSpeed { delta };
        let gripper_speed = |delta| Action::AdjustGripperSpeed { delta };
        let force = |delta| Action::AdjustGripperForce { delta };
        let buttons = vec![
            bind(Signal::CrossY(1), speed(-s.speed_step)),
            bind(Signal::CrossY(-1), speed(s.speed_step)),
            bind(Signal::CrossX(1), gripper_speed(-s.gripper_step)),
            bind(Signal::CrossX(-1), gripper_speed(s.gripper_step)),
            bind(Signal::Button(ButtonId::LB), force(-s.gripper_step)),
            bind(Signal::Button(ButtonId::RB), force(s.gripper_step)),
            bind(
                Signal::Button(ButtonId::X),
                Action::MoveGripper { position: s.open_position },
            ),
            bind(
                Signal::Button(ButtonId::Y),
                Action::MoveGripper { position: s.close_position },
            ),
        ];

        Self {
            buttons,
            axes: Vec::new(),
            trigger_stop: None,
        }
    }
}
