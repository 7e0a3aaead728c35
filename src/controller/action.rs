//! # Actions
//!
//! Terminal stage of every conditioner chain.
//!
//! An action receives the conditioned signal and, when the signal is `true`,
//! issues commands through the [`ActionContext`]. A `false` signal is ignored
//! by every variant, so a [`Gate`](super::conditioner::Gate) reset edge is
//! delivered as `true` on the reset branch.

use tracing::info;

use crate::error::SinkError;
use crate::session::SessionState;
use crate::sink::{clamp_percent, RobotCommand, RobotCommandSink, RobotMode};

/// Tunable parameters shared by several actions.
///
/// Owned once by the session and lent to actions through [`ActionContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionParameters {
    /// Global velocity percentage, also sent with every servo step
    pub velocity: u8,
    /// Gripper speed percentage
    pub gripper_speed: u8,
    /// Gripper force percentage
    pub gripper_force: u8,
}

impl Default for MotionParameters {
    fn default() -> Self {
        Self {
            velocity: 50,
            gripper_speed: 40,
            gripper_force: 50,
        }
    }
}

/// Everything an action may touch while it runs.
pub struct ActionContext<'a> {
    pub sink: &'a mut dyn RobotCommandSink,
    pub state: &'a mut SessionState,
    pub params: &'a mut MotionParameters,
}

impl ActionContext<'_> {
    fn issue(&mut self, command: RobotCommand) -> Result<(), SinkError> {
        self.sink.execute(command)
    }
}

/// Operations bound to a conditioned button signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Does nothing
    NoOp,
    /// Clear faults, power up and enter servo mode (START)
    Arm,
    /// Leave servo mode, stop and power down (SELECT)
    Disarm,
    /// Add `delta` to the global velocity
    AdjustSpeed { delta: i32 },
    /// Add `delta` to the gripper speed
    AdjustGripperSpeed { delta: i32 },
    /// Add `delta` to the gripper force
    AdjustGripperForce { delta: i32 },
    /// Non-blocking gripper move to `position` percent
    MoveGripper { position: u8 },
}

impl Action {
    /// Run the action for a signal value observed at `time_ms`.
    ///
    /// # Errors
    ///
    /// Propagates the first [`SinkError`] returned by the sink; commands after
    /// the failing one are not issued.
    pub fn act(
        &self,
        _time_ms: i64,
        value: bool,
        ctx: &mut ActionContext<'_>,
    ) -> Result<(), SinkError> {
        if !value {
            return Ok(());
        }

        match *self {
            Action::NoOp => Ok(()),
            Action::Arm => {
                ctx.issue(RobotCommand::ClearError)?;
                *ctx.state = SessionState::Armed;
                ctx.issue(RobotCommand::Enable { enabled: true })?;
                ctx.issue(RobotCommand::SetMode { mode: RobotMode::Auto })?;
                ctx.issue(RobotCommand::ServoStart)?;
                ctx.issue(RobotCommand::GripperActivate)
            }
            Action::Disarm => {
                ctx.issue(RobotCommand::ServoEnd)?;
                ctx.issue(RobotCommand::StopMotion)?;
                ctx.issue(RobotCommand::ClearError)?;
                *ctx.state = SessionState::Disarmed;
                ctx.issue(RobotCommand::GripperReset)?;
                ctx.issue(RobotCommand::Enable { enabled: false })
            }
            Action::AdjustSpeed { delta } => {
                let percent = clamp_percent(i32::from(ctx.params.velocity) + delta);
                ctx.params.velocity = percent;
                info!(percent, "Speed changed");
                ctx.issue(RobotCommand::SetSpeed { percent })
            }
            Action::AdjustGripperSpeed { delta } => {
                let percent = clamp_percent(i32::from(ctx.params.gripper_speed) + delta);
                ctx.params.gripper_speed = percent;
                info!(percent, "Gripper speed changed");
                ctx.issue(RobotCommand::GripperSetSpeed { percent })
            }
            Action::AdjustGripperForce { delta } => {
                let percent = clamp_percent(i32::from(ctx.params.gripper_force) + delta);
                ctx.params.gripper_force = percent;
                info!(percent, "Gripper force changed");
                ctx.issue(RobotCommand::GripperSetForce { percent })
            }
            Action::MoveGripper { position } => {
                info!(position, "Gripper position changed");
                ctx.issue(RobotCommand::GripperMove {
                    position,
                    blocking: false,
                })
            }
        }
    }
}
