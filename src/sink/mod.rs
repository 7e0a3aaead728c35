//! # Robot Command Sink
//!
//! Boundary to the vendor command executor.
//!
//! The pipeline never talks to the arm directly. It decides *when* and *with
//! what parameters* a command is issued and hands a [`RobotCommand`] to a
//! [`RobotCommandSink`]. Kinematics, interlocks and the actual RPC belong to
//! the executor behind the sink.

use serde::Serialize;

use crate::error::SinkError;

pub mod jsonl;

pub use jsonl::JsonLinesSink;

/// Upper bound of every percentage parameter.
pub const PERCENT_MAX: u8 = 100;

/// Clamp an accumulated percentage into `[0, 100]`.
///
/// # Examples
///
/// ```
/// use gamepad_arm_bridge::sink::clamp_percent;
///
/// assert_eq!(clamp_percent(-5), 0);
/// assert_eq!(clamp_percent(55), 55);
/// assert_eq!(clamp_percent(105), 100);
/// ```
#[must_use]
pub fn clamp_percent(value: i32) -> u8 {
    // Bounded by the clamp, the cast cannot truncate.
    value.clamp(0, i32::from(PERCENT_MAX)) as u8
}

/// Arm operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotMode {
    Auto,
    Manual,
}

/// One command for the executor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RobotCommand {
    /// Reset all resettable robot errors
    ClearError,
    /// Power the arm on or off
    Enable { enabled: bool },
    SetMode { mode: RobotMode },
    /// Enter servo mode
    ServoStart,
    /// Leave servo mode
    ServoEnd,
    /// Abort any motion in progress
    StopMotion,
    /// Global velocity percentage
    SetSpeed { percent: u8 },
    /// Incremental cartesian servo step
    ServoCart {
        mode: u8,
        delta: [f64; 6],
        cmd_time_s: f64,
        velocity: u8,
    },
    GripperActivate,
    GripperReset,
    GripperMove { position: u8, blocking: bool },
    GripperSetSpeed { percent: u8 },
    GripperSetForce { percent: u8 },
}

/// Executes robot commands.
///
/// Implementations may block on the underlying command channel. Returning
/// [`SinkError::Recoverable`] signals a resettable robot error; any other
/// error is treated as fatal by the session.
#[cfg_attr(test, mockall::automock)]
pub trait RobotCommandSink {
    fn execute(&mut self, command: RobotCommand) -> Result<(), SinkError>;
}

impl<T: RobotCommandSink + ?Sized> RobotCommandSink for Box<T> {
    fn execute(&mut self, command: RobotCommand) -> Result<(), SinkError> {
        (**self).execute(command)
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;

    /// Sink that records every command and fails on scripted commands.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        commands: Vec<RobotCommand>,
        faults: Vec<(RobotCommand, i32)>,
        fatal: Option<RobotCommand>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// The next execution of `command` reports recoverable fault `code`.
        pub fn fail_on(&mut self, command: RobotCommand, code: i32) {
            self.faults.push((command, code));
        }

        /// Every execution of `command` is rejected (fatal).
        pub fn reject(&mut self, command: RobotCommand) {
            self.fatal = Some(command);
        }

        pub fn commands(&self) -> &[RobotCommand] {
            &self.commands
        }

        pub fn clear(&mut self) {
            self.commands.clear();
        }

        pub fn count(&self, command: &RobotCommand) -> usize {
            self.commands.iter().filter(|c| *c == command).count()
        }
    }

    impl RobotCommandSink for RecordingSink {
        fn execute(&mut self, command: RobotCommand) -> Result<(), SinkError> {
            self.commands.push(command.clone());
            if self.fatal.as_ref() == Some(&command) {
                return Err(SinkError::Rejected(format!("{:?}", command)));
            }
            if let Some(pos) = self.faults.iter().position(|(c, _)| *c == command) {
                let (_, code) = self.faults.remove(pos);
                return Err(SinkError::Recoverable { code });
            }
            Ok(())
        }
    }
}
