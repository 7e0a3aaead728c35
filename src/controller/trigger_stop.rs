//! Dual-trigger stop: squeezing both analog triggers halts servo motion.

use super::action::ActionContext;
use crate::error::SinkError;
use crate::input::{ButtonId, InputFrame};
use crate::sink::RobotCommand;

/// Level-triggered stop on LT + RT.
///
/// Fires on every frame where both trigger levels exceed the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerStop {
    threshold: f32,
}

impl TriggerStop {
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub fn is_engaged(&self, frame: &InputFrame) -> bool {
        frame.button(ButtonId::LT).level() > self.threshold
            && frame.button(ButtonId::RT).level() > self.threshold
    }

    /// Returns whether the stop was issued.
    pub fn feed(&self, frame: &InputFrame, ctx: &mut ActionContext<'_>) -> Result<bool, SinkError> {
        if !self.is_engaged(frame) {
            return Ok(false);
        }
        ctx.sink.execute(RobotCommand::ServoEnd)?;
        ctx.sink.execute(RobotCommand::StopMotion)?;
        Ok(true)
    }
}
