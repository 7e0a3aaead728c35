//! # Session Module
//!
//! Per-frame safety state machine.
//!
//! ## States
//!
//! - **Disarmed** (initial): only START and SELECT are fed.
//! - **Armed**: START succeeded; every profile binding, axis control and the
//!   trigger stop are fed.
//! - **Faulted**: the robot reported a recoverable error; motion stays
//!   suppressed until the next START or SELECT edge clears it.
//!
//! ## Cycle
//!
//! 1. Drop reordered frames and clock anomalies without feeding anything.
//! 2. A gap above the watchdog timeout stops motion, clears robot errors and
//!    forces `Disarmed`, then the cycle continues with this frame.
//! 3. START and SELECT are fed unconditionally.
//! 4. Profile inputs are fed only while `Armed`.
//!
//! A [`SinkError::Recoverable`] anywhere in steps 2–4 ends the cycle early and
//! moves the session to `Faulted`. Any other error triggers a best-effort
//! stop and is returned to the caller.

use tracing::{debug, error, info, warn};

use crate::controller::action::{Action, ActionContext, MotionParameters};
use crate::controller::conditioner::Stage;
use crate::controller::profile::ControlLayout;
use crate::error::{BridgeError, Result, SinkError};
use crate::input::{ButtonId, InputFrame};
use crate::sink::{RobotCommand, RobotCommandSink};

pub mod clock;

pub use clock::{FrameClock, FrameVerdict};

/// Session-level safety state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disarmed,
    Armed,
    Faulted,
}

impl SessionState {
    /// Motion and gripper commands may be dispatched.
    #[must_use]
    pub fn is_armed(self) -> bool {
        self == SessionState::Armed
    }
}

/// Why a frame was not dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Reordered,
    ClockAnomaly,
}

/// Result of feeding one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Dropped(DropReason),
    Processed {
        period_ms: i64,
        /// The watchdog reset ran before dispatch
        watchdog_reset: bool,
        /// Code of the recoverable fault that ended the cycle, if any
        fault: Option<i32>,
        state: SessionState,
    },
}

/// Timing knobs of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub debounce_ms: u64,
    pub watchdog_timeout_ms: i64,
    pub reorder_tolerance_ms: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            watchdog_timeout_ms: clock::DEFAULT_WATCHDOG_TIMEOUT_MS,
            reorder_tolerance_ms: clock::DEFAULT_REORDER_TOLERANCE_MS,
        }
    }
}

/// Owns every conditioner, the shared motion parameters and the sink.
///
/// Not thread-safe; drive it from a single worker.
pub struct SessionStateMachine<S: RobotCommandSink> {
    sink: S,
    state: SessionState,
    params: MotionParameters,
    clock: FrameClock,
    start: Stage,
    select: Stage,
    layout: ControlLayout,
}

impl<S: RobotCommandSink> SessionStateMachine<S> {
    pub fn new(
        sink: S,
        settings: SessionSettings,
        layout: ControlLayout,
        params: MotionParameters,
    ) -> Self {
        Self {
            sink,
            state: SessionState::Disarmed,
            params,
            clock: FrameClock::new(settings.watchdog_timeout_ms, settings.reorder_tolerance_ms),
            start: Stage::debounced_press(Action::Arm, settings.debounce_ms),
            select: Stage::debounced_press(Action::Disarm, settings.debounce_ms),
            layout,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn params(&self) -> &MotionParameters {
        &self.params
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run one cycle for `frame`.
    ///
    /// # Errors
    ///
    /// Returns the first non-recoverable [`SinkError`], after attempting to
    /// stop the arm. The session should not be fed again afterwards.
    pub fn process_frame(&mut self, frame: &InputFrame) -> Result<CycleOutcome> {
        let (period_ms, stalled) = match self.clock.observe(frame.timestamp_ms()) {
            FrameVerdict::Accepted { period_ms } => (period_ms, false),
            FrameVerdict::Stalled { period_ms } => (period_ms, true),
            FrameVerdict::Reordered { behind_ms } => {
                debug!(behind_ms, "Dropping reordered frame");
                return Ok(CycleOutcome::Dropped(DropReason::Reordered));
            }
            FrameVerdict::ClockAnomaly { period_ms } => {
                debug!(period_ms, "Dropping frame with negative period");
                return Ok(CycleOutcome::Dropped(DropReason::ClockAnomaly));
            }
        };

        let before = self.state;
        let mut fault = None;

        if stalled {
            warn!(period_ms, "Input stalled, forcing disarm");
            let result = self.watchdog_reset();
            fault = self.contain(result)?;
        }

        let result = self.dispatch(frame, period_ms);
        if let Some(code) = self.contain(result)? {
            fault = Some(code);
        }

        if self.state != before {
            info!(from = ?before, to = ?self.state, "Session state changed");
        }

        Ok(CycleOutcome::Processed {
            period_ms,
            watchdog_reset: stalled,
            fault,
            state: self.state,
        })
    }

    /// Best-effort halt for a worker that is about to stop.
    ///
    /// Ends servo mode and stops motion if the session is armed, then disarms.
    /// Sink errors are logged, not returned.
    pub fn shutdown(&mut self) {
        if self.state.is_armed() {
            for command in [RobotCommand::ServoEnd, RobotCommand::StopMotion] {
                if let Err(e) = self.sink.execute(command) {
                    warn!("Shutdown command failed: {}", e);
                }
            }
        }
        self.state = SessionState::Disarmed;
    }

    fn watchdog_reset(&mut self) -> std::result::Result<(), SinkError> {
        self.state = SessionState::Disarmed;
        self.sink.execute(RobotCommand::StopMotion)?;
        self.sink.execute(RobotCommand::ClearError)
    }

    fn dispatch(
        &mut self,
        frame: &InputFrame,
        period_ms: i64,
    ) -> std::result::Result<(), SinkError> {
        let time_ms = frame.timestamp_ms();
        let mut ctx = ActionContext {
            sink: &mut self.sink,
            state: &mut self.state,
            params: &mut self.params,
        };

        self.start.feed(time_ms, frame.is_pressed(ButtonId::Start), &mut ctx)?;
        self.select.feed(time_ms, frame.is_pressed(ButtonId::Select), &mut ctx)?;

        if !ctx.state.is_armed() {
            return Ok(());
        }

        for binding in &mut self.layout.buttons {
            binding.feed(frame, &mut ctx)?;
        }
        for control in &self.layout.axes {
            control.feed(frame, period_ms, &mut ctx)?;
        }
        if let Some(stop) = &self.layout.trigger_stop {
            if stop.feed(frame, &mut ctx)? {
                debug!("Trigger stop engaged");
            }
        }
        Ok(())
    }

    /// Contain recoverable faults; stop the arm and escalate everything else.
    fn contain(&mut self, result: std::result::Result<(), SinkError>) -> Result<Option<i32>> {
        match result {
            Ok(()) => Ok(None),
            Err(SinkError::Recoverable { code }) => {
                warn!(code, "Robot reported a recoverable error, suppressing motion");
                self.state = SessionState::Faulted;
                Ok(Some(code))
            }
            Err(err) => {
                error!("Fatal robot command error: {}", err);
                if let Err(stop_err) = self.sink.execute(RobotCommand::StopMotion) {
                    error!("Emergency stop failed: {}", stop_err);
                }
                Err(BridgeError::Sink(err))
            }
        }
    }
}
