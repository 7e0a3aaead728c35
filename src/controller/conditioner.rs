//! # Signal Conditioners
//!
//! Stateful filters over a boolean signal stream.
//!
//! A chain is built by ownership: each wrapper owns the [`Stage`] it forwards
//! to, and the innermost stage is an [`Action`]. Every stage exposes the same
//! capability, `feed(time, value) -> forwarded?`, so wrappers nest in any order.
//!
//! ```
//! use gamepad_arm_bridge::controller::action::Action;
//! use gamepad_arm_bridge::controller::conditioner::Stage;
//!
//! // The usual button chain: debounce, then fire once per press.
//! let stage = Stage::debounce(Stage::edge(Stage::action(Action::NoOp)), 50);
//! # let _ = stage;
//! ```
//!
//! Conditioners never raise errors of their own; they only pass through what
//! the action at the end of the chain returns.

use super::action::{Action, ActionContext};
use crate::error::SinkError;

/// Forwards a value only after it has been stable for a window.
///
/// A held value is re-forwarded at most once per window.
#[derive(Debug, Clone, PartialEq)]
pub struct Debounce {
    window_ms: i64,
    last_observed_time: i64,
    last_observed_value: bool,
    inner: Box<Stage>,
}

impl Debounce {
    #[must_use]
    pub fn new(inner: Stage, window_ms: u64) -> Self {
        Self {
            window_ms: i64::try_from(window_ms).unwrap_or(i64::MAX),
            last_observed_time: 0,
            last_observed_value: false,
            inner: Box::new(inner),
        }
    }

    pub fn feed(
        &mut self,
        time_ms: i64,
        value: bool,
        ctx: &mut ActionContext<'_>,
    ) -> Result<bool, SinkError> {
        if value != self.last_observed_value {
            self.last_observed_value = value;
            self.last_observed_time = time_ms;
            return Ok(false);
        }

        if time_ms.saturating_sub(self.last_observed_time) >= self.window_ms {
            // Re-arm before forwarding so a failing action still restarts the window.
            self.last_observed_time = time_ms;
            self.inner.feed(time_ms, value, ctx)?;
            return Ok(true);
        }

        Ok(false)
    }
}

/// Forwards only rising (false → true) transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeTrigger {
    last_value: bool,
    inner: Box<Stage>,
}

impl EdgeTrigger {
    #[must_use]
    pub fn new(inner: Stage) -> Self {
        Self {
            last_value: false,
            inner: Box::new(inner),
        }
    }

    pub fn feed(
        &mut self,
        time_ms: i64,
        value: bool,
        ctx: &mut ActionContext<'_>,
    ) -> Result<bool, SinkError> {
        let rising = value && !self.last_value;
        self.last_value = value;
        if rising {
            self.inner.feed(time_ms, value, ctx)?;
        }
        Ok(rising)
    }
}

/// Splits a level signal into a set edge and a reset edge.
///
/// `set` fires once when the signal becomes true, `reset` once when it
/// becomes false. Both receive `true`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    set: EdgeTrigger,
    reset: EdgeTrigger,
}

impl Gate {
    #[must_use]
    pub fn new(set: Stage, reset: Stage) -> Self {
        Self {
            set: EdgeTrigger::new(set),
            reset: EdgeTrigger::new(reset),
        }
    }

    pub fn feed(
        &mut self,
        time_ms: i64,
        is_pressed: bool,
        ctx: &mut ActionContext<'_>,
    ) -> Result<bool, SinkError> {
        let set = self.set.feed(time_ms, is_pressed, ctx)?;
        let reset = self.reset.feed(time_ms, !is_pressed, ctx)?;
        Ok(set || reset)
    }
}

/// One link of a conditioner chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Debounce(Debounce),
    Edge(EdgeTrigger),
    Gate(Gate),
    Action(Action),
}

impl Stage {
    #[must_use]
    pub fn action(action: Action) -> Self {
        Stage::Action(action)
    }

    #[must_use]
    pub fn edge(inner: Stage) -> Self {
        Stage::Edge(EdgeTrigger::new(inner))
    }

    #[must_use]
    pub fn debounce(inner: Stage, window_ms: u64) -> Self {
        Stage::Debounce(Debounce::new(inner, window_ms))
    }

    #[must_use]
    pub fn gate(set: Stage, reset: Stage) -> Self {
        Stage::Gate(Gate::new(set, reset))
    }

    /// `Debounce(EdgeTrigger(action))`, the chain every button uses.
    #[must_use]
    pub fn debounced_press(action: Action, window_ms: u64) -> Self {
        Self::debounce(Self::edge(Self::action(action)), window_ms)
    }

    /// Feed one sample. Returns whether this stage forwarded it.
    ///
    /// An action stage counts as forwarding when it ran on a `true` signal.
    ///
    /// # Errors
    ///
    /// Returns the [`SinkError`] raised by the action at the end of the chain.
    pub fn feed(
        &mut self,
        time_ms: i64,
        value: bool,
        ctx: &mut ActionContext<'_>,
    ) -> Result<bool, SinkError> {
        match self {
            Stage::Debounce(debounce) => debounce.feed(time_ms, value, ctx),
            Stage::Edge(edge) => edge.feed(time_ms, value, ctx),
            Stage::Gate(gate) => gate.feed(time_ms, value, ctx),
            Stage::Action(action) => {
                action.act(time_ms, value, ctx)?;
                Ok(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::action::MotionParameters;
    use crate::session::SessionState;
    use crate::sink::mocks::RecordingSink;
    use crate::sink::RobotCommand;

    /// Owns everything an [`ActionContext`] borrows.
    struct Harness {
        sink: RecordingSink,
        state: SessionState,
        params: MotionParameters,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                sink: RecordingSink::new(),
                state: SessionState::Armed,
                params: MotionParameters::default(),
            }
        }

        fn feed(&mut self, stage: &mut Stage, time_ms: i64, value: bool) -> bool {
            let mut ctx = ActionContext {
                sink: &mut self.sink,
                state: &mut self.state,
                params: &mut self.params,
            };
            stage.feed(time_ms, value, &mut ctx).unwrap()
        }
    }

    /// An action that leaves a trace in the sink for every invocation.
    fn marker() -> Stage {
        Stage::action(Action::MoveGripper { position: 1 })
    }

    fn marker_count(h: &Harness) -> usize {
        h.sink.count(&RobotCommand::GripperMove { position: 1, blocking: false })
    }

    #[test]
    fn test_debounce_waits_for_window() {
        let mut h = Harness::new();
        let mut stage = Stage::debounce(marker(), 50);

        assert!(!h.feed(&mut stage, 1000, true)); // first observation
        assert!(!h.feed(&mut stage, 1030, true));
        assert!(!h.feed(&mut stage, 1049, true));
        assert!(h.feed(&mut stage, 1050, true));
        assert_eq!(marker_count(&h), 1);
    }

    #[test]
    fn test_debounce_glitch_restarts_window() {
        let mut h = Harness::new();
        let mut stage = Stage::debounce(marker(), 50);

        h.feed(&mut stage, 1000, true);
        h.feed(&mut stage, 1040, false); // glitch
        h.feed(&mut stage, 1045, true);
        assert!(!h.feed(&mut stage, 1060, true));
        assert!(!h.feed(&mut stage, 1094, true));
        assert!(h.feed(&mut stage, 1095, true));
    }

    #[test]
    fn test_debounce_reasserts_held_value_once_per_window() {
        let mut h = Harness::new();
        let mut stage = Stage::debounce(marker(), 50);

        h.feed(&mut stage, 0, true);
        let forwarded: Vec<i64> = (1..=30)
            .map(|i| i * 10)
            .filter(|&t| h.feed(&mut stage, t, true))
            .collect();

        assert_eq!(forwarded, vec![50, 100, 150, 200, 250, 300]);
    }

    #[test]
    fn test_debounce_stability_property() {
        // Pseudo-random toggling, checked against the stability guarantees.
        let window = 50;
        let mut h = Harness::new();
        let mut stage = Stage::debounce(Stage::action(Action::NoOp), window as u64);

        let mut seed: u32 = 0x2545_f491;
        let mut first_seen = (0i64, false);
        let mut last_forward: Option<(i64, bool)> = None;

        for step in 0..2000i64 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let t = step * 7;
            let value = seed % 5 != 0;

            if value != first_seen.1 {
                first_seen = (t, value);
            }
            if h.feed(&mut stage, t, value) {
                assert!(t - first_seen.0 >= window, "forwarded unstable value at {}", t);
                if let Some((prev_t, prev_v)) = last_forward {
                    if prev_v == value {
                        assert!(t - prev_t >= window, "re-forwarded too early at {}", t);
                    }
                }
                last_forward = Some((t, value));
            }
        }
    }

    #[test]
    fn test_edge_trigger_fires_once_per_press() {
        let mut h = Harness::new();
        let mut stage = Stage::edge(marker());

        assert!(h.feed(&mut stage, 0, true));
        for t in 1..100 {
            assert!(!h.feed(&mut stage, t, true));
        }
        assert!(!h.feed(&mut stage, 100, false)); // falling edge never forwards
        assert!(h.feed(&mut stage, 101, true));
        assert_eq!(marker_count(&h), 2);
    }

    #[test]
    fn test_edge_trigger_ignores_initial_low() {
        let mut h = Harness::new();
        let mut stage = Stage::edge(marker());

        assert!(!h.feed(&mut stage, 0, false));
        assert!(!h.feed(&mut stage, 1, false));
        assert_eq!(marker_count(&h), 0);
    }

    #[test]
    fn test_gate_set_and_reset_exclusive() {
        let mut h = Harness::new();
        let mut stage = Stage::gate(
            Stage::action(Action::MoveGripper { position: 90 }),
            Stage::action(Action::MoveGripper { position: 0 }),
        );

        // The reset branch sees `true` on the very first low sample.
        h.feed(&mut stage, 0, false);
        h.sink.clear();

        h.feed(&mut stage, 1, true);
        assert_eq!(
            h.sink.commands(),
            &[RobotCommand::GripperMove { position: 90, blocking: false }]
        );

        h.feed(&mut stage, 2, true);
        assert_eq!(h.sink.commands().len(), 1);

        h.feed(&mut stage, 3, false);
        assert_eq!(
            h.sink.commands(),
            &[
                RobotCommand::GripperMove { position: 90, blocking: false },
                RobotCommand::GripperMove { position: 0, blocking: false },
            ]
        );
    }

    #[test]
    fn test_gate_toggle_counts() {
        let mut h = Harness::new();
        let mut stage = Stage::gate(
            Stage::action(Action::AdjustSpeed { delta: 5 }),
            Stage::action(Action::AdjustSpeed { delta: -5 }),
        );

        h.feed(&mut stage, 0, true);
        h.feed(&mut stage, 1, false);

        assert_eq!(
            h.sink.commands(),
            &[RobotCommand::SetSpeed { percent: 55 }, RobotCommand::SetSpeed { percent: 50 }]
        );
    }

    #[test]
    fn test_nesting_order_is_free() {
        let mut h = Harness::new();
        // Edge outside the debounce: the debounced re-assertions never reach the action twice.
        let mut stage = Stage::edge(Stage::debounce(marker(), 20));

        h.feed(&mut stage, 0, true);
        h.feed(&mut stage, 10, true);
        h.feed(&mut stage, 30, true);
        assert_eq!(marker_count(&h), 0);
    }

    #[test]
    fn test_action_error_propagates_through_chain() {
        let mut h = Harness::new();
        h.sink.fail_on(RobotCommand::SetSpeed { percent: 55 }, 3);
        let mut stage = Stage::debounced_press(Action::AdjustSpeed { delta: 5 }, 50);

        h.feed(&mut stage, 0, true);
        let mut ctx = ActionContext {
            sink: &mut h.sink,
            state: &mut h.state,
            params: &mut h.params,
        };
        let err = stage.feed(50, true, &mut ctx).unwrap_err();
        assert!(matches!(err, SinkError::Recoverable { code: 3 }));
    }
}
