//! Structured, timestamped snapshot of one decoded packet.

use super::protocol::{ButtonId, ButtonValue, BUTTON_COUNT};

/// A pair of axes read together as one two-dimensional input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPair {
    /// Left stick (`left_x`, `left_y`)
    LeftStick,
    /// Right stick (`right_x`, `right_y`)
    RightStick,
    /// Cross pad (`cross_x`, `cross_y`), quantized to -1/0/1
    CrossPad,
}

/// Axis values of one frame.
///
/// Sticks are in `[-1, 1]`; cross pad values are exactly `-1.0`, `0.0` or `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Axes {
    pub left_x: f32,
    pub left_y: f32,
    pub right_x: f32,
    pub right_y: f32,
    pub cross_x: f32,
    pub cross_y: f32,
}

/// One decoded gamepad frame.
///
/// Immutable once built; the decoder produces exactly one per accepted packet.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFrame {
    timestamp_ms: i64,
    axes: Axes,
    buttons: [ButtonValue; BUTTON_COUNT],
}

impl InputFrame {
    /// Creates a frame from already-conditioned values.
    #[must_use]
    pub fn new(timestamp_ms: i64, axes: Axes, buttons: [ButtonValue; BUTTON_COUNT]) -> Self {
        Self {
            timestamp_ms,
            axes,
            buttons,
        }
    }

    /// A frame with centered axes and every button released.
    #[must_use]
    pub fn neutral(timestamp_ms: i64) -> Self {
        Self::new(timestamp_ms, Axes::default(), [ButtonValue::default(); BUTTON_COUNT])
    }

    /// Receipt time in milliseconds.
    #[must_use]
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    #[must_use]
    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    /// `(horizontal, vertical)` values of an axis pair.
    #[must_use]
    pub fn axis_pair(&self, pair: AxisPair) -> (f32, f32) {
        match pair {
            AxisPair::LeftStick => (self.axes.left_x, self.axes.left_y),
            AxisPair::RightStick => (self.axes.right_x, self.axes.right_y),
            AxisPair::CrossPad => (self.axes.cross_x, self.axes.cross_y),
        }
    }

    #[must_use]
    pub fn button(&self, id: ButtonId) -> ButtonValue {
        self.buttons[id.index()]
    }

    /// Shorthand for `self.button(id).is_pressed()`.
    #[must_use]
    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.button(id).is_pressed()
    }

    /// Copy of this frame with one button replaced. Handy for building scenarios.
    #[must_use]
    pub fn with_button(mut self, id: ButtonId, value: ButtonValue) -> Self {
        self.buttons[id.index()] = value;
        self
    }

    /// Copy of this frame with different axes.
    #[must_use]
    pub fn with_axes(mut self, axes: Axes) -> Self {
        self.axes = axes;
        self
    }
}
