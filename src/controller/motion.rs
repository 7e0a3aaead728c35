//! # Motion Mapper
//!
//! Maps a pair of continuous axes to a 6-DOF servo increment.
//!
//! The output vector is `v[i] = horizontal * delta_h[i] + vertical * delta_v[i]`.
//! Each [`AxisControl`] pairs one mapper with one [`AxisPair`] and issues a
//! servo-cart step per frame, with the command time set to the frame period
//! in seconds.

use super::action::ActionContext;
use crate::error::SinkError;
use crate::input::{AxisPair, InputFrame};
use crate::sink::RobotCommand;

/// Number of degrees of freedom in a servo increment.
pub const DOF: usize = 6;

/// A 6-DOF command vector (x, y, z, rx, ry, rz).
pub type MotionVector = [f64; DOF];

/// Stateless linear map from `(horizontal, vertical)` to a [`MotionVector`].
///
/// # Examples
///
/// ```
/// use gamepad_arm_bridge::controller::motion::MotionMapper;
///
/// let mapper = MotionMapper::new([0.5, 0.0, 0.0, 0.0, 0.0, 0.0], [0.0, 0.5, 0.0, 0.0, 0.0, 0.0]);
/// assert_eq!(mapper.map(1.0, -1.0), [0.5, -0.5, 0.0, 0.0, 0.0, 0.0]);
/// assert_eq!(mapper.map(0.0, 0.0), [0.0; 6]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionMapper {
    delta_h: MotionVector,
    delta_v: MotionVector,
}

impl MotionMapper {
    #[must_use]
    pub const fn new(delta_h: MotionVector, delta_v: MotionVector) -> Self {
        Self { delta_h, delta_v }
    }

    /// Mapper driving a single DOF from each axis with the same `gain`.
    ///
    /// # Panics
    ///
    /// Panics if either index is `>= DOF`.
    #[must_use]
    pub fn single_axes(horizontal_dof: usize, vertical_dof: usize, gain: f64) -> Self {
        let mut delta_h = [0.0; DOF];
        let mut delta_v = [0.0; DOF];
        delta_h[horizontal_dof] = gain;
        delta_v[vertical_dof] = gain;
        Self::new(delta_h, delta_v)
    }

    #[must_use]
    pub fn map(&self, horizontal: f64, vertical: f64) -> MotionVector {
        let mut out = [0.0; DOF];
        for (i, value) in out.iter_mut().enumerate() {
            *value = horizontal * self.delta_h[i] + vertical * self.delta_v[i];
        }
        out
    }
}

/// Servo-mode motion driven by one axis pair.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisControl {
    pair: AxisPair,
    servo_mode: u8,
    mapper: MotionMapper,
}

impl AxisControl {
    #[must_use]
    pub fn new(pair: AxisPair, servo_mode: u8, mapper: MotionMapper) -> Self {
        Self {
            pair,
            servo_mode,
            mapper,
        }
    }

    #[must_use]
    pub fn pair(&self) -> AxisPair {
        self.pair
    }

    #[must_use]
    pub fn mapper(&self) -> &MotionMapper {
        &self.mapper
    }

    /// Issue one servo step for `frame`, `period_ms` after the previous frame.
    pub fn feed(
        &self,
        frame: &InputFrame,
        period_ms: i64,
        ctx: &mut ActionContext<'_>,
    ) -> Result<(), SinkError> {
        let (horizontal, vertical) = frame.axis_pair(self.pair);
        let delta = self.mapper.map(f64::from(horizontal), f64::from(vertical));

        ctx.sink.execute(RobotCommand::ServoCart {
            mode: self.servo_mode,
            delta,
            cmd_time_s: period_ms as f64 / 1000.0,
            velocity: ctx.params.velocity,
        })
    }
}
