//! # Gamepad Packet Constants and Types
//!
//! Layout of the fixed-size datagram emitted by the joystick publisher.
//!
//! ## Packet Layout
//!
//! | Float index | Content |
//! |-------------|---------|
//! | 0..6 | `left_x, left_y, right_x, right_y, cross_x, cross_y` |
//! | 6..16 | buttons `A, B, X, Y, LB, RB, LT, RT, SELECT, START` |
//!
//! Every value is a little-endian IEEE 754 `f32`.

use serde::Deserialize;

/// Number of `f32` values in one packet
pub const PACKET_FLOAT_COUNT: usize = 16;

/// Packet size in bytes (16 × 4)
pub const PACKET_SIZE: usize = PACKET_FLOAT_COUNT * 4;

/// Number of axis values at the start of the packet
pub const AXIS_COUNT: usize = 6;

/// Number of button channels following the axes
pub const BUTTON_COUNT: usize = 10;

/// Gamepad buttons in packet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    A,
    B,
    X,
    Y,
    LB,
    RB,
    LT,
    RT,
    Select,
    Start,
}

impl ButtonId {
    /// All buttons in packet order.
    pub const ALL: [ButtonId; BUTTON_COUNT] = [
        ButtonId::A,
        ButtonId::B,
        ButtonId::X,
        ButtonId::Y,
        ButtonId::LB,
        ButtonId::RB,
        ButtonId::LT,
        ButtonId::RT,
        ButtonId::Select,
        ButtonId::Start,
    ];

    /// Position of this button among the button channels.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` for the analog trigger channels.
    #[must_use]
    pub const fn is_trigger(self) -> bool {
        matches!(self, ButtonId::LT | ButtonId::RT)
    }
}

/// Decoded value of a single button channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ButtonValue {
    /// Digital button state
    Pressed(bool),
    /// Raw trigger travel in `[0, 1]`
    Analog(f32),
}

impl ButtonValue {
    /// Digital interpretation: analog channels count as pressed when nonzero.
    #[must_use]
    pub fn is_pressed(self) -> bool {
        match self {
            ButtonValue::Pressed(pressed) => pressed,
            ButtonValue::Analog(level) => level != 0.0,
        }
    }

    /// Analog interpretation: digital channels read as `0.0` or `1.0`.
    #[must_use]
    pub fn level(self) -> f32 {
        match self {
            ButtonValue::Pressed(true) => 1.0,
            ButtonValue::Pressed(false) => 0.0,
            ButtonValue::Analog(level) => level,
        }
    }
}

impl Default for ButtonValue {
    fn default() -> Self {
        ButtonValue::Pressed(false)
    }
}

/// How the button channels of a packet are interpreted.
///
/// This is fixed per deployment, never per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecoderVariant {
    /// All ten channels are digital (nonzero = pressed)
    Digital,
    /// LT/RT keep their raw analog travel, the rest are digital
    #[default]
    AnalogTriggers,
}
