//! # Gamepad Packet Decoder
//!
//! Decodes 64-byte joystick datagrams into [`InputFrame`]s.

use bytes::Buf;

use super::frame::{Axes, InputFrame};
use super::protocol::*;
use crate::error::{BridgeError, Result};

/// Decodes raw packets according to a fixed [`DecoderVariant`].
///
/// # Examples
///
/// ```
/// use gamepad_arm_bridge::input::decoder::FrameDecoder;
/// use gamepad_arm_bridge::input::protocol::{ButtonId, DecoderVariant, PACKET_SIZE};
///
/// let decoder = FrameDecoder::new(DecoderVariant::Digital);
/// let frame = decoder.decode(&[0u8; PACKET_SIZE], 1_000)?;
/// assert_eq!(frame.timestamp_ms(), 1_000);
/// assert!(!frame.is_pressed(ButtonId::Start));
/// # Ok::<(), gamepad_arm_bridge::error::BridgeError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDecoder {
    variant: DecoderVariant,
}

impl FrameDecoder {
    #[must_use]
    pub fn new(variant: DecoderVariant) -> Self {
        Self { variant }
    }

    #[must_use]
    pub fn variant(&self) -> DecoderVariant {
        self.variant
    }

    /// Decode one packet received at `timestamp_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidPacket`] if the packet is not exactly
    /// [`PACKET_SIZE`] bytes long. Callers drop such packets.
    pub fn decode(&self, packet: &[u8], timestamp_ms: i64) -> Result<InputFrame> {
        if packet.len() != PACKET_SIZE {
            return Err(BridgeError::InvalidPacket {
                expected: PACKET_SIZE,
                actual: packet.len(),
            });
        }

        let mut buf = packet;
        let mut raw = [0f32; PACKET_FLOAT_COUNT];
        for value in raw.iter_mut() {
            *value = buf.get_f32_le();
        }

        let axes = Axes {
            left_x: condition_stick(raw[0]),
            left_y: condition_stick(raw[1]),
            right_x: condition_stick(raw[2]),
            right_y: condition_stick(raw[3]),
            cross_x: quantize_cross(raw[4]),
            cross_y: quantize_cross(raw[5]),
        };

        let mut buttons = [ButtonValue::default(); BUTTON_COUNT];
        for id in ButtonId::ALL {
            let value = raw[AXIS_COUNT + id.index()];
            buttons[id.index()] = match self.variant {
                DecoderVariant::AnalogTriggers if id.is_trigger() => {
                    ButtonValue::Analog(condition_trigger(value))
                }
                _ => ButtonValue::Pressed(value != 0.0),
            };
        }

        Ok(InputFrame::new(timestamp_ms, axes, buttons))
    }
}

/// Stick values outside `[-1, 1]` are clamped; non-finite values read as centered.
fn condition_stick(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

fn condition_trigger(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Cross pad values collapse to their sign.
fn quantize_cross(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
