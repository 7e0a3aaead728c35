//! # Input Module
//!
//! Gamepad telemetry decoding.
//!
//! This module handles:
//! - The fixed 64-byte packet layout (16 little-endian floats)
//! - Decoder variants (all-digital buttons or analog triggers)
//! - Cross pad quantization and stick range conditioning
//! - Timestamped, immutable [`InputFrame`]s

pub mod protocol;
pub mod frame;
pub mod decoder;

pub use decoder::FrameDecoder;
pub use frame::{AxisPair, Axes, InputFrame};
pub use protocol::{ButtonId, ButtonValue, DecoderVariant};
