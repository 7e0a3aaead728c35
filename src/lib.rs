//! # Gamepad Arm Bridge Library
//!
//! Drive a robotic manipulator in servo mode from a gamepad telemetry stream.
//!
//! This library provides the core functionality for turning fixed-size
//! joystick datagrams into debounced, safety-gated robot commands:
//!
//! - [`input`]: packet decoding into timestamped frames
//! - [`controller`]: conditioners, actions, motion mapping and profiles
//! - [`session`]: the Disarmed / Armed / Faulted state machine and watchdog
//! - [`sink`]: the command boundary and a JSON-lines implementation
//! - [`transport`] and [`bridge`]: UDP reception and the worker loop

pub mod bridge;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod session;
pub mod sink;
pub mod transport;
