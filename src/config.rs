//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field is optional; missing values take the defaults
//! below.
//!
//! ```toml
//! [transport]
//! bind_address = "127.0.0.1"
//! port = 25656
//! max_datagram = 256
//!
//! [input]
//! decoder = "analog_triggers"   # or "digital"
//!
//! [session]
//! profile = "servo"             # or "gripper"
//! debounce_ms = 50
//! watchdog_timeout_ms = 100
//! reorder_tolerance_ms = 2
//!
//! [motion]
//! initial_speed = 50
//! speed_step = 5
//! servo_mode = 2
//! stick_gain = 0.5
//!
//! [gripper]
//! speed = 40
//! force = 50
//! open_position = 0
//! # close_position = 90        # defaults to 90 (servo) or 80 (gripper)
//! step = 5
//! stop_trigger_threshold = 0.7
//!
//! [output]
//! path = ""                     # empty writes commands to stdout
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::controller::{LayoutSettings, MotionParameters, Profile};
use crate::error::{BridgeError, Result};
use crate::input::protocol::PACKET_SIZE;
use crate::input::DecoderVariant;
use crate::session::SessionSettings;

/// Largest payload a UDP datagram can carry over IPv4
const MAX_UDP_PAYLOAD: usize = 65_507;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub gripper: GripperConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// UDP listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TransportConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_datagram")]
    pub max_datagram: usize,
}

/// Packet decoding configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct InputConfig {
    #[serde(default)]
    pub decoder: DecoderVariant,
}

/// Session timing and profile selection
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default)]
    pub profile: Profile,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_watchdog_timeout_ms")]
    pub watchdog_timeout_ms: u64,

    #[serde(default = "default_reorder_tolerance_ms")]
    pub reorder_tolerance_ms: u64,
}

/// Servo motion configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MotionConfig {
    #[serde(default = "default_initial_speed")]
    pub initial_speed: u8,

    #[serde(default = "default_speed_step")]
    pub speed_step: i32,

    #[serde(default = "default_servo_mode")]
    pub servo_mode: u8,

    #[serde(default = "default_stick_gain")]
    pub stick_gain: f64,
}

/// Gripper and trigger stop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct GripperConfig {
    #[serde(default = "default_gripper_speed")]
    pub speed: u8,

    #[serde(default = "default_gripper_force")]
    pub force: u8,

    #[serde(default)]
    pub open_position: u8,

    /// Unset means the profile's own close position
    #[serde(default)]
    pub close_position: Option<u8>,

    #[serde(default = "default_gripper_step")]
    pub step: i32,

    #[serde(default = "default_stop_trigger_threshold")]
    pub stop_trigger_threshold: f32,
}

/// Command output configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct OutputConfig {
    /// JSON-lines file; empty writes to stdout
    #[serde(default)]
    pub path: String,
}

// Default value functions
fn default_bind_address() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { crate::transport::DEFAULT_PORT }
fn default_max_datagram() -> usize { crate::bridge::DEFAULT_MAX_DATAGRAM }

fn default_debounce_ms() -> u64 { 50 }
fn default_watchdog_timeout_ms() -> u64 { 100 }
fn default_reorder_tolerance_ms() -> u64 { 2 }

fn default_initial_speed() -> u8 { 50 }
fn default_speed_step() -> i32 { 5 }
fn default_servo_mode() -> u8 { 2 }
fn default_stick_gain() -> f64 { 0.5 }

fn default_gripper_speed() -> u8 { 40 }
fn default_gripper_force() -> u8 { 50 }
fn default_gripper_step() -> i32 { 5 }
fn default_stop_trigger_threshold() -> f32 { 0.7 }

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            max_datagram: default_max_datagram(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            debounce_ms: default_debounce_ms(),
            watchdog_timeout_ms: default_watchdog_timeout_ms(),
            reorder_tolerance_ms: default_reorder_tolerance_ms(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            initial_speed: default_initial_speed(),
            speed_step: default_speed_step(),
            servo_mode: default_servo_mode(),
            stick_gain: default_stick_gain(),
        }
    }
}

impl Default for GripperConfig {
    fn default() -> Self {
        Self {
            speed: default_gripper_speed(),
            force: default_gripper_force(),
            open_position: 0,
            close_position: None,
            step: default_gripper_step(),
            stop_trigger_threshold: default_stop_trigger_threshold(),
        }
    }
}

fn invalid(message: impl Into<String>) -> BridgeError {
    BridgeError::InvalidConfig(message.into())
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gamepad_arm_bridge::config::Config;
    ///
    /// let config = Config::load("bridge.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.transport.bind_address.is_empty() {
            return Err(invalid("bind_address cannot be empty"));
        }

        // A buffer of exactly PACKET_SIZE truncates oversized datagrams into valid-looking ones
        let max_datagram = self.transport.max_datagram;
        if max_datagram <= PACKET_SIZE || max_datagram > MAX_UDP_PAYLOAD {
            return Err(invalid(format!(
                "max_datagram must be between {} and {}",
                PACKET_SIZE + 1,
                MAX_UDP_PAYLOAD
            )));
        }

        // Validate session timing
        if self.session.debounce_ms > 10_000 {
            return Err(invalid("debounce_ms must be at most 10000"));
        }

        if self.session.watchdog_timeout_ms == 0 || self.session.watchdog_timeout_ms > 60_000 {
            return Err(invalid("watchdog_timeout_ms must be between 1 and 60000"));
        }

        if self.session.reorder_tolerance_ms > 1_000 {
            return Err(invalid("reorder_tolerance_ms must be at most 1000"));
        }

        // Validate motion
        if self.motion.initial_speed > 100 {
            return Err(invalid("initial_speed must be between 0 and 100"));
        }

        if self.motion.speed_step <= 0 || self.motion.speed_step > 100 {
            return Err(invalid("speed_step must be between 1 and 100"));
        }

        // 1 = incremental in base frame, 2 = incremental in tool frame
        if !(1..=2).contains(&self.motion.servo_mode) {
            return Err(invalid("servo_mode must be 1 or 2"));
        }

        if !self.motion.stick_gain.is_finite() || self.motion.stick_gain <= 0.0 {
            return Err(invalid("stick_gain must be a positive number"));
        }

        // Validate gripper
        for (name, value) in [
            ("gripper speed", Some(self.gripper.speed)),
            ("gripper force", Some(self.gripper.force)),
            ("open_position", Some(self.gripper.open_position)),
            ("close_position", self.gripper.close_position),
        ] {
            if matches!(value, Some(v) if v > 100) {
                return Err(invalid(format!("{} must be between 0 and 100", name)));
            }
        }

        if self.gripper.step <= 0 || self.gripper.step > 100 {
            return Err(invalid("gripper step must be between 1 and 100"));
        }

        let threshold = self.gripper.stop_trigger_threshold;
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(invalid("stop_trigger_threshold must be between 0.0 and 1.0 (exclusive)"));
        }

        Ok(())
    }

    /// Gripper close position, falling back to the profile's default.
    #[must_use]
    pub fn close_position(&self) -> u8 {
        self.gripper
            .close_position
            .unwrap_or_else(|| self.session.profile.default_close_position())
    }

    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            debounce_ms: self.session.debounce_ms,
            // Bounded by validation
            watchdog_timeout_ms: self.session.watchdog_timeout_ms as i64,
            reorder_tolerance_ms: self.session.reorder_tolerance_ms as i64,
        }
    }

    #[must_use]
    pub fn layout_settings(&self) -> LayoutSettings {
        LayoutSettings {
            debounce_ms: self.session.debounce_ms,
            speed_step: self.motion.speed_step,
            servo_mode: self.motion.servo_mode,
            stick_gain: self.motion.stick_gain,
            gripper_step: self.gripper.step,
            open_position: self.gripper.open_position,
            close_position: self.close_position(),
            stop_trigger_threshold: self.gripper.stop_trigger_threshold,
        }
    }

    #[must_use]
    pub fn motion_parameters(&self) -> MotionParameters {
        MotionParameters {
            velocity: self.motion.initial_speed,
            gripper_speed: self.gripper.speed,
            gripper_force: self.gripper.force,
        }
    }
}
