//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;

use async_trait::async_trait;
use gamepad_arm_bridge::error::SinkError;
use gamepad_arm_bridge::input::protocol::{AXIS_COUNT, PACKET_FLOAT_COUNT};
use gamepad_arm_bridge::input::ButtonId;
use gamepad_arm_bridge::sink::{RobotCommand, RobotCommandSink};
use gamepad_arm_bridge::transport::{FrameSource, Packet};
use tokio::sync::watch;

/// Builds 64-byte gamepad packets.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketBuilder {
    values: [f32; PACKET_FLOAT_COUNT],
}

impl PacketBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis by packet index: left x/y, right x/y, cross x/y.
    pub fn axis(mut self, index: usize, value: f32) -> Self {
        assert!(index < AXIS_COUNT);
        self.values[index] = value;
        self
    }

    pub fn button(mut self, id: ButtonId, value: f32) -> Self {
        self.values[AXIS_COUNT + id.index()] = value;
        self
    }

    pub fn press(self, id: ButtonId) -> Self {
        self.button(id, 1.0)
    }

    pub fn build(&self) -> Vec<u8> {
        self.values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }
}

type FaultRule = (Box<dyn Fn(&RobotCommand) -> bool + Send>, i32);

/// Records commands; optionally fails the next command matching a rule.
#[derive(Default)]
pub struct TestSink {
    pub commands: Vec<RobotCommand>,
    fault: Option<FaultRule>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next<P>(&mut self, predicate: P, code: i32)
    where
        P: Fn(&RobotCommand) -> bool + Send + 'static,
    {
        self.fault = Some((Box::new(predicate), code));
    }

    pub fn servo_steps(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RobotCommand::ServoCart { .. }))
            .count()
    }
}

impl RobotCommandSink for TestSink {
    fn execute(&mut self, command: RobotCommand) -> Result<(), SinkError> {
        let matched = self.fault.as_ref().is_some_and(|(rule, _)| rule(&command));
        self.commands.push(command);
        if matched {
            if let Some((_, code)) = self.fault.take() {
                return Err(SinkError::Recoverable { code });
            }
        }
        Ok(())
    }
}

/// Replays packets with fixed receipt times, then raises shutdown.
pub struct ReplaySource {
    packets: VecDeque<(Vec<u8>, i64)>,
    shutdown: watch::Sender<bool>,
}

impl ReplaySource {
    pub fn new(packets: Vec<(Vec<u8>, i64)>, shutdown: watch::Sender<bool>) -> Self {
        Self {
            packets: packets.into(),
            shutdown,
        }
    }
}

#[async_trait]
impl FrameSource for ReplaySource {
    async fn recv_packet(&mut self, buf: &mut [u8]) -> io::Result<Packet> {
        match self.packets.pop_front() {
            Some((bytes, received_at_ms)) => {
                let len = bytes.len().min(buf.len());
                buf[..len].copy_from_slice(&bytes[..len]);
                Ok(Packet { len, received_at_ms })
            }
            None => {
                let _ = self.shutdown.send(true);
                std::future::pending().await
            }
        }
    }
}
