//! Trait abstraction for packet reception to enable testing

use async_trait::async_trait;
use std::io;

/// One received datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    /// Bytes written into the caller's buffer
    pub len: usize,
    /// Wall-clock receipt time in milliseconds since the Unix epoch
    pub received_at_ms: i64,
}

/// Source of raw gamepad packets
#[async_trait]
pub trait FrameSource: Send {
    /// Wait for the next packet and copy it into `buf`.
    ///
    /// Oversized packets are truncated to `buf.len()`.
    async fn recv_packet(&mut self, buf: &mut [u8]) -> io::Result<Packet>;
}
