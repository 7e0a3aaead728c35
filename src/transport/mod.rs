//! # Transport Module
//!
//! Receives gamepad telemetry datagrams over UDP.
//!
//! This module handles:
//! - Binding the listening socket
//! - Stamping each datagram with its wall-clock receipt time
//! - Abstracting reception behind [`FrameSource`] for tests

use std::io;
use std::net::SocketAddr;

use async_trait::async_trait;
use chrono::Utc;
use tokio::net::UdpSocket;
use tracing::{info, trace};

use crate::error::Result;

pub mod source;

pub use source::{FrameSource, Packet};

/// Default UDP port of the joystick publisher
pub const DEFAULT_PORT: u16 = 25656;

/// UDP listener for joystick packets.
pub struct UdpTransport {
    socket: UdpSocket,
    local_addr: SocketAddr,
}

impl std::fmt::Debug for UdpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpTransport")
            .field("local_addr", &self.local_addr)
            .finish_non_exhaustive()
    }
}

impl UdpTransport {
    /// Bind a UDP socket on `address:port`.
    ///
    /// Port `0` picks an ephemeral port; see [`UdpTransport::local_addr`].
    ///
    /// # Errors
    ///
    /// Returns error if the address cannot be resolved or bound
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gamepad_arm_bridge::transport::UdpTransport;
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let transport = UdpTransport::bind("127.0.0.1", 25656).await?;
    ///     println!("listening on {}", transport.local_addr());
    ///     Ok(())
    /// }
    /// ```
    pub async fn bind(address: &str, port: u16) -> Result<Self> {
        let socket = UdpSocket::bind((address, port)).await?;
        let local_addr = socket.local_addr()?;
        info!("Listening for gamepad packets on {}", local_addr);
        Ok(Self { socket, local_addr })
    }

    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

#[async_trait]
impl FrameSource for UdpTransport {
    async fn recv_packet(&mut self, buf: &mut [u8]) -> io::Result<Packet> {
        let (len, peer) = self.socket.recv_from(buf).await?;
        let received_at_ms = Utc::now().timestamp_millis();
        trace!(%peer, len, "Datagram received");
        Ok(Packet { len, received_at_ms })
    }
}
