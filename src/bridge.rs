//! # Bridge Worker
//!
//! Receive → decode → dispatch loop.
//!
//! One worker owns the frame source, the decoder and the session, so frames
//! reach the session strictly in receipt order. The loop ends when:
//!
//! - the shutdown signal is raised (the session is halted, `Ok` is returned),
//! - the source fails, or
//! - the session reports a non-recoverable sink error.

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::input::protocol::PACKET_SIZE;
use crate::input::FrameDecoder;
use crate::session::{CycleOutcome, SessionStateMachine};
use crate::sink::RobotCommandSink;
use crate::transport::FrameSource;

/// Default receive buffer size in bytes
pub const DEFAULT_MAX_DATAGRAM: usize = 256;

/// Frame counters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    /// Datagrams received
    pub received: u64,
    /// Datagrams that decoded into a frame
    pub decoded: u64,
    /// Frames dropped by the reorder guard or as clock anomalies
    pub dropped: u64,
    /// Frames that ran a full cycle
    pub dispatched: u64,
}

impl RunStats {
    /// Datagrams rejected by the decoder.
    #[must_use]
    pub fn malformed(&self) -> u64 {
        self.received - self.decoded
    }
}

pub struct Bridge<F: FrameSource, S: RobotCommandSink> {
    source: F,
    decoder: FrameDecoder,
    session: SessionStateMachine<S>,
    max_datagram: usize,
    stats: RunStats,
}

impl<F: FrameSource, S: RobotCommandSink> Bridge<F, S> {
    /// `max_datagram` is raised to one byte past a packet if smaller, so an
    /// oversized datagram is never truncated to packet length.
    pub fn new(
        source: F,
        decoder: FrameDecoder,
        session: SessionStateMachine<S>,
        max_datagram: usize,
    ) -> Self {
        Self {
            source,
            decoder,
            session,
            max_datagram: max_datagram.max(PACKET_SIZE + 1),
            stats: RunStats::default(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStateMachine<S> {
        &self.session
    }

    #[must_use]
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Run until `shutdown` turns `true` or its sender is dropped.
    ///
    /// # Errors
    ///
    /// Returns the source's I/O error or the session's fatal sink error.
    /// The session has already attempted a stop in the latter case.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<RunStats> {
        let mut buf = vec![0u8; self.max_datagram];
        info!(decoder = ?self.decoder.variant(), "Bridge running");

        let result = loop {
            if *shutdown.borrow() {
                break Ok(());
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Shutdown requested");
                        break Ok(());
                    }
                }

                received = self.source.recv_packet(&mut buf) => {
                    match received {
                        Ok(packet) => {
                            let bytes = &buf[..packet.len];
                            if let Err(e) = self.handle_packet(bytes, packet.received_at_ms) {
                                break Err(e);
                            }
                        }
                        Err(e) => {
                            error!("Packet source failed: {}", e);
                            break Err(e.into());
                        }
                    }
                }
            }
        };

        if result.is_ok() {
            self.session.shutdown();
        }

        let stats = self.stats;
        info!(
            received = stats.received,
            decoded = stats.decoded,
            malformed = stats.malformed(),
            dropped = stats.dropped,
            dispatched = stats.dispatched,
            "Bridge stopped"
        );
        result.map(|()| stats)
    }

    fn handle_packet(&mut self, packet: &[u8], received_at_ms: i64) -> Result<()> {
        self.stats.received += 1;

        let frame = match self.decoder.decode(packet, received_at_ms) {
            Ok(frame) => frame,
            Err(e) => {
                debug!("Discarding packet: {}", e);
                return Ok(());
            }
        };
        self.stats.decoded += 1;

        match self.session.process_frame(&frame)? {
            CycleOutcome::Dropped(reason) => {
                debug!(?reason, timestamp_ms = received_at_ms, "Stale frame dropped");
                self.stats.dropped += 1;
            }
            CycleOutcome::Processed { .. } => self.stats.dispatched += 1,
        }
        Ok(())
    }
}
