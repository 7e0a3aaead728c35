//! # Gamepad Arm Bridge
//!
//! Drive a robotic manipulator in servo mode from a gamepad telemetry stream.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Set up logging on stderr (stdout carries the command stream)
//!    - Load configuration from the path given as the first argument, or defaults
//!    - Bind the UDP listener and open the command output
//!
//! 2. **Main Loop**
//!    - Receive, decode and dispatch one packet at a time
//!    - Ctrl+C raises the shutdown signal
//!
//! 3. **Graceful Shutdown**
//!    - End servo mode and stop motion if armed
//!    - Log frame statistics
//!
//! # Examples
//!
//! ```bash
//! cargo run --release -- bridge.toml > commands.jsonl
//! ```

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gamepad_arm_bridge::bridge::Bridge;
use gamepad_arm_bridge::config::Config;
use gamepad_arm_bridge::controller::ControlLayout;
use gamepad_arm_bridge::input::FrameDecoder;
use gamepad_arm_bridge::session::SessionStateMachine;
use gamepad_arm_bridge::sink::JsonLinesSink;
use gamepad_arm_bridge::transport::UdpTransport;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; the guard flushes buffered records on exit
    let (writer, _guard) = tracing_appender::non_blocking(io::stderr());
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("Gamepad Arm Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };
    info!(
        profile = ?config.session.profile,
        decoder = ?config.input.decoder,
        "Configuration loaded"
    );

    let transport = UdpTransport::bind(&config.transport.bind_address, config.transport.port)
        .await
        .context("Failed to bind UDP listener")?;

    let output: Box<dyn Write + Send> = if config.output.path.is_empty() {
        Box::new(io::stdout())
    } else {
        let file = File::create(&config.output.path)
            .with_context(|| format!("Failed to create {}", config.output.path))?;
        info!("Writing commands to {}", config.output.path);
        Box::new(BufWriter::new(file))
    };

    let session = SessionStateMachine::new(
        JsonLinesSink::new(output),
        config.session_settings(),
        ControlLayout::build(config.session.profile, &config.layout_settings()),
        config.motion_parameters(),
    );
    let mut bridge = Bridge::new(
        transport,
        FrameDecoder::new(config.input.decoder),
        session,
        config.transport.max_datagram,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // Without a Ctrl+C handler the bridge keeps running
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down...");
        let _ = shutdown_tx.send(true);
    });

    info!("Hold START to arm, SELECT to disarm. Press Ctrl+C to exit");
    let stats = bridge.run(shutdown_rx).await?;
    info!("Dispatched {} of {} received frames", stats.dispatched, stats.received);

    Ok(())
}
