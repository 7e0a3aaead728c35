//! The receive/decode/dispatch worker with scripted and real UDP sources.

mod common;

use std::time::Duration;

use common::{PacketBuilder, ReplaySource, TestSink};
use gamepad_arm_bridge::bridge::{Bridge, RunStats, DEFAULT_MAX_DATAGRAM};
use gamepad_arm_bridge::controller::{ControlLayout, LayoutSettings, MotionParameters, Profile};
use gamepad_arm_bridge::input::protocol::PACKET_SIZE;
use gamepad_arm_bridge::input::{ButtonId, DecoderVariant, FrameDecoder};
use gamepad_arm_bridge::session::{SessionSettings, SessionState, SessionStateMachine};
use gamepad_arm_bridge::sink::RobotCommand;
use gamepad_arm_bridge::transport::UdpTransport;
use tokio::net::UdpSocket;
use tokio::sync::watch;

fn servo_session() -> SessionStateMachine<TestSink> {
    SessionStateMachine::new(
        TestSink::new(),
        SessionSettings::default(),
        ControlLayout::build(Profile::Servo, &LayoutSettings::default()),
        MotionParameters::default(),
    )
}

#[tokio::test]
async fn test_replayed_session_arms_streams_and_halts() {
    let (tx, rx) = watch::channel(false);
    let start = PacketBuilder::new().press(ButtonId::Start).build();
    let push = PacketBuilder::new().axis(1, -1.0).build();

    let mut packets = Vec::new();
    for t in (0..=50).step_by(10) {
        packets.push((start.clone(), t));
    }
    for t in (60..=100).step_by(10) {
        packets.push((push.clone(), t));
    }
    packets.push((vec![0u8; 12], 105));

    let source = ReplaySource::new(packets, tx);
    let decoder = FrameDecoder::new(DecoderVariant::AnalogTriggers);
    let mut bridge = Bridge::new(source, decoder, servo_session(), DEFAULT_MAX_DATAGRAM);

    let stats = bridge.run(rx).await.unwrap();
    assert_eq!(
        stats,
        RunStats {
            received: 12,
            decoded: 11,
            dropped: 0,
            dispatched: 11,
        }
    );

    let sink = bridge.session().sink();
    assert!(sink.commands.contains(&RobotCommand::ServoCart {
        mode: 2,
        delta: [0.0, -0.5, 0.0, 0.0, 0.0, 0.0],
        cmd_time_s: 0.01,
        velocity: 50,
    }));
    assert_eq!(
        &sink.commands[sink.commands.len() - 2..],
        &[RobotCommand::ServoEnd, RobotCommand::StopMotion]
    );
    assert_eq!(bridge.session().state(), SessionState::Disarmed);
}

#[tokio::test]
async fn test_udp_packets_reach_the_session() {
    let transport = UdpTransport::bind("127.0.0.1", 0).await.unwrap();
    let target = transport.local_addr();

    let decoder = FrameDecoder::new(DecoderVariant::Digital);
    let mut bridge = Bridge::new(transport, decoder, servo_session(), DEFAULT_MAX_DATAGRAM);
    let (tx, rx) = watch::channel(false);
    let worker = tokio::spawn(async move {
        let result = bridge.run(rx).await;
        (bridge, result)
    });

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender.send_to(&PacketBuilder::new().build(), target).await.unwrap();
    sender.send_to(&[0u8; 20], target).await.unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    tx.send(true).unwrap();

    let (bridge, result) = worker.await.unwrap();
    let stats = result.unwrap();
    assert_eq!(stats.received, 2);
    assert_eq!(stats.malformed(), 1);
    assert!(bridge.session().sink().commands.is_empty());
}

#[tokio::test]
async fn test_udp_oversized_datagram_is_discarded() {
    let transport = UdpTransport::bind("127.0.0.1", 0).await.unwrap();
    let target = transport.local_addr();

    let decoder = FrameDecoder::new(DecoderVariant::Digital);
    let mut bridge = Bridge::new(transport, decoder, servo_session(), PACKET_SIZE);
    let (tx, rx) = watch::channel(false);
    let worker = tokio::spawn(async move {
        let result = bridge.run(rx).await;
        (bridge, result)
    });

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender.send_to(&[0u8; 100], target).await.unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    tx.send(true).unwrap();

    let (_bridge, result) = worker.await.unwrap();
    let stats = result.unwrap();
    assert_eq!(stats.received, 1);
    assert_eq!(stats.decoded, 0);
}
