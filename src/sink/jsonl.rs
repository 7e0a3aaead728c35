//! JSON-lines command sink.
//!
//! Writes every command as one JSON object per line, for an executor process
//! reading stdin or a file.

use std::io::Write;

use tracing::trace;

use super::{RobotCommand, RobotCommandSink};
use crate::error::SinkError;

/// Sink that serializes commands to a writer.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of commands written so far.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RobotCommandSink for JsonLinesSink<W> {
    fn execute(&mut self, command: RobotCommand) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(&command)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        self.written += 1;
        trace!(?command, "command written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "executor gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writes_one_line_per_command() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.execute(RobotCommand::ServoStart).unwrap();
        sink.execute(RobotCommand::SetSpeed { percent: 55 }).unwrap();
        assert_eq!(sink.written(), 2);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"command":"servo_start"}"#,
                r#"{"command":"set_speed","percent":55}"#,
            ]
        );
    }

    #[test]
    fn test_servo_cart_line_parses_back() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.execute(RobotCommand::ServoCart {
            mode: 2,
            delta: [0.25, 0.0, 0.0, 0.0, 0.0, -0.5],
            cmd_time_s: 0.008,
            velocity: 50,
        })
        .unwrap();

        let output = sink.into_inner();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["command"], "servo_cart");
        assert_eq!(value["mode"], 2);
        assert_eq!(value["delta"][5], -0.5);
        assert_eq!(value["velocity"], 50);
    }

    #[test]
    fn test_write_failure_is_fatal() {
        let mut sink = JsonLinesSink::new(FailingWriter);
        let err = sink.execute(RobotCommand::StopMotion).unwrap_err();
        assert!(matches!(err, SinkError::Io(_)));
        assert!(!err.is_recoverable());
        assert_eq!(sink.written(), 0);
    }
}
