//! Boolean signal sources and the conditioner chains bound to them.

use super::action::ActionContext;
use super::conditioner::Stage;
use crate::error::SinkError;
use crate::input::{ButtonId, InputFrame};

/// Where a boolean signal is read from in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// A button channel, pressed when nonzero
    Button(ButtonId),
    /// Cross pad horizontal axis equals `direction` (-1 or 1)
    CrossX(i8),
    /// Cross pad vertical axis equals `direction` (-1 or 1)
    CrossY(i8),
}

impl Signal {
    #[must_use]
    pub fn read(self, frame: &InputFrame) -> bool {
        match self {
            Signal::Button(id) => frame.is_pressed(id),
            Signal::CrossX(direction) => frame.axes().cross_x == f32::from(direction),
            Signal::CrossY(direction) => frame.axes().cross_y == f32::from(direction),
        }
    }
}

/// A conditioner chain fed from one [`Signal`].
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonBinding {
    signal: Signal,
    stage: Stage,
}

impl ButtonBinding {
    #[must_use]
    pub fn new(signal: Signal, stage: Stage) -> Self {
        Self { signal, stage }
    }

    #[must_use]
    pub fn signal(&self) -> Signal {
        self.signal
    }

    pub fn feed(
        &mut self,
        frame: &InputFrame,
        ctx: &mut ActionContext<'_>,
    ) -> Result<bool, SinkError> {
        self.stage.feed(frame.timestamp_ms(), self.signal.read(frame), ctx)
    }
}
