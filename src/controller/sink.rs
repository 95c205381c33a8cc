//! Delivery of [`ControllerEvent`]s to the emulation core.
//!
//! Emission never fails from the caller's point of view. A sink that cannot
//! accept an event logs it and drops it, the input loop keeps running.

use super::event::ControllerEvent;
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Receiver side of the overlay's event stream.
pub trait EventSink: Send {
    fn emit(&mut self, event: ControllerEvent);
}

impl EventSink for mpsc::Sender<ControllerEvent> {
    fn emit(&mut self, event: ControllerEvent) {
        match self.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!("Event channel full, dropping {:?}", event);
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                error!("Event channel closed, dropping {:?}", event);
            }
        }
    }
}

impl EventSink for mpsc::UnboundedSender<ControllerEvent> {
    fn emit(&mut self, event: ControllerEvent) {
        if let Err(e) = self.send(event) {
            error!("Event channel closed, dropping {:?}", e.0);
        }
    }
}

// Recorder, mostly for tests and hosts that poll
impl EventSink for Vec<ControllerEvent> {
    fn emit(&mut self, event: ControllerEvent) {
        self.push(event);
    }
}
