//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production, stderr under test).  Status
//! reports go out as one JSON object per line so a host script can parse
//! them.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(report) => match serde_json::to_string(report) {
                Ok(json) => info!("STATUS | {}", json),
                Err(e) => warn!("STATUS | unserialisable report: {}", e),
            },
            AppEvent::StateChanged { task, from, to } => {
                info!("STATE | {} | {} -> {}", task.label(), from, to);
            }
            AppEvent::TokenTransferred { from, to } => {
                info!("ADMIN | {:?} -> {:?}", from, to);
            }
            AppEvent::HourModeChanged(mode) => {
                info!("CLOCK | hour mode {:?}", mode);
            }
            AppEvent::AlarmArmed(t) => {
                info!("ALARM | armed {:02}:{:02} pm={}", t.hour, t.minute, t.pm);
            }
            AppEvent::ClockSet(t) => {
                info!("CLOCK | set {:02}:{:02} pm={}", t.hour, t.minute, t.pm);
            }
            AppEvent::AlarmTriggered { minutes_until } => {
                info!("ALARM | triggered, due in {} min", minutes_until);
            }
            AppEvent::HandshakeRetry => {
                warn!("LINK | no off confirmation, re-sending alarm");
            }
            AppEvent::AlarmSilenced => {
                info!("ALARM | silenced by remote");
            }
            AppEvent::RemoteAlarmHeard => {
                info!("LINK | alarm active received");
            }
            AppEvent::OffSent => {
                info!("LINK | off sent");
            }
            AppEvent::ClockFault(e) => {
                warn!("FAULT | clock: {}", e);
            }
            AppEvent::Started(node) => {
                info!("START | node={:?}", node);
            }
        }
    }
}
