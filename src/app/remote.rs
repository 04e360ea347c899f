//! Remote-unit service.
//!
//! A single machine: [`RemoteOff`] waits for "alarm active", then turns a
//! sustained press on the force sensor into "off".

use log::{info, warn};

use crate::config::SystemConfig;
use crate::fsm::remote_off::{RemoteOff, RemoteOffState};
use crate::scheduler::TaskId;

use super::events::{AppEvent, Node};
use super::ports::{EventSink, RemoteBoard, SerialPort};
use super::service::report_step;

pub struct RemoteUnit {
    off: RemoteOff,
}

impl RemoteUnit {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            off: RemoteOff::new(config.off_hold_ticks),
        }
    }

    /// Drop any bytes that arrived before the machine was listening.
    pub fn start(&mut self, serial: &mut impl SerialPort, sink: &mut impl EventSink) {
        serial.flush();
        sink.emit(&AppEvent::Started(Node::Remote));
        info!("RemoteUnit started");
    }

    pub fn run_task<B: RemoteBoard>(&mut self, task: TaskId, hw: &mut B, sink: &mut impl EventSink) {
        if task != TaskId::RemoteOff {
            warn!("RemoteUnit: {} is not a remote-unit task", task.label());
            return;
        }
        let step = self.off.tick(hw, sink);
        report_step(task, step, sink);
    }

    pub fn state(&self) -> RemoteOffState {
        self.off.state()
    }

    pub fn hold(&self) -> u16 {
        self.off.hold()
    }
}
