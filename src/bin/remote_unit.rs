//! AlarmLink remote unit entry point
//!
//! One cooperative task: listen for "alarm active", confirm a sustained
//! press on the force sensor, answer "off".
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, PinDriver, Pull};
use log::{error, info};

use alarmlink::adapters::gpio::ContactInput;
use alarmlink::adapters::hardware::RemoteUnitBoard;
use alarmlink::adapters::log_sink::LogEventSink;
use alarmlink::app::ports::RemoteBoard;
use alarmlink::app::remote::RemoteUnit;
use alarmlink::config::SystemConfig;
use alarmlink::drivers::{hw_init, hw_timer};
use alarmlink::events::{self, Event};
use alarmlink::pins;
use alarmlink::scheduler::{Scheduler, SchedulerDelegate, TaskId};

struct TaskRunner<'a, B> {
    unit: &'a mut RemoteUnit,
    hw: &'a mut B,
    sink: &'a mut LogEventSink,
}

impl<B: RemoteBoard> SchedulerDelegate for TaskRunner<'_, B> {
    fn on_task_due(&mut self, task: TaskId) {
        self.unit.run_task(task, self.hw, self.sink);
    }
}

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("AlarmLink remote unit v{}", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();
    config.validate().map_err(alarmlink::error::Error::from)?;

    if let Err(e) = hw_init::init_remote_peripherals() {
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // SAFETY: the force-sensor GPIO is claimed by this driver only.
    let mut sensor = PinDriver::input(unsafe { AnyIOPin::new(pins::FORCE_SENSOR_GPIO) })?;
    sensor.set_pull(Pull::Down)?;
    let mut hw = RemoteUnitBoard::new(ContactInput::new(sensor));

    let mut sink = LogEventSink::new();
    let mut unit = RemoteUnit::new(&config);
    unit.start(&mut hw, &mut sink);

    let mut sched = Scheduler::from_config(&config, &TaskId::REMOTE_UNIT);
    hw_timer::start_timers(config.base_tick_ms, None);

    info!("System ready. Entering event loop.");

    let base_tick = config.base_tick();
    loop {
        events::drain_events(|event| {
            if event == Event::BaseTick {
                let mut runner = TaskRunner {
                    unit: &mut unit,
                    hw: &mut hw,
                    sink: &mut sink,
                };
                sched.tick(base_tick, &mut runner);
            }
        });

        FreeRtos::delay_ms(1);
    }
}
