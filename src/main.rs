//! AlarmLink main unit entry point
//!
//! Hexagonal architecture with a timer-driven cooperative scheduler.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  MainUnitBoard (RTC · LCD · buttons · light · speaker · UART)  │
//! │  LogEventSink                                                  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              MainUnit (pure logic)                     │    │
//! │  │  DisplayTime · SetAlarm · SetTime · AlarmCheck ·       │    │
//! │  │  Light · Tone                                          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (delegate-driven) · esp_timer base tick             │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use alarmlink::adapters::gpio::{ActiveLowButtons, PwmLight};
use alarmlink::adapters::hardware::MainUnitBoard;
use alarmlink::adapters::log_sink::LogEventSink;
use alarmlink::app::events::AppEvent;
use alarmlink::app::ports::{EventSink, MainBoard};
use alarmlink::app::service::MainUnit;
use alarmlink::config::SystemConfig;
use alarmlink::drivers::{hw_init, hw_timer};
use alarmlink::events::{self, Event};
use alarmlink::pins;
use alarmlink::scheduler::{Scheduler, SchedulerDelegate, TaskId};

// ── Scheduler delegate ────────────────────────────────────────
//
// The scheduler only knows task ids; this bridges a due task to the
// service with the board and sink borrowed for the current tick.

struct TaskRunner<'a, B> {
    unit: &'a mut MainUnit,
    hw: &'a mut B,
    sink: &'a mut LogEventSink,
}

impl<B: MainBoard> SchedulerDelegate for TaskRunner<'_, B> {
    fn on_task_due(&mut self, task: TaskId) {
        self.unit.run_task(task, self.hw, self.sink);
    }
}

fn input_pin(gpio: i32) -> Result<PinDriver<'static, AnyIOPin, esp_idf_hal::gpio::Input>> {
    // SAFETY: each GPIO number in `pins` is claimed by exactly one driver.
    let mut pin = PinDriver::input(unsafe { AnyIOPin::new(gpio) })?;
    pin.set_pull(Pull::Up)?;
    Ok(pin)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  AlarmLink main unit v{}          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();
    config.validate().map_err(alarmlink::error::Error::from)?;

    // ── 2. Raw peripherals (link UART, speaker) ───────────────
    if let Err(e) = hw_init::init_main_peripherals() {
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. HAL drivers (I²C bus, buttons, light PWM) ──────────
    let peripherals = Peripherals::take()?;

    // SAFETY: SDA/SCL are used by this bus only.
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        unsafe { AnyIOPin::new(pins::I2C_SDA_GPIO) },
        unsafe { AnyIOPin::new(pins::I2C_SCL_GPIO) },
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;

    let buttons = ActiveLowButtons::new(
        input_pin(pins::BUTTON_SELECT_GPIO)?,
        input_pin(pins::BUTTON_CANCEL_GPIO)?,
        input_pin(pins::BUTTON_MINUTE_GPIO)?,
        input_pin(pins::BUTTON_HOUR_GPIO)?,
    );

    let light_timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default()
            .frequency(Hertz(pins::LIGHT_PWM_FREQ_HZ))
            .resolution(Resolution::Bits8),
    )?;
    // SAFETY: the light GPIO is driven by this channel only.
    let light_channel = LedcDriver::new(
        peripherals.ledc.channel0,
        light_timer,
        unsafe { AnyOutputPin::new(pins::LIGHT_PWM_GPIO) },
    )?;

    let mut hw = MainUnitBoard::new(
        i2c,
        Ets,
        buttons,
        PwmLight::new(light_channel),
        config.tone_timer_clock_hz,
    );
    if let Err(e) = hw.init_display() {
        warn!("LCD init failed ({:?}), continuing without display", e);
    }

    // ── 4. Service + scheduler ────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut unit = MainUnit::new(config.clone());
    unit.start(&mut hw, &mut sink);

    let mut sched = Scheduler::from_config(&config, &TaskId::MAIN_UNIT);
    hw_timer::start_timers(config.base_tick_ms, config.status_period_ms());

    info!("System ready. Entering event loop.");

    // ── 5. Event loop ─────────────────────────────────────────
    let base_tick = config.base_tick();
    loop {
        events::drain_events(|event| match event {
            Event::BaseTick => {
                let mut runner = TaskRunner {
                    unit: &mut unit,
                    hw: &mut hw,
                    sink: &mut sink,
                };
                sched.tick(base_tick, &mut runner);
            }
            Event::StatusTick => {
                let report = unit.build_status();
                sink.emit(&AppEvent::Status(report));
                let dropped = events::TIMER_EVENTS.dropped();
                if dropped > 0 {
                    warn!("event ring: {} ticks dropped since boot", dropped);
                }
            }
        });

        // Yield to the idle task until the next timer event.
        FreeRtos::delay_ms(1);
    }
}
