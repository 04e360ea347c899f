//! embedded-hal pin adapters for the input and PWM ports.
//!
//! Any HAL whose pins implement the embedded-hal 1.0 traits can drive the
//! state machines through these.  A pin read error counts as "not
//! pressed" / "no contact"; the next sample retries.

use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{ButtonPort, ContactSensor, LightPort};
use crate::input::Buttons;

fn is_low(pin: &mut impl InputPin) -> bool {
    pin.is_low().unwrap_or(false)
}

/// Four buttons wired to ground with pull-ups: low means pressed.
pub struct ActiveLowButtons<P: InputPin> {
    select: P,
    cancel: P,
    minute: P,
    hour: P,
}

impl<P: InputPin> ActiveLowButtons<P> {
    pub fn new(select: P, cancel: P, minute: P, hour: P) -> Self {
        Self {
            select,
            cancel,
            minute,
            hour,
        }
    }
}

impl<P: InputPin> ButtonPort for ActiveLowButtons<P> {
    fn sample(&mut self) -> Buttons {
        Buttons {
            select: is_low(&mut self.select),
            cancel: is_low(&mut self.cancel),
            minute: is_low(&mut self.minute),
            hour: is_low(&mut self.hour),
        }
    }
}

/// Force-sensor comparator: high means contact.
pub struct ContactInput<P: InputPin> {
    pin: P,
}

impl<P: InputPin> ContactInput<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> ContactSensor for ContactInput<P> {
    fn is_contact(&mut self) -> bool {
        self.pin.is_high().unwrap_or(false)
    }
}

/// Light on a PWM channel; the 0..=255 level is scaled to the channel's
/// own duty range.
pub struct PwmLight<P: SetDutyCycle> {
    pwm: P,
}

impl<P: SetDutyCycle> PwmLight<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }
}

impl<P: SetDutyCycle> LightPort for PwmLight<P> {
    fn set_duty(&mut self, level: u8) {
        if self.pwm.set_duty_cycle_fraction(u16::from(level), 255).is_err() {
            warn!("light: PWM duty update failed");
        }
    }
}
