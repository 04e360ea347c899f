//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! [`MainUnitBoard`] owns the shared I²C bus (RTC + LCD backpack), the
//! button and light adapters, the speaker and the link UART.
//! [`RemoteUnitBoard`] owns the force sensor, the LED bar and the link
//! UART.  The raw UART / LEDC / GPIO helpers in
//! [`hw_init`](crate::drivers::hw_init) use cfg-gated simulation stubs on
//! non-espidf targets, so both boards build on the host.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{info, warn};

use crate::app::ports::{
    ButtonPort, ClockPort, ContactSensor, DisplayPort, LightPort, ProgressIndicator, SerialPort,
    ToneTimer,
};
use crate::drivers::ds3231::Ds3231;
use crate::drivers::hw_init;
use crate::drivers::lcd::Lcd1602;
use crate::error::ClockError;
use crate::input::Buttons;
use crate::pins;
use crate::time::{HourMode, RawTime};

// ── Shared pieces ─────────────────────────────────────────────

/// Node-to-node link on the raw UART driver.
pub struct UartLink;

impl SerialPort for UartLink {
    fn send(&mut self, byte: u8) {
        if !hw_init::uart_send(byte) {
            warn!("link: UART refused byte 0x{:02x}", byte);
        }
    }

    fn is_send_ready(&self) -> bool {
        hw_init::uart_tx_done()
    }

    fn has_transmitted(&self) -> bool {
        hw_init::uart_tx_done()
    }

    fn has_received(&self) -> bool {
        hw_init::uart_rx_pending() > 0
    }

    fn receive(&mut self) -> u8 {
        hw_init::uart_read_byte().unwrap_or(0)
    }

    fn flush(&mut self) {
        hw_init::uart_flush_rx();
    }
}

/// Speaker on an LEDC channel.  The compare value is turned back into the
/// frequency the LEDC timer is programmed with.
pub struct LedcTone {
    clock_hz: u32,
}

impl LedcTone {
    pub fn new(clock_hz: u32) -> Self {
        Self { clock_hz }
    }

    /// Frequency produced by a toggle-on-compare timer at `compare`.
    pub fn frequency_for(&self, compare: u16) -> u32 {
        self.clock_hz / (2 * (u32::from(compare) + 1))
    }
}

impl ToneTimer for LedcTone {
    fn start(&mut self, compare: u16) {
        hw_init::speaker_on(self.frequency_for(compare).max(1));
    }

    fn stop(&mut self) {
        hw_init::speaker_off();
    }
}

/// Eight-LED bar showing the remote's hold progress, LSB first.
pub struct LedBar;

impl ProgressIndicator for LedBar {
    fn show(&mut self, pattern: u8) {
        for (bit, &pin) in pins::PROGRESS_LED_GPIOS.iter().enumerate() {
            hw_init::gpio_write(pin, pattern & (1 << bit) != 0);
        }
    }
}

// ── Main unit ─────────────────────────────────────────────────

pub struct MainUnitBoard<I2C, D, B, L> {
    i2c: I2C,
    delay: D,
    rtc: Ds3231,
    lcd: Lcd1602,
    /// Last LCD transaction failed; suppresses repeat warnings.
    lcd_fault: bool,
    buttons: B,
    light: L,
    tone: LedcTone,
    link: UartLink,
}

impl<I2C, D, B, L> MainUnitBoard<I2C, D, B, L>
where
    I2C: I2c,
    D: DelayNs,
    B: ButtonPort,
    L: LightPort,
{
    pub fn new(i2c: I2C, delay: D, buttons: B, light: L, tone_clock_hz: u32) -> Self {
        Self {
            i2c,
            delay,
            rtc: Ds3231::new(pins::RTC_I2C_ADDR),
            lcd: Lcd1602::new(pins::LCD_I2C_ADDR),
            lcd_fault: false,
            buttons,
            light,
            tone: LedcTone::new(tone_clock_hz),
            link: UartLink,
        }
    }

    /// Run the LCD power-on sequence.
    pub fn init_display(&mut self) -> Result<(), I2C::Error> {
        self.lcd.init(&mut self.i2c, &mut self.delay)?;
        info!("hardware: LCD ready at 0x{:02x}", pins::LCD_I2C_ADDR);
        Ok(())
    }

    fn note_lcd(&mut self, result: Result<(), I2C::Error>) {
        match result {
            Ok(()) => self.lcd_fault = false,
            Err(e) => {
                if !self.lcd_fault {
                    warn!("hardware: LCD write failed: {:?}", e);
                }
                self.lcd_fault = true;
            }
        }
    }
}

impl<I2C: I2c, D, B, L> ClockPort for MainUnitBoard<I2C, D, B, L> {
    fn read_time(&mut self) -> Result<RawTime, ClockError> {
        self.rtc.read_time(&mut self.i2c)
    }

    fn set_hour_mode(&mut self, mode: HourMode, current_hour: u8) -> Result<(), ClockError> {
        self.rtc.set_hour_mode(&mut self.i2c, mode, current_hour)
    }

    fn commit_time(
        &mut self,
        hour: u8,
        minute: u8,
        second: u8,
        pm: bool,
        mode: HourMode,
    ) -> Result<(), ClockError> {
        self.rtc
            .commit_time(&mut self.i2c, hour, minute, second, pm, mode)
    }
}

impl<I2C, D, B, L> DisplayPort for MainUnitBoard<I2C, D, B, L>
where
    I2C: I2c,
    D: DelayNs,
    B: ButtonPort,
    L: LightPort,
{
    fn clear(&mut self) {
        let result = self.lcd.clear(&mut self.i2c, &mut self.delay);
        self.note_lcd(result);
    }

    fn write_char(&mut self, position: u8, ch: char) {
        let result = self.lcd.write_char(&mut self.i2c, position, ch);
        self.note_lcd(result);
    }
}

impl<I2C, D, B: ButtonPort, L> ButtonPort for MainUnitBoard<I2C, D, B, L> {
    fn sample(&mut self) -> Buttons {
        self.buttons.sample()
    }
}

impl<I2C, D, B, L: LightPort> LightPort for MainUnitBoard<I2C, D, B, L> {
    fn set_duty(&mut self, level: u8) {
        self.light.set_duty(level);
    }
}

impl<I2C, D, B, L> ToneTimer for MainUnitBoard<I2C, D, B, L> {
    fn start(&mut self, compare: u16) {
        self.tone.start(compare);
    }

    fn stop(&mut self) {
        self.tone.stop();
    }
}

impl<I2C, D, B, L> SerialPort for MainUnitBoard<I2C, D, B, L> {
    fn send(&mut self, byte: u8) {
        self.link.send(byte);
    }

    fn is_send_ready(&self) -> bool {
        self.link.is_send_ready()
    }

    fn has_transmitted(&self) -> bool {
        self.link.has_transmitted()
    }

    fn has_received(&self) -> bool {
        self.link.has_received()
    }

    fn receive(&mut self) -> u8 {
        self.link.receive()
    }

    fn flush(&mut self) {
        self.link.flush();
    }
}

// ── Remote unit ───────────────────────────────────────────────

pub struct RemoteUnitBoard<C> {
    contact: C,
    progress: LedBar,
    link: UartLink,
}

impl<C: ContactSensor> RemoteUnitBoard<C> {
    pub fn new(contact: C) -> Self {
        Self {
            contact,
            progress: LedBar,
            link: UartLink,
        }
    }
}

impl<C: ContactSensor> ContactSensor for RemoteUnitBoard<C> {
    fn is_contact(&mut self) -> bool {
        self.contact.is_contact()
    }
}

impl<C> ProgressIndicator for RemoteUnitBoard<C> {
    fn show(&mut self, pattern: u8) {
        self.progress.show(pattern);
    }
}

impl<C> SerialPort for RemoteUnitBoard<C> {
    fn send(&mut self, byte: u8) {
        self.link.send(byte);
    }

    fn is_send_ready(&self) -> bool {
        self.link.is_send_ready()
    }

    fn has_transmitted(&self) -> bool {
        self.link.has_transmitted()
    }

    fn has_received(&self) -> bool {
        self.link.has_received()
    }

    fn receive(&mut self) -> u8 {
        self.link.receive()
    }

    fn flush(&mut self) {
        self.link.flush();
    }
}
