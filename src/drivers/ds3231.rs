//! DS3231 real-time clock over any embedded-hal I²C bus.
//!
//! Register map (all BCD):
//!
//! ```text
//!  0x00 seconds   0x01 minutes   0x02 hours (bit 6 = 12h, bit 5 = PM/20h)
//!  0x03 weekday   0x04 date      0x05 month (bit 7 = century)   0x06 year
//! ```
//!
//! The driver does not own the bus so the LCD backpack can share it.

use embedded_hal::i2c::I2c;
use log::debug;

use crate::error::ClockError;
use crate::time::{HourMode, RawTime, decode_hour24, encode_hour};

const REG_SECONDS: u8 = 0x00;
const REG_HOURS: u8 = 0x02;
const MONTH_MASK: u8 = 0x1F;
const SECONDS_MASK: u8 = 0x7F;
const HOUR_12H_SELECT: u8 = 0x40;
const HOUR_PM_BIT: u8 = 0x20;

pub struct Ds3231 {
    address: u8,
}

impl Ds3231 {
    pub fn new(address: u8) -> Self {
        Self { address }
    }

    /// Burst-read the seven time/date registers.
    pub fn read_time<I: I2c>(&self, i2c: &mut I) -> Result<RawTime, ClockError> {
        let mut regs = [0u8; 7];
        i2c.write_read(self.address, &[REG_SECONDS], &mut regs)
            .map_err(|_| ClockError::Bus)?;
        Ok(RawTime {
            second: regs[0] & SECONDS_MASK,
            minute: regs[1],
            hour: regs[2],
            weekday: regs[3],
            date: regs[4],
            month: regs[5] & MONTH_MASK,
            year: regs[6],
        })
    }

    /// Rewrite the hour register in `mode`, keeping the time of day that
    /// `current_hour` encodes.
    pub fn set_hour_mode<I: I2c>(
        &self,
        i2c: &mut I,
        mode: HourMode,
        current_hour: u8,
    ) -> Result<(), ClockError> {
        let hour24 = decode_hour24(current_hour)?;
        let register = encode_hour(hour24, mode);
        debug!("ds3231: hour register 0x{:02x} -> 0x{:02x}", current_hour, register);
        i2c.write(self.address, &[REG_HOURS, register])
            .map_err(|_| ClockError::Bus)
    }

    /// Write seconds, minutes and hours.  Arguments are BCD; in 12-hour
    /// mode `hour` is the clock-face hour and `pm` selects the half.
    pub fn commit_time<I: I2c>(
        &self,
        i2c: &mut I,
        hour: u8,
        minute: u8,
        second: u8,
        pm: bool,
        mode: HourMode,
    ) -> Result<(), ClockError> {
        let hour_register = match mode {
            HourMode::TwentyFour => hour,
            HourMode::Twelve => {
                let pm_bit = if pm { HOUR_PM_BIT } else { 0 };
                HOUR_12H_SELECT | pm_bit | hour
            }
        };
        i2c.write(self.address, &[REG_SECONDS, second, minute, hour_register])
            .map_err(|_| ClockError::Bus)
    }
}
