//! GPIO / peripheral pin assignments for both alarm clock boards.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Main unit: front-panel buttons (active-low, internal pull-ups)
// ---------------------------------------------------------------------------

/// Admin / save.
pub const BUTTON_SELECT_GPIO: i32 = 4;
pub const BUTTON_CANCEL_GPIO: i32 = 5;
/// Increment minute.
pub const BUTTON_MINUTE_GPIO: i32 = 6;
/// Increment hour.
pub const BUTTON_HOUR_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Main unit: actuators
// ---------------------------------------------------------------------------

/// Wake-up light, LEDC PWM.
pub const LIGHT_PWM_GPIO: i32 = 1;
/// Piezo speaker, LEDC square wave.
pub const SPEAKER_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Main unit: I²C bus (DS3231 RTC + PCF8574 LCD backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
pub const I2C_FREQ_HZ: u32 = 100_000;

/// DS3231 real-time clock.
pub const RTC_I2C_ADDR: u8 = 0x68;
/// PCF8574 backpack driving the 16×2 HD44780 LCD.
pub const LCD_I2C_ADDR: u8 = 0x27;

// ---------------------------------------------------------------------------
// Remote unit
// ---------------------------------------------------------------------------

/// Force-sensor comparator output, HIGH on contact.
pub const FORCE_SENSOR_GPIO: i32 = 4;
/// Hold-progress LED bar, LSB first.
pub const PROGRESS_LED_GPIOS: [i32; 8] = [10, 11, 12, 13, 14, 15, 16, 21];

// ---------------------------------------------------------------------------
// Node-to-node serial link (both units)
// ---------------------------------------------------------------------------

pub const LINK_UART_PORT: i32 = 1;
pub const LINK_UART_TX_GPIO: i32 = 17;
pub const LINK_UART_RX_GPIO: i32 = 18;
pub const LINK_UART_BAUD: i32 = 9600;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC base frequency for the light (5 kHz, flicker-free).
pub const LIGHT_PWM_FREQ_HZ: u32 = 5_000;
/// Frequency the tone timer is first configured with; retuned per note.
pub const SPEAKER_IDLE_FREQ_HZ: u32 = 1_000;
