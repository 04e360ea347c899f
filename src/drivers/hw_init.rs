//! One-shot hardware peripheral initialization and raw register helpers.
//!
//! Configures the node-to-node UART, the speaker LEDC channel and the
//! remote's LED bar using raw ESP-IDF sys calls.  Called once from
//! `main()` before the event loop starts.  The I²C bus, buttons, force
//! sensor and light PWM go through esp-idf-hal drivers instead and are
//! built in the binaries.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    UartInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::UartInitFailed(rc)   => write!(f, "UART driver install failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

/// Peripherals shared by both boards plus the main unit's speaker.
#[cfg(target_os = "espidf")]
pub fn init_main_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the event loop; single-threaded.
    unsafe {
        init_link_uart()?;
        init_speaker()?;
    }
    info!("hw_init: main unit peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_main_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): main unit peripheral init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn init_remote_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the event loop; single-threaded.
    unsafe {
        init_link_uart()?;
        init_progress_leds()?;
    }
    info!("hw_init: remote unit peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_remote_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): remote unit peripheral init skipped");
    Ok(())
}

// ── GPIO outputs (remote LED bar) ─────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_progress_leds() -> Result<(), HwInitError> {
    for &pin in &pins::PROGRESS_LED_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: progress LED bar configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_progress_leds(). Main-loop only.
    unsafe { gpio_set_level(pin, u32::from(high)); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── LEDC speaker channel ──────────────────────────────────────

pub const LEDC_TIMER_SPEAKER: u32 = 1;
pub const LEDC_CH_SPEAKER: u32 = 1;
/// 50 % duty at 8-bit resolution gives a square wave.
#[cfg(target_os = "espidf")]
const SPEAKER_DUTY: u32 = 128;

#[cfg(target_os = "espidf")]
unsafe fn init_speaker() -> Result<(), HwInitError> {
    // SAFETY: Called from single main-task context via init_main_peripherals().
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: LEDC_TIMER_SPEAKER,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::SPEAKER_IDLE_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK { return Err(HwInitError::LedcInitFailed(ret)); }

    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_SPEAKER,
        timer_sel: LEDC_TIMER_SPEAKER,
        gpio_num: pins::SPEAKER_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK { return Err(HwInitError::LedcInitFailed(ret)); }

    info!("hw_init: LEDC speaker on CH{}", LEDC_CH_SPEAKER);
    Ok(())
}

/// Retune the speaker timer and drive a square wave at `freq_hz`.
#[cfg(target_os = "espidf")]
pub fn speaker_on(freq_hz: u32) {
    // SAFETY: LEDC timer/channel were configured in init_speaker(); only
    // the main loop touches them.
    unsafe {
        ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_TIMER_SPEAKER, freq_hz);
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_SPEAKER, SPEAKER_DUTY);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_SPEAKER);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn speaker_on(_freq_hz: u32) {}

#[cfg(target_os = "espidf")]
pub fn speaker_off() {
    // SAFETY: see speaker_on().
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_SPEAKER, 0);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_SPEAKER);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn speaker_off() {}

// ── UART link ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
const UART_RX_BUFFER: i32 = 256;

#[cfg(target_os = "espidf")]
unsafe fn init_link_uart() -> Result<(), HwInitError> {
    let cfg = uart_config_t {
        baud_rate: pins::LINK_UART_BAUD,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    // SAFETY: one-time driver install from the main task before the loop.
    unsafe {
        let ret = uart_driver_install(
            pins::LINK_UART_PORT,
            UART_RX_BUFFER,
            0,
            0,
            core::ptr::null_mut(),
            0,
        );
        if ret != ESP_OK { return Err(HwInitError::UartInitFailed(ret)); }
        let ret = uart_param_config(pins::LINK_UART_PORT, &cfg);
        if ret != ESP_OK { return Err(HwInitError::UartInitFailed(ret)); }
        let ret = uart_set_pin(
            pins::LINK_UART_PORT,
            pins::LINK_UART_TX_GPIO,
            pins::LINK_UART_RX_GPIO,
            UART_PIN_NO_CHANGE,
            UART_PIN_NO_CHANGE,
        );
        if ret != ESP_OK { return Err(HwInitError::UartInitFailed(ret)); }
    }

    info!("hw_init: link UART{} at {} baud", pins::LINK_UART_PORT, pins::LINK_UART_BAUD);
    Ok(())
}

/// Queue one byte for transmission.  Returns `false` if the driver
/// refused it.
#[cfg(target_os = "espidf")]
pub fn uart_send(byte: u8) -> bool {
    // SAFETY: driver installed in init_link_uart(); main-loop only.
    let written = unsafe {
        uart_write_bytes(pins::LINK_UART_PORT, (&raw const byte).cast(), 1)
    };
    written == 1
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_send(_byte: u8) -> bool {
    true
}

/// The TX FIFO has drained onto the wire.  Never blocks.
#[cfg(target_os = "espidf")]
pub fn uart_tx_done() -> bool {
    // SAFETY: zero-tick wait only polls the driver's TX-done flag.
    (unsafe { uart_wait_tx_done(pins::LINK_UART_PORT, 0) }) == ESP_OK
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_tx_done() -> bool {
    true
}

/// Bytes waiting in the RX ring buffer.
#[cfg(target_os = "espidf")]
pub fn uart_rx_pending() -> usize {
    let mut len: usize = 0;
    // SAFETY: writes the buffered length into a local.
    let ret = unsafe { uart_get_buffered_data_len(pins::LINK_UART_PORT, &mut len) };
    if ret != ESP_OK { 0 } else { len }
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_rx_pending() -> usize {
    0
}

/// Take one byte without waiting.
#[cfg(target_os = "espidf")]
pub fn uart_read_byte() -> Option<u8> {
    let mut byte: u8 = 0;
    // SAFETY: reads at most one byte into a local, zero-tick timeout.
    let n = unsafe {
        uart_read_bytes(pins::LINK_UART_PORT, (&raw mut byte).cast(), 1, 0)
    };
    (n == 1).then_some(byte)
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_read_byte() -> Option<u8> {
    None
}

#[cfg(target_os = "espidf")]
pub fn uart_flush_rx() {
    // SAFETY: discards the driver's RX ring buffer; main-loop only.
    unsafe { uart_flush_input(pins::LINK_UART_PORT); }
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_flush_rx() {}
