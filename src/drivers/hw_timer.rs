//! Hardware timer module using ESP-IDF's esp_timer API.
//!
//! Creates periodic timers that push events into the lock-free SPSC queue.
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely call push_event() which uses atomics only.
//!
//! On simulation targets nothing is started; callers push
//! [`Event::BaseTick`](crate::events::Event::BaseTick) themselves.

#[cfg(target_os = "espidf")]
use crate::events::{push_event, Event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut BASE_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut STATUS_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn base_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::BaseTick);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn status_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::StatusTick);
}

/// Start the scheduler base tick and, if `status_period_ms` is given, the
/// status report timer.
#[cfg(target_os = "espidf")]
pub fn start_timers(base_period_ms: u32, status_period_ms: Option<u32>) {
    // SAFETY: BASE_TIMER and STATUS_TIMER are written here once at boot
    // from the single main-task context before any timer callbacks fire.
    // The callbacks themselves only call push_event(), which is lock-free.
    unsafe {
        let base_args = esp_timer_create_args_t {
            callback: Some(base_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"base".as_ptr(),
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&base_args, &raw mut BASE_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: base timer create failed (rc={})", ret);
            return;
        }
        let ret = esp_timer_start_periodic(BASE_TIMER, u64::from(base_period_ms) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: base timer start failed (rc={})", ret);
            return;
        }

        if let Some(status_ms) = status_period_ms {
            let status_args = esp_timer_create_args_t {
                callback: Some(status_tick_cb),
                arg: core::ptr::null_mut(),
                dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                name: c"status".as_ptr(),
                skip_unhandled_events: true,
            };
            let ret = esp_timer_create(&status_args, &raw mut STATUS_TIMER);
            if ret != ESP_OK {
                log::error!("hw_timer: status timer create failed (rc={}), continuing without reports", ret);
                return;
            }
            let ret = esp_timer_start_periodic(STATUS_TIMER, u64::from(status_ms) * 1_000);
            if ret != ESP_OK {
                log::error!("hw_timer: status timer start failed (rc={})", ret);
                return;
            }
        }

        info!("hw_timer: base tick every {} ms started", base_period_ms);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(_base_period_ms: u32, _status_period_ms: Option<u32>) {
    log::info!("hw_timer(sim): timers not started (ticks driven by the caller)");
}
