//! Hardware tick timer using ESP-IDF's esp_timer API.
//!
//! A single periodic timer pushes `Event::ControlTick` into the lock-free
//! queue. On simulation targets the tick loop paces itself with
//! `thread::sleep` instead, so nothing is started here.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely call `push_event()`.

#[cfg(target_os = "espidf")]
use crate::events::{Event, push_event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::ControlTick);
}

/// Start the periodic control tick timer.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer(interval_ms: u32) {
    // SAFETY: TICK_TIMER is written here once at boot from the single main
    // task before any callback fires; the callback only calls push_event().
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"tick".as_ptr(),
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer create failed (rc={})", ret);
            return;
        }
        let ret = esp_timer_start_periodic(TICK_TIMER, u64::from(interval_ms) * 1000);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer start failed (rc={})", ret);
            return;
        }
        log::info!("hw_timer: control tick every {} ms", interval_ms);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer(_interval_ms: u32) {
    log::info!("hw_timer(sim): ticks driven by sleep loop");
}

/// Stop the tick timer.
#[cfg(target_os = "espidf")]
pub fn stop_tick_timer() {
    // SAFETY: valid handle if start succeeded; null-check avoids misuse.
    unsafe {
        let t = TICK_TIMER;
        if !t.is_null() {
            esp_timer_stop(t);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_tick_timer() {}
