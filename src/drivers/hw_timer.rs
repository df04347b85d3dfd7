//! Hardware timer module using ESP-IDF's esp_timer API.
//!
//! Creates periodic timers that push events into the lock-free SPSC queue.
//! On simulation targets, the sleep loop in `main` drives events instead.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely call push_event() which uses AtomicU8.

#[cfg(target_os = "espidf")]
use crate::events::{push_event, Event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut CONTROL_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut REPORT_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: CONTROL_TIMER is written once in `start_timers()` before any
/// timer callbacks fire.  Only called from the single main task.
#[cfg(target_os = "espidf")]
unsafe fn control_timer() -> esp_timer_handle_t {
    unsafe { CONTROL_TIMER }
}

/// SAFETY: Same invariants as `control_timer()`.
#[cfg(target_os = "espidf")]
unsafe fn report_timer() -> esp_timer_handle_t {
    unsafe { REPORT_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn control_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::ControlTick);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn report_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::ReportTick);
}

/// Start the hardware tick timers.
///
/// - control tick timer (`control_ms` period, the main polling cadence)
/// - position report timer (`report_secs` period, for the cloud link)
#[cfg(target_os = "espidf")]
pub fn start_timers(control_ms: u32, report_secs: u32) {
    // SAFETY: CONTROL_TIMER and REPORT_TIMER are written here once at boot
    // from the single main-task context before any timer callbacks fire.
    // The callbacks themselves only call push_event(), which is ISR-safe.
    unsafe {
        let control_args = esp_timer_create_args_t {
            callback: Some(control_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"control\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&control_args, &raw mut CONTROL_TIMER);
        if ret != ESP_OK {
            log::error!(
                "hw_timer: control timer create failed (rc={}) — continuing without control ticks",
                ret
            );
            return;
        }
        let ret = esp_timer_start_periodic(CONTROL_TIMER, u64::from(control_ms) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: control timer start failed (rc={})", ret);
            return;
        }

        let report_args = esp_timer_create_args_t {
            callback: Some(report_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"report\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&report_args, &raw mut REPORT_TIMER);
        if ret != ESP_OK {
            log::error!(
                "hw_timer: report timer create failed (rc={}) — continuing without reports",
                ret
            );
            return;
        }
        let ret = esp_timer_start_periodic(REPORT_TIMER, u64::from(report_secs) * 1_000_000);
        if ret != ESP_OK {
            log::error!("hw_timer: report timer start failed (rc={})", ret);
            return;
        }

        info!(
            "hw_timer: control@{}ms + report@{}s started",
            control_ms, report_secs
        );
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(control_ms: u32, report_secs: u32) {
    log::info!(
        "hw_timer(sim): timers not started (control={}ms report={}s, events driven by sleep loop)",
        control_ms,
        report_secs
    );
}

/// Stop all hardware tick timers.
#[cfg(target_os = "espidf")]
pub fn stop_timers() {
    // SAFETY: CONTROL_TIMER/REPORT_TIMER are valid handles if start_timers()
    // succeeded; null-check prevents double-free.
    unsafe {
        // SAFETY: control_timer()/report_timer() contract — main task only.
        let ct = control_timer();
        if !ct.is_null() {
            esp_timer_stop(ct);
        }
        let rt = report_timer();
        if !rt.is_null() {
            esp_timer_stop(rt);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_timers() {}
