//! One-shot hardware peripheral initialization.
//!
//! Configures button GPIOs (input + pull-up + falling-edge interrupts) and
//! the LEDC timers/channels for backlight and speaker using raw ESP-IDF
//! sys calls. Called once from `main()` before the tick loop starts.

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
    LedcInitFailed,
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed => write!(f, "LEDC timer/channel config failed"),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

// ── LEDC channel assignments ──────────────────────────────────

pub const LEDC_CH_BACKLIGHT: u32 = 0;
pub const LEDC_CH_SPEAKER: u32 = 1;

#[cfg(target_os = "espidf")]
const LEDC_TIMER_BACKLIGHT: u32 = 0;
#[cfg(target_os = "espidf")]
const LEDC_TIMER_SPEAKER: u32 = 1;

// ── Init ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: called once from main() before the tick loop; single-threaded.
    unsafe {
        init_button_inputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── Buttons (input, pull-up, falling edge) ────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_button_inputs() -> Result<(), HwInitError> {
    for gpio in [pins::BUTTON_A_GPIO, pins::BUTTON_B_GPIO, pins::BUTTON_C_GPIO] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << gpio,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }
    info!("hw_init: buttons configured (A/B/C, falling edge)");
    Ok(())
}

// ── LEDC (backlight + speaker tone) ───────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let timers = [
        (LEDC_TIMER_BACKLIGHT, pins::BACKLIGHT_PWM_FREQ_HZ),
        (LEDC_TIMER_SPEAKER, pins::SPEAKER_TONE_FREQ_HZ),
    ];
    for (timer, freq) in timers {
        let cfg = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num: timer,
            freq_hz: freq,
            clk_cfg: ledc_clk_cfg_t_LEDC_AUTO_CLK,
            deconfigure: false,
            duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        };
        if unsafe { ledc_timer_config(&cfg) } != ESP_OK {
            return Err(HwInitError::LedcInitFailed);
        }
    }

    let channels = [
        (LEDC_CH_BACKLIGHT, LEDC_TIMER_BACKLIGHT, pins::LCD_BACKLIGHT_GPIO),
        (LEDC_CH_SPEAKER, LEDC_TIMER_SPEAKER, pins::SPEAKER_GPIO),
    ];
    for (channel, timer, gpio) in channels {
        let cfg = ledc_channel_config_t {
            gpio_num: gpio,
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            intr_type: ledc_intr_type_t_LEDC_INTR_DISABLE,
            timer_sel: timer,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        if unsafe { ledc_channel_config(&cfg) } != ESP_OK {
            return Err(HwInitError::LedcInitFailed);
        }
    }

    info!("hw_init: LEDC configured (backlight ch0, speaker ch1)");
    Ok(())
}

/// Set an 8-bit LEDC duty (0-255).
#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: channel was configured in init_ledc(); called from the
    // single-threaded tick loop only.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) {}

// ── GPIO ISR service + button handlers ────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: installed once at boot; ESP_ERR_INVALID_STATE means a
    // component already installed it, which is fine.
    let ret = unsafe { gpio_install_isr_service(0) };
    if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
        return Err(HwInitError::IsrInstallFailed(ret));
    }

    unsafe extern "C" fn button_a_isr(_arg: *mut core::ffi::c_void) {
        crate::drivers::button::button_isr(0, isr_now_ms());
        crate::events::push_event(crate::events::Event::ButtonA);
    }
    unsafe extern "C" fn button_b_isr(_arg: *mut core::ffi::c_void) {
        crate::drivers::button::button_isr(1, isr_now_ms());
        crate::events::push_event(crate::events::Event::ButtonB);
    }
    unsafe extern "C" fn button_c_isr(_arg: *mut core::ffi::c_void) {
        crate::drivers::button::button_isr(2, isr_now_ms());
        crate::events::push_event(crate::events::Event::ButtonC);
    }

    let handlers: [(i32, unsafe extern "C" fn(*mut core::ffi::c_void)); 3] = [
        (pins::BUTTON_A_GPIO, button_a_isr),
        (pins::BUTTON_B_GPIO, button_b_isr),
        (pins::BUTTON_C_GPIO, button_c_isr),
    ];
    for (gpio, handler) in handlers {
        // SAFETY: the handler only touches an atomic timestamp.
        let ret = unsafe { gpio_isr_handler_add(gpio, Some(handler), core::ptr::null_mut()) };
        if ret != ESP_OK {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
    }

    info!("hw_init: button ISRs attached");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    Ok(())
}

/// Millisecond timestamp usable from ISR context.
#[cfg(target_os = "espidf")]
fn isr_now_ms() -> u32 {
    // SAFETY: esp_timer_get_time is ISR-safe.
    ((unsafe { esp_timer_get_time() }) / 1000) as u32
}
