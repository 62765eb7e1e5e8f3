//! RGB indicator strip driver (SK6812/WS2812 over RMT).
//!
//! The strip is always a single solid colour, so the driver only exposes
//! `fill()`. Encoding follows the WS2812 one-wire protocol: each bit is an
//! RMT item with a long or short high phase (GRB byte order).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: legacy RMT driver, one `rmt_write_items` per fill.
//! On host/test: remembers the last fill only.

use crate::fsm::profile::Rgb;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub struct StripDriver {
    len: usize,
    last_fill: Rgb,
}

impl StripDriver {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            last_fill: (0, 0, 0),
        }
    }

    /// Initialise the RMT channel for the strip data line.
    #[cfg(target_os = "espidf")]
    pub fn init(&mut self) -> Result<(), crate::error::Error> {
        // SAFETY: one-shot init from the main task before the tick loop.
        unsafe {
            let mut cfg = rmt_config_t {
                rmt_mode: rmt_mode_t_RMT_MODE_TX,
                channel: rmt_channel_t_RMT_CHANNEL_0,
                gpio_num: pins::STRIP_DATA_GPIO,
                clk_div: 2, // 40 MHz → 25 ns per tick
                mem_block_num: 1,
                ..Default::default()
            };
            cfg.__bindgen_anon_1.tx_config.carrier_en = false;
            cfg.__bindgen_anon_1.tx_config.loop_en = false;
            cfg.__bindgen_anon_1.tx_config.idle_output_en = true;
            cfg.__bindgen_anon_1.tx_config.idle_level = rmt_idle_level_t_RMT_IDLE_LEVEL_LOW;

            if rmt_config(&cfg) != ESP_OK {
                return Err(crate::error::Error::Init("rmt_config failed"));
            }
            if rmt_driver_install(rmt_channel_t_RMT_CHANNEL_0, 0, 0) != ESP_OK {
                return Err(crate::error::Error::Init("rmt_driver_install failed"));
            }
        }
        log::info!("rgb_strip: RMT channel 0 on GPIO{}", pins::STRIP_DATA_GPIO);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn init(&mut self) -> Result<(), crate::error::Error> {
        Ok(())
    }

    /// Render a solid fill across the whole chain.
    pub fn fill(&mut self, color: Rgb) {
        self.last_fill = color;
        self.show(color);
    }

    pub fn last_fill(&self) -> Rgb {
        self.last_fill
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // ── Wire encoding ─────────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn show(&self, (r, g, b): Rgb) {
        // WS2812 timings at 25 ns/tick: T0H 14, T0L 34, T1H 28, T1L 20.
        const T0H: u32 = 14;
        const T0L: u32 = 34;
        const T1H: u32 = 28;
        const T1L: u32 = 20;

        let mut items: Vec<rmt_item32_t> = Vec::with_capacity(self.len * 24);
        for _ in 0..self.len {
            for byte in [g, r, b] {
                for bit in (0..8).rev() {
                    let one = byte & (1 << bit) != 0;
                    let (high, low) = if one { (T1H, T1L) } else { (T0H, T0L) };
                    let mut item = rmt_item32_t::default();
                    // SAFETY: writing the bitfield view of the freshly
                    // zeroed item union.
                    unsafe {
                        item.__bindgen_anon_1.__bindgen_anon_1.set_duration0(high);
                        item.__bindgen_anon_1.__bindgen_anon_1.set_level0(1);
                        item.__bindgen_anon_1.__bindgen_anon_1.set_duration1(low);
                        item.__bindgen_anon_1.__bindgen_anon_1.set_level1(0);
                    }
                    items.push(item);
                }
            }
        }

        // SAFETY: channel initialised in init(); wait_tx_done bounds the call.
        unsafe {
            rmt_write_items(rmt_channel_t_RMT_CHANNEL_0, items.as_ptr(), items.len() as i32, true);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn show(&self, _color: Rgb) {}
}
