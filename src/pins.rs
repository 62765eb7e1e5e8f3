//! GPIO / peripheral pin assignments for the panel main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. The assignments match the M5Stack Core/Fire
//! wiring that the panel hardware is built around.

// ---------------------------------------------------------------------------
// LCD (ILI9342C over SPI) + backlight
// ---------------------------------------------------------------------------

/// SPI clock for the LCD controller.
pub const LCD_SCK_GPIO: i32 = 18;
/// SPI MOSI for the LCD controller.
pub const LCD_MOSI_GPIO: i32 = 23;
/// LCD chip select (active LOW).
pub const LCD_CS_GPIO: i32 = 14;
/// LCD data/command select.
pub const LCD_DC_GPIO: i32 = 27;
/// LCD hardware reset (active LOW).
pub const LCD_RST_GPIO: i32 = 33;
/// LEDC PWM channel output for the LCD backlight.
pub const LCD_BACKLIGHT_GPIO: i32 = 32;

/// Panel resolution.
pub const LCD_WIDTH: u32 = 320;
pub const LCD_HEIGHT: u32 = 240;

// ---------------------------------------------------------------------------
// RGB indicator strip (SK6812, two side bars wired as one chain)
// ---------------------------------------------------------------------------

/// NeoPixel data line, driven by the RMT peripheral.
pub const STRIP_DATA_GPIO: i32 = 15;
/// Number of LEDs in the chain.
pub const STRIP_LEN: usize = 10;

// ---------------------------------------------------------------------------
// Speaker (piezo via LEDC tone)
// ---------------------------------------------------------------------------

pub const SPEAKER_GPIO: i32 = 25;

// ---------------------------------------------------------------------------
// Front buttons (active-low, internal pull-up)
// ---------------------------------------------------------------------------

pub const BUTTON_A_GPIO: i32 = 39;
pub const BUTTON_B_GPIO: i32 = 38;
pub const BUTTON_C_GPIO: i32 = 37;

// ---------------------------------------------------------------------------
// I²C bus (MFRC522 badge reader unit)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// 7-bit I²C address of the MFRC522 unit.
pub const RFID_I2C_ADDR: u8 = 0x28;

// ---------------------------------------------------------------------------
// LEDC (PWM) configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits). 8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// Backlight PWM frequency (above flicker perception).
pub const BACKLIGHT_PWM_FREQ_HZ: u32 = 5_000;
/// Speaker tone frequency for beep pulses.
pub const SPEAKER_TONE_FREQ_HZ: u32 = 1_000;
