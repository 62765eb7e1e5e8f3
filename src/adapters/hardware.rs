//! Hardware adapter — bridges real peripherals to the output port traits.
//!
//! Owns the display renderer, backlight, indicator strip and speaker,
//! exposing them through [`DisplayPort`], [`IndicatorPort`] and
//! [`BeeperPort`]. Generic over the draw target so host tests can aim the
//! renderer at an in-memory framebuffer.

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::Rgb565;
use log::warn;

use crate::adapters::display::PanelRenderer;
use crate::app::ports::{BeeperPort, DisplayPort, IndicatorPort};
use crate::drivers::backlight::Backlight;
use crate::drivers::rgb_strip::StripDriver;
use crate::drivers::speaker::SpeakerDriver;
use crate::error::RenderError;
use crate::fsm::profile::{AssetId, Rgb};

/// Concrete adapter combining all output hardware behind the port traits.
pub struct PanelHardware<D> {
    renderer: PanelRenderer<D>,
    backlight: Backlight,
    strip: StripDriver,
    speaker: SpeakerDriver,
}

impl<D> PanelHardware<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
{
    pub fn new(
        renderer: PanelRenderer<D>,
        backlight: Backlight,
        strip: StripDriver,
        speaker: SpeakerDriver,
    ) -> Self {
        Self {
            renderer,
            backlight,
            strip,
            speaker,
        }
    }

    pub fn renderer_mut(&mut self) -> &mut PanelRenderer<D> {
        &mut self.renderer
    }

    pub fn backlight(&self) -> &Backlight {
        &self.backlight
    }

    pub fn strip(&self) -> &StripDriver {
        &self.strip
    }

    pub fn speaker(&self) -> &SpeakerDriver {
        &self.speaker
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl<D> DisplayPort for PanelHardware<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
{
    fn draw_asset(&mut self, asset: AssetId, x: i32, y: i32) -> Result<(), RenderError> {
        self.renderer.draw_asset(asset, x, y)
    }

    fn set_title(&mut self, text: &str) {
        if let Err(e) = self.renderer.draw_title(text) {
            warn!("hardware: title redraw failed: {e}");
        }
    }

    fn set_brightness(&mut self, percent: u8) {
        self.backlight.set_percent(percent);
    }

    fn sleep(&mut self) {
        self.backlight.off();
    }

    fn wake(&mut self) {
        // Powering up is the backlight's job; the controller sets the
        // level right after.
    }
}

// ── IndicatorPort / BeeperPort implementations ────────────────

impl<D> IndicatorPort for PanelHardware<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
{
    fn fill(&mut self, color: Rgb) {
        self.strip.fill(color);
    }
}

impl<D> BeeperPort for PanelHardware<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
{
    fn pulse(&mut self) {
        self.speaker.pulse();
    }
}
