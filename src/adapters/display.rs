//! Status display renderer.
//!
//! Draws the state assets and the title band through `embedded-graphics`,
//! generic over any `DrawTarget<Color = Rgb565>` — the real ILI9342C on
//! the panel, a plain framebuffer in host tests. The assets are simple
//! geometric glyphs so no bitmap files ship with the firmware.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    CornerRadii, PrimitiveStyle, Rectangle, RoundedRectangle, Triangle,
};
use embedded_graphics::text::{Alignment, Text};
use log::warn;

use crate::error::RenderError;
use crate::fsm::profile::{AssetId, Rgb};

/// Square bounding box of every state asset.
pub const ASSET_SIZE: u32 = 64;
/// Height of the title band at the top of the panel.
pub const TITLE_BAND_HEIGHT: u32 = 40;
/// Baseline for the title text.
const TITLE_BASELINE_Y: i32 = 27;

/// Asset glyph colours (fixed per asset, independent of the strip colour).
const ARMED_BLUE: Rgb = (40, 80, 255);
const DISARMED_GREEN: Rgb = (0, 200, 70);
const PENDING_ORANGE: Rgb = (255, 140, 0);
const TRIGGERED_RED: Rgb = (255, 30, 30);

fn to565((r, g, b): Rgb) -> Rgb565 {
    Rgb565::from(Rgb888::new(r, g, b))
}

/// Renders assets and titles onto a draw target.
pub struct PanelRenderer<D> {
    target: D,
}

impl<D> PanelRenderer<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    /// Access to the underlying target (flushing, inspection in tests).
    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    /// Draw a state asset with its top-left corner at (`x`, `y`).
    pub fn draw_asset(&mut self, asset: AssetId, x: i32, y: i32) -> Result<(), RenderError> {
        let area = Rectangle::new(Point::new(x, y), Size::new(ASSET_SIZE, ASSET_SIZE));
        let panel = self.target.bounding_box();
        if panel.intersection(&area) != area {
            return Err(RenderError::OutOfBounds);
        }

        // Clear the asset box, then draw the glyph.
        area.into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
            .draw(&mut self.target)
            .map_err(draw_failed)?;

        match asset {
            AssetId::Armed => self.draw_shield(x, y, to565(ARMED_BLUE), true),
            AssetId::Disarmed => self.draw_shield(x, y, to565(DISARMED_GREEN), false),
            AssetId::Pending => self.draw_hourglass(x, y, to565(PENDING_ORANGE)),
            AssetId::Triggered => self.draw_warning(x, y, to565(TRIGGERED_RED)),
        }
    }

    /// Replace the title band: black it out, then centre the text.
    pub fn draw_title(&mut self, text: &str) -> Result<(), RenderError> {
        let panel_width = self.target.bounding_box().size.width;
        Rectangle::new(Point::zero(), Size::new(panel_width, TITLE_BAND_HEIGHT))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
            .draw(&mut self.target)
            .map_err(draw_failed)?;

        let style = MonoTextStyle::new(&FONT_10X20, Rgb565::WHITE);
        Text::with_alignment(
            text,
            Point::new(panel_width as i32 / 2, TITLE_BASELINE_Y),
            style,
            Alignment::Center,
        )
        .draw(&mut self.target)
        .map_err(draw_failed)?;
        Ok(())
    }

    // ── Glyphs ────────────────────────────────────────────────

    fn draw_shield(&mut self, x: i32, y: i32, color: Rgb565, filled: bool) -> Result<(), RenderError> {
        let style = if filled {
            PrimitiveStyle::with_fill(color)
        } else {
            PrimitiveStyle::with_stroke(color, 3)
        };

        RoundedRectangle::new(
            Rectangle::new(Point::new(x + 8, y + 4), Size::new(48, 34)),
            CornerRadii::new(Size::new(6, 6)),
        )
        .into_styled(style)
        .draw(&mut self.target)
        .map_err(draw_failed)?;

        Triangle::new(
            Point::new(x + 8, y + 36),
            Point::new(x + 56, y + 36),
            Point::new(x + 32, y + 60),
        )
        .into_styled(style)
        .draw(&mut self.target)
        .map_err(draw_failed)?;
        Ok(())
    }

    fn draw_hourglass(&mut self, x: i32, y: i32, color: Rgb565) -> Result<(), RenderError> {
        let style = PrimitiveStyle::with_fill(color);
        Triangle::new(
            Point::new(x + 12, y + 4),
            Point::new(x + 52, y + 4),
            Point::new(x + 32, y + 30),
        )
        .into_styled(style)
        .draw(&mut self.target)
        .map_err(draw_failed)?;
        Triangle::new(
            Point::new(x + 32, y + 34),
            Point::new(x + 12, y + 60),
            Point::new(x + 52, y + 60),
        )
        .into_styled(style)
        .draw(&mut self.target)
        .map_err(draw_failed)?;
        Ok(())
    }

    fn draw_warning(&mut self, x: i32, y: i32, color: Rgb565) -> Result<(), RenderError> {
        Triangle::new(
            Point::new(x + 32, y + 2),
            Point::new(x + 2, y + 58),
            Point::new(x + 62, y + 58),
        )
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(&mut self.target)
        .map_err(draw_failed)?;

        // Exclamation mark.
        let white = PrimitiveStyle::with_fill(Rgb565::WHITE);
        Rectangle::new(Point::new(x + 29, y + 20), Size::new(6, 20))
            .into_styled(white)
            .draw(&mut self.target)
            .map_err(draw_failed)?;
        Rectangle::new(Point::new(x + 29, y + 46), Size::new(6, 6))
            .into_styled(white)
            .draw(&mut self.target)
            .map_err(draw_failed)?;
        Ok(())
    }
}

fn draw_failed<E: core::fmt::Debug>(e: E) -> RenderError {
    warn!("display: draw target error: {e:?}");
    RenderError::DrawFailed
}
