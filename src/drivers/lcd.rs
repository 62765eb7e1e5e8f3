//! ILI9342C LCD driver (SPI) for the panel display.
//!
//! Minimal: enough command coverage to initialise the controller and
//! expose it as an `embedded-graphics` `DrawTarget` for the renderer.
//! Backlight control is a separate LEDC channel (see
//! [`crate::drivers::backlight`]). Device-only — host tests render into
//! their own draw targets.

#[cfg(target_os = "espidf")]
mod esp {
    use embedded_graphics::Pixel;
    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::pixelcolor::raw::RawU16;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::Rectangle;
    use esp_idf_hal::delay::Delay;
    use esp_idf_hal::gpio::{AnyIOPin, Output, PinDriver};
    use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriver, config::Config};
    use esp_idf_hal::units::FromValueType;

    use crate::error::Error;
    use crate::pins;

    // Command subset.
    const CMD_SWRESET: u8 = 0x01;
    const CMD_SLPOUT: u8 = 0x11;
    const CMD_INVON: u8 = 0x21;
    const CMD_DISPON: u8 = 0x29;
    const CMD_CASET: u8 = 0x2A;
    const CMD_PASET: u8 = 0x2B;
    const CMD_RAMWR: u8 = 0x2C;
    const CMD_MADCTL: u8 = 0x36;
    const CMD_COLMOD: u8 = 0x3A;

    pub struct Ili9342<'d> {
        spi: SpiDeviceDriver<'d, SpiDriver<'d>>,
        dc: PinDriver<'d, AnyIOPin, Output>,
        rst: PinDriver<'d, AnyIOPin, Output>,
    }

    impl<'d> Ili9342<'d> {
        pub fn new(
            spi: SpiDeviceDriver<'d, SpiDriver<'d>>,
            dc: PinDriver<'d, AnyIOPin, Output>,
            rst: PinDriver<'d, AnyIOPin, Output>,
        ) -> Self {
            Self { spi, dc, rst }
        }

        /// Default SPI bus configuration for the panel (40 MHz, mode 0).
        pub fn spi_config() -> Config {
            Config::new().baudrate(40.MHz().into())
        }

        pub fn init(&mut self) -> Result<(), Error> {
            let delay = Delay::new_default();

            self.rst.set_low().map_err(|_| Error::Init("lcd reset"))?;
            delay.delay_ms(20);
            self.rst.set_high().map_err(|_| Error::Init("lcd reset"))?;
            delay.delay_ms(120);

            self.command(CMD_SWRESET, &[])?;
            delay.delay_ms(120);
            self.command(CMD_SLPOUT, &[])?;
            delay.delay_ms(120);
            self.command(CMD_COLMOD, &[0x55])?; // 16-bit colour
            self.command(CMD_MADCTL, &[0x08])?; // BGR order, no rotation
            self.command(CMD_INVON, &[])?; // panel wants inversion
            self.command(CMD_DISPON, &[])?;

            log::info!("lcd: ILI9342C initialised ({}x{})", pins::LCD_WIDTH, pins::LCD_HEIGHT);
            Ok(())
        }

        fn command(&mut self, cmd: u8, args: &[u8]) -> Result<(), Error> {
            self.dc.set_low().map_err(|_| Error::Init("lcd dc"))?;
            self.spi.write(&[cmd]).map_err(|_| Error::Init("lcd spi"))?;
            if !args.is_empty() {
                self.dc.set_high().map_err(|_| Error::Init("lcd dc"))?;
                self.spi.write(args).map_err(|_| Error::Init("lcd spi"))?;
            }
            Ok(())
        }

        fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Error> {
            self.command(CMD_CASET, &[(x0 >> 8) as u8, x0 as u8, (x1 >> 8) as u8, x1 as u8])?;
            self.command(CMD_PASET, &[(y0 >> 8) as u8, y0 as u8, (y1 >> 8) as u8, y1 as u8])?;
            self.command(CMD_RAMWR, &[])?;
            self.dc.set_high().map_err(|_| Error::Init("lcd dc"))
        }

        fn push_pixels(&mut self, raw: &[u8]) -> Result<(), Error> {
            self.spi.write(raw).map_err(|_| Error::Init("lcd spi"))
        }
    }

    impl OriginDimensions for Ili9342<'_> {
        fn size(&self) -> Size {
            Size::new(pins::LCD_WIDTH, pins::LCD_HEIGHT)
        }
    }

    impl DrawTarget for Ili9342<'_> {
        type Color = Rgb565;
        type Error = Error;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if point.x < 0
                    || point.y < 0
                    || point.x >= pins::LCD_WIDTH as i32
                    || point.y >= pins::LCD_HEIGHT as i32
                {
                    continue;
                }
                let (x, y) = (point.x as u16, point.y as u16);
                self.set_window(x, y, x, y)?;
                self.push_pixels(&RawU16::from(color).into_inner().to_be_bytes())?;
            }
            Ok(())
        }

        fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
            let bounds = Rectangle::new(Point::zero(), self.size());
            let area = area.intersection(&bounds);
            let Some(bottom_right) = area.bottom_right() else {
                return Ok(()); // zero-sized
            };

            self.set_window(
                area.top_left.x as u16,
                area.top_left.y as u16,
                bottom_right.x as u16,
                bottom_right.y as u16,
            )?;

            let raw = RawU16::from(color).into_inner().to_be_bytes();
            let mut chunk = [0u8; 256];
            for pair in chunk.chunks_exact_mut(2) {
                pair.copy_from_slice(&raw);
            }
            let mut remaining = area.size.width as usize * area.size.height as usize * 2;
            while remaining > 0 {
                let n = remaining.min(chunk.len());
                self.push_pixels(&chunk[..n])?;
                remaining -= n;
            }
            Ok(())
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::Ili9342;
