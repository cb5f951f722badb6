//! Display control module for PineTime

use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26},
    spim::{self, Spim},
};
use embassy_time::Delay;

use display_interface_spi::SPIInterface;
use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use mipidsi::{models::ST7789, Builder, Orientation};
use watchface::{engine::DrawError, Engine, Host, WatchFace};

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

type Lcd<'a, SPI> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

/// ST7789 panel the watch face is drawn on
pub struct Display<'a, SPI>
where
    SPI: spim::Instance,
{
    lcd: Lcd<'a, SPI>,
}

impl<'a, SPI> Display<'a, SPI>
where
    SPI: spim::Instance,
{
    /// Initialize the display
    pub fn init(
        spim: Spim<'a, SPI>,
        cs: Output<'a, P0_25>,
        dc: Output<'a, P0_18>,
        rst: Output<'a, P0_26>,
        delay: &mut Delay,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc, cs))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(delay, Some(rst))
            .map_err(|_| Error::Init)?;

        let mut display = Self { lcd };
        display.clear()?;
        Ok(display)
    }

    /// Clear the display
    pub fn clear(&mut self) -> Result<(), Error> {
        self.lcd.clear(Rgb565::BLACK).map_err(|_| Error::Draw)
    }

    /// Full panel size; the face ignores insets
    pub fn bounds(&self) -> Size {
        Size::new(LCD_W as u32, LCD_H as u32)
    }

    /// Let the engine paint the current frame
    pub fn draw_face<H: Host, F: WatchFace>(
        &mut self,
        engine: &mut Engine<H, F>,
    ) -> Result<(), Error> {
        let bounds = self.bounds();
        engine.draw(&mut self.lcd, bounds).map_err(|error| match error {
            DrawError::Frame(_) => Error::Frame,
            DrawError::Target(_) => Error::Draw,
        })
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    /// Panel did not come out of reset
    Init,
    /// SPI transfer failed
    Draw,
    /// Frame did not fit the command buffer
    Frame,
}
