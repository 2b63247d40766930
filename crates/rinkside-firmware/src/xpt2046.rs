//! XPT2046 resistive touch controller driver.
//!
//! The XPT2046 is a 12-bit ADC behind SPI. Each conversion is requested with
//! a control byte (start bit, channel select, 12-bit mode, differential) and
//! clocked out in the following two bytes, left-aligned. Position channels
//! are read differentially per the datasheet's accuracy recommendation.
//!
//! The driver is polled: `sample()` returns the averaged raw position while
//! the panel reports enough contact pressure, `None` otherwise. Pen-down
//! gating uses the PENIRQ line when the board wires it out, which saves an
//! SPI transaction per idle poll.

use embedded_hal::digital::InputPin;
use embedded_hal::spi::SpiDevice;

use rinkside_core::touch::RawPoint;

/// Control bytes: start bit, channel, 12-bit differential, power-down with
/// PENIRQ enabled.
const CMD_READ_X: u8 = 0x90;
const CMD_READ_Y: u8 = 0xD0;
const CMD_READ_Z1: u8 = 0xB0;

/// Minimum Z1 pressure reading to count as contact. Readings below this are
/// noise from a floating panel.
const PRESSURE_THRESHOLD: u16 = 100;

/// Position samples averaged per `sample()` call.
const SAMPLE_COUNT: u16 = 4;

/// XPT2046 over a shared-bus SPI device plus the PENIRQ input.
pub struct Xpt2046<SPI, IRQ> {
    spi: SPI,
    irq: IRQ,
}

impl<SPI, IRQ> Xpt2046<SPI, IRQ>
where
    SPI: SpiDevice,
    IRQ: InputPin,
{
    pub fn new(spi: SPI, irq: IRQ) -> Self {
        Self { spi, irq }
    }

    /// One raw position sample, or `None` when the panel is untouched or the
    /// bus errored. Bus errors are indistinguishable from "no contact" to
    /// callers on purpose; a transient SPI glitch should read as a missed
    /// poll, not a crash.
    pub fn sample(&mut self) -> Option<RawPoint> {
        // PENIRQ is active low while the panel is pressed.
        if self.irq.is_high().unwrap_or(false) {
            return None;
        }
        if self.read_channel(CMD_READ_Z1).ok()? < PRESSURE_THRESHOLD {
            return None;
        }

        let mut x_acc: u32 = 0;
        let mut y_acc: u32 = 0;
        for _ in 0..SAMPLE_COUNT {
            x_acc += u32::from(self.read_channel(CMD_READ_X).ok()?);
            y_acc += u32::from(self.read_channel(CMD_READ_Y).ok()?);
        }
        Some(RawPoint::new(
            (x_acc / u32::from(SAMPLE_COUNT)) as u16,
            (y_acc / u32::from(SAMPLE_COUNT)) as u16,
        ))
    }

    /// Request one conversion and return the 12-bit result.
    fn read_channel(&mut self, command: u8) -> Result<u16, SPI::Error> {
        let mut frame = [command, 0, 0];
        self.spi.transfer_in_place(&mut frame)?;
        // Result arrives left-aligned across the two trailing bytes.
        Ok((u16::from(frame[1]) << 8 | u16::from(frame[2])) >> 3)
    }
}
