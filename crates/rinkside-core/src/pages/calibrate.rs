//! Calibration wizard screen: instructions and the current corner crosshair.

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle},
};

use crate::pages::{fmt_label, text};
use crate::theme::{COLOR_ACCENT, COLOR_BG, COLOR_DIM, COLOR_RED, COLOR_TEXT};
use crate::touch::wizard::CalibrationWizard;

pub fn draw<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    wizard: &CalibrationWizard,
) -> Result<(), D::Error> {
    display.clear(COLOR_BG)?;

    text(display, "TOUCH-KALIBRERING", 60, 110, COLOR_TEXT)?;
    text(display, "Tryck pa korset med pennan", 40, 140, COLOR_TEXT)?;

    let step = fmt_label(format_args!("Steg {} av 4", wizard.step() + 1));
    text(display, &step, 90, 160, COLOR_DIM)?;

    let target = wizard.target();
    crosshair(display, i32::from(target.x), i32::from(target.y))?;

    text(display, "Haller i 3s for att avbryta", 80, 220, COLOR_DIM)
}

fn crosshair<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    x: i32,
    y: i32,
) -> Result<(), D::Error> {
    let accent = PrimitiveStyle::with_stroke(COLOR_ACCENT, 1);
    Line::new(Point::new(x - 15, y), Point::new(x + 15, y))
        .into_styled(accent)
        .draw(display)?;
    Line::new(Point::new(x, y - 15), Point::new(x, y + 15))
        .into_styled(accent)
        .draw(display)?;
    Circle::with_center(Point::new(x, y), 16)
        .into_styled(accent)
        .draw(display)?;
    Circle::with_center(Point::new(x, y), 6)
        .into_styled(PrimitiveStyle::with_fill(COLOR_RED))
        .draw(display)?;
    Ok(())
}
