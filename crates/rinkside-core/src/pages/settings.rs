//! Settings screen: calibrate button plus status rows.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::config::FIRMWARE_VERSION;
use crate::pages::{NetStatus, back_button, fill_rect, fill_round_rect, fmt_label, text};
use crate::theme::{COLOR_ACCENT, COLOR_DIM, COLOR_GREEN, COLOR_RED, COLOR_TEXT};
use crate::touch::calibration::CalibrationTransform;

pub fn draw<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    status: &NetStatus,
    cal: &CalibrationTransform,
) -> Result<(), D::Error> {
    back_button(display)?;

    fill_rect(display, 60, 28, 260, 20, COLOR_DIM)?;
    text(display, "INSTALLNINGAR", 120, 42, COLOR_TEXT)?;

    // Calibrate button; its rect matches the navigation controller's hit
    // region.
    fill_round_rect(display, 20, 60, 280, 40, 5, COLOR_ACCENT)?;
    text(display, "KALIBRERA TOUCH", 100, 84, COLOR_TEXT)?;

    let mut y = 128;
    row(
        display,
        "Touch-kalibrering:",
        if cal.valid { "OK" } else { "EJ KALIBRERAD" },
        if cal.valid { COLOR_GREEN } else { COLOR_RED },
        y,
    )?;
    y += 25;

    row(
        display,
        "WiFi:",
        if status.wifi_connected { "Ansluten" } else { "Ej ansluten" },
        if status.wifi_connected { COLOR_GREEN } else { COLOR_RED },
        y,
    )?;
    y += 25;

    let version = fmt_label(format_args!("v{FIRMWARE_VERSION}"));
    row(display, "Firmware:", &version, COLOR_TEXT, y)?;
    y += 25;

    row(
        display,
        "Data:",
        if status.connection_ok { "OK" } else { "Offline" },
        if status.connection_ok { COLOR_GREEN } else { COLOR_RED },
        y,
    )?;

    text(
        display,
        "Hall inne 10s for att oppna denna meny",
        50,
        224,
        COLOR_DIM,
    )
}

fn row<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    label: &str,
    value: &str,
    value_color: Rgb565,
    y: i32,
) -> Result<(), D::Error> {
    text(display, label, 20, y, COLOR_DIM)?;
    text(display, value, 180, y, value_color)
}
