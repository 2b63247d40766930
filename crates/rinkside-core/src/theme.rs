//! RGB565 palette for the panel UI.
//!
//! Components are given directly in 565 precision (5-bit red, 6-bit green,
//! 5-bit blue).

use embedded_graphics::pixelcolor::Rgb565;

use crate::model::League;

/// Screen background - near-black blue-gray.
pub const COLOR_BG: Rgb565 = Rgb565::new(2, 4, 2);

/// Header strip and row striping - dark slate.
pub const COLOR_HEADER: Rgb565 = Rgb565::new(5, 10, 5);

/// Primary text - white.
pub const COLOR_TEXT: Rgb565 = Rgb565::new(31, 63, 31);

/// Accent - warm orange, used for points, arrows, and the wizard crosshair.
pub const COLOR_ACCENT: Rgb565 = Rgb565::new(31, 41, 0);

/// Positive values and "OK" status.
pub const COLOR_GREEN: Rgb565 = Rgb565::new(0, 63, 0);

/// Negative values, errors, offline banner.
pub const COLOR_RED: Rgb565 = Rgb565::new(31, 0, 0);

/// SHL league badge - blue.
pub const COLOR_SHL: Rgb565 = Rgb565::new(0, 0, 31);

/// HockeyAllsvenskan league badge - dark green.
pub const COLOR_HA: Rgb565 = Rgb565::new(0, 50, 0);

/// Secondary/disabled text - medium gray.
pub const COLOR_DIM: Rgb565 = Rgb565::new(15, 31, 15);

/// Badge color for a league tag.
pub const fn league_color(league: League) -> Rgb565 {
    match league {
        League::Shl => COLOR_SHL,
        League::Allsvenskan => COLOR_HA,
    }
}

/// Jersey color for the dot next to a team row.
///
/// Matched by substring so the backend's spelling variants (diacritics get
/// mangled in transit) still hit. Unknown teams fall back to gray.
pub fn team_color(name: &str) -> Rgb565 {
    const TABLE: &[(&str, Rgb565)] = &[
        ("lunda", Rgb565::new(0, 16, 0)),
        ("Skellefte", Rgb565::new(31, 63, 0)),
        ("rjestad", Rgb565::new(31, 63, 0)),
        ("ster", Rgb565::new(31, 63, 0)),
        ("Malm", COLOR_RED),
        ("Lule", COLOR_RED),
        ("Timr", COLOR_RED),
        ("MoDo", COLOR_RED),
        ("Mora", COLOR_RED),
        ("Bryn", Rgb565::new(24, 0, 0)),
        ("Djurg", COLOR_SHL),
        ("ping", COLOR_SHL),
        ("HV71", COLOR_SHL),
        ("Leksand", COLOR_SHL),
        ("sby", COLOR_SHL),
        ("AIK", Rgb565::new(0, 0, 0)),
        ("SSK", Rgb565::new(0, 0, 0)),
        ("Oskarshamn", COLOR_ACCENT),
        ("Nybro", COLOR_ACCENT),
        ("Karlskoga", COLOR_RED),
        ("rkl", COLOR_GREEN),
        ("Vita", COLOR_TEXT),
    ];

    for (needle, color) in TABLE {
        if name.contains(needle) {
            return *color;
        }
    }
    COLOR_DIM
}
