//! Screen rendering.
//!
//! Every screen is a plain draw function over the current data snapshot and
//! navigation state; nothing here mutates state or reads pixels back. The
//! firmware and simulator call [`draw_screen`] whenever the navigation
//! controller reports a change.

pub mod calibrate;
pub mod matches;
pub mod news;
pub mod settings;
pub mod standings;
pub mod team_detail;

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, PrimitiveStyle, Rectangle, RoundedRectangle, Triangle},
    text::Text,
};
use heapless::String;

use crate::config::{SCREEN_WIDTH, TAB_BAR_HEIGHT, TAB_COUNT};
use crate::model::{League, PanelData};
use crate::nav::{NavState, Screen};
use crate::theme::{
    COLOR_ACCENT, COLOR_BG, COLOR_DIM, COLOR_GREEN, COLOR_HA, COLOR_HEADER, COLOR_RED, COLOR_SHL,
    COLOR_TEXT, league_color,
};
use crate::touch::calibration::CalibrationTransform;
use crate::touch::wizard::CalibrationWizard;

/// Connectivity summary shown in the header dot, offline banner, and
/// settings rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetStatus {
    /// Last fetch succeeded.
    pub connection_ok: bool,
    /// No successful fetch within the staleness threshold.
    pub timed_out: bool,
    /// Minutes since the last successful fetch, for the banner.
    pub offline_minutes: u64,
    /// Wi-Fi link is up.
    pub wifi_connected: bool,
}

/// Scratch buffer for formatted labels.
pub(crate) type Label = String<40>;

pub(crate) fn fmt_label(args: core::fmt::Arguments<'_>) -> Label {
    let mut s = Label::new();
    s.write_fmt(args).ok();
    s
}

/// Render the active screen in full.
pub fn draw_screen<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    nav: &NavState,
    data: &PanelData,
    status: &NetStatus,
    cal: &CalibrationTransform,
    wizard: &CalibrationWizard,
) -> Result<(), D::Error> {
    if nav.current == Screen::Calibrate {
        return calibrate::draw(display, wizard);
    }

    display.clear(COLOR_BG)?;
    draw_header(display, nav, status)?;

    match nav.current {
        Screen::StandingsShl => standings::draw(display, data, League::Shl, nav.scroll_offset)?,
        Screen::StandingsAllsvenskan => {
            standings::draw(display, data, League::Allsvenskan, nav.scroll_offset)?
        }
        Screen::Upcoming => matches::draw(display, data, nav.scroll_offset)?,
        Screen::News => news::draw(display, data, nav.scroll_offset)?,
        Screen::NewsDetail => news::draw_detail(display, data, nav.selected_news)?,
        Screen::TeamDetail => team_detail::draw(display, data, nav)?,
        Screen::Settings => settings::draw(display, status, cal)?,
        Screen::Calibrate => {}
    }

    draw_offline_banner(display, nav, status)?;
    Ok(())
}

/// Top tab strip plus the connectivity dot.
fn draw_header<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    nav: &NavState,
    status: &NetStatus,
) -> Result<(), D::Error> {
    fill_rect(display, 0, 0, SCREEN_WIDTH as u32, TAB_BAR_HEIGHT as u32, COLOR_HEADER)?;

    const LABELS: [&str; TAB_COUNT] = ["SHL", "HA", "NASTA", "NEWS"];
    const COLORS: [Rgb565; TAB_COUNT] = [COLOR_SHL, COLOR_HA, COLOR_ACCENT, COLOR_ACCENT];
    let tab_width = SCREEN_WIDTH / TAB_COUNT as u16;

    let active_tab = match nav.current {
        Screen::StandingsShl => Some(0),
        Screen::StandingsAllsvenskan => Some(1),
        Screen::Upcoming => Some(2),
        Screen::News | Screen::NewsDetail => Some(3),
        // Team detail keeps its originating table highlighted.
        Screen::TeamDetail => Some(match nav.selected_league {
            League::Shl => 0,
            League::Allsvenskan => 1,
        }),
        _ => None,
    };

    for (i, label) in LABELS.iter().enumerate() {
        let x = i as u16 * tab_width;
        let color = if active_tab == Some(i) {
            fill_rect(display, x as i32, 0, tab_width as u32, TAB_BAR_HEIGHT as u32, COLORS[i])?;
            COLOR_TEXT
        } else {
            COLOR_DIM
        };
        text(display, label, x as i32 + 8, 18, color)?;
    }

    // Connectivity dot in the strip's right edge.
    let dot_color = if status.timed_out {
        COLOR_RED
    } else if status.connection_ok {
        COLOR_GREEN
    } else {
        COLOR_ACCENT
    };
    Circle::with_center(Point::new(305, 14), 14)
        .into_styled(PrimitiveStyle::with_fill(dot_color))
        .draw(display)?;
    Circle::with_center(Point::new(305, 14), 14)
        .into_styled(PrimitiveStyle::with_stroke(COLOR_TEXT, 1))
        .draw(display)?;
    Ok(())
}

/// Red strip along the bottom once data goes stale. Settings and the wizard
/// keep their full height.
fn draw_offline_banner<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    nav: &NavState,
    status: &NetStatus,
) -> Result<(), D::Error> {
    if !status.timed_out || matches!(nav.current, Screen::Settings | Screen::Calibrate) {
        return Ok(());
    }
    fill_rect(display, 0, 222, SCREEN_WIDTH as u32, 18, COLOR_RED)?;
    let label = fmt_label(format_args!("OFFLINE - {} min", status.offline_minutes));
    text(display, &label, 10, 234, COLOR_TEXT)
}

// ---------------------------------------------------------------------------
// Shared drawing helpers
// ---------------------------------------------------------------------------

pub(crate) fn fill_rect<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    color: Rgb565,
) -> Result<(), D::Error> {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
}

pub(crate) fn fill_round_rect<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    radius: u32,
    color: Rgb565,
) -> Result<(), D::Error> {
    RoundedRectangle::with_equal_corners(
        Rectangle::new(Point::new(x, y), Size::new(w, h)),
        Size::new(radius, radius),
    )
    .into_styled(PrimitiveStyle::with_fill(color))
    .draw(display)
}

/// 6x10 text with its baseline at `y`.
pub(crate) fn text<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    s: &str,
    x: i32,
    y: i32,
    color: Rgb565,
) -> Result<(), D::Error> {
    Text::new(s, Point::new(x, y), MonoTextStyle::new(&FONT_6X10, color)).draw(display)?;
    Ok(())
}

/// Section title bar under the tab strip.
pub(crate) fn title_bar<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    title: &str,
    accent: Rgb565,
) -> Result<(), D::Error> {
    fill_rect(display, 0, TAB_BAR_HEIGHT as i32, SCREEN_WIDTH as u32, 16, accent)?;
    text(display, title, 5, 39, COLOR_TEXT)
}

/// "< BACK" button in the standard top-left slot.
pub(crate) fn back_button<D: DrawTarget<Color = Rgb565>>(display: &mut D) -> Result<(), D::Error> {
    fill_round_rect(display, 5, 32, 50, 20, 3, COLOR_HEADER)?;
    text(display, "< BACK", 12, 45, COLOR_TEXT)
}

/// Small colored league badge with its label.
pub(crate) fn league_badge<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    league: League,
    x: i32,
    y: i32,
    w: u32,
) -> Result<(), D::Error> {
    fill_round_rect(display, x, y, w, 12, 2, league_color(league))?;
    text(display, league.label(), x + 4, y + 9, COLOR_TEXT)
}

/// Up/down scroll arrows at the right edge of a list.
pub(crate) fn scroll_arrows<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    can_scroll_up: bool,
    can_scroll_down: bool,
) -> Result<(), D::Error> {
    if can_scroll_up {
        Triangle::new(Point::new(295, 50), Point::new(300, 45), Point::new(305, 50))
            .into_styled(PrimitiveStyle::with_fill(COLOR_ACCENT))
            .draw(display)?;
    }
    if can_scroll_down {
        Triangle::new(Point::new(295, 210), Point::new(300, 215), Point::new(305, 210))
            .into_styled(PrimitiveStyle::with_fill(COLOR_ACCENT))
            .draw(display)?;
    }
    Ok(())
}

/// "current/total" scroll position indicator.
pub(crate) fn scroll_position<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    scroll_offset: usize,
    count: usize,
    visible: usize,
) -> Result<(), D::Error> {
    let total = count.saturating_sub(visible) + 1;
    let current = (scroll_offset + 1).min(total);
    let label = fmt_label(format_args!("{current}/{total}"));
    text(display, &label, 280, 148, COLOR_DIM)
}
