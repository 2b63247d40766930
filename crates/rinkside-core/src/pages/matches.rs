//! Upcoming matches list.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::config::VISIBLE_MATCHES;
use crate::model::{MatchInfo, MatchStatus, PanelData};
use crate::pages::{
    fill_round_rect, fmt_label, league_badge, scroll_arrows, text, title_bar,
};
use crate::theme::{COLOR_ACCENT, COLOR_DIM, COLOR_GREEN, COLOR_HEADER, COLOR_RED, COLOR_TEXT};

const CARD_START_Y: i32 = 50;
const CARD_STRIDE: i32 = 42;

pub fn draw<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    data: &PanelData,
    scroll_offset: usize,
) -> Result<(), D::Error> {
    title_bar(display, "Kommande matcher", COLOR_ACCENT)?;

    let upcoming_count = data.upcoming_count();
    if upcoming_count == 0 {
        return text(display, "Inga matcher", 100, 128, COLOR_DIM);
    }

    scroll_arrows(
        display,
        scroll_offset > 0,
        scroll_offset + VISIBLE_MATCHES < upcoming_count,
    )?;

    for (row, m) in data
        .upcoming()
        .skip(scroll_offset)
        .take(VISIBLE_MATCHES)
        .enumerate()
    {
        draw_card(display, m, CARD_START_Y + row as i32 * CARD_STRIDE)?;
    }
    Ok(())
}

fn draw_card<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    m: &MatchInfo,
    y: i32,
) -> Result<(), D::Error> {
    fill_round_rect(display, 5, y, 280, 38, 4, COLOR_HEADER)?;
    league_badge(display, m.league, 8, y + 3, 22)?;

    text(display, &m.home, 35, y + 12, COLOR_TEXT)?;
    text(display, &m.away, 35, y + 29, COLOR_TEXT)?;

    match (m.home_score, m.away_score) {
        (Some(home), Some(away)) => {
            let score = fmt_label(format_args!("{home} - {away}"));
            text(display, &score, 200, y + 20, COLOR_ACCENT)?;
            if m.status == MatchStatus::Live {
                text(display, "LIVE", 265, y + 24, COLOR_RED)?;
            }
        }
        _ => {
            text(display, &m.time, 220, y + 20, COLOR_GREEN)?;
        }
    }
    Ok(())
}
