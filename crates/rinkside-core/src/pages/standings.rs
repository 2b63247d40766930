//! League standings table.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::config::VISIBLE_TEAMS;
use crate::model::{League, PanelData};
use crate::pages::{fill_rect, fmt_label, scroll_arrows, scroll_position, text, title_bar};
use crate::theme::{
    COLOR_ACCENT, COLOR_GREEN, COLOR_HEADER, COLOR_RED, COLOR_TEXT, league_color, team_color,
};

const ROW_START_Y: i32 = 63;
const ROW_HEIGHT: i32 = 19;
const ROW_WIDTH: u32 = 270;

pub fn draw<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    data: &PanelData,
    league: League,
    scroll_offset: usize,
) -> Result<(), D::Error> {
    let teams = data.table(league);
    title_bar(display, league.full_name(), league_color(league))?;

    // Column headers.
    text(display, "#", 5, 56, COLOR_ACCENT)?;
    text(display, "LAG", 22, 56, COLOR_ACCENT)?;
    text(display, "S", 175, 56, COLOR_ACCENT)?;
    text(display, "+/-", 200, 56, COLOR_ACCENT)?;
    text(display, "P", 240, 56, COLOR_ACCENT)?;
    fill_rect(display, 0, 60, ROW_WIDTH, 1, COLOR_HEADER)?;

    scroll_arrows(
        display,
        scroll_offset > 0,
        scroll_offset + VISIBLE_TEAMS < teams.len(),
    )?;

    let end = (scroll_offset + VISIBLE_TEAMS).min(teams.len());
    for (row, team) in teams[scroll_offset..end].iter().enumerate() {
        let y = ROW_START_Y + row as i32 * ROW_HEIGHT;

        if row % 2 == 1 {
            fill_rect(display, 0, y - 1, ROW_WIDTH, 18, COLOR_HEADER)?;
        }

        let baseline = y + 9;
        let rank = fmt_label(format_args!("{:2}", team.position));
        text(display, &rank, 5, baseline, COLOR_TEXT)?;

        embedded_graphics::primitives::Circle::with_center(Point::new(30, y + 5), 10)
            .into_styled(embedded_graphics::primitives::PrimitiveStyle::with_fill(
                team_color(&team.name),
            ))
            .draw(display)?;

        text(display, &team.name, 40, baseline, COLOR_TEXT)?;

        let played = fmt_label(format_args!("{:2}", team.played));
        text(display, &played, 175, baseline, COLOR_TEXT)?;

        let gd_color = match team.goal_diff {
            d if d > 0 => COLOR_GREEN,
            d if d < 0 => COLOR_RED,
            _ => COLOR_TEXT,
        };
        let gd = fmt_label(format_args!("{:+3}", team.goal_diff));
        text(display, &gd, 195, baseline, gd_color)?;

        let points = fmt_label(format_args!("{:3}", team.points));
        text(display, &points, 238, baseline, COLOR_ACCENT)?;
    }

    scroll_position(display, scroll_offset, teams.len(), VISIBLE_TEAMS)
}
