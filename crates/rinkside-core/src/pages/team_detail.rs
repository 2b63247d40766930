//! Single-team detail screen with season stats and playoff outlook.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::model::{PanelData, Team};
use crate::nav::NavState;
use crate::pages::{back_button, fill_rect, fmt_label, text};
use crate::theme::{
    COLOR_ACCENT, COLOR_DIM, COLOR_GREEN, COLOR_RED, COLOR_TEXT, team_color,
};

const COL1_X: i32 = 15;
const COL2_X: i32 = 165;
const LINE_HEIGHT: i32 = 18;

pub fn draw<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    data: &PanelData,
    nav: &NavState,
) -> Result<(), D::Error> {
    let Some(team) = data.table(nav.selected_league).get(nav.selected_team) else {
        return text(display, "Laget saknas", 100, 128, COLOR_DIM);
    };

    back_button(display)?;

    // Banner in the team's color.
    let banner = team_color(&team.name);
    fill_rect(display, 0, 55, 320, 35, banner)?;
    let heading = fmt_label(format_args!("#{} {}", team.position, team.name));
    text(display, &heading, 10, 70, COLOR_TEXT)?;
    text(display, nav.selected_league.full_name(), 10, 85, COLOR_TEXT)?;

    let mut y = 106;
    stat(display, "Matcher:", &fmt_label(format_args!("{}", team.played)), COL1_X, y, COLOR_TEXT)?;
    stat(display, "Poang:", &fmt_label(format_args!("{}", team.points)), COL2_X, y, COLOR_ACCENT)?;
    y += LINE_HEIGHT;

    stat(display, "Vinster:", &fmt_label(format_args!("{}", team.wins)), COL1_X, y, COLOR_GREEN)?;
    stat(display, "Forluster:", &fmt_label(format_args!("{}", team.losses)), COL2_X, y, COLOR_RED)?;
    y += LINE_HEIGHT;

    stat(display, "OT/SO:", &fmt_label(format_args!("{}", team.ot_wins)), COL1_X, y, COLOR_TEXT)?;
    let gd_color = match team.goal_diff {
        d if d > 0 => COLOR_GREEN,
        d if d < 0 => COLOR_RED,
        _ => COLOR_TEXT,
    };
    stat(display, "+/-:", &fmt_label(format_args!("{:+}", team.goal_diff)), COL2_X, y, gd_color)?;
    y += LINE_HEIGHT;

    if team.played > 0 {
        // Fixed-point points-per-game, two decimals without float formatting.
        let centi = i32::from(team.points) * 100 / i32::from(team.played);
        let ppg = fmt_label(format_args!("{}.{:02}", centi / 100, centi % 100));
        stat(display, "P/match:", &ppg, COL1_X, y, COLOR_TEXT)?;

        let win_pct = i32::from(team.wins) * 100 / i32::from(team.played);
        stat(display, "Vinst%:", &fmt_label(format_args!("{win_pct}%")), COL2_X, y, COLOR_TEXT)?;
    }
    y += LINE_HEIGHT + 8;

    fill_rect(display, 10, y, 300, 2, banner)?;
    y += 16;

    let (label, color) = playoff_status(team);
    text(display, label, COL1_X, y, color)
}

fn stat<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    label: &str,
    value: &str,
    x: i32,
    y: i32,
    value_color: Rgb565,
) -> Result<(), D::Error> {
    text(display, label, x, y, COLOR_DIM)?;
    text(display, value, x + 70, y, value_color)
}

/// Playoff outlook line for the table position. Both leagues use the same
/// cutoffs: top six go straight through, seven through ten play in, the
/// bottom two risk relegation.
fn playoff_status(team: &Team) -> (&'static str, Rgb565) {
    match team.position {
        1..=6 => ("SLUTSPEL - Direktplats", COLOR_GREEN),
        7..=10 => ("PLAY-IN - Kval till slutspel", COLOR_ACCENT),
        11..=12 => ("Utanfor slutspel", COLOR_DIM),
        _ => ("KVAL - Nedflyttningsrisk", COLOR_RED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Team;

    fn team_at(position: u8) -> Team {
        Team {
            position,
            ..Team::default()
        }
    }

    #[test]
    fn playoff_cutoffs() {
        assert_eq!(playoff_status(&team_at(1)).0, "SLUTSPEL - Direktplats");
        assert_eq!(playoff_status(&team_at(6)).0, "SLUTSPEL - Direktplats");
        assert_eq!(playoff_status(&team_at(7)).0, "PLAY-IN - Kval till slutspel");
        assert_eq!(playoff_status(&team_at(11)).0, "Utanfor slutspel");
        assert_eq!(playoff_status(&team_at(13)).0, "KVAL - Nedflyttningsrisk");
    }
}
