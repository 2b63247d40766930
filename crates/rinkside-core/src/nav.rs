//! Screen navigation state machine.
//!
//! Consumes dispatched touch events and mutates a single [`NavState`]. Hit
//! regions are tested in fixed priority order: scroll strip, tab bar, back
//! button, then screen-specific items; anything else is absorbed. A
//! long-press anywhere jumps to the settings screen regardless of region.

use log::debug;

use crate::config::{
    SCREEN_HEIGHT, SCREEN_WIDTH, SCROLL_STRIP_WIDTH, TAB_BAR_HEIGHT, TAB_COUNT, VISIBLE_MATCHES,
    VISIBLE_NEWS, VISIBLE_TEAMS,
};
use crate::model::League;
use crate::touch::{ScreenPoint, TouchEvent};

/// Every screen the panel can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    StandingsShl,
    StandingsAllsvenskan,
    Upcoming,
    News,
    NewsDetail,
    TeamDetail,
    Settings,
    Calibrate,
}

impl Screen {
    /// Tab index for the top-level screens, `None` for detail screens.
    fn tab_index(self) -> Option<usize> {
        match self {
            Screen::StandingsShl => Some(0),
            Screen::StandingsAllsvenskan => Some(1),
            Screen::Upcoming => Some(2),
            Screen::News => Some(3),
            _ => None,
        }
    }

    fn from_tab(index: usize) -> Screen {
        match index {
            0 => Screen::StandingsShl,
            1 => Screen::StandingsAllsvenskan,
            2 => Screen::Upcoming,
            _ => Screen::News,
        }
    }
}

/// Item counts the controller needs for scroll bounds and row hit tests.
/// Derived from the current data snapshot by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemCounts {
    pub shl_teams: usize,
    pub allsvenskan_teams: usize,
    pub upcoming_matches: usize,
    pub news: usize,
}

/// Mutable navigation state, owned by the [`Navigator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NavState {
    pub current: Screen,
    pub previous: Screen,
    pub scroll_offset: usize,
    pub selected_team: usize,
    pub selected_league: League,
    pub selected_news: usize,
}

/// What the caller must do after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Event absorbed without a state change.
    Ignored,
    /// State changed; redraw.
    Changed,
    /// The settings calibrate button was hit; enter the wizard and redraw.
    StartWizard,
}

/// Back button rectangle shared by the detail screens.
const BACK_X_MAX: u16 = 60;
const BACK_Y_MIN: u16 = 30;
const BACK_Y_MAX: u16 = 55;

/// Navigation controller. All screen state lives here; the firmware and
/// simulator own one instance each and route every dispatched event through
/// [`Navigator::handle_event`].
#[derive(Debug, Default)]
pub struct Navigator {
    pub state: NavState,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump straight to a screen, resetting scroll. Used for the wizard's
    /// exit transitions and the first-start flow.
    pub fn go_to(&mut self, screen: Screen) {
        if self.state.current != screen {
            self.state.previous = self.state.current;
        }
        self.state.current = screen;
        self.state.scroll_offset = 0;
    }

    pub fn handle_event(&mut self, event: TouchEvent, counts: &ItemCounts) -> NavOutcome {
        match event {
            TouchEvent::LongPress(_) => {
                if self.state.current == Screen::Settings {
                    return NavOutcome::Ignored;
                }
                debug!("long press -> settings");
                self.go_to(Screen::Settings);
                NavOutcome::Changed
            }
            TouchEvent::Tap(point) => self.handle_tap(point, counts),
        }
    }

    fn handle_tap(&mut self, point: ScreenPoint, counts: &ItemCounts) -> NavOutcome {
        if let Some(outcome) = self.scroll_strip_hit(point, counts) {
            return outcome;
        }
        if let Some(outcome) = self.tab_bar_hit(point) {
            return outcome;
        }
        if let Some(outcome) = self.back_button_hit(point) {
            return outcome;
        }
        if let Some(outcome) = self.item_hit(point, counts) {
            return outcome;
        }
        NavOutcome::Ignored
    }

    /// Counts and page size for the current screen's list, if it scrolls.
    fn scroll_bounds(&self, counts: &ItemCounts) -> Option<(usize, usize)> {
        match self.state.current {
            Screen::StandingsShl => Some((counts.shl_teams, VISIBLE_TEAMS)),
            Screen::StandingsAllsvenskan => Some((counts.allsvenskan_teams, VISIBLE_TEAMS)),
            Screen::Upcoming => Some((counts.upcoming_matches, VISIBLE_MATCHES)),
            Screen::News => Some((counts.news, VISIBLE_NEWS)),
            _ => None,
        }
    }

    fn scroll_strip_hit(&mut self, point: ScreenPoint, counts: &ItemCounts) -> Option<NavOutcome> {
        if point.x < SCREEN_WIDTH - SCROLL_STRIP_WIDTH || point.y < TAB_BAR_HEIGHT {
            return None;
        }
        let (count, visible) = self.scroll_bounds(counts)?;
        let max_offset = count.saturating_sub(visible);

        let midpoint = TAB_BAR_HEIGHT + (SCREEN_HEIGHT - TAB_BAR_HEIGHT) / 2;
        let target = if point.y < midpoint {
            self.state.scroll_offset.saturating_sub(1)
        } else {
            (self.state.scroll_offset + 1).min(max_offset)
        };

        if target == self.state.scroll_offset {
            return Some(NavOutcome::Ignored);
        }
        self.state.scroll_offset = target;
        Some(NavOutcome::Changed)
    }

    fn tab_bar_hit(&mut self, point: ScreenPoint) -> Option<NavOutcome> {
        if point.y >= TAB_BAR_HEIGHT {
            return None;
        }
        // No tab bar on settings or inside the wizard.
        if matches!(self.state.current, Screen::Settings | Screen::Calibrate) {
            return None;
        }
        let tab = tab_at(point.x, TAB_COUNT);
        let target = Screen::from_tab(tab);
        if self.state.current == target {
            return Some(NavOutcome::Ignored);
        }
        self.go_to(target);
        Some(NavOutcome::Changed)
    }

    fn back_button_hit(&mut self, point: ScreenPoint) -> Option<NavOutcome> {
        if point.x >= BACK_X_MAX || point.y <= BACK_Y_MIN || point.y >= BACK_Y_MAX {
            return None;
        }
        let target = match self.state.current {
            Screen::TeamDetail => self.state.previous,
            Screen::NewsDetail => Screen::News,
            Screen::Settings => Screen::StandingsShl,
            _ => return None,
        };
        self.go_to(target);
        Some(NavOutcome::Changed)
    }

    fn item_hit(&mut self, point: ScreenPoint, counts: &ItemCounts) -> Option<NavOutcome> {
        match self.state.current {
            Screen::Settings => {
                if point.x > 20 && point.x < 300 && point.y > 60 && point.y < 100 {
                    self.go_to(Screen::Calibrate);
                    return Some(NavOutcome::StartWizard);
                }
                None
            }
            Screen::News => {
                if point.x < 305 && point.y > 50 && point.y < 220 {
                    let row = usize::from(point.y.saturating_sub(50)) / 34;
                    let index = self.state.scroll_offset + row;
                    if index < counts.news {
                        self.state.selected_news = index;
                        self.go_to(Screen::NewsDetail);
                        return Some(NavOutcome::Changed);
                    }
                }
                None
            }
            Screen::StandingsShl | Screen::StandingsAllsvenskan => {
                if point.x < 270 && point.y > 60 && point.y < 220 {
                    let row = usize::from(point.y.saturating_sub(63)) / 19;
                    // The region runs a few pixels past the last drawn row;
                    // taps in that strip hit no row.
                    if row >= VISIBLE_TEAMS {
                        return None;
                    }
                    let index = self.state.scroll_offset + row;
                    let league = if self.state.current == Screen::StandingsShl {
                        League::Shl
                    } else {
                        League::Allsvenskan
                    };
                    let count = match league {
                        League::Shl => counts.shl_teams,
                        League::Allsvenskan => counts.allsvenskan_teams,
                    };
                    if index < count {
                        self.state.selected_team = index;
                        self.state.selected_league = league;
                        self.go_to(Screen::TeamDetail);
                        return Some(NavOutcome::Changed);
                    }
                }
                None
            }
            _ => None,
        }
    }
}

/// Index of the tab containing `x`, for a bar of `count` equal-width tabs.
fn tab_at(x: u16, count: usize) -> usize {
    let width = usize::from(SCREEN_WIDTH) / count;
    (usize::from(x) / width).min(count - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> ItemCounts {
        ItemCounts {
            shl_teams: 14,
            allsvenskan_teams: 14,
            upcoming_matches: 6,
            news: 12,
        }
    }

    fn tap(x: u16, y: u16) -> TouchEvent {
        TouchEvent::Tap(ScreenPoint::new(x, y))
    }

    #[test]
    fn tab_bar_switches_screens_and_resets_scroll() {
        let mut nav = Navigator::new();
        nav.state.scroll_offset = 3;

        let outcome = nav.handle_event(tap(100, 10), &counts());
        assert_eq!(outcome, NavOutcome::Changed);
        assert_eq!(nav.state.current, Screen::StandingsAllsvenskan);
        assert_eq!(nav.state.scroll_offset, 0);

        // Same tab again: no-op.
        let outcome = nav.handle_event(tap(100, 10), &counts());
        assert_eq!(outcome, NavOutcome::Ignored);
    }

    #[test]
    fn tab_origin_resolves_to_first_tab() {
        assert_eq!(tab_at(0, 5), 0);
        assert_eq!(tab_at(0, TAB_COUNT), 0);
        // Rightmost pixel lands in the last tab even with rounding slack.
        assert_eq!(tab_at(319, 5), 4);
    }

    #[test]
    fn scroll_strip_clamps_at_both_ends() {
        let mut nav = Navigator::new();
        let c = counts();

        // Up from 0 stays at 0.
        assert_eq!(nav.handle_event(tap(310, 60), &c), NavOutcome::Ignored);
        assert_eq!(nav.state.scroll_offset, 0);

        // Down increments until count - visible, then clamps.
        for _ in 0..10 {
            nav.handle_event(tap(310, 200), &c);
        }
        assert_eq!(nav.state.scroll_offset, c.shl_teams - VISIBLE_TEAMS);

        // Up decrements again.
        assert_eq!(nav.handle_event(tap(310, 60), &c), NavOutcome::Changed);
        assert_eq!(nav.state.scroll_offset, c.shl_teams - VISIBLE_TEAMS - 1);
    }

    #[test]
    fn short_lists_never_scroll() {
        let mut nav = Navigator::new();
        let c = ItemCounts {
            shl_teams: 5,
            ..counts()
        };
        assert_eq!(nav.handle_event(tap(310, 200), &c), NavOutcome::Ignored);
        assert_eq!(nav.state.scroll_offset, 0);
    }

    #[test]
    fn scroll_strip_outranks_row_hits() {
        let mut nav = Navigator::new();
        // y=200 x=310 lands in the strip; must scroll, not select row.
        nav.handle_event(tap(310, 200), &counts());
        assert_eq!(nav.state.current, Screen::StandingsShl);
        assert_eq!(nav.state.scroll_offset, 1);
    }

    #[test]
    fn standings_row_opens_team_detail() {
        let mut nav = Navigator::new();
        nav.state.scroll_offset = 2;

        // Row 1: y in [82, 101).
        let outcome = nav.handle_event(tap(100, 90), &counts());
        assert_eq!(outcome, NavOutcome::Changed);
        assert_eq!(nav.state.current, Screen::TeamDetail);
        assert_eq!(nav.state.previous, Screen::StandingsShl);
        assert_eq!(nav.state.selected_team, 3);
        assert_eq!(nav.state.selected_league, League::Shl);
        assert_eq!(nav.state.scroll_offset, 0);
    }

    #[test]
    fn row_hit_beyond_item_count_is_absorbed() {
        let mut nav = Navigator::new();
        let c = ItemCounts {
            shl_teams: 2,
            ..counts()
        };
        // Row 5, only two teams.
        let outcome = nav.handle_event(tap(100, 160), &c);
        assert_eq!(outcome, NavOutcome::Ignored);
        assert_eq!(nav.state.current, Screen::StandingsShl);
    }

    #[test]
    fn tap_below_the_last_drawn_row_is_absorbed() {
        let mut nav = Navigator::new();
        // y 215..220 is inside the item region but past row 7's extent;
        // selecting a row there would open a team the finger never touched.
        let outcome = nav.handle_event(tap(100, 217), &counts());
        assert_eq!(outcome, NavOutcome::Ignored);
        assert_eq!(nav.state.current, Screen::StandingsShl);
    }

    #[test]
    fn news_row_opens_detail_and_back_returns() {
        let mut nav = Navigator::new();
        nav.go_to(Screen::News);
        nav.state.scroll_offset = 1;

        let outcome = nav.handle_event(tap(150, 120), &counts());
        assert_eq!(outcome, NavOutcome::Changed);
        assert_eq!(nav.state.current, Screen::NewsDetail);
        // Row 2 plus the offset of 1.
        assert_eq!(nav.state.selected_news, 3);

        let outcome = nav.handle_event(tap(30, 40), &counts());
        assert_eq!(outcome, NavOutcome::Changed);
        assert_eq!(nav.state.current, Screen::News);
        assert_eq!(nav.state.scroll_offset, 0);
    }

    #[test]
    fn team_detail_back_returns_to_originating_table() {
        let mut nav = Navigator::new();
        nav.go_to(Screen::StandingsAllsvenskan);
        nav.handle_event(tap(100, 70), &counts());
        assert_eq!(nav.state.current, Screen::TeamDetail);

        nav.handle_event(tap(30, 40), &counts());
        assert_eq!(nav.state.current, Screen::StandingsAllsvenskan);
    }

    #[test]
    fn long_press_opens_settings_from_anywhere() {
        let mut nav = Navigator::new();
        nav.go_to(Screen::News);

        let outcome = nav.handle_event(TouchEvent::LongPress(ScreenPoint::new(160, 120)), &counts());
        assert_eq!(outcome, NavOutcome::Changed);
        assert_eq!(nav.state.current, Screen::Settings);

        // Already on settings: absorbed.
        let outcome = nav.handle_event(TouchEvent::LongPress(ScreenPoint::new(160, 120)), &counts());
        assert_eq!(outcome, NavOutcome::Ignored);
    }

    #[test]
    fn settings_calibrate_button_starts_the_wizard() {
        let mut nav = Navigator::new();
        nav.go_to(Screen::Settings);

        let outcome = nav.handle_event(tap(160, 80), &counts());
        assert_eq!(outcome, NavOutcome::StartWizard);
        assert_eq!(nav.state.current, Screen::Calibrate);
    }

    #[test]
    fn settings_back_returns_to_first_table() {
        let mut nav = Navigator::new();
        nav.go_to(Screen::Settings);

        let outcome = nav.handle_event(tap(30, 40), &counts());
        assert_eq!(outcome, NavOutcome::Changed);
        assert_eq!(nav.state.current, Screen::StandingsShl);
    }

    #[test]
    fn tab_bar_is_inert_on_settings() {
        let mut nav = Navigator::new();
        nav.go_to(Screen::Settings);

        let outcome = nav.handle_event(tap(100, 10), &counts());
        assert_eq!(outcome, NavOutcome::Ignored);
        assert_eq!(nav.state.current, Screen::Settings);
    }
}
