//! Desktop simulator for the rinkside hockey standings panel.
//!
//! Renders rinkside-core screens in an SDL2 window via
//! `embedded-graphics-simulator` and drives the full touch pipeline with the
//! mouse: button-down/up become synthetic raw touch samples that flow through
//! the dispatcher (or the calibration wizard) exactly as on the device.
//!
//! # Key bindings
//!
//! | Key | Action                               |
//! |-----|--------------------------------------|
//! | C   | Start the calibration wizard         |
//! | O   | Toggle simulated backend offline     |
//! | Q   | Quit                                 |
//!
//! The persistence store starts empty, so the first run lands in the
//! calibration wizard just like a factory-fresh panel. Holding the mouse
//! button maps to holding the stylus, so long-press navigation and the
//! wizard's cancel hold both work.

use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{info, warn};

use rinkside_core::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use rinkside_core::model::{
    League, MatchInfo, MatchStatus, NewsItem, PanelData, Team, truncated,
};
use rinkside_core::nav::{ItemCounts, NavOutcome, Navigator, Screen};
use rinkside_core::pages::{self, NetStatus};
use rinkside_core::store::MemStore;
use rinkside_core::touch::calibration::{
    DEFAULT_X_MAX, DEFAULT_X_MIN, DEFAULT_Y_MAX, DEFAULT_Y_MIN,
};
use rinkside_core::touch::{
    CalibrationTransform, CalibrationWizard, MappingStrategy, RawPoint, TouchDispatcher,
    WizardEvent,
};

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~30 FPS), which also bounds the touch poll rate.
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Map a window pixel onto the sensor-native coordinate the default
/// calibration transform would map back to that pixel. This makes the mouse
/// behave like a perfectly linear resistive panel, so the wizard produces a
/// transform close to the defaults.
fn pixel_to_raw(point: Point) -> RawPoint {
    let x = i32::clamp(point.x, 0, i32::from(SCREEN_WIDTH) - 1);
    let y = i32::clamp(point.y, 0, i32::from(SCREEN_HEIGHT) - 1);
    let x_span = i32::from(DEFAULT_X_MAX - DEFAULT_X_MIN);
    let y_span = i32::from(DEFAULT_Y_MAX - DEFAULT_Y_MIN);
    RawPoint::new(
        (i32::from(DEFAULT_X_MIN) + x * x_span / (i32::from(SCREEN_WIDTH) - 1)) as u16,
        (i32::from(DEFAULT_Y_MIN) + y * y_span / (i32::from(SCREEN_HEIGHT) - 1)) as u16,
    )
}

fn team(name: &str, position: u8, points: i16, played: i16, goal_diff: i16) -> Team {
    let wins = points / 3;
    let ot_wins = points % 3;
    Team {
        name: truncated(name),
        position,
        points,
        played,
        goal_diff,
        wins,
        ot_wins,
        losses: played - wins - ot_wins,
        goals_for: 90 + goal_diff / 2,
        goals_against: 90 - goal_diff / 2,
    }
}

fn upcoming(home: &str, away: &str, time: &str, league: League) -> MatchInfo {
    MatchInfo {
        home: truncated(home),
        away: truncated(away),
        home_score: None,
        away_score: None,
        time: truncated(time),
        status: MatchStatus::Upcoming,
        league,
    }
}

/// A plausible mid-season snapshot so every screen has content.
fn mock_data() -> PanelData {
    let mut data = PanelData::default();

    for t in [
        team("Skelleftea AIK", 1, 68, 32, 41),
        team("Fargestad BK", 2, 64, 32, 35),
        team("Lulea HF", 3, 61, 32, 28),
        team("Vaxjo Lakers", 4, 55, 32, 14),
        team("HV71", 5, 52, 32, 9),
        team("Frolunda HC", 6, 50, 32, 6),
        team("Rogle BK", 7, 47, 32, 2),
        team("Timra IK", 8, 44, 32, -4),
        team("Leksands IF", 9, 40, 32, -9),
        team("Linkoping HC", 10, 38, 32, -13),
        team("Brynas IF", 11, 33, 32, -20),
        team("Malmo Redhawks", 12, 30, 32, -25),
        team("Orebro Hockey", 13, 27, 32, -29),
        team("MoDo Hockey", 14, 22, 32, -35),
    ] {
        data.shl.push(t).ok();
    }

    for t in [
        team("Djurgardens IF", 1, 70, 33, 44),
        team("AIK", 2, 62, 33, 30),
        team("Bjorkloven", 3, 58, 33, 22),
        team("Sodertalje SK", 4, 53, 33, 15),
        team("Oskarshamn", 5, 49, 33, 8),
        team("Mora IK", 6, 45, 33, 1),
        team("Vasteras IK", 7, 42, 33, -6),
        team("Karlskoga", 8, 39, 33, -11),
    ] {
        data.allsvenskan.push(t).ok();
    }

    for m in [
        upcoming("Lulea HF", "Skelleftea AIK", "19:00", League::Shl),
        upcoming("HV71", "Fargestad BK", "19:00", League::Shl),
        upcoming("Timra IK", "Vaxjo Lakers", "15:15", League::Shl),
        upcoming("Djurgardens IF", "AIK", "18:50", League::Allsvenskan),
        upcoming("Mora IK", "Bjorkloven", "19:00", League::Allsvenskan),
        upcoming("Frolunda HC", "Rogle BK", "15:15", League::Shl),
    ] {
        data.matches.push(m).ok();
    }

    let stories: [(&str, &str, League); 5] = [
        (
            "Skelleftea tar serieledningen efter derbyseger",
            "En stark tredje period avgjorde toppmotet mot Lulea. Skelleftea \
             vande underlage till seger med tva mal under slutminuterna och \
             gar upp i serieledning.",
            League::Shl,
        ),
        (
            "HV71 varvar malvakt fran NHL",
            "Klubben bekraftar att kontraktet stracker sig over tva sasonger. \
             Malvakten ansluter till truppen redan under nasta vecka.",
            League::Shl,
        ),
        (
            "Djurgarden obesegrade pa tio raka matcher",
            "Sviten ar klubbens langsta sedan nedflyttningen och avstandet \
             till kvalplats vaxer for varje omgang.",
            League::Allsvenskan,
        ),
        (
            "Skadelaget vaxer i Brynas",
            "Ytterligare tva backar saknas till helgens bortamatch.",
            League::Shl,
        ),
        (
            "Bjorkloven forlanger med tranaren",
            "",
            League::Allsvenskan,
        ),
    ];
    for (title, summary, league) in stories {
        data.news
            .push(NewsItem {
                title: truncated(title),
                summary: truncated(summary),
                league,
            })
            .ok();
    }

    data
}

fn main() {
    env_logger::init();
    info!("starting rinkside simulator");
    info!("keys: C=calibrate  O=toggle offline  Q=quit");

    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(
        u32::from(SCREEN_WIDTH),
        u32::from(SCREEN_HEIGHT),
    ));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Rinkside Simulator", &output_settings);

    let mut store = MemStore::new();
    let mut cal = CalibrationTransform::load(&mut store);
    let mut dispatcher = TouchDispatcher::new(MappingStrategy::Calibrated);
    let mut wizard = CalibrationWizard::new();
    let mut nav = Navigator::new();
    let data = mock_data();

    // The store starts empty, so this always runs on a fresh launch. It is
    // the same first-start path the firmware takes.
    if cal.is_factory_default() {
        info!("no stored calibration, entering wizard");
        nav.go_to(Screen::Calibrate);
        wizard.start();
    }

    let epoch = Instant::now();
    let mut held: Option<Point> = None;
    let mut connection_ok = true;
    let mut offline_since: Option<Instant> = None;
    let mut dirty = true;

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    window.update(&display);

    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::C => {
                        nav.go_to(Screen::Calibrate);
                        wizard.start();
                        dirty = true;
                    }
                    Keycode::O => {
                        connection_ok = !connection_ok;
                        offline_since = (!connection_ok).then(Instant::now);
                        info!("backend {}", if connection_ok { "online" } else { "offline" });
                        dirty = true;
                    }
                    _ => {}
                },
                SimulatorEvent::MouseButtonDown { point, .. } => held = Some(point),
                SimulatorEvent::MouseButtonUp { .. } => held = None,
                SimulatorEvent::MouseMove { point } => {
                    if held.is_some() {
                        held = Some(point);
                    }
                }
                _ => {}
            }
        }

        // One pipeline poll per frame, just like the device loop.
        let now_ms = epoch.elapsed().as_millis() as u64;
        let raw = held.map(pixel_to_raw);

        if nav.state.current == Screen::Calibrate {
            match wizard.poll(now_ms, raw, &mut cal, &mut store) {
                WizardEvent::Redraw => dirty = true,
                WizardEvent::Cancelled => {
                    info!("calibration cancelled");
                    nav.go_to(Screen::Settings);
                    dirty = true;
                }
                WizardEvent::Completed => {
                    info!("calibration completed: {cal:?}");
                    nav.go_to(Screen::StandingsShl);
                    dirty = true;
                }
                WizardEvent::None => {}
            }
        } else if let Some(event) = dispatcher.poll(now_ms, raw, &cal) {
            let counts = ItemCounts {
                shl_teams: data.shl.len(),
                allsvenskan_teams: data.allsvenskan.len(),
                upcoming_matches: data.upcoming_count(),
                news: data.news.len(),
            };
            match nav.handle_event(event, &counts) {
                NavOutcome::Changed => dirty = true,
                NavOutcome::StartWizard => {
                    wizard.start();
                    dirty = true;
                }
                NavOutcome::Ignored => {}
            }
        }

        if dirty {
            let offline_minutes = offline_since
                .map(|since| since.elapsed().as_secs() / 60)
                .unwrap_or(0);
            let status = NetStatus {
                connection_ok,
                timed_out: !connection_ok,
                offline_minutes,
                wifi_connected: connection_ok,
            };
            if pages::draw_screen(&mut display, &nav.state, &data, &status, &cal, &wizard)
                .is_err()
            {
                warn!("screen draw failed");
            }
            dirty = false;
        }

        window.update(&display);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("simulator exiting");
}
