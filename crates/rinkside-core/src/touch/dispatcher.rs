//! Debounced tap / long-press dispatcher.
//!
//! Sits between the raw touch source and the navigation controller. Each
//! `poll` feeds one raw sample (or absence of contact) in; the dispatcher
//! rate-limits its own sampling, maps raw coordinates to screen space via the
//! selected strategy, suppresses contact bounce, and emits at most one
//! discrete [`TouchEvent`] per press-release cycle.

use crate::config::{
    LONG_PRESS_MS, RAW_RANGE, SCREEN_HEIGHT, SCREEN_WIDTH, TOUCH_DEBOUNCE_MS,
    TOUCH_POLL_INTERVAL_MS,
};
use crate::touch::calibration::CalibrationTransform;
use crate::touch::{RawPoint, ScreenPoint, TouchEvent};

/// How raw samples become screen coordinates.
///
/// `FixedEmpirical` is a hardcoded transform tuned for panels whose
/// controller wiring mirrors the x axis; it exists for hardware revisions
/// where the calibrated path proved unreliable and is selected by
/// configuration, not at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingStrategy {
    #[default]
    Calibrated,
    FixedEmpirical,
}

/// Per-press state machine. One instance lives for the whole session.
#[derive(Debug)]
pub struct TouchDispatcher {
    strategy: MappingStrategy,
    last_poll: Option<u64>,
    press_start: Option<u64>,
    last_point: ScreenPoint,
    long_press_fired: bool,
    /// End of the previous recognized press-release cycle; presses within
    /// the debounce window of this are bounce, not input.
    cycle_end: u64,
}

impl TouchDispatcher {
    pub const fn new(strategy: MappingStrategy) -> Self {
        Self {
            strategy,
            last_poll: None,
            press_start: None,
            last_point: ScreenPoint::new(0, 0),
            long_press_fired: false,
            cycle_end: 0,
        }
    }

    pub fn strategy(&self) -> MappingStrategy {
        self.strategy
    }

    /// Map one raw sample to screen space using the configured strategy.
    pub fn map_raw(&self, raw: RawPoint, cal: &CalibrationTransform) -> ScreenPoint {
        match self.strategy {
            MappingStrategy::Calibrated => cal.to_screen(raw),
            MappingStrategy::FixedEmpirical => fixed_empirical(raw),
        }
    }

    /// Feed one sample into the dispatcher.
    ///
    /// Samples arriving faster than the poll interval are dropped so the
    /// state machine sees a bounded rate no matter how hot the caller's loop
    /// runs. Returns at most one event: a long-press once the hold threshold
    /// passes, or a tap on release of a cycle that never long-pressed.
    pub fn poll(
        &mut self,
        now_ms: u64,
        raw: Option<RawPoint>,
        cal: &CalibrationTransform,
    ) -> Option<TouchEvent> {
        if let Some(last) = self.last_poll
            && now_ms.saturating_sub(last) < TOUCH_POLL_INTERVAL_MS
        {
            return None;
        }
        self.last_poll = Some(now_ms);

        match (raw, self.press_start) {
            (Some(point), None) => {
                // Contact inside the debounce window is bounce from the
                // previous cycle; not a new press.
                if now_ms.saturating_sub(self.cycle_end) < TOUCH_DEBOUNCE_MS {
                    return None;
                }
                self.press_start = Some(now_ms);
                self.long_press_fired = false;
                self.last_point = self.map_raw(point, cal);
                None
            }
            (Some(point), Some(start)) => {
                self.last_point = self.map_raw(point, cal);
                if !self.long_press_fired && now_ms.saturating_sub(start) > LONG_PRESS_MS {
                    self.long_press_fired = true;
                    return Some(TouchEvent::LongPress(self.last_point));
                }
                None
            }
            (None, Some(_)) => {
                self.press_start = None;
                self.cycle_end = now_ms;
                if self.long_press_fired {
                    None
                } else {
                    Some(TouchEvent::Tap(self.last_point))
                }
            }
            (None, None) => None,
        }
    }
}

/// Hardcoded mapping for the mirrored-x hardware revision.
fn fixed_empirical(raw: RawPoint) -> ScreenPoint {
    let w = u32::from(SCREEN_WIDTH) - 1;
    let h = u32::from(SCREEN_HEIGHT) - 1;
    let range = u32::from(RAW_RANGE);
    let x = w - (u32::from(raw.x).min(range - 1) * w / range);
    let y = u32::from(raw.y).min(range - 1) * h / range;
    ScreenPoint::new(x as u16, y as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibrated() -> (TouchDispatcher, CalibrationTransform) {
        let cal = CalibrationTransform {
            x_min: 0,
            x_max: 3190,
            y_min: 0,
            y_max: 2390,
            valid: true,
        };
        (TouchDispatcher::new(MappingStrategy::Calibrated), cal)
    }

    #[test]
    fn tap_emits_exactly_one_event_on_release() {
        let (mut disp, cal) = calibrated();
        let raw = RawPoint::new(1000, 1000);

        assert_eq!(disp.poll(1_000, Some(raw), &cal), None);
        assert_eq!(disp.poll(1_050, Some(raw), &cal), None);
        assert_eq!(
            disp.poll(1_100, None, &cal),
            Some(TouchEvent::Tap(ScreenPoint::new(100, 100)))
        );
        assert_eq!(disp.poll(1_300, None, &cal), None);
    }

    #[test]
    fn bounce_after_release_is_merged() {
        let (mut disp, cal) = calibrated();
        let raw = RawPoint::new(500, 500);

        disp.poll(1_000, Some(raw), &cal);
        assert!(matches!(
            disp.poll(1_060, None, &cal),
            Some(TouchEvent::Tap(_))
        ));

        // Contact 40ms after release: bounce. No new cycle, no second tap.
        assert_eq!(disp.poll(1_100, Some(raw), &cal), None);
        assert_eq!(disp.poll(1_140, None, &cal), None);

        // A press clear of the debounce window is a fresh cycle.
        assert_eq!(disp.poll(1_300, Some(raw), &cal), None);
        assert!(matches!(
            disp.poll(1_360, None, &cal),
            Some(TouchEvent::Tap(_))
        ));
    }

    #[test]
    fn held_press_emits_nothing_until_release() {
        let (mut disp, cal) = calibrated();
        let raw = RawPoint::new(1000, 1000);

        let mut now = 1_000;
        for _ in 0..50 {
            assert_eq!(disp.poll(now, Some(raw), &cal), None);
            now += 50;
        }
        assert!(matches!(disp.poll(now, None, &cal), Some(TouchEvent::Tap(_))));
    }

    #[test]
    fn long_press_fires_once_and_suppresses_tap() {
        let (mut disp, cal) = calibrated();
        let raw = RawPoint::new(1000, 1000);

        let mut now = 1_000;
        let mut long_presses = 0;
        while now < 1_000 + 12_000 {
            if let Some(event) = disp.poll(now, Some(raw), &cal) {
                assert!(matches!(event, TouchEvent::LongPress(_)));
                long_presses += 1;
            }
            now += 50;
        }
        assert_eq!(long_presses, 1);

        // Release after the long-press: no tap for this cycle.
        assert_eq!(disp.poll(now, None, &cal), None);

        // Next cycle taps normally again.
        now += 200;
        disp.poll(now, Some(raw), &cal);
        assert!(matches!(
            disp.poll(now + 60, None, &cal),
            Some(TouchEvent::Tap(_))
        ));
    }

    #[test]
    fn polls_faster_than_the_interval_are_dropped() {
        let (mut disp, cal) = calibrated();
        let raw = RawPoint::new(1000, 1000);

        assert_eq!(disp.poll(1_000, Some(raw), &cal), None);
        // 5ms later: dropped, release not observed.
        assert_eq!(disp.poll(1_005, None, &cal), None);
        // Still considered held; release seen on a spaced poll emits the tap.
        assert!(matches!(
            disp.poll(1_040, None, &cal),
            Some(TouchEvent::Tap(_))
        ));
    }

    #[test]
    fn fixed_empirical_mirrors_x_axis() {
        let disp = TouchDispatcher::new(MappingStrategy::FixedEmpirical);
        let cal = CalibrationTransform::default();

        let origin = disp.map_raw(RawPoint::new(0, 0), &cal);
        assert_eq!(origin, ScreenPoint::new(319, 0));

        let far = disp.map_raw(RawPoint::new(4095, 4095), &cal);
        assert_eq!(far.x, 1);
        assert_eq!(far.y, 238);

        let mid = disp.map_raw(RawPoint::new(2048, 2048), &cal);
        assert!(mid.x > 150 && mid.x < 170);
        assert!(mid.y > 110 && mid.y < 130);
    }

    #[test]
    fn calibrated_strategy_maps_through_the_transform() {
        let (mut disp, cal) = calibrated();
        disp.poll(1_000, Some(RawPoint::new(3190, 2390)), &cal);
        assert_eq!(
            disp.poll(1_060, None, &cal),
            Some(TouchEvent::Tap(ScreenPoint::new(319, 239)))
        );
    }
}
