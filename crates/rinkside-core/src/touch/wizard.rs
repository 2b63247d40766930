//! Four-corner calibration wizard.
//!
//! The wizard walks the user through tapping a crosshair in each screen
//! corner (top-left, top-right, bottom-right, bottom-left), collects the raw
//! sample per corner, and derives the [`CalibrationTransform`] from edge
//! averages. It is a pure state machine driven by `poll`; the caller owns
//! drawing and screen transitions and reacts to the returned event.

use log::{info, warn};

use crate::config::{
    CAL_TARGET_INSET, SCREEN_HEIGHT, SCREEN_WIDTH, WIZARD_CANCEL_HOLD_MS, WIZARD_TAP_MAX_MS,
    WIZARD_TAP_MIN_MS,
};
use crate::store::KvStore;
use crate::touch::calibration::CalibrationTransform;
use crate::touch::{RawPoint, ScreenPoint};

/// What the caller should do after a `poll`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    /// Nothing changed.
    None,
    /// The step advanced; redraw the crosshair screen.
    Redraw,
    /// The user held for the cancel duration; leave the wizard without
    /// committing anything.
    Cancelled,
    /// All four corners captured and the transform committed; leave the
    /// wizard.
    Completed,
}

const CORNER_COUNT: usize = 4;

/// Wizard state for one calibration run. Reset by [`CalibrationWizard::start`].
#[derive(Debug)]
pub struct CalibrationWizard {
    step: usize,
    samples: [RawPoint; CORNER_COUNT],
    press_start: Option<u64>,
    last_raw: RawPoint,
}

impl Default for CalibrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationWizard {
    pub const fn new() -> Self {
        Self {
            step: 0,
            samples: [RawPoint::new(0, 0); CORNER_COUNT],
            press_start: None,
            last_raw: RawPoint::new(0, 0),
        }
    }

    /// Begin a fresh run at the first corner. Samples from a previous run
    /// are overwritten as the new run progresses.
    pub fn start(&mut self) {
        self.step = 0;
        self.press_start = None;
    }

    /// Current step, 0-based. Useful for "step N of 4" captions.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Crosshair position for the current step, inset from the corners.
    pub fn target(&self) -> ScreenPoint {
        let inset = CAL_TARGET_INSET as u16;
        let right = SCREEN_WIDTH - inset;
        let bottom = SCREEN_HEIGHT - inset;
        match self.step {
            0 => ScreenPoint::new(inset, inset),
            1 => ScreenPoint::new(right, inset),
            2 => ScreenPoint::new(right, bottom),
            _ => ScreenPoint::new(inset, bottom),
        }
    }

    /// Feed one raw sample (or absence of contact) into the state machine.
    ///
    /// Taps are classified on release by press duration: past the cancel
    /// threshold aborts the run, inside the tap window records the corner,
    /// anything else (too short to be deliberate, too long to be a tap) is
    /// ignored without advancing.
    pub fn poll<S: KvStore>(
        &mut self,
        now_ms: u64,
        raw: Option<RawPoint>,
        cal: &mut CalibrationTransform,
        store: &mut S,
    ) -> WizardEvent {
        match (raw, self.press_start) {
            (Some(point), None) => {
                self.press_start = Some(now_ms);
                self.last_raw = point;
                WizardEvent::None
            }
            (Some(point), Some(_)) => {
                self.last_raw = point;
                WizardEvent::None
            }
            (None, Some(start)) => {
                self.press_start = None;
                let duration = now_ms.saturating_sub(start);

                if duration > WIZARD_CANCEL_HOLD_MS {
                    info!("calibration cancelled at step {}", self.step);
                    self.step = 0;
                    return WizardEvent::Cancelled;
                }
                if duration > WIZARD_TAP_MIN_MS && duration < WIZARD_TAP_MAX_MS {
                    self.samples[self.step] = self.last_raw;
                    info!(
                        "cal point {}: {}, {}",
                        self.step, self.last_raw.x, self.last_raw.y
                    );
                    self.step += 1;
                    if self.step >= CORNER_COUNT {
                        self.step = 0;
                        self.finish(cal, store);
                        return WizardEvent::Completed;
                    }
                    return WizardEvent::Redraw;
                }
                WizardEvent::None
            }
            (None, None) => WizardEvent::None,
        }
    }

    /// Derive the transform from the four corner samples and persist it.
    ///
    /// Each edge is the average of its two corner samples, then both axes are
    /// widened symmetrically to compensate for the crosshair inset (20px of a
    /// 280x200 usable span). Non-monotonic geometry (corners tapped out of
    /// order, or noise) discards the run's samples and commits the default
    /// transform instead; committing a known default beats forcing the user
    /// back through the wizard.
    fn finish<S: KvStore>(&self, cal: &mut CalibrationTransform, store: &mut S) {
        let [tl, tr, br, bl] = self.samples;
        let left = (i32::from(tl.x) + i32::from(bl.x)) / 2;
        let right = (i32::from(tr.x) + i32::from(br.x)) / 2;
        let top = (i32::from(tl.y) + i32::from(tr.y)) / 2;
        let bottom = (i32::from(br.y) + i32::from(bl.y)) / 2;

        if right > left && bottom > top {
            let usable_w = i32::from(SCREEN_WIDTH) - 2 * CAL_TARGET_INSET;
            let usable_h = i32::from(SCREEN_HEIGHT) - 2 * CAL_TARGET_INSET;
            let x_margin = (right - left) * CAL_TARGET_INSET / usable_w;
            let y_margin = (bottom - top) * CAL_TARGET_INSET / usable_h;
            cal.x_min = (left - x_margin) as i16;
            cal.x_max = (right + x_margin) as i16;
            cal.y_min = (top - y_margin) as i16;
            cal.y_max = (bottom + y_margin) as i16;
        } else {
            warn!("calibration geometry not monotonic, committing defaults");
            *cal = CalibrationTransform::default();
        }

        if cal.save(store).is_err() {
            // In-memory transform stays usable for this session; it just
            // won't survive a reboot.
            warn!("calibration save failed, keeping in-memory values");
            cal.valid = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use crate::touch::calibration::CAL_NAMESPACE;

    /// Drive one press-release of the given duration at a raw point.
    fn tap<S: KvStore>(
        wizard: &mut CalibrationWizard,
        now: &mut u64,
        point: RawPoint,
        duration: u64,
        cal: &mut CalibrationTransform,
        store: &mut S,
    ) -> WizardEvent {
        let down = wizard.poll(*now, Some(point), cal, store);
        assert_eq!(down, WizardEvent::None);
        *now += duration;
        let up = wizard.poll(*now, None, cal, store);
        *now += 200;
        up
    }

    #[test]
    fn four_corner_run_computes_edge_averages_with_margin() {
        let mut wizard = CalibrationWizard::new();
        let mut cal = CalibrationTransform::default();
        let mut store = MemStore::new();
        let mut now = 1_000;
        wizard.start();

        let corners = [
            RawPoint::new(100, 100),
            RawPoint::new(3900, 100),
            RawPoint::new(3900, 3800),
            RawPoint::new(100, 3800),
        ];
        for (i, corner) in corners.iter().enumerate() {
            let event = tap(&mut wizard, &mut now, *corner, 200, &mut cal, &mut store);
            if i < 3 {
                assert_eq!(event, WizardEvent::Redraw);
            } else {
                assert_eq!(event, WizardEvent::Completed);
            }
        }

        // x span 3800 -> margin 271; y span 3700 -> margin 370.
        assert_eq!(cal.x_min, 100 - 271);
        assert_eq!(cal.x_max, 3900 + 271);
        assert_eq!(cal.y_min, 100 - 370);
        assert_eq!(cal.y_max, 3800 + 370);
        assert!(cal.valid);
        assert!(store.get_bool(CAL_NAMESPACE, "valid", false));
    }

    #[test]
    fn swapped_corners_fall_back_to_defaults_marked_valid() {
        let mut wizard = CalibrationWizard::new();
        let mut cal = CalibrationTransform::default();
        let mut store = MemStore::new();
        let mut now = 1_000;
        wizard.start();

        // Left/right swapped: leftAvg > rightAvg.
        let corners = [
            RawPoint::new(3900, 100),
            RawPoint::new(100, 100),
            RawPoint::new(100, 3800),
            RawPoint::new(3900, 3800),
        ];
        let mut last = WizardEvent::None;
        for corner in corners {
            last = tap(&mut wizard, &mut now, corner, 200, &mut cal, &mut store);
        }

        assert_eq!(last, WizardEvent::Completed);
        let defaults = CalibrationTransform::default();
        assert_eq!(cal.x_min, defaults.x_min);
        assert_eq!(cal.x_max, defaults.x_max);
        assert!(cal.valid);
    }

    #[test]
    fn long_hold_cancels_without_committing() {
        let mut wizard = CalibrationWizard::new();
        let mut cal = CalibrationTransform::default();
        let mut store = MemStore::new();
        let mut now = 1_000;
        wizard.start();

        tap(
            &mut wizard,
            &mut now,
            RawPoint::new(100, 100),
            200,
            &mut cal,
            &mut store,
        );
        let event = tap(
            &mut wizard,
            &mut now,
            RawPoint::new(2000, 2000),
            3_500,
            &mut cal,
            &mut store,
        );

        assert_eq!(event, WizardEvent::Cancelled);
        assert_eq!(wizard.step(), 0);
        assert!(!cal.valid);
        assert!(!store.get_bool(CAL_NAMESPACE, "valid", false));
    }

    #[test]
    fn out_of_window_taps_are_ignored() {
        let mut wizard = CalibrationWizard::new();
        let mut cal = CalibrationTransform::default();
        let mut store = MemStore::new();
        let mut now = 1_000;
        wizard.start();

        // Too short to be deliberate.
        let short = tap(
            &mut wizard,
            &mut now,
            RawPoint::new(100, 100),
            30,
            &mut cal,
            &mut store,
        );
        assert_eq!(short, WizardEvent::None);
        assert_eq!(wizard.step(), 0);

        // Too long for a tap but short of the cancel hold.
        let drag = tap(
            &mut wizard,
            &mut now,
            RawPoint::new(100, 100),
            2_000,
            &mut cal,
            &mut store,
        );
        assert_eq!(drag, WizardEvent::None);
        assert_eq!(wizard.step(), 0);
    }

    #[test]
    fn failed_save_keeps_in_memory_transform() {
        let mut wizard = CalibrationWizard::new();
        let mut cal = CalibrationTransform::default();
        let mut store = MemStore::new();
        store.fail_writes = true;
        let mut now = 1_000;
        wizard.start();

        let corners = [
            RawPoint::new(100, 100),
            RawPoint::new(3900, 100),
            RawPoint::new(3900, 3800),
            RawPoint::new(100, 3800),
        ];
        let mut last = WizardEvent::None;
        for corner in corners {
            last = tap(&mut wizard, &mut now, corner, 200, &mut cal, &mut store);
        }

        assert_eq!(last, WizardEvent::Completed);
        assert!(cal.valid);
        assert_eq!(cal.x_max, 3900 + 271);
        assert!(!store.get_bool(CAL_NAMESPACE, "valid", false));
    }

    #[test]
    fn targets_follow_corner_order() {
        let mut wizard = CalibrationWizard::new();
        wizard.start();
        assert_eq!(wizard.target(), ScreenPoint::new(20, 20));

        let mut cal = CalibrationTransform::default();
        let mut store = MemStore::new();
        let mut now = 1_000;
        tap(
            &mut wizard,
            &mut now,
            RawPoint::new(100, 100),
            200,
            &mut cal,
            &mut store,
        );
        assert_eq!(wizard.target(), ScreenPoint::new(300, 20));
    }
}
