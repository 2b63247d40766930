//! Calibration transform: raw sensor coordinates to screen pixels.
//!
//! The transform is an independent linear scale per axis, derived from the
//! four-corner wizard and persisted in the key-value store under the
//! `touch-calibration` namespace. Loading always runs a plausibility check;
//! anything that looks corrupted resets to the compiled defaults rather than
//! producing a transform that could divide by zero or pin every tap to one
//! edge.

use log::{info, warn};

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::store::KvStore;
use crate::touch::{RawPoint, ScreenPoint};

/// Store namespace holding the calibration record.
pub const CAL_NAMESPACE: &str = "touch-calibration";

const KEY_X_MIN: &str = "xMin";
const KEY_X_MAX: &str = "xMax";
const KEY_Y_MIN: &str = "yMin";
const KEY_Y_MAX: &str = "yMax";
const KEY_VALID: &str = "valid";

/// Factory defaults: roughly right for the stock panel, flagged as
/// never-calibrated. Public so the simulator can model a panel with exactly
/// this response.
pub const DEFAULT_X_MIN: i16 = 300;
pub const DEFAULT_X_MAX: i16 = 3800;
pub const DEFAULT_Y_MIN: i16 = 300;
pub const DEFAULT_Y_MAX: i16 = 3800;

/// Smallest believable raw span per axis. Anything tighter means the stored
/// record is noise.
const MIN_SPAN: i16 = 200;

/// Largest believable raw coordinate.
const MAX_RAW: i16 = 5000;

/// Per-axis linear mapping from raw sensor space to 320x240 screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationTransform {
    pub x_min: i16,
    pub x_max: i16,
    pub y_min: i16,
    pub y_max: i16,
    /// True once a wizard run has been committed. Defaults are usable but
    /// not `valid`.
    pub valid: bool,
}

impl Default for CalibrationTransform {
    fn default() -> Self {
        Self {
            x_min: DEFAULT_X_MIN,
            x_max: DEFAULT_X_MAX,
            y_min: DEFAULT_Y_MIN,
            y_max: DEFAULT_Y_MAX,
            valid: false,
        }
    }
}

impl CalibrationTransform {
    /// Whether the four bounds describe a usable mapping.
    pub fn is_plausible(&self) -> bool {
        self.x_max > self.x_min
            && self.y_max > self.y_min
            && self.x_min >= 0
            && self.y_min >= 0
            && self.x_max <= MAX_RAW
            && self.y_max <= MAX_RAW
            && self.x_max - self.x_min >= MIN_SPAN
            && self.y_max - self.y_min >= MIN_SPAN
    }

    /// True when the transform still carries the compiled defaults and no
    /// wizard run has ever been committed. Used for the first-start flow.
    pub fn is_factory_default(&self) -> bool {
        !self.valid && self.x_min == DEFAULT_X_MIN && self.x_max == DEFAULT_X_MAX
    }

    /// Load from the store, substituting the compiled default for any absent
    /// field, then force-reset to defaults if the result fails the
    /// plausibility check.
    pub fn load<S: KvStore>(store: &mut S) -> Self {
        let mut cal = Self {
            x_min: store.get_i16(CAL_NAMESPACE, KEY_X_MIN, DEFAULT_X_MIN),
            x_max: store.get_i16(CAL_NAMESPACE, KEY_X_MAX, DEFAULT_X_MAX),
            y_min: store.get_i16(CAL_NAMESPACE, KEY_Y_MIN, DEFAULT_Y_MIN),
            y_max: store.get_i16(CAL_NAMESPACE, KEY_Y_MAX, DEFAULT_Y_MAX),
            valid: store.get_bool(CAL_NAMESPACE, KEY_VALID, false),
        };

        if !cal.is_plausible() {
            warn!("corrupted touch calibration detected, using defaults");
            cal = Self::default();
        } else if cal.valid {
            info!(
                "touch calibration loaded: x[{}-{}] y[{}-{}]",
                cal.x_min, cal.x_max, cal.y_min, cal.y_max
            );
        }
        cal
    }

    /// Persist all four bounds and mark the record valid. Key writes are
    /// sequential; the store is single-threaded so no partial state is ever
    /// observable through `load`.
    pub fn save<S: KvStore>(&mut self, store: &mut S) -> Result<(), S::Error> {
        store.put_i16(CAL_NAMESPACE, KEY_X_MIN, self.x_min)?;
        store.put_i16(CAL_NAMESPACE, KEY_X_MAX, self.x_max)?;
        store.put_i16(CAL_NAMESPACE, KEY_Y_MIN, self.y_min)?;
        store.put_i16(CAL_NAMESPACE, KEY_Y_MAX, self.y_max)?;
        store.put_bool(CAL_NAMESPACE, KEY_VALID, true)?;
        self.valid = true;
        info!(
            "touch calibration saved: x[{}-{}] y[{}-{}]",
            self.x_min, self.x_max, self.y_min, self.y_max
        );
        Ok(())
    }

    /// Map a raw sample into screen space, clamped to the display.
    ///
    /// Rounding is integer truncation toward zero after widening to i32.
    /// A degenerate span cannot normally get here (the load-time check
    /// rejects it) but if one does, the default transform's mapping is used
    /// instead of dividing by zero.
    pub fn to_screen(&self, raw: RawPoint) -> ScreenPoint {
        if self.x_max <= self.x_min || self.y_max <= self.y_min {
            return Self::default().to_screen(raw);
        }
        ScreenPoint {
            x: linear_map(raw.x, self.x_min, self.x_max, SCREEN_WIDTH),
            y: linear_map(raw.y, self.y_min, self.y_max, SCREEN_HEIGHT),
        }
    }
}

/// `[in_min, in_max] -> [0, dim-1]`, clamped on both ends.
fn linear_map(value: u16, in_min: i16, in_max: i16, dim: u16) -> u16 {
    let out_max = i32::from(dim) - 1;
    let span = i32::from(in_max) - i32::from(in_min);
    let mapped = (i32::from(value) - i32::from(in_min)) * out_max / span;
    mapped.clamp(0, out_max) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    #[test]
    fn maps_span_onto_screen_bounds() {
        let cal = CalibrationTransform {
            x_min: 100,
            x_max: 3900,
            y_min: 200,
            y_max: 3800,
            valid: true,
        };
        assert_eq!(cal.to_screen(RawPoint::new(100, 200)), ScreenPoint::new(0, 0));
        assert_eq!(
            cal.to_screen(RawPoint::new(3900, 3800)),
            ScreenPoint::new(319, 239)
        );
        let mid = cal.to_screen(RawPoint::new(2000, 2000));
        assert!(mid.x > 150 && mid.x < 170);
        assert!(mid.y > 110 && mid.y < 130);
    }

    #[test]
    fn output_is_clamped_for_out_of_range_input() {
        let cal = CalibrationTransform::default();
        let below = cal.to_screen(RawPoint::new(0, 0));
        assert_eq!(below, ScreenPoint::new(0, 0));
        let above = cal.to_screen(RawPoint::new(4095, 4095));
        assert_eq!(above, ScreenPoint::new(319, 239));
    }

    #[test]
    fn every_in_span_input_stays_on_screen() {
        let cal = CalibrationTransform::default();
        for raw in (300..=3800).step_by(97) {
            let p = cal.to_screen(RawPoint::new(raw, raw));
            assert!(p.x <= 319, "x out of bounds for raw {raw}");
            assert!(p.y <= 239, "y out of bounds for raw {raw}");
        }
    }

    #[test]
    fn degenerate_span_falls_back_to_default_mapping() {
        let broken = CalibrationTransform {
            x_min: 2000,
            x_max: 2000,
            y_min: 3000,
            y_max: 100,
            valid: true,
        };
        let expected = CalibrationTransform::default().to_screen(RawPoint::new(1000, 1000));
        assert_eq!(broken.to_screen(RawPoint::new(1000, 1000)), expected);
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = MemStore::new();
        let mut cal = CalibrationTransform {
            x_min: 250,
            x_max: 3750,
            y_min: 310,
            y_max: 3900,
            valid: false,
        };
        cal.save(&mut store).unwrap();

        let loaded = CalibrationTransform::load(&mut store);
        assert_eq!(loaded, CalibrationTransform { valid: true, ..cal });
    }

    #[test]
    fn corrupted_record_resets_to_defaults() {
        let mut store = MemStore::new();
        // Inverted x axis: xMax <= xMin.
        store.put_i16(CAL_NAMESPACE, "xMin", 3000).unwrap();
        store.put_i16(CAL_NAMESPACE, "xMax", 1000).unwrap();
        store.put_i16(CAL_NAMESPACE, "yMin", 300).unwrap();
        store.put_i16(CAL_NAMESPACE, "yMax", 3800).unwrap();
        store.put_bool(CAL_NAMESPACE, "valid", true).unwrap();

        let loaded = CalibrationTransform::load(&mut store);
        assert_eq!(loaded, CalibrationTransform::default());
        assert!(!loaded.valid);
    }

    #[test]
    fn narrow_span_counts_as_corruption() {
        let mut store = MemStore::new();
        store.put_i16(CAL_NAMESPACE, "xMin", 2000).unwrap();
        store.put_i16(CAL_NAMESPACE, "xMax", 2100).unwrap();
        store.put_i16(CAL_NAMESPACE, "yMin", 300).unwrap();
        store.put_i16(CAL_NAMESPACE, "yMax", 3800).unwrap();

        let loaded = CalibrationTransform::load(&mut store);
        assert_eq!(loaded, CalibrationTransform::default());
    }

    #[test]
    fn absent_fields_get_per_field_defaults() {
        let mut store = MemStore::new();
        let loaded = CalibrationTransform::load(&mut store);
        assert!(loaded.is_factory_default());
    }
}
