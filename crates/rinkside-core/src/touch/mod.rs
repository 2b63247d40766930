//! Resistive touch input pipeline.
//!
//! Layered bottom-up: a hardware driver produces [`RawPoint`]s in
//! sensor-native coordinates, [`calibration`] maps them into screen space,
//! [`wizard`] builds that mapping interactively, and [`dispatcher`] turns
//! polled contact into discrete tap and long-press events.

pub mod calibration;
pub mod dispatcher;
pub mod wizard;

pub use calibration::CalibrationTransform;
pub use dispatcher::{MappingStrategy, TouchDispatcher};
pub use wizard::{CalibrationWizard, WizardEvent};

/// One raw sample from the touch controller, in sensor-native coordinates
/// (12-bit ADC, nominally 0..4095). Produced fresh on every poll; `None`
/// from a source means no contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPoint {
    pub x: u16,
    pub y: u16,
}

impl RawPoint {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// A point in logical screen space, 0-based pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenPoint {
    pub x: u16,
    pub y: u16,
}

impl ScreenPoint {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Discrete events emitted by the dispatcher, consumed by the navigation
/// controller. At most one per press-release cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    /// A debounced press-release within the tap duration window.
    Tap(ScreenPoint),
    /// Contact held past the long-press threshold. Fires once per cycle and
    /// suppresses the tap for that cycle.
    LongPress(ScreenPoint),
}
