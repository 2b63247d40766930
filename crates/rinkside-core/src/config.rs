//! Shared constants for the panel: display geometry, input timing, layout
//! regions, and fetch cadence.
//!
//! Timing values are plain milliseconds rather than `embassy_time::Duration`
//! so the core stays host-testable; the firmware converts at the boundary.

/// Firmware version reported on the settings screen.
pub const FIRMWARE_VERSION: &str = "2.0.0";

// ---------------------------------------------------------------------------
// Display geometry
// ---------------------------------------------------------------------------

/// Logical display width in pixels (landscape).
pub const SCREEN_WIDTH: u16 = 320;

/// Logical display height in pixels (landscape).
pub const SCREEN_HEIGHT: u16 = 240;

/// Height of the tab bar strip at the top of list screens.
pub const TAB_BAR_HEIGHT: u16 = 28;

/// Number of top-level tabs (SHL, HA, upcoming, news).
pub const TAB_COUNT: usize = 4;

/// Width of the scroll strip reserved along the right display edge.
pub const SCROLL_STRIP_WIDTH: u16 = 30;

// ---------------------------------------------------------------------------
// Touch input timing
// ---------------------------------------------------------------------------

/// Dispatcher poll cadence. 20 ms keeps touch sampling at 50 Hz independent
/// of how long a redraw takes.
pub const TOUCH_POLL_INTERVAL_MS: u64 = 20;

/// Minimum gap after a recognized press-release cycle before the next press
/// is accepted. Suppresses contact bounce on the resistive panel.
pub const TOUCH_DEBOUNCE_MS: u64 = 100;

/// Hold duration that opens the settings screen from anywhere.
pub const LONG_PRESS_MS: u64 = 10_000;

// ---------------------------------------------------------------------------
// Calibration wizard
// ---------------------------------------------------------------------------

/// Crosshair target inset from each display corner.
pub const CAL_TARGET_INSET: i32 = 20;

/// Holding a wizard tap longer than this cancels the wizard.
pub const WIZARD_CANCEL_HOLD_MS: u64 = 3_000;

/// Lower bound (exclusive) of a valid wizard tap duration.
pub const WIZARD_TAP_MIN_MS: u64 = 50;

/// Upper bound (exclusive) of a valid wizard tap duration. Longer contacts
/// are treated as accidental drags and ignored.
pub const WIZARD_TAP_MAX_MS: u64 = 1_500;

/// Sensor-native coordinate range of the XPT2046 (12-bit ADC).
pub const RAW_RANGE: u16 = 4096;

// ---------------------------------------------------------------------------
// List screens
// ---------------------------------------------------------------------------

/// Table rows visible at once on a standings screen.
pub const VISIBLE_TEAMS: usize = 8;

/// Match cards visible at once on the upcoming screen.
pub const VISIBLE_MATCHES: usize = 4;

/// News rows visible at once on the news screen.
pub const VISIBLE_NEWS: usize = 5;

// ---------------------------------------------------------------------------
// Backend fetch cadence
// ---------------------------------------------------------------------------

/// Normal interval between backend polls.
pub const FETCH_INTERVAL_MS: u64 = 300_000;

/// Faster poll interval while a match is live.
pub const FETCH_INTERVAL_LIVE_MS: u64 = 30_000;

/// Retry interval after a failed fetch.
pub const FETCH_INTERVAL_ERROR_MS: u64 = 15_000;

/// How long without a successful fetch before the panel shows the offline
/// banner.
pub const CONNECTION_TIMEOUT_MS: u64 = 180_000;

/// Interval between Wi-Fi link checks / reconnect attempts.
pub const WIFI_CHECK_INTERVAL_MS: u64 = 30_000;

/// Platform liveness deadline; the main loop must feed the watchdog at least
/// this often.
pub const WATCHDOG_TIMEOUT_MS: u64 = 30_000;
