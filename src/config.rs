use crate::touch::{calibration::CalibrationFallback, AreaLayout};

pub const DISPLAY_WIDTH: u16 = 320;
pub const DISPLAY_HEIGHT: u16 = 240;

pub const TOUCH_THRESHOLD_PX: u16 = 10;
pub const TOUCH_LONG_PRESS_MS: u64 = 1_000;
pub const TOUCH_DOUBLE_TAP_MS: u64 = 300;
pub const TOUCH_MIN_GESTURE_DISTANCE_PX: u16 = 50;

pub const MAX_TOUCH_AREAS: usize = 16;

pub const CALIBRATION_STORE_OFFSET: u32 = 100;
// "TCL" (touch calibration).
pub const CALIBRATION_MAGIC: u32 = 0x0054_434C;
pub const CALIBRATION_RECORD_LEN: usize = 4 + 6 * 4;

pub const CALIBRATION_TARGET_COUNT: usize = 4;
// Top-left, top-right, bottom-right, bottom-left.
pub const CALIBRATION_TARGETS: [(u16, u16); CALIBRATION_TARGET_COUNT] =
    [(30, 30), (290, 30), (290, 210), (30, 210)];

pub const BURN_IN_SHIFT_INTERVAL_MS: u64 = 900_000;
pub const BURN_IN_MAX_OFFSET_PX: i16 = 10;

const SENSOR_TILE_WIDTH: u16 = 100;
const SENSOR_TILE_HEIGHT: u16 = 40;

/// 3x3 dashboard grid with the bottom-right cell left empty.
pub const SENSOR_TILE_LAYOUT: [AreaLayout; 8] = [
    AreaLayout::new(0, 10, 35, SENSOR_TILE_WIDTH, SENSOR_TILE_HEIGHT),
    AreaLayout::new(1, 115, 35, SENSOR_TILE_WIDTH, SENSOR_TILE_HEIGHT),
    AreaLayout::new(2, 220, 35, SENSOR_TILE_WIDTH, SENSOR_TILE_HEIGHT),
    AreaLayout::new(3, 10, 85, SENSOR_TILE_WIDTH, SENSOR_TILE_HEIGHT),
    AreaLayout::new(4, 115, 85, SENSOR_TILE_WIDTH, SENSOR_TILE_HEIGHT),
    AreaLayout::new(5, 220, 85, SENSOR_TILE_WIDTH, SENSOR_TILE_HEIGHT),
    AreaLayout::new(6, 10, 135, SENSOR_TILE_WIDTH, SENSOR_TILE_HEIGHT),
    AreaLayout::new(7, 115, 135, SENSOR_TILE_WIDTH, SENSOR_TILE_HEIGHT),
];

const _: () = assert!(SENSOR_TILE_LAYOUT.len() <= MAX_TOUCH_AREAS);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplaySize {
    pub width: u16,
    pub height: u16,
}

impl DisplaySize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn max_x(&self) -> u16 {
        self.width.saturating_sub(1)
    }

    pub fn max_y(&self) -> u16 {
        self.height.saturating_sub(1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureConfig {
    /// Per-axis travel from the last reported point before a move is emitted.
    pub touch_threshold_px: u16,
    pub long_press_ms: u64,
    /// Upper bound for a tap and for the gap between the taps of a double tap.
    pub double_tap_ms: u64,
    pub min_gesture_distance_px: u16,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchConfig {
    pub display: DisplaySize,
    pub gesture: GestureConfig,
    pub calibration_offset: u32,
    pub calibration_fallback: CalibrationFallback,
    pub calibration_targets: [(u16, u16); CALIBRATION_TARGET_COUNT],
}

pub const DEFAULT_GESTURE_CONFIG: GestureConfig = GestureConfig {
    touch_threshold_px: TOUCH_THRESHOLD_PX,
    long_press_ms: TOUCH_LONG_PRESS_MS,
    double_tap_ms: TOUCH_DOUBLE_TAP_MS,
    min_gesture_distance_px: TOUCH_MIN_GESTURE_DISTANCE_PX,
};

pub const DEFAULT_TOUCH_CONFIG: TouchConfig = TouchConfig {
    display: DisplaySize::new(DISPLAY_WIDTH, DISPLAY_HEIGHT),
    gesture: DEFAULT_GESTURE_CONFIG,
    calibration_offset: CALIBRATION_STORE_OFFSET,
    calibration_fallback: CalibrationFallback::Identity,
    calibration_targets: CALIBRATION_TARGETS,
};

impl Default for TouchConfig {
    fn default() -> Self {
        DEFAULT_TOUCH_CONFIG
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        DEFAULT_GESTURE_CONFIG
    }
}
