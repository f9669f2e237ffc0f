#![no_std]

//! Touch input recognition and calibration for small capacitive dashboards.
//!
//! Raw samples from the touch controller are mapped onto the display through
//! a persisted affine calibration, classified into UI events by a single
//! finger state machine and hit-tested against the currently rendered tiles.

#[cfg(test)]
extern crate std;

pub mod config;
pub mod drivers;
pub mod storage;
pub mod touch;

pub use config::{DisplaySize, GestureConfig, TouchConfig, DEFAULT_TOUCH_CONFIG};
pub use drivers::Cst820;
pub use storage::{CalibrationStore, StoreError};
pub use touch::{
    calibration::{
        AffineTransform, AxisMapping, CalibrationError, CalibrationFallback, CalibrationModel,
        CalibrationPoint, CalibrationSession,
    },
    AreaLayout, BurnInShifter, DisplayOffset, RawTouch, RegistryError, SampleError,
    SwipeDirection, TouchArea, TouchAreaRegistry, TouchClassifier, TouchEvent, TouchEventKind,
    TouchManager, TouchPoint, TouchSampleSource, TouchState,
};
