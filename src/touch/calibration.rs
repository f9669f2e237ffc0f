use core::fmt;

use super::types::{RawTouch, TouchPoint};
use crate::config::DisplaySize;

mod session;
mod solve;

pub use session::CalibrationSession;
pub use solve::{solve_four_point, solve_two_point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationError {
    /// Not enough corners captured for a solve.
    Incomplete,
    /// Captured corners do not span both axes.
    Degenerate,
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete => f.write_str("calibration points incomplete"),
            Self::Degenerate => f.write_str("calibration points degenerate"),
        }
    }
}

/// `screen_x = a*raw_x + b*raw_y + c`, `screen_y = d*raw_x + e*raw_y + f`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl AffineTransform {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 1.0,
        f: 0.0,
    };

    pub const fn from_array(values: [f32; 6]) -> Self {
        Self {
            a: values[0],
            b: values[1],
            c: values[2],
            d: values[3],
            e: values[4],
            f: values[5],
        }
    }

    pub const fn to_array(&self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn map(&self, raw: RawTouch) -> (f32, f32) {
        let x = f32::from(raw.x);
        let y = f32::from(raw.y);
        (
            self.a * x + self.b * y + self.c,
            self.d * x + self.e * y + self.f,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|value| value.is_finite())
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Scale/offset form with optional axis swap and mirroring.
///
/// The source axes are `(raw_x, raw_y)`, or `(raw_y, raw_x)` when `swap_xy`
/// is set; each screen axis is then `±scale * source + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisMapping {
    pub scale_x: f32,
    pub scale_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub swap_xy: bool,
    pub mirror_x: bool,
    pub mirror_y: bool,
}

impl AxisMapping {
    pub fn into_transform(self) -> AffineTransform {
        let sx = if self.mirror_x {
            -self.scale_x
        } else {
            self.scale_x
        };
        let sy = if self.mirror_y {
            -self.scale_y
        } else {
            self.scale_y
        };

        if self.swap_xy {
            AffineTransform {
                a: 0.0,
                b: sx,
                c: self.offset_x,
                d: sy,
                e: 0.0,
                f: self.offset_y,
            }
        } else {
            AffineTransform {
                a: sx,
                b: 0.0,
                c: self.offset_x,
                d: 0.0,
                e: sy,
                f: self.offset_y,
            }
        }
    }
}

impl From<AxisMapping> for AffineTransform {
    fn from(mapping: AxisMapping) -> Self {
        mapping.into_transform()
    }
}

/// Transform used when no valid calibration is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CalibrationFallback {
    /// Raw coordinates pass through, the model stays uncalibrated.
    #[default]
    Identity,
    /// Device-specific transform, treated as a real calibration.
    Factory(AffineTransform),
}

impl CalibrationFallback {
    pub fn model(&self) -> CalibrationModel {
        match self {
            Self::Identity => CalibrationModel::uncalibrated(),
            Self::Factory(transform) => CalibrationModel::calibrated(*transform),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationModel {
    pub transform: AffineTransform,
    pub has_calibration: bool,
}

impl Default for CalibrationModel {
    fn default() -> Self {
        Self::uncalibrated()
    }
}

impl CalibrationModel {
    pub const fn uncalibrated() -> Self {
        Self {
            transform: AffineTransform::IDENTITY,
            has_calibration: false,
        }
    }

    pub const fn calibrated(transform: AffineTransform) -> Self {
        Self {
            transform,
            has_calibration: true,
        }
    }

    /// Maps a raw sample onto the display, always inside `display`.
    pub fn apply(&self, raw: RawTouch, display: DisplaySize) -> TouchPoint {
        let (x, y) = if self.has_calibration {
            let (x, y) = self.transform.map(raw);
            (
                clamp_to_axis(x, display.max_x()),
                clamp_to_axis(y, display.max_y()),
            )
        } else {
            (raw.x.min(display.max_x()), raw.y.min(display.max_y()))
        };
        TouchPoint::with_contact(x, y, raw.pressure, raw.area)
    }
}

fn clamp_to_axis(value: f32, max: u16) -> u16 {
    // NaN lands on zero.
    if !(value >= 0.0) {
        return 0;
    }
    let max_f = f32::from(max);
    if value >= max_f {
        return max;
    }
    (value + 0.5) as u16
}

/// One corner of the guided capture flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CalibrationPoint {
    pub screen_x: u16,
    pub screen_y: u16,
    pub touch_x: u16,
    pub touch_y: u16,
    pub captured: bool,
}

impl CalibrationPoint {
    pub const fn target(screen_x: u16, screen_y: u16) -> Self {
        Self {
            screen_x,
            screen_y,
            touch_x: 0,
            touch_y: 0,
            captured: false,
        }
    }

    pub const fn captured(screen: (u16, u16), raw: (u16, u16)) -> Self {
        Self {
            screen_x: screen.0,
            screen_y: screen.1,
            touch_x: raw.0,
            touch_y: raw.1,
            captured: true,
        }
    }

    pub fn record(&mut self, raw: RawTouch) {
        self.touch_x = raw.x;
        self.touch_y = raw.y;
        self.captured = true;
    }
}
