use super::{solve_four_point, AffineTransform, CalibrationError, CalibrationPoint};
use crate::config::{CALIBRATION_TARGETS, CALIBRATION_TARGET_COUNT};
use crate::touch::types::RawTouch;

/// Guided four-corner capture.
///
/// Corners are taken in target order, one per press: a sample is captured
/// only on the edge from "no contact" to "contact", so holding a finger on a
/// target never fills the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalibrationSession {
    points: [CalibrationPoint; CALIBRATION_TARGET_COUNT],
    was_pressed: bool,
}

impl Default for CalibrationSession {
    fn default() -> Self {
        Self::new(CALIBRATION_TARGETS)
    }
}

impl CalibrationSession {
    pub fn new(targets: [(u16, u16); CALIBRATION_TARGET_COUNT]) -> Self {
        Self {
            points: targets.map(|(x, y)| CalibrationPoint::target(x, y)),
            was_pressed: false,
        }
    }

    /// Index of the first corner still waiting for a touch.
    pub fn current_index(&self) -> Option<usize> {
        self.points.iter().position(|point| !point.captured)
    }

    /// Screen position of the corner the user should touch next.
    pub fn current_target(&self) -> Option<(u16, u16)> {
        self.current_index()
            .map(|index| (self.points[index].screen_x, self.points[index].screen_y))
    }

    /// Feeds one poll. Returns the index of the corner captured on this poll.
    pub fn feed(&mut self, sample: Option<RawTouch>) -> Option<usize> {
        let pressed = sample.is_some();
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;

        match sample {
            Some(raw) if edge => self.capture(raw),
            _ => None,
        }
    }

    /// Records `raw` for the current target.
    pub fn capture(&mut self, raw: RawTouch) -> Option<usize> {
        let index = self.current_index()?;
        self.points[index].record(raw);
        log::info!(
            "touch_cal: corner {} screen=({},{}) raw=({},{})",
            index,
            self.points[index].screen_x,
            self.points[index].screen_y,
            raw.x,
            raw.y
        );
        Some(index)
    }

    /// Overwrites one corner with an externally captured pair. Out-of-range
    /// indices are ignored.
    pub fn set_point(&mut self, index: usize, screen: (u16, u16), raw: RawTouch) -> bool {
        match self.points.get_mut(index) {
            Some(point) => {
                *point = CalibrationPoint::captured(screen, (raw.x, raw.y));
                true
            }
            None => false,
        }
    }

    pub fn captured_count(&self) -> usize {
        self.points.iter().filter(|point| point.captured).count()
    }

    pub fn is_complete(&self) -> bool {
        self.current_index().is_none()
    }

    pub fn points(&self) -> &[CalibrationPoint; CALIBRATION_TARGET_COUNT] {
        &self.points
    }

    pub fn solve(&self) -> Result<AffineTransform, CalibrationError> {
        solve_four_point(&self.points)
    }
}
