use super::super::types::{SwipeDirection, TouchPoint};

/// Larger of the per-axis distances between two points.
pub(crate) fn axis_travel(a: TouchPoint, b: TouchPoint) -> u16 {
    let dx = a.x.abs_diff(b.x);
    let dy = a.y.abs_diff(b.y);
    dx.max(dy)
}

/// Swipe direction of a completed press, `None` below the minimum distance.
/// The dominant axis wins; equal travel counts as horizontal.
pub(crate) fn detect_swipe(
    start: TouchPoint,
    end: TouchPoint,
    min_distance_px: u16,
) -> Option<SwipeDirection> {
    let dx = i32::from(end.x) - i32::from(start.x);
    let dy = i32::from(end.y) - i32::from(start.y);
    let abs_dx = dx.abs();
    let abs_dy = dy.abs();
    let min_distance = i32::from(min_distance_px);

    if abs_dx < min_distance && abs_dy < min_distance {
        return None;
    }

    if abs_dx >= abs_dy {
        if dx > 0 {
            Some(SwipeDirection::Right)
        } else {
            Some(SwipeDirection::Left)
        }
    } else if dy > 0 {
        Some(SwipeDirection::Down)
    } else {
        Some(SwipeDirection::Up)
    }
}
