use super::{AffineTransform, AxisMapping, CalibrationError, CalibrationPoint};

// Twice the triangle area, in raw units², below which three corners count as collinear.
const MIN_SPAN_AREA: f64 = 1.0;

/// Derives the transform from a diagonal pair of corners.
///
/// Swaps the raw axes when the touch spans are ordered differently from the
/// screen spans, and normalizes negative scales into mirror flags.
pub fn solve_two_point(
    top_left: &CalibrationPoint,
    bottom_right: &CalibrationPoint,
) -> Result<AffineTransform, CalibrationError> {
    solve_axis_mapping(top_left, bottom_right).map(AxisMapping::into_transform)
}

pub(crate) fn solve_axis_mapping(
    top_left: &CalibrationPoint,
    bottom_right: &CalibrationPoint,
) -> Result<AxisMapping, CalibrationError> {
    if !top_left.captured || !bottom_right.captured {
        return Err(CalibrationError::Incomplete);
    }

    let touch_span_x = f32::from(bottom_right.touch_x) - f32::from(top_left.touch_x);
    let touch_span_y = f32::from(bottom_right.touch_y) - f32::from(top_left.touch_y);
    let screen_span_x = f32::from(bottom_right.screen_x) - f32::from(top_left.screen_x);
    let screen_span_y = f32::from(bottom_right.screen_y) - f32::from(top_left.screen_y);

    let swap_xy = (touch_span_x.abs() < touch_span_y.abs())
        != (screen_span_x.abs() < screen_span_y.abs());

    let (source_span_x, source_span_y, source_origin_x, source_origin_y) = if swap_xy {
        (
            touch_span_y,
            touch_span_x,
            f32::from(top_left.touch_y),
            f32::from(top_left.touch_x),
        )
    } else {
        (
            touch_span_x,
            touch_span_y,
            f32::from(top_left.touch_x),
            f32::from(top_left.touch_y),
        )
    };

    if source_span_x == 0.0 || source_span_y == 0.0 {
        return Err(CalibrationError::Degenerate);
    }

    let signed_scale_x = screen_span_x / source_span_x;
    let signed_scale_y = screen_span_y / source_span_y;
    if signed_scale_x == 0.0 || signed_scale_y == 0.0 {
        return Err(CalibrationError::Degenerate);
    }

    let mapping = AxisMapping {
        scale_x: signed_scale_x.abs(),
        scale_y: signed_scale_y.abs(),
        offset_x: f32::from(top_left.screen_x) - signed_scale_x * source_origin_x,
        offset_y: f32::from(top_left.screen_y) - signed_scale_y * source_origin_y,
        swap_xy,
        mirror_x: signed_scale_x < 0.0,
        mirror_y: signed_scale_y < 0.0,
    };
    log::debug!(
        "touch_cal: two-point swap={} mirror=({},{}) scale=({},{})",
        mapping.swap_xy,
        mapping.mirror_x,
        mapping.mirror_y,
        mapping.scale_x,
        mapping.scale_y
    );
    Ok(mapping)
}

/// Least-squares fit over every captured corner (at least three, not
/// collinear); falls back to the diagonal pair `points[0]`/`points[2]`.
pub fn solve_four_point(points: &[CalibrationPoint]) -> Result<AffineTransform, CalibrationError> {
    let captured = points.iter().filter(|point| point.captured).count();
    if captured >= 3 {
        if let Some(transform) = least_squares(points) {
            log::debug!("touch_cal: least-squares fit over {} corners", captured);
            return Ok(transform);
        }
        log::debug!("touch_cal: corners collinear, using diagonal pair");
    }

    match (points.first(), points.get(2)) {
        (Some(top_left), Some(bottom_right)) => solve_two_point(top_left, bottom_right),
        _ => Err(CalibrationError::Incomplete),
    }
}

fn least_squares(points: &[CalibrationPoint]) -> Option<AffineTransform> {
    if !spans_plane(points) {
        return None;
    }

    // Normal equations of [rx ry 1] · (a b c)ᵀ = sx and the same for sy.
    let mut normal = [[0.0f64; 3]; 3];
    let mut rhs_x = [0.0f64; 3];
    let mut rhs_y = [0.0f64; 3];
    for point in points.iter().filter(|point| point.captured) {
        let row = [f64::from(point.touch_x), f64::from(point.touch_y), 1.0];
        let sx = f64::from(point.screen_x);
        let sy = f64::from(point.screen_y);
        for i in 0..3 {
            for j in 0..3 {
                normal[i][j] += row[i] * row[j];
            }
            rhs_x[i] += row[i] * sx;
            rhs_y[i] += row[i] * sy;
        }
    }

    let [a, b, c] = solve_3x3(&normal, &rhs_x)?;
    let [d, e, f] = solve_3x3(&normal, &rhs_y)?;
    let transform = AffineTransform {
        a: a as f32,
        b: b as f32,
        c: c as f32,
        d: d as f32,
        e: e as f32,
        f: f as f32,
    };
    transform.is_finite().then_some(transform)
}

fn spans_plane(points: &[CalibrationPoint]) -> bool {
    let captured: heapless::Vec<(f64, f64), 8> = points
        .iter()
        .filter(|point| point.captured)
        .take(8)
        .map(|point| (f64::from(point.touch_x), f64::from(point.touch_y)))
        .collect();

    for i in 0..captured.len() {
        for j in (i + 1)..captured.len() {
            for k in (j + 1)..captured.len() {
                let (ax, ay) = captured[i];
                let (bx, by) = captured[j];
                let (cx, cy) = captured[k];
                let cross = (bx - ax) * (cy - ay) - (by - ay) * (cx - ax);
                if cross > MIN_SPAN_AREA || cross < -MIN_SPAN_AREA {
                    return true;
                }
            }
        }
    }
    false
}

fn determinant(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

fn solve_3x3(m: &[[f64; 3]; 3], rhs: &[f64; 3]) -> Option<[f64; 3]> {
    let det = determinant(m);
    if det == 0.0 || !det.is_finite() {
        return None;
    }

    let mut solution = [0.0f64; 3];
    for (column, value) in solution.iter_mut().enumerate() {
        let mut replaced = *m;
        for row in 0..3 {
            replaced[row][column] = rhs[row];
        }
        *value = determinant(&replaced) / det;
    }
    Some(solution)
}
