use super::Point2;

/// Computes the signed area of a closed polygon in parameter space (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]
    }

    #[test]
    fn ccw_square_has_positive_area() {
        assert!((signed_area_2d(&square()) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn cw_square_has_negative_area() {
        let mut pts = square();
        pts.reverse();
        assert!((signed_area_2d(&pts) + 4.0).abs() < 1e-12);
    }
}
