use crate::core::models::distribution::SizePoint;

/// Piecewise-linear view over a sampled curve.
///
/// Between samples the curve is linearly interpolated; outside the sampled range it
/// is held flat at the nearest boundary value. When several samples share a size,
/// evaluation at exactly that size returns the last of them, so a zone boundary
/// reports the value of the zone that starts there.
#[derive(Debug, Clone, Copy)]
pub struct LinearInterpolant<'a> {
    points: &'a [SizePoint],
}

impl<'a> LinearInterpolant<'a> {
    /// Returns `None` for an empty sample.
    pub fn new(points: &'a [SizePoint]) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    pub fn points(&self) -> &'a [SizePoint] {
        self.points
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let points = self.points;
        let first = points[0];
        let last = points[points.len() - 1];
        if x <= first.size {
            // The flat extension and an exact hit on the first size differ only when
            // the first size is repeated.
            return if x < first.size {
                first.value
            } else {
                self.last_at_or_below(x).value
            };
        }
        if x >= last.size {
            return last.value;
        }

        // Index of the first sample strictly greater than x; the one before it is the
        // last sample at or below x.
        let upper = points.partition_point(|p| p.size <= x);
        let lo = points[upper - 1];
        if lo.size == x {
            return lo.value;
        }
        let hi = points[upper];
        let width = hi.size - lo.size;
        lo.value * (hi.size - x) / width + hi.value * (x - lo.size) / width
    }

    fn last_at_or_below(&self, x: f64) -> SizePoint {
        let upper = self.points.partition_point(|p| p.size <= x);
        self.points[upper.saturating_sub(1)]
    }

    /// Distinct sample sizes in ascending order; used as quadrature breakpoints.
    pub fn breakpoints(&self) -> Vec<f64> {
        let mut sizes: Vec<f64> = self.points.iter().map(|p| p.size).collect();
        sizes.dedup();
        sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(data: &[(f64, f64)]) -> Vec<SizePoint> {
        data.iter().map(|&(s, v)| SizePoint::new(s, v)).collect()
    }

    #[test]
    fn empty_sample_has_no_interpolant() {
        assert!(LinearInterpolant::new(&[]).is_none());
    }

    #[test]
    fn interpolates_linearly_between_samples() {
        let points = pts(&[(0.0, 0.0), (2.0, 4.0), (4.0, 0.0)]);
        let f = LinearInterpolant::new(&points).unwrap();
        assert!((f.evaluate(1.0) - 2.0).abs() < 1e-12);
        assert!((f.evaluate(3.0) - 2.0).abs() < 1e-12);
        assert_eq!(f.evaluate(2.0), 4.0);
    }

    #[test]
    fn holds_boundary_values_outside_range() {
        let points = pts(&[(1.0, 3.0), (2.0, 5.0)]);
        let f = LinearInterpolant::new(&points).unwrap();
        assert_eq!(f.evaluate(-10.0), 3.0);
        assert_eq!(f.evaluate(100.0), 5.0);
    }

    #[test]
    fn duplicated_size_reports_later_sample() {
        let points = pts(&[(0.0, 10.0), (1.0, 8.0), (1.0, 6.0), (2.0, 2.0)]);
        let f = LinearInterpolant::new(&points).unwrap();
        assert_eq!(f.evaluate(1.0), 6.0);
        assert!((f.evaluate(0.5) - 9.0).abs() < 1e-12);
        assert!((f.evaluate(1.5) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn duplicated_first_size_reports_later_sample() {
        let points = pts(&[(0.0, 1.0), (0.0, 7.0), (1.0, 7.0)]);
        let f = LinearInterpolant::new(&points).unwrap();
        assert_eq!(f.evaluate(0.0), 7.0);
        assert_eq!(f.evaluate(-1.0), 1.0);
    }

    #[test]
    fn breakpoints_skip_duplicates() {
        let points = pts(&[(0.0, 1.0), (1.0, 1.0), (1.0, 2.0), (3.0, 2.0)]);
        let f = LinearInterpolant::new(&points).unwrap();
        assert_eq!(f.breakpoints(), vec![0.0, 1.0, 3.0]);
    }
}
