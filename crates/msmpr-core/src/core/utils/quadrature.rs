use std::cmp::Ordering;
use std::collections::BinaryHeap;

// 15-point Kronrod abscissae and weights with the embedded 7-point Gauss rule.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_6,
    0.949_107_912_342_758_5,
    0.864_864_423_359_769_1,
    0.741_531_185_599_394_4,
    0.586_087_235_467_691_1,
    0.405_845_151_377_397_2,
    0.207_784_955_007_898_5,
    0.0,
];
const WGK: [f64; 8] = [
    0.022_935_322_010_529_22,
    0.063_092_092_629_978_55,
    0.104_790_010_322_250_18,
    0.140_653_259_715_525_92,
    0.169_004_726_639_267_9,
    0.190_350_578_064_785_4,
    0.204_432_940_075_298_9,
    0.209_482_141_084_727_83,
];
const WG: [f64; 4] = [
    0.129_484_966_168_869_7,
    0.279_705_391_489_276_7,
    0.381_830_050_505_118_9,
    0.417_959_183_673_469_4,
];

/// Tolerances and work limits for [`integrate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureSettings {
    pub abs_tolerance: f64,
    pub rel_tolerance: f64,
    /// Bisections allowed per seed interval.
    pub subdivisions_per_interval: usize,
}

impl Default for QuadratureSettings {
    fn default() -> Self {
        Self {
            abs_tolerance: 1.49e-8,
            rel_tolerance: 1.49e-8,
            subdivisions_per_interval: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureResult {
    pub value: f64,
    pub error_estimate: f64,
    pub subdivisions: usize,
    /// `false` if the subdivision budget ran out before the tolerance was met.
    pub converged: bool,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.error.total_cmp(&other.error) == Ordering::Equal
    }
}

impl Eq for Segment {}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.error.total_cmp(&other.error)
    }
}

/// Applies the 15-point Gauss-Kronrod rule on `[a, b]`.
///
/// Returns the Kronrod estimate and the absolute difference to the embedded Gauss
/// estimate as an error bound.
pub fn gauss_kronrod_15<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> (f64, f64) {
    let center = 0.5 * (a + b);
    let half_length = 0.5 * (b - a);

    let fc = f(center);
    let mut result_gauss = fc * WG[3];
    let mut result_kronrod = fc * WGK[7];

    for j in 0..3 {
        let jtw = 2 * j + 1;
        let abscissa = half_length * XGK[jtw];
        let sum = f(center - abscissa) + f(center + abscissa);
        result_gauss += WG[j] * sum;
        result_kronrod += WGK[jtw] * sum;
    }
    for j in 0..4 {
        let jtwm1 = 2 * j;
        let abscissa = half_length * XGK[jtwm1];
        let sum = f(center - abscissa) + f(center + abscissa);
        result_kronrod += WGK[jtwm1] * sum;
    }

    let value = result_kronrod * half_length;
    let error = ((result_kronrod - result_gauss) * half_length).abs();
    (value, error)
}

/// Globally adaptive Gauss-Kronrod integration over consecutive breakpoints.
///
/// Each pair of adjacent breakpoints seeds one interval; the interval with the
/// largest error estimate is bisected until the summed error falls below
/// `max(abs_tolerance, rel_tolerance * |value|)` or the subdivision budget is spent.
/// Zero-width intervals contribute nothing. Fewer than two breakpoints integrate
/// to zero.
pub fn integrate<F: Fn(f64) -> f64>(
    f: F,
    breakpoints: &[f64],
    settings: &QuadratureSettings,
) -> QuadratureResult {
    let mut heap: BinaryHeap<Segment> = breakpoints
        .windows(2)
        .filter(|w| w[1] > w[0])
        .map(|w| {
            let (value, error) = gauss_kronrod_15(&f, w[0], w[1]);
            Segment {
                a: w[0],
                b: w[1],
                value,
                error,
            }
        })
        .collect();

    let budget = settings.subdivisions_per_interval * heap.len().max(1);
    let mut total_value: f64 = heap.iter().map(|s| s.value).sum();
    let mut total_error: f64 = heap.iter().map(|s| s.error).sum();
    let mut subdivisions = 0;

    let tolerance_met = |value: f64, error: f64| {
        error <= settings.abs_tolerance.max(settings.rel_tolerance * value.abs())
    };

    while !tolerance_met(total_value, total_error) && subdivisions < budget {
        let Some(worst) = heap.pop() else {
            break;
        };
        let mid = 0.5 * (worst.a + worst.b);
        if mid <= worst.a || mid >= worst.b {
            // Interval cannot be split further in floating point.
            heap.push(Segment { error: 0.0, ..worst });
            total_error -= worst.error;
            continue;
        }
        let (left_value, left_error) = gauss_kronrod_15(&f, worst.a, mid);
        let (right_value, right_error) = gauss_kronrod_15(&f, mid, worst.b);

        total_value += left_value + right_value - worst.value;
        total_error += left_error + right_error - worst.error;
        heap.push(Segment {
            a: worst.a,
            b: mid,
            value: left_value,
            error: left_error,
        });
        heap.push(Segment {
            a: mid,
            b: worst.b,
            value: right_value,
            error: right_error,
        });
        subdivisions += 1;
    }

    // Re-sum to shed the drift accumulated by the incremental updates.
    let value: f64 = heap.iter().map(|s| s.value).sum();
    let error_estimate: f64 = heap.iter().map(|s| s.error).sum();

    QuadratureResult {
        value,
        error_estimate,
        subdivisions,
        converged: tolerance_met(value, error_estimate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn gauss_kronrod_is_exact_for_low_degree_polynomials() {
        let (value, error) = gauss_kronrod_15(&|x: f64| 3.0 * x * x + 1.0, 0.0, 2.0);
        assert!((value - 10.0).abs() < TOLERANCE);
        assert!(error < TOLERANCE);
    }

    #[test]
    fn integrate_constant_over_breakpoints() {
        let result = integrate(|_| 2.0, &[0.0, 1.0, 2.0], &QuadratureSettings::default());
        assert!((result.value - 4.0).abs() < TOLERANCE);
        assert!(result.converged);
        assert_eq!(result.subdivisions, 0);
    }

    #[test]
    fn integrate_adapts_to_endpoint_singularity() {
        let result = integrate(|x: f64| x.sqrt(), &[0.0, 1.0], &QuadratureSettings::default());
        assert!((result.value - 2.0 / 3.0).abs() < 1e-7);
        assert!(result.converged);
        assert!(result.subdivisions > 0);
    }

    #[test]
    fn integrate_exponential_tail() {
        let result = integrate(
            |x: f64| (-x / 5.0).exp(),
            &[0.0, 100.0],
            &QuadratureSettings::default(),
        );
        let exact = 5.0 * (1.0 - (-20.0f64).exp());
        assert!((result.value - exact).abs() < 1e-8);
    }

    #[test]
    fn zero_width_and_missing_intervals_contribute_nothing() {
        let settings = QuadratureSettings::default();
        assert_eq!(integrate(|_| 1.0, &[], &settings).value, 0.0);
        assert_eq!(integrate(|_| 1.0, &[3.0], &settings).value, 0.0);
        let result = integrate(|_| 1.0, &[0.0, 1.0, 1.0, 2.0], &settings);
        assert!((result.value - 2.0).abs() < TOLERANCE);
    }
}
