use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RootError {
    #[error("Function value is not finite at x = {x}")]
    NonFinite { x: f64 },

    #[error("No sign change found in [{lower}, {upper}] after {steps} expansion steps")]
    NoBracket { lower: f64, upper: f64, steps: usize },

    #[error("Interval [{lower}, {upper}] does not bracket a root")]
    NoSignChange { lower: f64, upper: f64 },

    #[error("Invalid starting point {0}: must be finite and positive")]
    InvalidStart(f64),

    #[error("Root not converged after {iterations} iterations (best estimate {best})")]
    MaxIterations { iterations: usize, best: f64 },

    #[error("Residual {residual:e} at x = {x} exceeds the accepted {allowed:e}")]
    ResidualTooLarge { x: f64, residual: f64, allowed: f64 },
}

/// An interval whose endpoint function values differ in sign (or touch zero).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lower: f64,
    pub upper: f64,
    pub f_lower: f64,
    pub f_upper: f64,
    pub steps: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub x: f64,
    pub residual: f64,
    pub iterations: usize,
}

fn checked<F: FnMut(f64) -> f64>(f: &mut F, x: f64) -> Result<f64, RootError> {
    let value = f(x);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RootError::NonFinite { x })
    }
}

#[inline]
fn straddles(a: f64, b: f64) -> bool {
    a == 0.0 || b == 0.0 || (a < 0.0) != (b < 0.0)
}

/// Searches outward from a positive `start` for a sign change, multiplying and
/// dividing by `factor` on each step.
///
/// Every trial point stays strictly positive. The first neighbouring pair whose
/// values straddle zero is returned, so the bracket is at most one factor wide.
pub fn expand_positive_bracket<F: FnMut(f64) -> f64>(
    mut f: F,
    start: f64,
    factor: f64,
    max_steps: usize,
) -> Result<Bracket, RootError> {
    if !start.is_finite() || start <= 0.0 {
        return Err(RootError::InvalidStart(start));
    }
    let factor = if factor > 1.0 { factor } else { 2.0 };

    let f_start = checked(&mut f, start)?;
    if f_start == 0.0 {
        return Ok(Bracket {
            lower: start,
            upper: start,
            f_lower: f_start,
            f_upper: f_start,
            steps: 0,
        });
    }

    let (mut lo, mut f_lo) = (start, f_start);
    let (mut hi, mut f_hi) = (start, f_start);

    for step in 1..=max_steps {
        let next_hi = hi * factor;
        let f_next_hi = checked(&mut f, next_hi)?;
        if straddles(f_hi, f_next_hi) {
            return Ok(Bracket {
                lower: hi,
                upper: next_hi,
                f_lower: f_hi,
                f_upper: f_next_hi,
                steps: step,
            });
        }
        (hi, f_hi) = (next_hi, f_next_hi);

        let next_lo = lo / factor;
        let f_next_lo = checked(&mut f, next_lo)?;
        if straddles(f_next_lo, f_lo) {
            return Ok(Bracket {
                lower: next_lo,
                upper: lo,
                f_lower: f_next_lo,
                f_upper: f_lo,
                steps: step,
            });
        }
        (lo, f_lo) = (next_lo, f_next_lo);
    }

    Err(RootError::NoBracket {
        lower: lo,
        upper: hi,
        steps: max_steps,
    })
}

/// Brent's method on a sign-changing bracket.
///
/// Terminates once the remaining bracket is no wider than `rel_tolerance * |x|`
/// or the function value is exactly zero.
pub fn brent<F: FnMut(f64) -> f64>(
    mut f: F,
    bracket: &Bracket,
    rel_tolerance: f64,
    max_iterations: usize,
) -> Result<Root, RootError> {
    let (mut a, mut b) = (bracket.lower, bracket.upper);
    let (mut fa, mut fb) = (bracket.f_lower, bracket.f_upper);

    if fa == 0.0 {
        return Ok(Root {
            x: a,
            residual: 0.0,
            iterations: 0,
        });
    }
    if fb == 0.0 {
        return Ok(Root {
            x: b,
            residual: 0.0,
            iterations: 0,
        });
    }
    if !straddles(fa, fb) {
        return Err(RootError::NoSignChange { lower: a, upper: b });
    }

    let (mut c, mut fc) = (b, fb);
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=max_iterations {
        if (fb > 0.0) == (fc > 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * rel_tolerance * b.abs() + f64::MIN_POSITIVE;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(Root {
                x: b,
                residual: fb,
                iterations: iteration,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation, or secant when only two points are known.
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q0 = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q0 * (q0 - r) - (b - a) * (r - 1.0)),
                    (q0 - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(xm) };
        fb = checked(&mut f, b)?;
    }

    Err(RootError::MaxIterations {
        iterations: max_iterations,
        best: b,
    })
}

/// Accepts `root` only if `|residual| <= allowed`.
///
/// Brent's method stops on bracket width alone, so a function whose values are
/// dominated by rounding noise can still report convergence.
pub fn accept_residual(root: Root, allowed: f64) -> Result<Root, RootError> {
    if root.residual.abs() <= allowed {
        Ok(root)
    } else {
        Err(RootError::ResidualTooLarge {
            x: root.x,
            residual: root.residual,
            allowed,
        })
    }
}
