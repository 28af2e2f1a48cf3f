//! Bracketed root finding.
//!
//! Brent's method: bisection safeguarded inverse quadratic interpolation.
//! Given `f(lo)` and `f(hi)` of opposite sign it always converges, and on
//! smooth monotonic functions (achieved power as a function of effect size)
//! it does so in a handful of iterations.

use crate::constants::{ROOT_MAX_ITERATIONS, ROOT_TOLERANCE};

/// Why a root could not be found.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RootError {
    /// `f(lo)` and `f(hi)` have the same sign (or one is not finite).
    #[error("root not bracketed: f({lo}) = {f_lo}, f({hi}) = {f_hi}")]
    NotBracketed {
        /// Lower end of the search interval.
        lo: f64,
        /// Upper end of the search interval.
        hi: f64,
        /// Function value at `lo`.
        f_lo: f64,
        /// Function value at `hi`.
        f_hi: f64,
    },

    /// Iteration cap reached before the bracket shrank below tolerance.
    #[error("no convergence after {iterations} iterations (last estimate {estimate})")]
    MaxIterations {
        /// Iterations performed.
        iterations: usize,
        /// Best estimate when the cap was hit.
        estimate: f64,
    },
}

/// A converged root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    /// Location of the root.
    pub x: f64,
    /// Iterations used.
    pub iterations: usize,
}

/// Find a root of `f` in `[lo, hi]` with default tolerance and iteration cap.
pub fn brent<F>(f: F, lo: f64, hi: f64) -> Result<Root, RootError>
where
    F: Fn(f64) -> f64,
{
    brent_with(f, lo, hi, ROOT_TOLERANCE, ROOT_MAX_ITERATIONS)
}

/// Find a root of `f` in `[lo, hi]`.
///
/// # Errors
///
/// [`RootError::NotBracketed`] when `f(lo)` and `f(hi)` do not straddle
/// zero, [`RootError::MaxIterations`] when `max_iter` is exhausted.
pub fn brent_with<F>(f: F, lo: f64, hi: f64, tol: f64, max_iter: usize) -> Result<Root, RootError>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = (lo, hi);
    let (mut fa, mut fb) = (f(a), f(b));

    if fa == 0.0 {
        return Ok(Root { x: a, iterations: 0 });
    }
    if fb == 0.0 {
        return Ok(Root { x: b, iterations: 0 });
    }
    if !(fa.is_finite() && fb.is_finite()) || fa.signum() == fb.signum() || lo >= hi {
        return Err(RootError::NotBracketed {
            lo,
            hi,
            f_lo: fa,
            f_hi: fb,
        });
    }

    let (mut c, mut fc) = (a, fa);
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=max_iter {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        // Keep b as the best estimate
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * tol;
        let m = 0.5 * (c - b);
        tracing::trace!(iteration, x = b, fx = fb, half_width = m.abs(), "brent step");

        if m.abs() <= tol1 || fb == 0.0 {
            return Ok(Root { x: b, iterations: iteration });
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Attempt interpolation
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // Secant
                (2.0 * m * s, 1.0 - s)
            } else {
                // Inverse quadratic
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            let min1 = 3.0 * m * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = d;
            }
        } else {
            d = m;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol1 { d } else { tol1.copysign(m) };
        fb = f(b);
    }

    Err(RootError::MaxIterations {
        iterations: max_iter,
        estimate: b,
    })
}
