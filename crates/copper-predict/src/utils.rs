//! Numeric helpers shared by the feature pipeline and the adapters.

// =============================================================================
// Rounding
// =============================================================================

/// Round `value` to `decimals` decimal places (half away from zero).
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

// =============================================================================
// Scalar minimization
// =============================================================================

const GOLDEN: f64 = 1.618_034;
const GROW_LIMIT: f64 = 110.0;
const TINY: f64 = 1e-21;
const CGOLD: f64 = 0.381_966_0;
const MIN_TOL: f64 = 1e-11;

/// Relative tolerance used by [`minimize_scalar`] by default.
pub const DEFAULT_XTOL: f64 = 1.48e-8;

/// Errors from [`minimize_scalar`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MinimizeError {
    /// The objective kept decreasing while the bracket was being expanded.
    #[error("no bracketing interval found after {0} expansion steps")]
    NoBracket(usize),
    /// The objective evaluated to NaN.
    #[error("objective is NaN at x = {0}")]
    NotANumber(f64),
}

/// Three points `a, b, c` with `f(b) <= f(a)` and `f(b) <= f(c)`.
#[derive(Debug, Clone, Copy)]
struct Bracket {
    a: f64,
    b: f64,
    c: f64,
    fb: f64,
}

fn eval<F: FnMut(f64) -> f64>(f: &mut F, x: f64) -> Result<f64, MinimizeError> {
    let y = f(x);
    if y.is_nan() {
        Err(MinimizeError::NotANumber(x))
    } else {
        Ok(y)
    }
}

/// Expand the downhill interval starting at `(xa, xb)` until it brackets a minimum.
///
/// Golden-section growth with parabolic extrapolation, capped at `GROW_LIMIT`
/// times the current step.
fn bracket<F: FnMut(f64) -> f64>(f: &mut F, xa: f64, xb: f64) -> Result<Bracket, MinimizeError> {
    const MAX_ITER: usize = 1000;

    let (mut xa, mut xb) = (xa, xb);
    let (mut fa, mut fb) = (eval(f, xa)?, eval(f, xb)?);
    if fa < fb {
        std::mem::swap(&mut xa, &mut xb);
        std::mem::swap(&mut fa, &mut fb);
    }
    let mut xc = xb + GOLDEN * (xb - xa);
    let mut fc = eval(f, xc)?;

    let mut iter = 0;
    while fc < fb {
        iter += 1;
        if iter > MAX_ITER || !xc.is_finite() {
            return Err(MinimizeError::NoBracket(iter));
        }

        let tmp1 = (xb - xa) * (fb - fc);
        let tmp2 = (xb - xc) * (fb - fa);
        let val = tmp2 - tmp1;
        let denom = if val.abs() < TINY { 2.0 * TINY } else { 2.0 * val };
        let mut w = xb - ((xb - xc) * tmp2 - (xb - xa) * tmp1) / denom;
        let wlim = xb + GROW_LIMIT * (xc - xb);
        let mut fw;

        if (w - xc) * (xb - w) > 0.0 {
            // Parabolic point between b and c.
            fw = eval(f, w)?;
            if fw < fc {
                return Ok(Bracket { a: xb, b: w, c: xc, fb: fw });
            } else if fw > fb {
                return Ok(Bracket { a: xa, b: xb, c: w, fb });
            }
            w = xc + GOLDEN * (xc - xb);
            fw = eval(f, w)?;
        } else if (w - wlim) * (wlim - xc) >= 0.0 {
            w = wlim;
            fw = eval(f, w)?;
        } else if (w - wlim) * (xc - w) > 0.0 {
            fw = eval(f, w)?;
            if fw < fc {
                xb = xc;
                xc = w;
                w = xc + GOLDEN * (xc - xb);
                fb = fc;
                fc = fw;
                fw = eval(f, w)?;
            }
        } else {
            w = xc + GOLDEN * (xc - xb);
            fw = eval(f, w)?;
        }

        xa = xb;
        xb = xc;
        xc = w;
        fa = fb;
        fb = fc;
        fc = fw;
    }

    if !(xa.is_finite() && xb.is_finite() && xc.is_finite()) {
        return Err(MinimizeError::NoBracket(iter));
    }
    Ok(Bracket { a: xa, b: xb, c: xc, fb })
}

/// Minimize a univariate function with Brent's method.
///
/// The search starts by expanding the interval `(x0, x1)` downhill until a
/// minimum is bracketed, then refines it with parabolic interpolation and
/// golden-section steps until the bracket is narrower than `xtol * |x|`.
/// The procedure is fully deterministic: the same inputs always produce the
/// same abscissa.
///
/// Returns `(x_min, f(x_min))`.
pub fn minimize_scalar<F>(mut f: F, x0: f64, x1: f64, xtol: f64) -> Result<(f64, f64), MinimizeError>
where
    F: FnMut(f64) -> f64,
{
    const MAX_ITER: usize = 500;

    let br = bracket(&mut f, x0, x1)?;
    let (mut a, mut b) = if br.a < br.c { (br.a, br.c) } else { (br.c, br.a) };

    let mut x = br.b;
    let mut w = x;
    let mut v = x;
    let mut fx = br.fb;
    let mut fw = fx;
    let mut fv = fx;
    let mut deltax: f64 = 0.0;
    let mut rat: f64 = 0.0;

    for _ in 0..MAX_ITER {
        let tol1 = xtol * x.abs() + MIN_TOL;
        let tol2 = 2.0 * tol1;
        let xmid = 0.5 * (a + b);
        if (x - xmid).abs() < tol2 - 0.5 * (b - a) {
            break;
        }

        if deltax.abs() <= tol1 {
            deltax = if x >= xmid { a - x } else { b - x };
            rat = CGOLD * deltax;
        } else {
            // Try a parabolic step through x, w, v.
            let tmp1 = (x - w) * (fx - fv);
            let mut tmp2 = (x - v) * (fx - fw);
            let mut p = (x - v) * tmp2 - (x - w) * tmp1;
            tmp2 = 2.0 * (tmp2 - tmp1);
            if tmp2 > 0.0 {
                p = -p;
            }
            tmp2 = tmp2.abs();
            let prev_delta = deltax;
            deltax = rat;

            if p > tmp2 * (a - x) && p < tmp2 * (b - x) && p.abs() < (0.5 * tmp2 * prev_delta).abs()
            {
                rat = p / tmp2;
                let u = x + rat;
                if (u - a) < tol2 || (b - u) < tol2 {
                    rat = if xmid - x >= 0.0 { tol1 } else { -tol1 };
                }
            } else {
                deltax = if x >= xmid { a - x } else { b - x };
                rat = CGOLD * deltax;
            }
        }

        let u = if rat.abs() < tol1 {
            x + tol1.copysign(rat)
        } else {
            x + rat
        };
        let fu = eval(&mut f, u)?;

        if fu > fx {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                w = u;
                fv = fw;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        } else {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            v = w;
            w = x;
            x = u;
            fv = fw;
            fw = fx;
            fx = fu;
        }
    }

    Ok((x, fx))
}
