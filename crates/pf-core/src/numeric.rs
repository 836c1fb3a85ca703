use crate::PfError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PfError::NonFinite { what, value: v })
    }
}

/// Round half away from zero to a fixed number of decimals.
///
/// Negative zero is normalized to `0.0` so formatted output never shows `-0`.
pub fn round_to(v: Real, decimals: u32) -> Real {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (v * scale).round() / scale;
    rounded + 0.0
}

/// Relative error of `actual` against `expected`.
///
/// Against a zero reference any difference is infinitely large; only an exact
/// match gives 0.
pub fn relative_error(actual: Real, expected: Real) -> Real {
    let diff = (actual - expected).abs();
    if expected == 0.0 {
        if diff == 0.0 { 0.0 } else { Real::INFINITY }
    } else {
        diff / expected.abs()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rounding_stays_within_half_unit(v in -1.0e4_f64..1.0e4_f64, decimals in 0_u32..5) {
            let rounded = round_to(v, decimals);
            let half_unit = 0.5 / 10f64.powi(decimals as i32);
            prop_assert!((rounded - v).abs() <= half_unit + 1e-9);
        }
    }
}
