//! Fixed-precision float formatting for score display.
//!
//! Float-to-decimal formatting through `format!` has panicked on wasm in some
//! toolchain/browser combinations, and these strings are rendered in the
//! browser build. So the helpers here scale + round into an `i64` and format
//! integers instead.
//!
//! - `NaN`/`±Inf` are handled explicitly.
//! - Rounding is half away from zero.

/// Number of decimals used for every displayed confidence score.
pub const SCORE_DECIMALS: usize = 4;

/// Render a confidence score with exactly [`SCORE_DECIMALS`] decimals.
#[inline]
pub fn fmt_score(v: f64) -> String {
    fmt_f64_fixed(v, SCORE_DECIMALS)
}

pub fn fmt_f64_fixed(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return if v.is_nan() {
            "NaN".to_string()
        } else if v.is_sign_positive() {
            "Inf".to_string()
        } else {
            "-Inf".to_string()
        };
    }

    // Avoid huge powers.
    let decimals = decimals.min(9);

    let scale = 10_u64.pow(decimals as u32);
    let scaled = (v * scale as f64).round();

    // Overflowing the scale, or the i64 range, degrades to Inf.
    if !scaled.is_finite() || scaled.abs() > (i64::MAX as f64) {
        return if v.is_sign_negative() {
            "-Inf".to_string()
        } else {
            "Inf".to_string()
        };
    }

    // `i64::MIN` passes the range check above, so take the magnitude unsigned.
    let scaled_i = scaled as i64;
    let negative = scaled_i < 0;

    let abs_i = scaled_i.unsigned_abs();
    let int_part = abs_i / scale;
    let frac_part = abs_i % scale;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&int_part.to_string());

    if decimals > 0 {
        out.push('.');
        let frac_str = frac_part.to_string();
        for _ in 0..decimals.saturating_sub(frac_str.len()) {
            out.push('0');
        }
        out.push_str(&frac_str);
    }

    out
}
