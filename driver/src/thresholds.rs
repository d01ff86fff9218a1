use crate::Error;

/// Fine value of the change-detector reference bias that maximizes the usable
/// ratio range: with `diff·ratio ≤ 255` and `diff/ratio ≥ 1` the best
/// compromise is `diff = √255 ≈ 16`, giving a practical ratio ceiling of
/// about 16.
pub const NOMINAL_DIFF_FINE: u8 = 16;

/// Fine values of the three coupled change-detector biases, sharing one
/// coarse range.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ThresholdTriple {
    pub diff: u8,
    pub on: u8,
    pub off: u8,
}

/// Computes the ON/OFF comparator fine values for a requested threshold
/// ratio around the shared reference value `base`.
///
/// `on = round(base·ratio)` and `off = round(base/ratio)` must both stay in
/// the fine-value domain; the checks run on the unrounded products and a
/// violated bound is a configuration error, never a silent clamp.
pub fn solve(base: u8, ratio: f64) -> Result<ThresholdTriple, Error> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(Error::ThresholdBelowRange { base, ratio });
    }
    let on = f64::from(base) * ratio;
    if on > 255.0 {
        return Err(Error::ThresholdAboveRange { base, ratio });
    }
    let off = f64::from(base) / ratio;
    if off < 1.0 {
        return Err(Error::ThresholdBelowRange { base, ratio });
    }
    Ok(ThresholdTriple {
        diff: base,
        on: on.round() as u8,
        off: off.round() as u8,
    })
}
