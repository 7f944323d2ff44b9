//! Step quantization of target percentages.

use crate::error::SliderError;

/// Highest multiple of `step` that does not exceed 100.
///
/// Equals 100 whenever `step` divides 100.
#[inline]
pub fn ceiling(step: u8) -> u8 {
    let step = step.max(1);
    100 - 100 % step
}

/// `round(percent / step) * step`, clamped to `[0, ceiling(step)]`.
///
/// Fails with `InvalidConfig` when `step_size` is zero or larger than 100.
pub fn quantize(percent: f32, step_size: u32) -> Result<u8, SliderError> {
    let step = validate_step(step_size)?;
    Ok(quantize_with(percent, step))
}

/// Convert a configured step size into the internal `u8` grid step.
pub fn validate_step(step_size: u32) -> Result<u8, SliderError> {
    match u8::try_from(step_size) {
        Ok(s) if (1..=100).contains(&s) => Ok(s),
        _ => Err(SliderError::InvalidConfig(format!(
            "step_size must be in 1..=100, got {step_size}"
        ))),
    }
}

/// Infallible quantization for an already validated step.
#[inline]
pub(crate) fn quantize_with(percent: f32, step: u8) -> u8 {
    let top = ceiling(step);
    if percent.is_nan() {
        return 0;
    }
    let s = f32::from(step);
    let q = (percent / s).round() * s;
    if q <= 0.0 {
        0
    } else if q >= f32::from(top) {
        top
    } else {
        // q is an exact small integer here
        q as u8
    }
}
