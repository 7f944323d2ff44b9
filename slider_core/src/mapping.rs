//! Distance to percentage mapping.

use crate::error::SliderError;

/// Linear interpolation of `distance` from `[min_dist, max_dist]` onto `[0, 100]`,
/// clamped to the nearest bound outside the range.
///
/// Fails with `InvalidConfig` when the range is empty (`min_dist == max_dist`)
/// or its span is not finite. An inverted range maps decreasing distance to increasing
/// percentage. NaN distance maps to 0.
pub fn map_distance(distance: f32, min_dist: f32, max_dist: f32) -> Result<f32, SliderError> {
    let mapper = DistanceMapper::new(min_dist, max_dist)?;
    Ok(mapper.map(distance))
}

/// Validated mapping range; `map` is infallible once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceMapper {
    min_dist: f32,
    max_dist: f32,
}

impl DistanceMapper {
    pub fn new(min_dist: f32, max_dist: f32) -> Result<Self, SliderError> {
        if !min_dist.is_finite() || !max_dist.is_finite() {
            return Err(SliderError::InvalidConfig(
                "distance range must be finite".into(),
            ));
        }
        if !(max_dist - min_dist).is_finite() {
            return Err(SliderError::InvalidConfig(format!(
                "distance range {min_dist}..{max_dist} overflows"
            )));
        }
        if min_dist == max_dist {
            return Err(SliderError::InvalidConfig(format!(
                "min_dist == max_dist ({min_dist}): slope undefined"
            )));
        }
        Ok(Self { min_dist, max_dist })
    }

    #[inline]
    pub fn min_dist(&self) -> f32 {
        self.min_dist
    }

    #[inline]
    pub fn max_dist(&self) -> f32 {
        self.max_dist
    }

    /// Percentage in `[0.0, 100.0]` for `distance`.
    #[inline]
    pub fn map(&self, distance: f32) -> f32 {
        if distance.is_nan() {
            return 0.0;
        }
        let t = (distance - self.min_dist) / (self.max_dist - self.min_dist);
        (t * 100.0).clamp(0.0, 100.0)
    }
}
