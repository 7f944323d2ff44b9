//! Maps `Box<dyn Error>` from trait boundaries to typed `SliderError`.
//!
//! The traits in `slider_traits` use `Box<dyn Error + Send + Sync>`; this
//! module converts those to our typed error enum, with an optional
//! feature-gated path for `slider_hardware::HwError` downcasting.

use crate::error::SliderError;

/// Map an error returned by `SignalSource::grab`.
///
/// End of stream is recognised by downcast first, then by message.
pub fn map_source_error(e: &(dyn std::error::Error + 'static)) -> SliderError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<slider_hardware::error::HwError>() {
            return match hw {
                slider_hardware::error::HwError::EndOfStream => SliderError::EndOfStream,
                other => SliderError::FrameAcquisition(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("end of stream") || lower.contains("exhausted") {
        SliderError::EndOfStream
    } else {
        SliderError::FrameAcquisition(s)
    }
}

/// Map an error returned by `Actuator::pulse`.
pub fn map_actuator_error(e: &(dyn std::error::Error + 'static)) -> SliderError {
    SliderError::ActuatorFault(e.to_string())
}
