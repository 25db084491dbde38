//! Ambient-lighting adaptation.
//!
//! Samples a heavily downscaled copy of the current video frame and turns the
//! channel statistics into brightness/contrast/saturation factors for the
//! overlay material. Purely cosmetic: any failure along the way yields the
//! neutral factors, never an error on the render path.

use image::{imageops::FilterType, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::camera::VideoSource;
use crate::error::{Error, Result};

/// Edge length of the square sample the frame is reduced to. 10k pixels is
/// plenty for average statistics and cheap enough for a 500 ms cadence.
pub const DEFAULT_SAMPLE_SIZE: u32 = 100;

/// Multiplicative adjustment factors applied to the overlay's rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingState {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl LightingState {
    /// No-op adjustment, published whenever sampling is impossible.
    pub fn neutral() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

impl Default for LightingState {
    fn default() -> Self {
        Self::neutral()
    }
}

#[derive(Debug, Clone)]
pub struct LightingAdapter {
    sample_size: u32,
}

impl LightingAdapter {
    pub fn new(sample_size: u32) -> Self {
        Self {
            sample_size: sample_size.max(1),
        }
    }

    /// Derive lighting factors from the given frame. Falls back to neutral
    /// for degenerate frames instead of failing.
    pub fn sample(&self, frame: &RgbImage) -> LightingState {
        if frame.width() == 0 || frame.height() == 0 {
            debug!("lighting sample skipped: empty frame");
            return LightingState::neutral();
        }

        let small = image::imageops::resize(
            frame,
            self.sample_size,
            self.sample_size,
            FilterType::Triangle,
        );

        let mut sum_r = 0u64;
        let mut sum_g = 0u64;
        let mut sum_b = 0u64;
        for px in small.pixels() {
            sum_r += px[0] as u64;
            sum_g += px[1] as u64;
            sum_b += px[2] as u64;
        }
        let count = (small.width() * small.height()) as f32;
        let avg_r = sum_r as f32 / count;
        let avg_g = sum_g as f32 / count;
        let avg_b = sum_b as f32 / count;

        // Per-pixel mean of the three channels, averaged over the sample.
        let luminance = (avg_r + avg_g + avg_b) / 3.0;
        // Crude warm/cool proxy; same mean today, kept separate so the
        // saturation rule can move to a real temperature estimate.
        let color_temperature = (avg_r + avg_g + avg_b) / 3.0;

        LightingState {
            brightness: (luminance / 128.0).clamp(0.7, 1.3),
            contrast: if luminance < 100.0 { 1.1 } else { 0.95 },
            saturation: if color_temperature > 150.0 { 1.1 } else { 0.9 },
        }
    }

    /// Snapshot the source and sample it. Source failures surface as
    /// [`Error::LightingSample`]; callers publish neutral factors instead of
    /// propagating further.
    pub fn sample_source(&self, source: &mut dyn VideoSource) -> Result<LightingState> {
        let frame = source
            .snapshot()
            .map_err(|e| Error::LightingSample(e.to_string()))?;
        Ok(self.sample(&frame))
    }
}

impl Default for LightingAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_frame(r: u8, g: u8, b: u8) -> RgbImage {
        RgbImage::from_pixel(320, 240, image::Rgb([r, g, b]))
    }

    #[test]
    fn neutral_is_exactly_ones() {
        let n = LightingState::neutral();
        assert_eq!(n.brightness, 1.0);
        assert_eq!(n.contrast, 1.0);
        assert_eq!(n.saturation, 1.0);
    }

    #[test]
    fn mid_gray_frame_is_near_unity_brightness() {
        let state = LightingAdapter::default().sample(&flat_frame(128, 128, 128));
        assert!((state.brightness - 1.0).abs() < 0.01);
        // 128 >= 100 -> contrast pulled down slightly
        assert_eq!(state.contrast, 0.95);
        // 128 <= 150 -> desaturate
        assert_eq!(state.saturation, 0.9);
    }

    #[test]
    fn dark_frame_boosts_brightness_and_contrast() {
        let state = LightingAdapter::default().sample(&flat_frame(20, 20, 20));
        assert_eq!(state.brightness, 0.7); // clamped floor
        assert_eq!(state.contrast, 1.1);
    }

    #[test]
    fn bright_warm_frame_clamps_brightness_and_saturates() {
        let state = LightingAdapter::default().sample(&flat_frame(240, 230, 220));
        assert_eq!(state.brightness, 1.3); // clamped ceiling
        assert_eq!(state.saturation, 1.1);
    }

    #[test]
    fn empty_frame_falls_back_to_neutral() {
        let empty = RgbImage::new(0, 0);
        let state = LightingAdapter::default().sample(&empty);
        assert_eq!(state, LightingState::neutral());
    }

    struct DeadSource;

    impl VideoSource for DeadSource {
        fn frame_size(&self) -> crate::types::FrameSize {
            crate::types::FrameSize::new(0, 0)
        }

        fn snapshot(&mut self) -> Result<RgbImage> {
            Err(Error::VideoSource("device unplugged".into()))
        }
    }

    #[test]
    fn snapshot_failure_surfaces_as_lighting_sample_error() {
        let err = LightingAdapter::default()
            .sample_source(&mut DeadSource)
            .unwrap_err();
        assert!(matches!(err, Error::LightingSample(_)));
    }
}
