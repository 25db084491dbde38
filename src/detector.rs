//! The landmark detection seam.
//!
//! Detection engines are external capabilities: given a frame they
//! asynchronously yield a named point set, or nothing when no subject is in
//! view. The engine behind the trait is a black box — model files, inference
//! runtimes and their loading live on the other side of this boundary.

use async_trait::async_trait;
use image::RgbImage;

use crate::error::Result;
use crate::types::{FaceLandmarks, LandmarkSet, Point3};

#[async_trait]
pub trait LandmarkDetector: Send {
    fn name(&self) -> String;

    /// Acquire whatever the engine needs. Failures here are fatal to the
    /// session; tracking does not start.
    async fn initialize(&mut self) -> Result<()>;

    fn is_ready(&self) -> bool;

    /// Run one detection. `None` is an expected miss (no subject in frame),
    /// not an error; the tracking loop continues either way.
    async fn detect(&mut self, frame: &RgbImage) -> Result<Option<LandmarkSet>>;

    /// Release engine resources. Idempotent.
    fn cleanup(&mut self);
}

/// Synthetic detector producing a plausible face drifting in a slow circle
/// around the frame center. Used by the demo binary when no real engine is
/// attached, and by the integration tests to drive full sessions.
pub struct SyntheticDetector {
    frame_count: u32,
    ready: bool,
}

impl SyntheticDetector {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            ready: false,
        }
    }
}

impl Default for SyntheticDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LandmarkDetector for SyntheticDetector {
    fn name(&self) -> String {
        "Synthetic Face (Simulated)".to_string()
    }

    async fn initialize(&mut self) -> Result<()> {
        self.ready = true;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn detect(&mut self, frame: &RgbImage) -> Result<Option<LandmarkSet>> {
        self.frame_count += 1;

        let width = frame.width() as f32;
        let height = frame.height() as f32;
        // Slow circular drift around the frame center, with a gentle roll.
        let t = self.frame_count as f32 * 0.05;
        let cx = width / 2.0 + t.cos() * width * 0.05;
        let cy = height / 2.0 + t.sin() * height * 0.05;
        let roll = (t * 0.5).sin() * 0.1;

        let face_w = width * 0.25;
        let face_h = height * 0.4;

        // Rectangle oval is enough for the extractor's bbox/mean math.
        let face_oval = vec![
            Point3::new(cx - face_w / 2.0, cy - face_h / 2.0, 0.0),
            Point3::new(cx + face_w / 2.0, cy - face_h / 2.0, 0.0),
            Point3::new(cx + face_w / 2.0, cy + face_h / 2.0, 0.0),
            Point3::new(cx - face_w / 2.0, cy + face_h / 2.0, 0.0),
        ];

        let eye_dx = face_w * 0.3;
        let eye_y = cy - face_h * 0.15;
        let left_eye = vec![Point3::new(
            cx - eye_dx,
            eye_y + roll.sin() * eye_dx,
            0.0,
        )];
        let right_eye = vec![Point3::new(
            cx + eye_dx,
            eye_y - roll.sin() * eye_dx,
            0.0,
        )];

        let face = FaceLandmarks {
            face_oval,
            left_eye,
            right_eye,
            nose: vec![Point3::new(cx, cy, 0.0)],
            lips: vec![Point3::new(cx, cy + face_h * 0.25, 0.0)],
            jaw: vec![Point3::new(cx, cy + face_h / 2.0, 0.0)],
            confidence: 0.85,
            ..Default::default()
        };

        Ok(Some(LandmarkSet::Face(face)))
    }

    fn cleanup(&mut self) {
        self.ready = false;
    }
}
