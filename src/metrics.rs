//! Tracking performance metrics and the derived quality label.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Per-cycle performance snapshot, recomputed every tracking cycle
/// (latency/placement time) and once per rolling window (frame rate).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingMetrics {
    pub frame_rate: f32,
    pub detection_latency_ms: f32,
    pub render_time_ms: f32,
    pub tracking_confidence: f32,
}

impl Default for TrackingMetrics {
    fn default() -> Self {
        Self {
            frame_rate: 0.0,
            detection_latency_ms: 0.0,
            render_time_ms: 0.0,
            tracking_confidence: 0.0,
        }
    }
}

/// Qualitative tracking quality shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl TrackingQuality {
    /// Classify from confidence and frame rate. Comparisons are strict, so a
    /// value sitting exactly on a threshold lands in the lower tier.
    pub fn classify(confidence: f32, frame_rate: f32) -> Self {
        if confidence > 0.8 && frame_rate > 25.0 {
            TrackingQuality::Excellent
        } else if confidence > 0.6 && frame_rate > 20.0 {
            TrackingQuality::Good
        } else if confidence > 0.4 && frame_rate > 15.0 {
            TrackingQuality::Fair
        } else {
            TrackingQuality::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingQuality::Excellent => "excellent",
            TrackingQuality::Good => "good",
            TrackingQuality::Fair => "fair",
            TrackingQuality::Poor => "poor",
        }
    }
}

impl std::fmt::Display for TrackingQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rolling cycle counter producing a frame-rate reading once per window.
#[derive(Debug)]
pub struct FrameRateWindow {
    window: Duration,
    cycle_count: u32,
    window_start: Instant,
}

impl FrameRateWindow {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            cycle_count: 0,
            window_start: Instant::now(),
        }
    }

    /// Record one completed cycle. Returns the measured rate when a full
    /// window has elapsed, `None` otherwise.
    pub fn tick(&mut self) -> Option<f32> {
        self.cycle_count += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed >= self.window {
            let fps = self.cycle_count as f32 / elapsed.as_secs_f32();
            self.cycle_count = 0;
            self.window_start = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

impl Default for FrameRateWindow {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
