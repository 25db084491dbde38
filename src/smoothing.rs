//! Temporal smoothing of per-frame geometry.
//!
//! Raw per-frame estimates jitter by a few pixels even on a still subject,
//! which makes an anchored overlay shimmer. The buffer keeps the last few
//! geometry summaries and exposes their running mean; placement only ever
//! reads the smoothed value, never a raw frame.

use std::collections::VecDeque;

use crate::geometry::Geometry;
use crate::types::Point3;

pub const DEFAULT_CAPACITY: usize = 3;

#[derive(Debug)]
pub struct SmoothingBuffer {
    frames: VecDeque<Geometry>,
    capacity: usize,
}

impl SmoothingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Append the newest estimate, evicting the oldest once full.
    pub fn push(&mut self, geometry: Geometry) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(geometry);
    }

    /// Field-wise mean over the frames currently held, or `None` while empty.
    /// Rotation uses the circular mean so angles straddling the ±180° wrap
    /// don't average towards zero.
    pub fn current(&self) -> Option<Geometry> {
        if self.frames.is_empty() {
            return None;
        }
        let n = self.frames.len() as f32;

        let mut center = Point3::default();
        let mut width = 0.0;
        let mut height = 0.0;
        let mut scale = 0.0;
        let mut confidence = 0.0;
        let mut rot_sin = 0.0;
        let mut rot_cos = 0.0;

        for g in &self.frames {
            center.x += g.center.x;
            center.y += g.center.y;
            center.z += g.center.z;
            width += g.width;
            height += g.height;
            scale += g.scale;
            confidence += g.confidence;
            rot_sin += g.rotation_z.sin();
            rot_cos += g.rotation_z.cos();
        }

        center.x /= n;
        center.y /= n;
        center.z /= n;

        Some(Geometry {
            center,
            width: width / n,
            height: height / n,
            rotation_z: rot_sin.atan2(rot_cos),
            scale: scale / n,
            confidence: confidence / n,
        })
    }
}

impl Default for SmoothingBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
