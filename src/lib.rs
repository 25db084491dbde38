//! # tryon
//!
//! Landmark-driven product overlay placement and stabilization.
//!
//! The engine turns raw detected landmark points into a steady, per-frame
//! overlay transform for a catalog product:
//!
//! 1. **Geometry extraction** — center, extents, rotation and scale from a
//!    face or body landmark set ([`geometry`]).
//! 2. **Temporal smoothing** — a small FIFO buffer whose field-wise mean
//!    suppresses frame-to-frame jitter ([`smoothing`]).
//! 3. **Category placement** — per-category rules (with product-name hints
//!    and manual overrides) producing the published transform ([`placement`]).
//! 4. **Lighting adaptation** — brightness/contrast/saturation factors
//!    sampled from the live frame ([`lighting`]).
//!
//! [`tracker::TrackingSession`] wires these into a throttled async cycle
//! against a [`detector::LandmarkDetector`] capability and publishes
//! immutable state snapshots over watch channels.

pub mod camera;
pub mod config;
pub mod detector;
pub mod error;
pub mod geometry;
pub mod lighting;
pub mod metrics;
pub mod placement;
pub mod regions;
pub mod render;
pub mod smoothing;
pub mod tracker;
pub mod types;


pub use error::{Error, Result};
pub use geometry::Geometry;
pub use lighting::LightingState;
pub use metrics::{TrackingMetrics, TrackingQuality};
pub use smoothing::SmoothingBuffer;
pub use tracker::{SessionState, TrackingSession};
pub use types::{
    LandmarkSet, OverlayAdjust, OverlayTransform, PercentRect, Product, ProductCategory,
};
