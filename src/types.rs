use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// A single detected landmark in frame pixel space. `z` is an approximate
/// depth supplied by some detection engines, 0.0 otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance_2d(&self, other: &Point3) -> f32 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    pub fn midpoint(&self, other: &Point3) -> Point3 {
        Point3::new(
            (self.x + other.x) / 2.0,
            (self.y + other.y) / 2.0,
            (self.z + other.z) / 2.0,
        )
    }
}

/// 3-component vector for the 3D placement path (position / euler / scale).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }
}

impl From<Point3> for Vec3 {
    fn from(p: Point3) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

/// Overlay rectangle in percent-of-frame coordinates. `x`/`y` name the
/// rectangle's center (the renderer applies a -50%,-50% translate), so 50/50
/// is mid-frame regardless of aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PercentRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Clamp every field into the publishable [0,100] range.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 100.0),
            y: self.y.clamp(0.0, 100.0),
            width: self.width.clamp(0.0, 100.0),
            height: self.height.clamp(0.0, 100.0),
        }
    }
}

/// Named face point groups as exposed by a mesh-style detection engine.
/// Groups may be sparse; the extractor dispatches on what is present.
#[derive(Debug, Clone, Default)]
pub struct FaceLandmarks {
    pub face_oval: Vec<Point3>,
    pub left_eye: Vec<Point3>,
    pub right_eye: Vec<Point3>,
    pub left_eyebrow: Vec<Point3>,
    pub right_eyebrow: Vec<Point3>,
    pub nose: Vec<Point3>,
    pub lips: Vec<Point3>,
    pub jaw: Vec<Point3>,
    pub confidence: f32,
}

impl FaceLandmarks {
    /// Anchors used for rotation/scale: the first point of each eye group
    /// (outer corner in the mesh layouts we consume).
    pub fn eye_anchors(&self) -> Option<(Point3, Point3)> {
        match (self.left_eye.first(), self.right_eye.first()) {
            (Some(l), Some(r)) => Some((*l, *r)),
            _ => None,
        }
    }

    /// Chin point when the jaw group carries one.
    pub fn chin(&self) -> Option<Point3> {
        self.jaw.last().copied()
    }
}

/// Upper/lower body key points from a pose-style detection engine.
#[derive(Debug, Clone, Default)]
pub struct BodyLandmarks {
    pub left_shoulder: Point3,
    pub right_shoulder: Point3,
    pub left_elbow: Point3,
    pub right_elbow: Point3,
    pub left_wrist: Point3,
    pub right_wrist: Point3,
    pub left_hip: Point3,
    pub right_hip: Point3,
    pub left_knee: Point3,
    pub right_knee: Point3,
    pub left_ankle: Point3,
    pub right_ankle: Point3,
    pub confidence: f32,
}

impl BodyLandmarks {
    pub fn shoulder_width(&self) -> f32 {
        (self.right_shoulder.x - self.left_shoulder.x).abs()
    }

    pub fn torso_height(&self) -> f32 {
        let shoulder_y = (self.left_shoulder.y + self.right_shoulder.y) / 2.0;
        let hip_y = (self.left_hip.y + self.right_hip.y) / 2.0;
        (shoulder_y - hip_y).abs()
    }

    /// Chest center, offset a bit below the shoulder line.
    pub fn chest(&self) -> Point3 {
        let mid = self.left_shoulder.midpoint(&self.right_shoulder);
        Point3::new(mid.x, mid.y + self.torso_height() * 0.3, mid.z)
    }
}

/// One detection cycle's output: a tagged point-group set. Different engines
/// expose different layouts, so downstream code dispatches on the variant
/// rather than assuming one fixed schema.
#[derive(Debug, Clone)]
pub enum LandmarkSet {
    Face(FaceLandmarks),
    Body(BodyLandmarks),
}

impl LandmarkSet {
    pub fn confidence(&self) -> f32 {
        match self {
            LandmarkSet::Face(f) => f.confidence,
            LandmarkSet::Body(b) => b.confidence,
        }
    }
}

/// The four catalog categories the placement strategy knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Jewelry,
    Shoes,
    Clothes,
    Furniture,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Jewelry => "jewelry",
            ProductCategory::Shoes => "shoes",
            ProductCategory::Clothes => "clothes",
            ProductCategory::Furniture => "furniture",
        }
    }
}

impl FromStr for ProductCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jewelry" => Ok(ProductCategory::Jewelry),
            "shoes" => Ok(ProductCategory::Shoes),
            "clothes" => Ok(ProductCategory::Clothes),
            "furniture" => Ok(ProductCategory::Furniture),
            other => Err(Error::UnsupportedCategory(other.to_string())),
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog product, reduced to what placement needs: the category and the
/// name (matched for hints like "earring" or "necklace").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub category: ProductCategory,
}

impl Product {
    pub fn new(name: impl Into<String>, category: ProductCategory) -> Self {
        Self { name: name.into(), category }
    }
}

/// Published 2D overlay transform. Replaced wholesale each cycle; consumers
/// only ever see complete snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayTransform {
    pub position: PercentRect,
    pub scale: f32,
    pub rotation_deg: f32,
    pub opacity: f32,
}

/// Manual repositioning supplied by the user. Any `Some` field takes
/// precedence over the computed value; `None` fields keep tracking output,
/// so manual adjustment and automatic tracking don't fight each other.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OverlayAdjust {
    pub position: Option<PercentRect>,
    pub scale: Option<f32>,
    pub rotation_deg: Option<f32>,
    pub opacity: Option<f32>,
}

/// 3D pose for the mesh-rendering path: position, euler rotation (radians),
/// per-axis scale and the anchor points the asset should stick to.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub anchor_points: Vec<Vec3>,
    pub category: ProductCategory,
}

/// Source frame dimensions, carried alongside pixel-space geometry so the
/// placement stage can convert to percent space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
