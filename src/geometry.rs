//! Landmark geometry extraction.
//!
//! Reduces a raw [`LandmarkSet`] to the compact summary the rest of the
//! engine works with: center, extents, in-plane rotation and a
//! resolution-independent scale. Pure functions only — no state, so every
//! branch is testable in isolation.

use crate::error::{Error, Result};
use crate::types::{LandmarkSet, Point3};

/// Typical inter-eye distance in pixels at arm's length from a webcam.
/// Dividing the measured eye distance by this makes scale ~1.0 for a face at
/// normal distance and keeps it independent of frame resolution.
pub const REFERENCE_EYE_DISTANCE: f32 = 100.0;

/// Same idea for the body path, keyed on shoulder width.
pub const REFERENCE_SHOULDER_WIDTH: f32 = 300.0;

/// Derived per-frame summary of a tracked subject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub center: Point3,
    pub width: f32,
    pub height: f32,
    /// In-plane rotation in radians, from the line between the two anchor
    /// points (eye-to-eye, or shoulder-to-shoulder for body).
    pub rotation_z: f32,
    pub scale: f32,
    pub confidence: f32,
}

impl Geometry {
    pub fn rotation_deg(&self) -> f32 {
        self.rotation_z.to_degrees()
    }
}

/// Compute the geometric summary for one landmark set.
///
/// Fails with [`Error::IncompleteLandmarks`] when the required point groups
/// are missing, which callers treat exactly like a detection miss.
pub fn extract(set: &LandmarkSet) -> Result<Geometry> {
    match set {
        LandmarkSet::Face(face) => {
            if face.face_oval.is_empty() {
                return Err(Error::IncompleteLandmarks("face outline"));
            }
            let (left_eye, right_eye) = face
                .eye_anchors()
                .ok_or(Error::IncompleteLandmarks("eye anchors"))?;

            let (center, width, height) = summarize_group(&face.face_oval);
            let (rotation_z, scale) =
                anchor_rotation_scale(&left_eye, &right_eye, REFERENCE_EYE_DISTANCE);

            Ok(Geometry {
                center,
                width,
                height,
                rotation_z,
                scale,
                confidence: face.confidence,
            })
        }
        LandmarkSet::Body(body) => {
            let torso = [
                body.left_shoulder,
                body.right_shoulder,
                body.left_hip,
                body.right_hip,
            ];
            if torso.iter().all(|p| *p == Point3::default()) {
                return Err(Error::IncompleteLandmarks("torso points"));
            }

            let (center, width, height) = summarize_group(&torso);
            let (rotation_z, scale) = anchor_rotation_scale(
                &body.left_shoulder,
                &body.right_shoulder,
                REFERENCE_SHOULDER_WIDTH,
            );

            Ok(Geometry {
                center,
                width,
                height,
                rotation_z,
                scale,
                confidence: body.confidence,
            })
        }
    }
}

/// Mean center and bounding-box extents of a point group.
fn summarize_group(points: &[Point3]) -> (Point3, f32, f32) {
    let n = points.len() as f32;
    let mut center = Point3::default();
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;

    for p in points {
        center.x += p.x;
        center.y += p.y;
        center.z += p.z;
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    center.x /= n;
    center.y /= n;
    center.z /= n;

    (center, max_x - min_x, max_y - min_y)
}

fn anchor_rotation_scale(left: &Point3, right: &Point3, reference: f32) -> (f32, f32) {
    let rotation = (right.y - left.y).atan2(right.x - left.x);
    let scale = left.distance_2d(right) / reference;
    (rotation, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BodyLandmarks, FaceLandmarks};

    fn synthetic_face() -> FaceLandmarks {
        FaceLandmarks {
            face_oval: vec![
                Point3::new(100.0, 150.0, 0.0),
                Point3::new(300.0, 150.0, 0.0),
                Point3::new(300.0, 350.0, 0.0),
                Point3::new(100.0, 350.0, 0.0),
            ],
            left_eye: vec![Point3::new(140.0, 200.0, 0.0)],
            right_eye: vec![Point3::new(260.0, 200.0, 0.0)],
            confidence: 0.85,
            ..Default::default()
        }
    }

    #[test]
    fn face_center_and_extents_from_oval() {
        let geo = extract(&LandmarkSet::Face(synthetic_face())).unwrap();
        assert_eq!(geo.center.x, 200.0);
        assert_eq!(geo.center.y, 250.0);
        assert_eq!(geo.width, 200.0);
        assert_eq!(geo.height, 200.0);
    }

    #[test]
    fn level_eyes_give_zero_rotation_and_normalized_scale() {
        let geo = extract(&LandmarkSet::Face(synthetic_face())).unwrap();
        assert!(geo.rotation_z.abs() < 1e-6);
        // 120px eye distance / 100px reference
        assert!((geo.scale - 1.2).abs() < 1e-6);
    }

    #[test]
    fn tilted_eyes_give_atan2_rotation() {
        let mut face = synthetic_face();
        // Right eye 60px lower than left: 45 degree tilt over a 60px run.
        face.left_eye = vec![Point3::new(140.0, 200.0, 0.0)];
        face.right_eye = vec![Point3::new(200.0, 260.0, 0.0)];
        let geo = extract(&LandmarkSet::Face(face)).unwrap();
        assert!((geo.rotation_z - std::f32::consts::FRAC_PI_4).abs() < 1e-5);
    }

    #[test]
    fn confidence_passes_through_unchanged() {
        let geo = extract(&LandmarkSet::Face(synthetic_face())).unwrap();
        assert_eq!(geo.confidence, 0.85);
    }

    #[test]
    fn missing_eye_anchor_is_incomplete() {
        let mut face = synthetic_face();
        face.right_eye.clear();
        let err = extract(&LandmarkSet::Face(face)).unwrap_err();
        assert!(matches!(err, Error::IncompleteLandmarks("eye anchors")));
    }

    #[test]
    fn empty_oval_is_incomplete() {
        let mut face = synthetic_face();
        face.face_oval.clear();
        let err = extract(&LandmarkSet::Face(face)).unwrap_err();
        assert!(matches!(err, Error::IncompleteLandmarks("face outline")));
    }

    #[test]
    fn body_geometry_from_shoulders_and_hips() {
        let body = BodyLandmarks {
            left_shoulder: Point3::new(200.0, 300.0, 0.0),
            right_shoulder: Point3::new(500.0, 300.0, 0.0),
            left_hip: Point3::new(250.0, 600.0, 0.0),
            right_hip: Point3::new(450.0, 600.0, 0.0),
            confidence: 0.7,
            ..Default::default()
        };
        let geo = extract(&LandmarkSet::Body(body)).unwrap();
        assert_eq!(geo.center.x, 350.0);
        assert_eq!(geo.center.y, 450.0);
        assert_eq!(geo.width, 300.0);
        assert_eq!(geo.height, 300.0);
        // 300px shoulder span / 300px reference
        assert!((geo.scale - 1.0).abs() < 1e-6);
        assert_eq!(geo.confidence, 0.7);
    }

    #[test]
    fn all_zero_body_is_incomplete() {
        let err = extract(&LandmarkSet::Body(BodyLandmarks::default())).unwrap_err();
        assert!(matches!(err, Error::IncompleteLandmarks("torso points")));
    }
}
