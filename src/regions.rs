//! Clothing regions derived from body landmarks.
//!
//! Quad regions for shirt/pants plus per-foot shoe boxes, all in frame pixel
//! space. The clothes and shoes placement paths use these when a body
//! detection engine is attached; face-only sessions never build them.

use crate::types::{BodyLandmarks, Point3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub top_left: Point3,
    pub top_right: Point3,
    pub bottom_left: Point3,
    pub bottom_right: Point3,
    pub center: Point3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShoeBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClothingRegions {
    pub shirt: Quad,
    pub pants: Quad,
    pub left_shoe: ShoeBox,
    pub right_shoe: ShoeBox,
}

pub fn clothing_regions(body: &BodyLandmarks) -> ClothingRegions {
    let shoulder_width = body.shoulder_width();

    // Shirt: shoulders to hips, padded a tenth of the shoulder span.
    let pad = shoulder_width * 0.1;
    let shirt = Quad {
        top_left: Point3::new(
            body.left_shoulder.x - pad,
            body.left_shoulder.y - shoulder_width * 0.1,
            body.left_shoulder.z,
        ),
        top_right: Point3::new(
            body.right_shoulder.x + pad,
            body.right_shoulder.y - shoulder_width * 0.1,
            body.right_shoulder.z,
        ),
        bottom_left: Point3::new(body.left_hip.x - pad, body.left_hip.y, body.left_hip.z),
        bottom_right: Point3::new(body.right_hip.x + pad, body.right_hip.y, body.right_hip.z),
        center: body.chest(),
    };

    // Pants: hips to knees, half the shirt padding.
    let pad = shoulder_width * 0.05;
    let pants = Quad {
        top_left: Point3::new(body.left_hip.x - pad, body.left_hip.y, body.left_hip.z),
        top_right: Point3::new(body.right_hip.x + pad, body.right_hip.y, body.right_hip.z),
        bottom_left: Point3::new(body.left_knee.x - pad, body.left_knee.y, body.left_knee.z),
        bottom_right: Point3::new(body.right_knee.x + pad, body.right_knee.y, body.right_knee.z),
        center: body.left_hip.midpoint(&body.right_hip),
    };

    // Shoes: boxes centered on each ankle, sized off the shoulder span.
    let shoe_w = shoulder_width * 0.15;
    let shoe_h = shoulder_width * 0.08;
    let shoe_at = |ankle: &Point3| ShoeBox {
        x: ankle.x - shoe_w / 2.0,
        y: ankle.y - shoe_h / 2.0,
        width: shoe_w,
        height: shoe_h,
    };

    ClothingRegions {
        shirt,
        pants,
        left_shoe: shoe_at(&body.left_ankle),
        right_shoe: shoe_at(&body.right_ankle),
    }
}
