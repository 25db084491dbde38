//! Category placement strategy.
//!
//! Maps (smoothed geometry, product category, name hints) to the overlay
//! transform the renderer applies. The decision order is fixed: category
//! default when there is no tracking, tracked refinement when there is,
//! manual override fields last. Whatever happens, something plausible is
//! always placed — absence of tracking never blanks the overlay.

use crate::geometry::Geometry;
use crate::regions::ClothingRegions;
use crate::types::{
    FrameSize, OverlayAdjust, OverlayTransform, PercentRect, Product, ProductCategory,
    ProductPose, Vec3,
};

pub const DEFAULT_OPACITY: f32 = 0.9;
pub const SCALE_MIN: f32 = 0.5;
pub const SCALE_MAX: f32 = 2.0;

/// Clothing must never collapse to a sliver when the tracked face is small
/// or far away, so the band size has a hard floor (percent of frame).
pub const CLOTHES_WIDTH_FLOOR: f32 = 25.0;
pub const CLOTHES_HEIGHT_FLOOR: f32 = 30.0;

/// Fixed base position per category, used whenever no geometry is available.
/// Jewelry sits near the top of frame, shoes along the bottom band, clothes
/// over the torso region, furniture in an off-center background spot.
pub fn category_default(category: ProductCategory) -> PercentRect {
    match category {
        ProductCategory::Jewelry => PercentRect::new(50.0, 30.0, 20.0, 15.0),
        ProductCategory::Shoes => PercentRect::new(50.0, 80.0, 30.0, 20.0),
        ProductCategory::Clothes => PercentRect::new(50.0, 55.0, 35.0, 40.0),
        ProductCategory::Furniture => PercentRect::new(30.0, 40.0, 40.0, 35.0),
    }
}

/// Compute the final 2D overlay transform for one cycle.
///
/// `geometry` is the smoothed estimate (or `None` before the first
/// detection / after sustained misses); `adjust` is the user's manual
/// repositioning, if any.
pub fn compute(
    geometry: Option<&Geometry>,
    frame: FrameSize,
    product: &Product,
    adjust: Option<&OverlayAdjust>,
) -> OverlayTransform {
    compute_with_regions(geometry, frame, product, adjust, None)
}

/// Like [`compute`], with the clothing regions a body detection engine
/// yields. The clothes and shoes branches anchor to the torso/ankle regions
/// when present instead of guessing from the tracked bounding box.
pub fn compute_with_regions(
    geometry: Option<&Geometry>,
    frame: FrameSize,
    product: &Product,
    adjust: Option<&OverlayAdjust>,
    regions: Option<&ClothingRegions>,
) -> OverlayTransform {
    let (position, scale, rotation_deg) = match geometry {
        Some(geo) => refined_placement(geo, frame, product, regions),
        None => (category_default(product.category), 1.0, 0.0),
    };

    let mut transform = OverlayTransform {
        position,
        scale: scale.clamp(SCALE_MIN, SCALE_MAX),
        rotation_deg,
        opacity: DEFAULT_OPACITY,
    };

    if let Some(adj) = adjust {
        if let Some(pos) = adj.position {
            transform.position = pos;
        }
        if let Some(scale) = adj.scale {
            transform.scale = scale.clamp(SCALE_MIN, SCALE_MAX);
        }
        if let Some(rot) = adj.rotation_deg {
            transform.rotation_deg = rot;
        }
        if let Some(opacity) = adj.opacity {
            transform.opacity = opacity;
        }
    }

    transform.position = transform.position.clamped();
    transform
}

fn refined_placement(
    geo: &Geometry,
    frame: FrameSize,
    product: &Product,
    regions: Option<&ClothingRegions>,
) -> (PercentRect, f32, f32) {
    // Tracked values converted to percent-of-frame.
    let fw = frame.width.max(1) as f32;
    let fh = frame.height.max(1) as f32;
    let cx = geo.center.x / fw * 100.0;
    let cy = geo.center.y / fh * 100.0;
    let w = geo.width / fw * 100.0;
    let h = geo.height / fh * 100.0;

    match product.category {
        ProductCategory::Jewelry => jewelry_placement(geo, product, cx, cy, w, h),
        ProductCategory::Shoes => {
            if let Some(r) = regions {
                return (shoe_band(r, fw, fh), geo.scale, 0.0);
            }
            // Face-only session: horizontal lock to the subject, fixed band
            // near the bottom.
            let position = PercentRect::new(cx, 75.0, w * 1.5, 20.0);
            (position, geo.scale, 0.0)
        }
        ProductCategory::Clothes => {
            if let Some(r) = regions {
                return (shirt_band(r, fw, fh), geo.scale, geo.rotation_deg() * 0.5);
            }
            let band_w = (w * 1.6).max(CLOTHES_WIDTH_FLOOR);
            let band_h = (h * 2.0).max(CLOTHES_HEIGHT_FLOOR);
            // Band top starts at the chin line; position is the band center.
            let position = PercentRect::new(cx, cy + h * 0.5 + band_h * 0.5, band_w, band_h);
            (position, geo.scale, geo.rotation_deg() * 0.5)
        }
        // Furniture is scenery, not worn: tracked geometry is ignored on purpose.
        ProductCategory::Furniture => (category_default(ProductCategory::Furniture), 1.0, 0.0),
    }
}

/// Clothes band from the detected shirt quad, centered on the chest. The
/// size floors still apply so a distant subject keeps a wearable band.
fn shirt_band(r: &ClothingRegions, fw: f32, fh: f32) -> PercentRect {
    let left = r.shirt.top_left.x.min(r.shirt.bottom_left.x);
    let right = r.shirt.top_right.x.max(r.shirt.bottom_right.x);
    let top = r.shirt.top_left.y.min(r.shirt.top_right.y);
    let bottom = r.shirt.bottom_left.y.max(r.shirt.bottom_right.y);

    PercentRect::new(
        r.shirt.center.x / fw * 100.0,
        r.shirt.center.y / fh * 100.0,
        ((right - left) / fw * 100.0).max(CLOTHES_WIDTH_FLOOR),
        ((bottom - top) / fh * 100.0).max(CLOTHES_HEIGHT_FLOOR),
    )
}

/// Shoes band spanning both detected ankle boxes.
fn shoe_band(r: &ClothingRegions, fw: f32, fh: f32) -> PercentRect {
    let left = r.left_shoe.x.min(r.right_shoe.x);
    let right = (r.left_shoe.x + r.left_shoe.width).max(r.right_shoe.x + r.right_shoe.width);
    let top = r.left_shoe.y.min(r.right_shoe.y);
    let bottom = (r.left_shoe.y + r.left_shoe.height).max(r.right_shoe.y + r.right_shoe.height);

    PercentRect::new(
        (left + right) / 2.0 / fw * 100.0,
        (top + bottom) / 2.0 / fh * 100.0,
        (right - left) / fw * 100.0,
        (bottom - top) / fh * 100.0,
    )
}

fn jewelry_placement(
    geo: &Geometry,
    product: &Product,
    cx: f32,
    cy: f32,
    w: f32,
    h: f32,
) -> (PercentRect, f32, f32) {
    let name = product.name.to_ascii_lowercase();
    let rotation = geo.rotation_deg();

    let position = if name.contains("earring") {
        // Face sides, ~30% below the center-line.
        PercentRect::new(cx, cy + h * 0.3, w * 0.8, h * 0.4)
    } else if name.contains("necklace") {
        // Below the chin at ~80% of face height.
        PercentRect::new(cx, cy + h * 0.8, w * 0.6, h * 0.3)
    } else if name.contains("watch") || name.contains("bracelet") {
        // Wrist guess: left of the face, well below it.
        PercentRect::new(cx - w * 0.5, cy + h * 1.2, w * 0.4, h * 0.2)
    } else {
        // No hint matched: category default size, applied at the tracked center.
        let default = category_default(ProductCategory::Jewelry);
        PercentRect::new(cx, cy, default.width, default.height)
    };

    (position, geo.scale, rotation)
}

/// 3D pose for the mesh-rendering path, with the per-category scale
/// multipliers the asset pipeline expects. Pixel-space output; the renderer
/// owns the projection.
pub fn compute_pose(geo: &Geometry, category: ProductCategory) -> ProductPose {
    let c = geo.center;
    let (position, rotation, scale, anchor_points) = match category {
        ProductCategory::Jewelry => {
            // Neck region below the chin line.
            let neck = Vec3::new(c.x, c.y + geo.height * 0.8, c.z + 5.0);
            let anchors = vec![
                Vec3::new(c.x - geo.width * 0.3, neck.y, c.z),
                Vec3::new(c.x + geo.width * 0.3, neck.y, c.z),
            ];
            (
                neck,
                Vec3::new(0.0, 0.0, geo.rotation_z),
                Vec3::splat(geo.scale * 0.8),
                anchors,
            )
        }
        ProductCategory::Clothes => {
            let torso = Vec3::new(c.x, c.y + geo.height * 1.5, c.z - 10.0);
            let anchors = vec![
                Vec3::new(c.x - geo.width / 2.0, c.y + geo.height, c.z),
                Vec3::new(c.x + geo.width / 2.0, c.y + geo.height, c.z),
            ];
            (
                torso,
                Vec3::new(0.0, 0.0, geo.rotation_z * 0.5),
                Vec3::new(geo.scale * 2.5, geo.scale * 3.0, geo.scale),
                anchors,
            )
        }
        ProductCategory::Shoes => {
            let feet = Vec3::new(c.x, c.y + geo.height * 4.0, c.z - 20.0);
            let anchors = vec![
                Vec3::new(c.x - 50.0, feet.y, c.z),
                Vec3::new(c.x + 50.0, feet.y, c.z),
            ];
            (
                feet,
                Vec3::default(),
                Vec3::new(geo.scale * 1.5, geo.scale * 0.8, geo.scale),
                anchors,
            )
        }
        ProductCategory::Furniture => {
            let spot = Vec3::new(c.x - 200.0, c.y + 100.0, c.z - 50.0);
            (spot, Vec3::default(), Vec3::splat(2.0), vec![spot])
        }
    };

    ProductPose {
        position,
        rotation,
        scale,
        anchor_points,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::clothing_regions;
    use crate::types::{BodyLandmarks, Point3};

    const FRAME: FrameSize = FrameSize {
        width: 640,
        height: 480,
    };

    fn face_geo() -> Geometry {
        Geometry {
            center: Point3::new(320.0, 160.0, 0.0),
            width: 160.0,
            height: 192.0,
            rotation_z: 0.1,
            scale: 1.1,
            confidence: 0.85,
        }
    }

    fn all_categories() -> [ProductCategory; 4] {
        [
            ProductCategory::Jewelry,
            ProductCategory::Shoes,
            ProductCategory::Clothes,
            ProductCategory::Furniture,
        ]
    }

    #[test]
    fn no_geometry_yields_category_default_constants() {
        for category in all_categories() {
            let product = Product::new("anything", category);
            let t = compute(None, FRAME, &product, None);
            assert_eq!(t.position, category_default(category), "{category}");
            assert_eq!(t.scale, 1.0);
            assert_eq!(t.rotation_deg, 0.0);
            assert_eq!(t.opacity, DEFAULT_OPACITY);
        }
    }

    #[test]
    fn published_positions_always_in_percent_range() {
        // Sweep geometry over and past the frame edges.
        let mut geometries = vec![face_geo()];
        for cx in [-200.0, 0.0, 320.0, 640.0, 2000.0] {
            for cy in [-200.0, 0.0, 240.0, 480.0, 2000.0] {
                geometries.push(Geometry {
                    center: Point3::new(cx, cy, 0.0),
                    ..face_geo()
                });
            }
        }
        for category in all_categories() {
            let product = Product::new("necklace watch earring", category);
            for geo in &geometries {
                let t = compute(Some(geo), FRAME, &product, None);
                for v in [
                    t.position.x,
                    t.position.y,
                    t.position.width,
                    t.position.height,
                ] {
                    assert!((0.0..=100.0).contains(&v), "{category}: {v}");
                }
                assert!((SCALE_MIN..=SCALE_MAX).contains(&t.scale));
            }
        }
    }

    #[test]
    fn shoes_follow_horizontal_center_in_bottom_band() {
        let product = Product::new("running shoe", ProductCategory::Shoes);
        let t = compute(Some(&face_geo()), FRAME, &product, None);
        assert!((t.position.x - 50.0).abs() < 1e-4);
        assert_eq!(t.position.y, 75.0);
        // 160px tracked width * 1.5 over a 640px frame
        assert!((t.position.width - 37.5).abs() < 1e-4);
        assert_eq!(t.rotation_deg, 0.0);
    }

    #[test]
    fn clothes_enforce_size_floor_for_distant_subjects() {
        let tiny = Geometry {
            width: 20.0,
            height: 24.0,
            ..face_geo()
        };
        let product = Product::new("t-shirt", ProductCategory::Clothes);
        let t = compute(Some(&tiny), FRAME, &product, None);
        assert_eq!(t.position.width, CLOTHES_WIDTH_FLOOR);
        assert_eq!(t.position.height, CLOTHES_HEIGHT_FLOOR);
    }

    #[test]
    fn clothes_band_scales_with_large_subjects() {
        let product = Product::new("jacket", ProductCategory::Clothes);
        let t = compute(Some(&face_geo()), FRAME, &product, None);
        // 160px * 1.6 / 640px = 40%, above the floor.
        assert!((t.position.width - 40.0).abs() < 1e-4);
        assert!((t.position.height - 80.0).abs() < 1e-4);
        // Clothes damp the face roll by half.
        assert!((t.rotation_deg - face_geo().rotation_deg() * 0.5).abs() < 1e-4);
    }

    fn tracked_body() -> BodyLandmarks {
        BodyLandmarks {
            left_shoulder: Point3::new(200.0, 150.0, 0.0),
            right_shoulder: Point3::new(400.0, 150.0, 0.0),
            left_hip: Point3::new(230.0, 300.0, 0.0),
            right_hip: Point3::new(370.0, 300.0, 0.0),
            left_knee: Point3::new(240.0, 380.0, 0.0),
            right_knee: Point3::new(360.0, 380.0, 0.0),
            left_ankle: Point3::new(245.0, 460.0, 0.0),
            right_ankle: Point3::new(355.0, 460.0, 0.0),
            confidence: 0.8,
            ..Default::default()
        }
    }

    #[test]
    fn clothes_anchor_to_shirt_region_when_body_is_tracked() {
        let regions = clothing_regions(&tracked_body());
        let product = Product::new("jacket", ProductCategory::Clothes);
        let t = compute_with_regions(Some(&face_geo()), FRAME, &product, None, Some(&regions));
        // Chest center: (300, 195) px over 640x480.
        assert!((t.position.x - 46.875).abs() < 1e-3);
        assert!((t.position.y - 40.625).abs() < 1e-3);
        // Padded shoulder span, 240px wide.
        assert!((t.position.width - 37.5).abs() < 1e-3);
        // 170px shoulder-to-hip span, above the 30% height floor.
        assert!((t.position.height - 170.0 / 480.0 * 100.0).abs() < 1e-3);

        // The floors still hold for a distant body.
        let far = BodyLandmarks {
            left_shoulder: Point3::new(300.0, 150.0, 0.0),
            right_shoulder: Point3::new(340.0, 150.0, 0.0),
            left_hip: Point3::new(305.0, 180.0, 0.0),
            right_hip: Point3::new(335.0, 180.0, 0.0),
            ..tracked_body()
        };
        let t = compute_with_regions(
            Some(&face_geo()),
            FRAME,
            &product,
            None,
            Some(&clothing_regions(&far)),
        );
        assert_eq!(t.position.width, CLOTHES_WIDTH_FLOOR);
        assert_eq!(t.position.height, CLOTHES_HEIGHT_FLOOR);
    }

    #[test]
    fn shoes_span_the_detected_ankle_boxes() {
        let regions = clothing_regions(&tracked_body());
        let product = Product::new("running shoe", ProductCategory::Shoes);
        let t = compute_with_regions(Some(&face_geo()), FRAME, &product, None, Some(&regions));
        // Band spans both 30x16 shoe boxes: 230..370 px wide, centered on the
        // ankle line at y=460.
        assert!((t.position.x - 46.875).abs() < 1e-3);
        assert!((t.position.y - 460.0 / 480.0 * 100.0).abs() < 1e-3);
        assert!((t.position.width - 140.0 / 640.0 * 100.0).abs() < 1e-3);
        assert!((t.position.height - 16.0 / 480.0 * 100.0).abs() < 1e-3);
    }

    #[test]
    fn furniture_ignores_tracked_geometry() {
        let product = Product::new("armchair", ProductCategory::Furniture);
        let with_geo = compute(Some(&face_geo()), FRAME, &product, None);
        let without = compute(None, FRAME, &product, None);
        assert_eq!(with_geo, without);
        assert_eq!(with_geo.position, category_default(ProductCategory::Furniture));
    }

    #[test]
    fn scale_is_clamped_to_publishable_range() {
        let huge = Geometry {
            scale: 9.0,
            ..face_geo()
        };
        let product = Product::new("ring", ProductCategory::Jewelry);
        let t = compute(Some(&huge), FRAME, &product, None);
        assert_eq!(t.scale, SCALE_MAX);

        let tiny = Geometry {
            scale: 0.01,
            ..face_geo()
        };
        let t = compute(Some(&tiny), FRAME, &product, None);
        assert_eq!(t.scale, SCALE_MIN);
    }

    #[test]
    fn pose_multipliers_per_category() {
        let geo = face_geo();
        let jewelry = compute_pose(&geo, ProductCategory::Jewelry);
        assert!((jewelry.scale.x - geo.scale * 0.8).abs() < 1e-6);
        assert_eq!(jewelry.anchor_points.len(), 2);
        assert!((jewelry.rotation.z - geo.rotation_z).abs() < 1e-6);

        let clothes = compute_pose(&geo, ProductCategory::Clothes);
        assert!((clothes.scale.y - geo.scale * 3.0).abs() < 1e-6);
        assert!((clothes.rotation.z - geo.rotation_z * 0.5).abs() < 1e-6);

        let furniture = compute_pose(&geo, ProductCategory::Furniture);
        assert_eq!(furniture.position, furniture.anchor_points[0]);
        assert_eq!(furniture.scale, Vec3::splat(2.0));
    }
}
