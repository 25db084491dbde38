//! The scene-renderer seam for the 3D mode.
//!
//! The engine never rasterizes anything itself; it hands vertex/index buffers
//! and light intensities to whatever renderer the host attaches. What it does
//! own is building those buffers from a face landmark set.

use crate::error::Result;
use crate::lighting::LightingState;
use crate::types::{FaceLandmarks, Point3};

/// Flat vertex/index buffers in the layout renderers consume directly:
/// xyz triples and triangle index triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Consumed capability: renders mesh buffers to an attached surface under an
/// ambient + directional light split.
pub trait SceneRenderer: Send {
    fn render(&mut self, mesh: &MeshBuffers, ambient: f32, directional: f32) -> Result<()>;
    fn resize(&mut self, width: u32, height: u32);
    fn dispose(&mut self);
}

/// Light intensities derived from the lighting state, in the ambient +
/// directional split renderers expect.
pub fn light_intensities(lighting: &LightingState) -> (f32, f32) {
    let ambient = 0.4 + (lighting.brightness - 0.7) / 0.6 * 0.4;
    let directional = 0.6 + (lighting.brightness - 0.7) / 0.6 * 0.4;
    (ambient.clamp(0.4, 0.8), directional.clamp(0.6, 1.0))
}

/// Build a renderable mesh from a face landmark set: one vertex per point,
/// triangle fans over the outline and lip groups. Enough surface for
/// occlusion and lighting; it is never shown as-is.
pub fn face_mesh(face: &FaceLandmarks) -> MeshBuffers {
    let mut mesh = MeshBuffers::default();

    let oval_base = push_group(&mut mesh, &face.face_oval);
    fan(&mut mesh, oval_base, face.face_oval.len());

    let lips_base = push_group(&mut mesh, &face.lips);
    fan(&mut mesh, lips_base, face.lips.len());

    // Remaining groups contribute vertices only; renderers index them.
    push_group(&mut mesh, &face.left_eye);
    push_group(&mut mesh, &face.right_eye);
    push_group(&mut mesh, &face.nose);
    push_group(&mut mesh, &face.jaw);

    mesh
}

fn push_group(mesh: &mut MeshBuffers, points: &[Point3]) -> u32 {
    let base = mesh.vertex_count() as u32;
    for p in points {
        mesh.vertices.extend_from_slice(&[p.x, p.y, p.z]);
    }
    base
}

fn fan(mesh: &mut MeshBuffers, base: u32, len: usize) {
    if len < 3 {
        return;
    }
    for i in 1..(len as u32 - 1) {
        mesh.indices.extend_from_slice(&[base, base + i, base + i + 1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_fans_outline_and_lips() {
        let face = FaceLandmarks {
            face_oval: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(10.0, 10.0, 0.0),
                Point3::new(0.0, 10.0, 0.0),
            ],
            lips: vec![
                Point3::new(3.0, 7.0, 0.0),
                Point3::new(7.0, 7.0, 0.0),
                Point3::new(5.0, 8.0, 0.0),
            ],
            ..Default::default()
        };
        let mesh = face_mesh(&face);
        assert_eq!(mesh.vertex_count(), 7);
        // 4-point fan = 2 triangles, 3-point fan = 1.
        assert_eq!(mesh.triangle_count(), 3);
        // Lip indices start after the oval vertices.
        assert_eq!(mesh.indices[6], 4);
    }

    #[test]
    fn sparse_groups_produce_no_degenerate_triangles() {
        let face = FaceLandmarks {
            face_oval: vec![Point3::default(), Point3::default()],
            ..Default::default()
        };
        let mesh = face_mesh(&face);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn light_split_tracks_brightness() {
        let neutral = LightingState::neutral();
        let (ambient, directional) = light_intensities(&neutral);
        assert!(ambient > 0.4 && ambient < 0.8);
        assert!(directional > 0.6 && directional < 1.0);

        let dark = LightingState {
            brightness: 0.7,
            ..neutral
        };
        assert_eq!(light_intensities(&dark), (0.4, 0.6));
    }
}
