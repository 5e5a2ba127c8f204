//! CPU-side UV sphere tessellation shared by the globe, its shells and markers.

use bytemuck::{Pod, Zeroable};
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Clone, Debug)]
pub struct SphereMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Latitude/longitude sphere. Column `u` runs with longitude from -180 at
    /// u = 0; row `v` runs from the north pole (v = 0) to the south pole, so
    /// image row 0 maps to the top of the globe. Triangles wind CCW seen from
    /// outside.
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            let theta = v * PI;
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let phi = u * TAU;
                let n = [
                    -phi.cos() * theta.sin(),
                    theta.cos(),
                    phi.sin() * theta.sin(),
                ];
                vertices.push(MeshVertex {
                    position: [n[0] * radius, n[1] * radius, n[2] * radius],
                    normal: n,
                    uv: [u, v],
                });
            }
        }
        let row = ws + 1;
        let mut indices = Vec::with_capacity((ws * hs * 6) as usize);
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        Self { vertices, indices }
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}
