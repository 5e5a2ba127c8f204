//! Scene composition: the globe body, its shells, the starfield, lights,
//! markers and camera, plus the ledger of graphics resources they own.

use crate::camera::Camera;
use crate::constants::*;
use crate::geo::GeoPoint;
use crate::markers::{MarkerSet, RebuildReport};
use crate::orientation::GroupTransforms;
use crate::resources::{ResourceId, ResourceKind, ResourceLedger};
use crate::solar::SolarLighting;
use glam::Vec3;
use rand::prelude::*;

/// Fresnel glow parameters for a translucent shell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShellLook {
    pub inner_color: [f32; 3],
    pub outer_color: [f32; 3],
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shell {
    pub radius: f32,
    pub look: ShellLook,
    pub geometry: ResourceId,
    pub material: ResourceId,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobeBody {
    pub radius: f32,
    pub base_color: [f32; 3],
    pub opacity: f32,
    pub geometry: ResourceId,
    pub material: ResourceId,
    /// Base map currently bound to the material, if any.
    pub map: Option<ResourceId>,
}

#[derive(Clone, Debug)]
pub struct Starfield {
    pub positions: Vec<Vec3>,
    pub geometry: ResourceId,
    pub material: ResourceId,
}

/// Stars scattered uniformly over a sphere.
pub fn starfield_positions(count: usize, radius: f32, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let theta = rng.gen::<f32>() * std::f32::consts::TAU;
            let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
            Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            )
        })
        .collect()
}

/// Base, edge-highlight and anti-aliasing passes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Composer {
    pub passes: [ResourceId; 3],
}

#[derive(Debug)]
pub struct SceneGraph {
    pub ledger: ResourceLedger,
    pub globe: GlobeBody,
    pub atmosphere: Shell,
    pub boundary: Shell,
    pub starfield: Starfield,
    pub markers: MarkerSet,
    pub transforms: GroupTransforms,
    pub lighting: SolarLighting,
    pub camera: Camera,
    pub composer: Composer,
    pub sun_helper_visible: bool,
    disposed: bool,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::compose()
    }
}

impl SceneGraph {
    pub fn compose() -> Self {
        let mut ledger = ResourceLedger::new();
        let globe = GlobeBody {
            radius: GLOBE_RADIUS,
            base_color: GLOBE_BASE_COLOR,
            opacity: GLOBE_OPACITY,
            geometry: ledger.allocate(ResourceKind::Geometry, "globe_geometry"),
            material: ledger.allocate(ResourceKind::Material, "globe_material"),
            map: None,
        };
        let atmosphere = Shell {
            radius: ATMOSPHERE_RADIUS,
            look: ShellLook {
                inner_color: ATMOSPHERE_INNER,
                outer_color: ATMOSPHERE_OUTER,
                intensity: ATMOSPHERE_INTENSITY,
            },
            geometry: ledger.allocate(ResourceKind::Geometry, "atmosphere_geometry"),
            material: ledger.allocate(ResourceKind::Material, "atmosphere_material"),
        };
        let boundary = Shell {
            radius: BOUNDARY_RADIUS,
            look: ShellLook {
                inner_color: BOUNDARY_INNER,
                outer_color: BOUNDARY_OUTER,
                intensity: BOUNDARY_INTENSITY,
            },
            geometry: ledger.allocate(ResourceKind::Geometry, "boundary_geometry"),
            material: ledger.allocate(ResourceKind::Material, "boundary_material"),
        };
        let starfield = Starfield {
            positions: starfield_positions(STAR_COUNT, STARFIELD_RADIUS, STARFIELD_SEED),
            geometry: ledger.allocate(ResourceKind::Geometry, "starfield_geometry"),
            material: ledger.allocate(ResourceKind::Material, "starfield_material"),
        };
        let composer = Composer {
            passes: [
                ledger.allocate(ResourceKind::PostPass, "base_pass"),
                ledger.allocate(ResourceKind::PostPass, "edge_pass"),
                ledger.allocate(ResourceKind::PostPass, "fxaa_pass"),
            ],
        };
        Self {
            ledger,
            globe,
            atmosphere,
            boundary,
            starfield,
            markers: MarkerSet::new(),
            transforms: GroupTransforms::default(),
            lighting: SolarLighting::default(),
            camera: Camera::default(),
            composer,
            sun_helper_visible: false,
            disposed: false,
        }
    }

    pub fn set_markers(&mut self, points: Option<&[GeoPoint]>) -> RebuildReport {
        if self.disposed {
            return RebuildReport::default();
        }
        self.markers.rebuild(points, &mut self.ledger)
    }

    /// Bind a freshly prepared base map. The previous map stays live until the
    /// new one is allocated, then is released.
    pub fn install_map(&mut self) -> Option<ResourceId> {
        if self.disposed {
            return None;
        }
        let new_map = self.ledger.allocate(ResourceKind::Texture, "globe_map");
        if let Some(old) = self.globe.map.replace(new_map) {
            if let Err(e) = self.ledger.release(old) {
                log::warn!("[texture] releasing previous map: {}", e);
            }
        }
        Some(new_map)
    }

    #[inline]
    pub fn is_textured(&self) -> bool {
        self.globe.map.is_some()
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release every resource the scene owns exactly once. Later calls are
    /// no-ops. Returns how many resources were released by this call.
    pub fn dispose(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        self.disposed = true;
        let mut released = self.markers.clear(&mut self.ledger);
        let mut owned = vec![
            self.globe.geometry,
            self.globe.material,
            self.atmosphere.geometry,
            self.atmosphere.material,
            self.boundary.geometry,
            self.boundary.material,
            self.starfield.geometry,
            self.starfield.material,
        ];
        owned.extend(self.globe.map.take());
        owned.extend(self.composer.passes);
        for id in owned {
            match self.ledger.release(id) {
                Ok(()) => released += 1,
                Err(e) => log::warn!("[teardown] {}", e),
            }
        }
        released
    }
}
