//! Respondent markers: construction, picking and the click pulse.

use crate::camera::ray_sphere;
use crate::constants::{
    GLOBE_RADIUS, MARKER_ALTITUDE, MARKER_BASE_SCALE, MARKER_PULSE_SCALE, MARKER_RADIUS,
};
use crate::geo::{lat_lng_to_vec3, GeoPoint};
use crate::resources::{ResourceId, ResourceKind, ResourceLedger};
use glam::{Quat, Vec3};

/// Stable handle to a marker within one build of the marker set.
///
/// Rebuilding bumps the generation, so handles held across a rebuild (for
/// example by a pending pulse timer) simply stop resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarkerId {
    pub generation: u32,
    pub index: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerResources {
    pub geometry: ResourceId,
    pub material: ResourceId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    /// Center in the globe's local frame.
    pub position: Vec3,
    /// Rotates +Z onto the outward surface normal.
    pub facing: Quat,
    pub source: GeoPoint,
    pub base_scale: f32,
    pub scale: f32,
    pub resources: MarkerResources,
}

impl Marker {
    #[inline]
    pub fn pick_radius(&self) -> f32 {
        MARKER_RADIUS * self.scale
    }

    #[inline]
    pub fn is_pulsing(&self) -> bool {
        self.scale > self.base_scale
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerHit {
    pub id: MarkerId,
    pub point: GeoPoint,
    pub distance: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RebuildReport {
    pub released: usize,
    pub created: usize,
    pub skipped: usize,
}

#[derive(Clone, Debug, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
    generation: u32,
}

/// Where a marker for `point` sits in globe-local space.
#[inline]
pub fn marker_position(point: &GeoPoint) -> Vec3 {
    let p = point.clamped();
    lat_lng_to_vec3(p.lat, p.lng, GLOBE_RADIUS + MARKER_ALTITUDE)
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        if id.generation != self.generation {
            return None;
        }
        self.markers.get(id.index as usize)
    }

    fn get_mut(&mut self, id: MarkerId) -> Option<&mut Marker> {
        if id.generation != self.generation {
            return None;
        }
        self.markers.get_mut(id.index as usize)
    }

    /// Look a marker up by its source point (lat/lng equality).
    pub fn find_by_point(&self, point: &GeoPoint) -> Option<&Marker> {
        self.markers.iter().find(|m| m.source == *point)
    }

    /// Release every marker's resources. A failed release is logged and the
    /// rest still run.
    pub fn clear(&mut self, ledger: &mut ResourceLedger) -> usize {
        let mut released = 0;
        for m in self.markers.drain(..) {
            for id in [m.resources.geometry, m.resources.material] {
                match ledger.release(id) {
                    Ok(()) => released += 1,
                    Err(e) => log::warn!("[marker] release failed: {}", e),
                }
            }
        }
        self.generation = self.generation.wrapping_add(1);
        released
    }

    /// Replace the marker set. `None` or an empty slice leaves no markers.
    pub fn rebuild(
        &mut self,
        points: Option<&[GeoPoint]>,
        ledger: &mut ResourceLedger,
    ) -> RebuildReport {
        let released = self.clear(ledger);
        let mut report = RebuildReport {
            released,
            ..Default::default()
        };
        for point in points.unwrap_or(&[]) {
            if !point.is_finite() {
                report.skipped += 1;
                continue;
            }
            let position = marker_position(point);
            let resources = MarkerResources {
                geometry: ledger.allocate(ResourceKind::Geometry, "marker_geometry"),
                material: ledger.allocate(ResourceKind::Material, "marker_material"),
            };
            let id = MarkerId {
                generation: self.generation,
                index: self.markers.len() as u32,
            };
            self.markers.push(Marker {
                id,
                position,
                facing: Quat::from_rotation_arc(Vec3::Z, position.normalize_or_zero()),
                source: *point,
                base_scale: MARKER_BASE_SCALE,
                scale: MARKER_BASE_SCALE,
                resources,
            });
            report.created += 1;
        }
        if report.skipped > 0 {
            log::warn!("[marker] skipped {} non-finite points", report.skipped);
        }
        report
    }

    /// Nearest marker hit by a ray expressed in the globe's local frame.
    ///
    /// Hits that lie behind the globe body are ignored. Equal distances
    /// resolve to the lower index.
    pub fn pick_local(&self, origin: Vec3, dir: Vec3) -> Option<MarkerHit> {
        if self.markers.is_empty() {
            return None;
        }
        let dir = dir.try_normalize()?;
        let occluder = ray_sphere(origin, dir, Vec3::ZERO, GLOBE_RADIUS);
        let mut best: Option<(f32, &Marker)> = None;
        for m in &self.markers {
            let Some(t) = ray_sphere(origin, dir, m.position, m.pick_radius()) else {
                continue;
            };
            if occluder.is_some_and(|g| g < t) {
                continue;
            }
            match best {
                Some((bt, _)) if t >= bt => {}
                _ => best = Some((t, m)),
            }
        }
        best.map(|(distance, m)| MarkerHit {
            id: m.id,
            point: m.source,
            distance,
        })
    }

    /// Enlarge a marker as click feedback. Returns false for stale ids.
    pub fn begin_pulse(&mut self, id: MarkerId) -> bool {
        match self.get_mut(id) {
            Some(m) => {
                m.scale = m.base_scale * MARKER_PULSE_SCALE;
                true
            }
            None => false,
        }
    }

    /// Restore a marker's scale. A marker that no longer exists is a no-op.
    pub fn end_pulse(&mut self, id: MarkerId) -> bool {
        match self.get_mut(id) {
            Some(m) => {
                m.scale = m.base_scale;
                true
            }
            None => false,
        }
    }
}
