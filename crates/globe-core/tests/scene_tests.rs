// Host-side tests for scene composition, meshes and resource bookkeeping.

use globe_core::constants::{STARFIELD_RADIUS, STAR_COUNT};
use globe_core::*;

#[test]
fn compose_allocates_bodies_shells_stars_and_passes() {
    let scene = SceneGraph::compose();
    // Four bodies with geometry and material, plus three composer passes.
    assert_eq!(scene.ledger.live(), 11);
    assert!(!scene.is_textured());
    assert!(scene.atmosphere.radius > scene.globe.radius);
    assert!(scene.boundary.radius > scene.atmosphere.radius);
    assert!(!scene.sun_helper_visible);
}

#[test]
fn starfield_is_seeded_and_on_its_sphere() {
    let a = SceneGraph::compose();
    let b = SceneGraph::compose();
    assert_eq!(a.starfield.positions.len(), STAR_COUNT);
    assert_eq!(a.starfield.positions, b.starfield.positions);
    for p in &a.starfield.positions {
        assert!((p.length() - STARFIELD_RADIUS).abs() < 1e-2);
    }
}

#[test]
fn installing_a_map_swaps_the_previous_one() {
    let mut scene = SceneGraph::compose();
    let first = scene.install_map().unwrap();
    let second = scene.install_map().unwrap();
    assert_ne!(first, second);
    assert!(!scene.ledger.is_live(first));
    assert!(scene.ledger.is_live(second));
    let textures = scene
        .ledger
        .live_ids()
        .filter(|id| scene.ledger.kind(*id) == Some(ResourceKind::Texture))
        .count();
    assert_eq!(textures, 1);
}

#[test]
fn dispose_releases_everything_once() {
    let mut scene = SceneGraph::compose();
    scene.install_map();
    scene.set_markers(Some(&[GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)]));
    let live = scene.ledger.live();
    assert_eq!(scene.dispose(), live);
    assert_eq!(scene.ledger.live(), 0);
    assert_eq!(scene.dispose(), 0);
    assert!(scene.install_map().is_none());
    assert_eq!(scene.set_markers(Some(&[GeoPoint::new(0.0, 0.0)])).created, 0);
}

#[test]
fn ledger_rejects_double_release() {
    let mut ledger = ResourceLedger::new();
    let id = ledger.allocate(ResourceKind::Geometry, "probe");
    assert!(ledger.release(id).is_ok());
    assert_eq!(
        ledger.release(id),
        Err(ResourceError::AlreadyReleased(id, "probe"))
    );
    assert_eq!(ledger.released(), 1);
    assert_eq!(ledger.allocated(), 1);
}

#[test]
fn uv_sphere_has_expected_topology() {
    let mesh = SphereMesh::uv_sphere(1.0, 8, 4);
    assert_eq!(mesh.vertices.len(), 9 * 5);
    // Pole rows contribute one triangle per segment, inner rows two.
    assert_eq!(mesh.index_count(), 8 * 3 + 2 * 8 * 6 + 8 * 3);
    for v in &mesh.vertices {
        let p = glam::Vec3::from(v.position);
        assert!((p.length() - 1.0).abs() < 1e-5);
    }
    let north = mesh.vertices[0];
    assert_eq!(north.uv, [0.0, 0.0]);
    assert!((north.position[1] - 1.0).abs() < 1e-6);
}

#[test]
fn uv_sphere_texture_seam_matches_projection() {
    let mesh = SphereMesh::uv_sphere(1.0, 4, 2);
    // Equator row, u = 0.5 is longitude 0.
    let v = mesh.vertices[5 + 2];
    assert_eq!(v.uv, [0.5, 0.5]);
    let expected = lat_lng_to_vec3(0.0, 0.0, 1.0);
    assert!((glam::Vec3::from(v.position) - expected).length() < 1e-5);
}
