// Host-side tests for base-map preparation. Images are encoded in memory.

use globe_core::constants::DEEP_OCEAN_RGBA;
use globe_core::*;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn checker(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([200, 180, 90, 255])
        } else {
            Rgba([30, 90, 160, 255])
        }
    })
}

#[test]
fn fallback_chain_tries_primary_then_fallback() {
    let chain: Vec<MapSource> = FallbackChain::default().collect();
    assert_eq!(chain, vec![MapSource::Primary, MapSource::Fallback]);
    assert_eq!(MapSource::Primary.url(), "/images/world_map.png");
    assert_eq!(MapSource::Fallback.url(), "/images/world_map_modified.png");
}

#[test]
fn prepares_full_mip_chain_and_fills_holes() {
    let mut img = checker(8, 4);
    img.put_pixel(3, 1, Rgba([255, 255, 255, 0]));
    let prepared = prepare_base_map(
        &png_bytes(&img),
        MapSource::Primary,
        &RendererCapabilities::default(),
        UvOrigin::TopLeft,
    )
    .unwrap();

    assert_eq!(prepared.source, MapSource::Primary);
    assert_eq!(prepared.original_size, (8, 4));
    let dims: Vec<(u32, u32)> = prepared.levels.iter().map(|l| l.dimensions()).collect();
    assert_eq!(dims, vec![(8, 4), (4, 2), (2, 1), (1, 1)]);
    assert_eq!(prepared.levels[0].get_pixel(3, 1).0, DEEP_OCEAN_RGBA);
}

#[test]
fn tiny_images_are_rejected() {
    let err = prepare_base_map(
        &png_bytes(&checker(4, 4)),
        MapSource::Fallback,
        &RendererCapabilities::default(),
        UvOrigin::TopLeft,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        TextureError::Implausible {
            width: 4,
            height: 4,
            ..
        }
    ));
    assert!(!is_plausible(1, 1000));
    assert!(is_plausible(5, 5));
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let err = prepare_base_map(
        b"definitely not an image",
        MapSource::Primary,
        &RendererCapabilities::default(),
        UvOrigin::TopLeft,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        TextureError::Decode {
            source_kind: MapSource::Primary,
            ..
        }
    ));
}

#[test]
fn oversized_maps_are_clamped_to_device_limit() {
    let caps = RendererCapabilities {
        max_texture_dimension: 4,
        ..RendererCapabilities::default()
    };
    let prepared = prepare_base_map(
        &png_bytes(&checker(16, 8)),
        MapSource::Primary,
        &caps,
        UvOrigin::TopLeft,
    )
    .unwrap();
    assert_eq!(prepared.original_size, (16, 8));
    assert_eq!(prepared.size(), (4, 2));
}

#[test]
fn bottom_left_origin_flips_rows() {
    let mut img = RgbaImage::new(1, 2);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));

    let mut top_left = img.clone();
    normalize_orientation(&mut top_left, UvOrigin::TopLeft);
    assert_eq!(top_left.get_pixel(0, 0).0, [255, 0, 0, 255]);

    normalize_orientation(&mut img, UvOrigin::BottomLeft);
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255, 255]);
}

#[test]
fn fill_counts_only_transparent_texels() {
    let mut img = checker(6, 6);
    img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
    img.put_pixel(5, 5, Rgba([9, 9, 9, 0]));
    img.put_pixel(2, 2, Rgba([9, 9, 9, 1]));
    assert_eq!(fill_transparent(&mut img), 2);
}

#[test]
fn mip_count_covers_down_to_one_texel() {
    assert_eq!(mip_level_count(1, 1), 1);
    assert_eq!(mip_level_count(2048, 1024), 12);
    assert_eq!(mip_level_count(5, 3), 3);
}

#[test]
fn anisotropy_clamp_reflects_capabilities() {
    let on = RendererCapabilities::default();
    assert_eq!(on.anisotropy_clamp(), 16);
    let off = RendererCapabilities {
        anisotropy: Anisotropy::Unsupported,
        ..on
    };
    assert_eq!(off.anisotropy_clamp(), 1);
}
