mod common;

use common::synthetic_image::dot_lattice_image;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use kolam_grid::grid::build_grid_from_points;
use kolam_grid::kornia::{DotConfig, annotate_dots, detect_dots};
use kolam_grid::symmetry::analyze_symmetries;

#[test]
fn detects_every_lattice_dot() {
    let _ = env_logger::builder().is_test(true).try_init();
    let img = dot_lattice_image(3, 4, 40, 5);
    let dots = detect_dots(&img, &DotConfig::default()).expect("detection failed");
    assert_eq!(dots.len(), 12);
    for d in &dots {
        let (x, y) = d.center;
        let near = |v: f32| ((v - 40.0) / 40.0 - ((v - 40.0) / 40.0).round()).abs() * 40.0;
        assert!(near(x) < 1.0 && near(y) < 1.0, "centre off lattice: {x}, {y}");
        assert!(d.radius > 3.0 && d.radius < 7.0);
    }
}

#[test]
fn detected_dots_rebuild_the_lattice() {
    let img = dot_lattice_image(3, 4, 40, 5);
    let dots = detect_dots(&img, &DotConfig::default()).expect("detection failed");
    let grid = build_grid_from_points(&dots, 12.0);
    assert_eq!(grid.row_count(), 3);
    assert!(grid.rows().iter().all(|r| r.len() == 4));
    assert!((grid.rows()[2][3].x - 160.0).abs() < 1.0);
    assert!((grid.rows()[2][3].y - 120.0).abs() < 1.0);

    let report = analyze_symmetries(&grid, 12.0);
    assert!(!report.horizontal_reflection);
    assert!(!report.rotation_90);
}

#[test]
fn blank_page_has_no_dots() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, Rgb([255, 255, 255])));
    let dots = detect_dots(&img, &DotConfig::default()).expect("detection failed");
    assert!(dots.is_empty());

    let grid = build_grid_from_points(&dots, 12.0);
    let report = analyze_symmetries(&grid, 12.0);
    assert!(!report.rotation_90);
    assert!(!report.rotation_180);
}

#[test]
fn area_filter_rejects_small_specks() {
    let img = dot_lattice_image(2, 2, 30, 2);
    let cfg = DotConfig {
        min_component_pixels: 50,
        ..DotConfig::default()
    };
    let dots = detect_dots(&img, &cfg).expect("detection failed");
    assert!(dots.is_empty());
}

#[test]
fn overlay_keeps_image_size() {
    let img = dot_lattice_image(2, 2, 30, 4);
    let dots = detect_dots(&img, &DotConfig::default()).expect("detection failed");
    let annotated = annotate_dots(&img, &dots);
    assert_eq!(annotated.dimensions(), img.dimensions());
    let (x, y) = dots[0].center;
    let px = annotated.to_rgba8().get_pixel(x.round() as u32, y.round() as u32).0;
    assert_eq!(px, [0, 200, 0, 255]);
}
