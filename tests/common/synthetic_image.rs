use image::{DynamicImage, Rgb, RgbImage};

/// Draws a `rows` x `cols` lattice of dark filled dots on white paper.
///
/// Dot `(r, c)` is centred at `(origin + c * spacing, origin + r * spacing)`.
pub fn dot_lattice_image(rows: u32, cols: u32, spacing: u32, radius: u32) -> DynamicImage {
    assert!(spacing > 2 * radius, "dots must not touch");
    let origin = spacing;
    let width = origin * 2 + spacing * cols.saturating_sub(1);
    let height = origin * 2 + spacing * rows.saturating_sub(1);

    let ink = Rgb([30u8, 30, 30]);
    let mut img = RgbImage::from_pixel(width, height, Rgb([250u8, 250, 245]));
    let r2 = (radius * radius) as i64;
    for r in 0..rows {
        for c in 0..cols {
            let cx = (origin + c * spacing) as i64;
            let cy = (origin + r * spacing) as i64;
            for y in (cy - radius as i64)..=(cy + radius as i64) {
                for x in (cx - radius as i64)..=(cx + radius as i64) {
                    let (dx, dy) = (x - cx, y - cy);
                    if dx * dx + dy * dy <= r2 {
                        img.put_pixel(x as u32, y as u32, ink);
                    }
                }
            }
        }
    }
    DynamicImage::ImageRgb8(img)
}
