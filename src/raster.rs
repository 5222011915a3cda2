//! Low-level canvas primitives shared by the indexer and the compositor
//!
//! Every call works on a caller-owned `RgbaImage` and retains no state, so
//! concurrent compositions never contend. Two draw flavors exist on
//! purpose: `copy_region` replaces destination pixels verbatim (the
//! expression overlay must not re-apply alpha), while `blit` does
//! source-over blending with an optional global alpha multiplier.

use image::{Rgba, RgbaImage};

/// Copy a rectangular region from `src` to `dst` verbatim.
///
/// Destination pixels are overwritten, transparency included. Regions
/// hanging over either image's edge are clipped.
pub fn copy_region(
    dst: &mut RgbaImage,
    src: &RgbaImage,
    src_x: u32,
    src_y: u32,
    width: u32,
    height: u32,
    dst_x: i32,
    dst_y: i32,
) {
    for row in 0..height {
        let sy = src_y + row;
        if sy >= src.height() {
            break;
        }
        let dy = dst_y + row as i32;
        if dy < 0 {
            continue;
        }
        let dy = dy as u32;
        if dy >= dst.height() {
            break;
        }
        for col in 0..width {
            let sx = src_x + col;
            if sx >= src.width() {
                break;
            }
            let dx = dst_x + col as i32;
            if dx < 0 {
                continue;
            }
            let dx = dx as u32;
            if dx >= dst.width() {
                break;
            }
            dst.put_pixel(dx, dy, *src.get_pixel(sx, sy));
        }
    }
}

/// Reset a rectangle to fully transparent.
pub fn clear_rect(canvas: &mut RgbaImage, x: i32, y: i32, width: u32, height: u32) {
    for row in 0..height {
        let cy = y + row as i32;
        if cy < 0 {
            continue;
        }
        let cy = cy as u32;
        if cy >= canvas.height() {
            break;
        }
        for col in 0..width {
            let cx = x + col as i32;
            if cx < 0 {
                continue;
            }
            let cx = cx as u32;
            if cx >= canvas.width() {
                break;
            }
            canvas.put_pixel(cx, cy, Rgba([0, 0, 0, 0]));
        }
    }
}

/// Draw `sprite` onto `canvas` at `(x, y)` with source-over blending.
///
/// `global_alpha` scales every source pixel's alpha, matching the 85%
/// opacity the dialog chrome is drawn at.
pub fn blit(canvas: &mut RgbaImage, sprite: &RgbaImage, x: i32, y: i32, global_alpha: f32) {
    for (sy, row) in sprite.rows().enumerate() {
        let dest_y = y + sy as i32;
        if dest_y < 0 {
            continue;
        }
        let dest_y = dest_y as u32;
        if dest_y >= canvas.height() {
            break;
        }

        for (sx, pixel) in row.enumerate() {
            let dest_x = x + sx as i32;
            if dest_x < 0 {
                continue;
            }
            let dest_x = dest_x as u32;
            if dest_x >= canvas.width() {
                break;
            }

            let src = pixel;
            if src[3] == 0 {
                // Fully transparent, skip
                continue;
            } else if src[3] == 255 && global_alpha >= 1.0 {
                // Fully opaque, overwrite
                canvas.put_pixel(dest_x, dest_y, *src);
            } else {
                let dst = canvas.get_pixel(dest_x, dest_y);
                let blended = alpha_blend(src, dst, global_alpha);
                canvas.put_pixel(dest_x, dest_y, blended);
            }
        }
    }
}

/// Composite a full-size overlay canvas over `base` at the origin.
pub fn composite_over(base: &mut RgbaImage, overlay: &RgbaImage) {
    blit(base, overlay, 0, 0, 1.0);
}

/// Blend a solid color into one canvas pixel at fractional coverage.
/// Used by the text rasterizer for glyph edges.
pub fn blend_pixel(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if coverage <= 0.0 || x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= canvas.width() || y >= canvas.height() {
        return;
    }
    let mut src = color;
    src[3] = (src[3] as f32 * coverage.min(1.0)).round() as u8;
    if src[3] == 0 {
        return;
    }
    let dst = canvas.get_pixel(x, y);
    let blended = alpha_blend(&src, dst, 1.0);
    canvas.put_pixel(x, y, blended);
}

/// Alpha blend source over destination, with a global alpha multiplier
/// applied to the source.
fn alpha_blend(src: &Rgba<u8>, dst: &Rgba<u8>, global_alpha: f32) -> Rgba<u8> {
    let src_a = src[3] as f32 / 255.0 * global_alpha.clamp(0.0, 1.0);
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let s_f = s as f32 / 255.0;
        let d_f = d as f32 / 255.0;
        let out = (s_f * src_a + d_f * dst_a * (1.0 - src_a)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}
