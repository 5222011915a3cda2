//! Text measurement and rasterization
//!
//! The indexer and compositor only speak to the [`TextRenderer`] seam; the
//! production backend is [`Typeface`], an `ab_glyph` font. Style state is
//! per call, never shared: rendering backends that keep an active font or
//! fill color globally corrupt concurrent output, so every draw receives
//! its full [`TextStyle`].
//!
//! Also home to the dialog word wrap, which is generic over a measure
//! function so layout can be tested without a font file.

use crate::error::DialogError;
use crate::raster;
use ab_glyph::{point, Font, FontVec, Glyph, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Light grey the dialog UI uses for all text fills
pub const UI_TEXT_FILL: Rgba<u8> = Rgba([0xd8, 0xd7, 0xdb, 0xff]);

/// Outline stroke drawn behind the fill pass
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Rgba<u8>,
    /// Stroke width in pixels; the stroke extends half of it outward
    pub width: f32,
}

/// Drop shadow drawn behind stroke and fill
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub offset: (i32, i32),
    pub blur: u32,
    pub color: Rgba<u8>,
}

/// Styling for one text draw call
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels
    pub px: f32,
    pub fill: Rgba<u8>,
    pub stroke: Option<Stroke>,
    pub shadow: Option<Shadow>,
}

/// Measurement and drawing capability supplied by the rendering backend.
///
/// `(x, y)` is the baseline-left anchor, matching canvas-style text APIs.
pub trait TextRenderer {
    /// Measured advance width of `text` at `px` pixels
    fn measure(&self, text: &str, px: f32) -> f32;
    /// Draw `text` onto `canvas` with its baseline-left anchor at `(x, y)`
    fn draw(&self, canvas: &mut RgbaImage, text: &str, x: i32, y: i32, style: &TextStyle);
}

/// A loaded font ready for measuring and rasterizing dialog text.
pub struct Typeface {
    font: FontVec,
}

impl Typeface {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DialogError> {
        let font =
            FontVec::try_from_vec(bytes).map_err(|e| DialogError::FontLoad(e.to_string()))?;
        Ok(Self { font })
    }

    pub fn from_path(path: &Path) -> Result<Self, DialogError> {
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Position the glyphs of `text` along a baseline at the origin,
    /// applying kerning. Returns the glyphs and the total advance width.
    fn layout(&self, text: &str, px: f32) -> (Vec<Glyph>, f32) {
        let scale = PxScale::from(px);
        let scaled = self.font.as_scaled(scale);
        let mut glyphs = Vec::new();
        let mut caret = 0.0f32;
        let mut prev: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            glyphs.push(id.with_scale_and_position(scale, point(caret, 0.0)));
            caret += scaled.h_advance(id);
            prev = Some(id);
        }
        (glyphs, caret)
    }

    /// Rasterize glyph coverage into a mask anchored at the baseline-left
    /// origin. `None` when nothing produces an outline (e.g. only spaces).
    fn coverage_mask(&self, text: &str, px: f32) -> Option<CoverageMask> {
        let (glyphs, _) = self.layout(text, px);
        let outlined: Vec<_> = glyphs
            .into_iter()
            .filter_map(|g| self.font.outline_glyph(g))
            .collect();
        if outlined.is_empty() {
            return None;
        }

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for og in &outlined {
            let b = og.px_bounds();
            min_x = min_x.min(b.min.x);
            min_y = min_y.min(b.min.y);
            max_x = max_x.max(b.max.x);
            max_y = max_y.max(b.max.y);
        }

        let origin_x = min_x.floor() as i32;
        let origin_y = min_y.floor() as i32;
        let width = (max_x.ceil() as i32 - origin_x).max(1) as usize;
        let height = (max_y.ceil() as i32 - origin_y).max(1) as usize;
        let mut mask = CoverageMask::new(origin_x, origin_y, width, height);

        for og in &outlined {
            let b = og.px_bounds();
            let gx = b.min.x.floor() as i32 - origin_x;
            let gy = b.min.y.floor() as i32 - origin_y;
            og.draw(|x, y, coverage| {
                mask.accumulate(gx + x as i32, gy + y as i32, coverage);
            });
        }
        Some(mask)
    }
}

impl TextRenderer for Typeface {
    fn measure(&self, text: &str, px: f32) -> f32 {
        self.layout(text, px).1
    }

    fn draw(&self, canvas: &mut RgbaImage, text: &str, x: i32, y: i32, style: &TextStyle) {
        let Some(mask) = self.coverage_mask(text, style.px) else {
            return;
        };

        // The stroke silhouette is the glyph coverage dilated by half the
        // stroke width, drawn before the fill so the fill stays crisp.
        let silhouette = style
            .stroke
            .as_ref()
            .map(|s| mask.dilate(((s.width / 2.0).round() as i32).max(1)));

        if let Some(shadow) = &style.shadow {
            let base = silhouette.as_ref().unwrap_or(&mask);
            let blurred = base.box_blur(shadow.blur.div_ceil(2) as i32);
            blurred.stamp(
                canvas,
                x + shadow.offset.0,
                y + shadow.offset.1,
                shadow.color,
            );
        }
        if let (Some(stroke), Some(silhouette)) = (&style.stroke, &silhouette) {
            silhouette.stamp(canvas, x, y, stroke.color);
        }
        mask.stamp(canvas, x, y, style.fill);
    }
}

/// Grayscale coverage buffer positioned relative to a text anchor.
struct CoverageMask {
    origin_x: i32,
    origin_y: i32,
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl CoverageMask {
    fn new(origin_x: i32, origin_y: i32, width: usize, height: usize) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    fn get(&self, x: i32, y: i32) -> f32 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0.0;
        }
        self.data[y as usize * self.width + x as usize]
    }

    fn accumulate(&mut self, x: i32, y: i32, coverage: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.data[idx] = self.data[idx].max(coverage);
    }

    /// Expand coverage by a disc of the given radius (stroke silhouette).
    fn dilate(&self, radius: i32) -> CoverageMask {
        let mut out = CoverageMask::new(
            self.origin_x - radius,
            self.origin_y - radius,
            self.width + 2 * radius as usize,
            self.height + 2 * radius as usize,
        );
        for oy in 0..out.height as i32 {
            for ox in 0..out.width as i32 {
                let mut best = 0.0f32;
                for dy in -radius..=radius {
                    for dx in -radius..=radius {
                        if dx * dx + dy * dy > radius * radius {
                            continue;
                        }
                        best = best.max(self.get(ox - radius + dx, oy - radius + dy));
                    }
                }
                out.data[oy as usize * out.width + ox as usize] = best;
            }
        }
        out
    }

    /// Box-blur coverage with the given radius (shadow softening).
    fn box_blur(&self, radius: i32) -> CoverageMask {
        if radius <= 0 {
            return CoverageMask {
                origin_x: self.origin_x,
                origin_y: self.origin_y,
                width: self.width,
                height: self.height,
                data: self.data.clone(),
            };
        }
        let mut out = CoverageMask::new(
            self.origin_x - radius,
            self.origin_y - radius,
            self.width + 2 * radius as usize,
            self.height + 2 * radius as usize,
        );
        let window = (2 * radius + 1) * (2 * radius + 1);
        for oy in 0..out.height as i32 {
            for ox in 0..out.width as i32 {
                let mut sum = 0.0f32;
                for dy in -radius..=radius {
                    for dx in -radius..=radius {
                        sum += self.get(ox - radius + dx, oy - radius + dy);
                    }
                }
                out.data[oy as usize * out.width + ox as usize] = sum / window as f32;
            }
        }
        out
    }

    /// Blend this mask into the canvas as a solid color, anchored at the
    /// caller's baseline-left `(x, y)`.
    fn stamp(&self, canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
        for my in 0..self.height {
            for mx in 0..self.width {
                let coverage = self.data[my * self.width + mx];
                if coverage <= 0.0 {
                    continue;
                }
                raster::blend_pixel(
                    canvas,
                    x + self.origin_x + mx as i32,
                    y + self.origin_y + my as i32,
                    color,
                    coverage,
                );
            }
        }
    }
}

/// Greedy word wrap with a hard two-line cap.
///
/// Returns the wrapped lines (one or two) and whether trailing words were
/// dropped. Text past the second line is discarded, not reflowed; that is
/// deliberate, carried-over behavior. A single word wider than `max_width`
/// is placed as-is and may overflow visually.
pub fn wrap_dialog_text(
    text: &str,
    max_width: f32,
    measure: impl Fn(&str) -> f32,
) -> (Vec<String>, bool) {
    if measure(text) <= max_width {
        return (vec![text.to_string()], false);
    }

    let mut words = text.split(' ');
    let mut line = words.next().unwrap_or("").to_string();
    let mut lines = Vec::new();
    let mut dropped = false;
    for word in words {
        let candidate = format!("{line} {word}");
        if measure(&candidate) <= max_width {
            line = candidate;
        } else if lines.is_empty() {
            lines.push(line);
            line = word.to_string();
        } else {
            dropped = true;
            break;
        }
    }
    lines.push(line);
    (lines, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 10px per char keeps the arithmetic easy to follow
    fn measure(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    #[test]
    fn test_wrap_single_line_fits() {
        let (lines, dropped) = wrap_dialog_text("hello", 860.0, measure);
        assert_eq!(lines, vec!["hello"]);
        assert!(!dropped);
    }

    #[test]
    fn test_wrap_exact_fit_stays_single_line() {
        let (lines, dropped) = wrap_dialog_text("abcdefghij", 100.0, measure);
        assert_eq!(lines, vec!["abcdefghij"]);
        assert!(!dropped);
    }

    #[test]
    fn test_wrap_two_lines() {
        // "aaaa bbbb cccc" at 100px: line 1 = "aaaa bbbb" (90), cccc starts line 2
        let (lines, dropped) = wrap_dialog_text("aaaa bbbb cccc", 100.0, measure);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
        assert!(!dropped);
    }

    #[test]
    fn test_wrap_third_line_words_vanish() {
        // needs three conceptual lines; everything past line 2 disappears
        let text = "aaaaaaaa bbbbbbbb cccccccc dddddddd eeeeeeee";
        let (lines, dropped) = wrap_dialog_text(text, 100.0, measure);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "aaaaaaaa");
        assert_eq!(lines[1], "bbbbbbbb");
        assert!(dropped);
        assert!(!lines.iter().any(|l| l.contains("cccccccc")));
        assert!(!lines.iter().any(|l| l.contains("dddddddd")));
    }

    #[test]
    fn test_wrap_oversized_word_placed_as_is() {
        // no hyphenation: a word wider than the limit lands on its own line
        let (lines, dropped) = wrap_dialog_text("hi incomprehensibilities", 100.0, measure);
        assert_eq!(lines, vec!["hi", "incomprehensibilities"]);
        assert!(!dropped);
    }

    #[test]
    fn test_wrap_drop_reported_once_line_two_full() {
        let (lines, dropped) = wrap_dialog_text("aaaa bbbb cccc dddd eeee ffff", 90.0, measure);
        // line 1: "aaaa bbbb" (90), line 2: "cccc dddd" (90), rest dropped
        assert_eq!(lines, vec!["aaaa bbbb", "cccc dddd"]);
        assert!(dropped);
    }

    #[test]
    fn test_wrap_empty_text() {
        let (lines, dropped) = wrap_dialog_text("", 100.0, measure);
        assert_eq!(lines, vec![""]);
        assert!(!dropped);
    }

    fn fixture_typeface() -> Typeface {
        let path = Path::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/DejaVuSansMono.ttf"
        ));
        Typeface::from_path(path).unwrap()
    }

    fn fill_style(px: f32) -> TextStyle {
        TextStyle {
            px,
            fill: Rgba([255, 255, 255, 255]),
            stroke: None,
            shadow: None,
        }
    }

    fn opaque_count(canvas: &RgbaImage) -> usize {
        canvas.pixels().filter(|p| p[3] > 0).count()
    }

    #[test]
    fn test_measure_grows_with_text() {
        let face = fixture_typeface();
        let short = face.measure("hi", 30.0);
        let long = face.measure("hello there", 30.0);
        assert!(short > 0.0);
        assert!(long > short);
    }

    #[test]
    fn test_measure_scales_with_font_size() {
        let face = fixture_typeface();
        let small = face.measure("dialog", 30.0);
        let large = face.measure("dialog", 60.0);
        // a monospace face advances linearly with the pixel size
        assert!((large - 2.0 * small).abs() < 0.01, "small {small}, large {large}");
    }

    #[test]
    fn test_garbage_font_bytes_rejected() {
        assert!(matches!(
            Typeface::from_bytes(b"not a font".to_vec()),
            Err(crate::error::DialogError::FontLoad(_))
        ));
    }

    #[test]
    fn test_draw_fills_pixels_near_the_anchor() {
        let face = fixture_typeface();
        let mut canvas = RgbaImage::new(120, 80);
        face.draw(&mut canvas, "8", 30, 60, &fill_style(40.0));

        assert!(opaque_count(&canvas) > 0);
        // glyph coverage sits above the baseline, right of the anchor
        for (x, y, p) in canvas.enumerate_pixels() {
            if p[3] > 0 {
                assert!(x >= 30 && (x as f32) < 30.0 + face.measure("8", 40.0) + 1.0);
                assert!(y < 61);
            }
        }
    }

    #[test]
    fn test_draw_space_only_is_noop() {
        let face = fixture_typeface();
        let mut canvas = RgbaImage::new(60, 60);
        face.draw(&mut canvas, "   ", 10, 40, &fill_style(30.0));
        assert_eq!(opaque_count(&canvas), 0);
    }

    #[test]
    fn test_stroke_pass_widens_the_glyph() {
        let face = fixture_typeface();
        let mut plain = RgbaImage::new(160, 120);
        face.draw(&mut plain, "1", 50, 90, &fill_style(60.0));

        let stroked_style = TextStyle {
            px: 60.0,
            fill: Rgba([255, 255, 255, 255]),
            stroke: Some(Stroke {
                color: Rgba([255, 0, 0, 255]),
                width: 10.0,
            }),
            shadow: None,
        };
        let mut stroked = RgbaImage::new(160, 120);
        face.draw(&mut stroked, "1", 50, 90, &stroked_style);

        // the dilated stroke silhouette covers strictly more ground
        assert!(opaque_count(&stroked) > opaque_count(&plain));
        // and somewhere the stroke color survives un-overdrawn by the fill
        assert!(stroked
            .pixels()
            .any(|p| p[0] > 200 && p[1] < 50 && p[2] < 50 && p[3] > 200));
    }

    #[test]
    fn test_shadow_pass_extends_past_the_fill() {
        let face = fixture_typeface();
        let mut plain = RgbaImage::new(160, 120);
        face.draw(&mut plain, "W", 40, 80, &fill_style(40.0));

        let shadowed_style = TextStyle {
            px: 40.0,
            fill: Rgba([255, 255, 255, 255]),
            stroke: None,
            shadow: Some(Shadow {
                offset: (2, 1),
                blur: 2,
                color: Rgba([0, 0, 0, 255]),
            }),
        };
        let mut shadowed = RgbaImage::new(160, 120);
        face.draw(&mut shadowed, "W", 40, 80, &shadowed_style);

        let right_edge = |canvas: &RgbaImage| {
            canvas
                .enumerate_pixels()
                .filter(|(_, _, p)| p[3] > 0)
                .map(|(x, _, _)| x)
                .max()
                .unwrap()
        };
        // blur + offset push coverage past the plain fill's right edge
        assert!(right_edge(&shadowed) > right_edge(&plain));
        assert!(opaque_count(&shadowed) > opaque_count(&plain));
    }

    #[test]
    fn test_draw_is_deterministic() {
        let face = fixture_typeface();
        let style = fill_style(30.0);
        let mut a = RgbaImage::new(200, 60);
        let mut b = RgbaImage::new(200, 60);
        face.draw(&mut a, "Da Vinci", 5, 45, &style);
        face.draw(&mut b, "Da Vinci", 5, 45, &style);
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
