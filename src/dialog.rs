//! Dialog screen composition
//!
//! Layers the body sprite, an optional expression override, the dialog-box
//! chrome, a dynamically sized nametag and up to two lines of shadowed
//! text into one fixed-size raster. Each request allocates its own
//! canvases; nothing is shared or retained between compositions.

use crate::assets::DialogArt;
use crate::error::{DialogError, Warning};
use crate::indexer::ExpressionCell;
use crate::raster;
use crate::text::{wrap_dialog_text, Shadow, TextRenderer, TextStyle, UI_TEXT_FILL};
use image::{Rgba, RgbaImage};

/// Dialog screen metrics, measured from in-game screenshots.
pub mod metrics {
    /// Canvas size
    pub const WIDTH: u32 = 1024;
    pub const HEIGHT: u32 = 575;
    /// Wrap width for dialog text; adjusted measurement to compensate for
    /// letter spacing (proper value: 855)
    pub const TEXT_WIDTH: f32 = 860.0;
    /// Dialog box position
    pub const BOX_X: i32 = 0;
    pub const BOX_Y: i32 = 389;
    /// Text lines; x adjusted like TEXT_WIDTH (proper value: 72)
    pub const BOX_TEXT_X: i32 = 70;
    pub const BOX_TEXT1_Y: i32 = 490;
    pub const BOX_TEXT2_Y: i32 = 540;
    /// Speaker name
    pub const NAME_X: i32 = 27;
    pub const NAME_Y: i32 = 425;
    /// Nametag background, anchored with the box
    pub const NAMETAG_X: i32 = NAME_X;
    pub const NAMETAG_Y: i32 = BOX_Y;
    /// Nametags keep this width even for two-letter names
    pub const NAMETAG_WIDTH_MIN: f32 = 214.0;
    /// Font size for name and dialog text
    pub const TEXT_PX: f32 = 30.0;
    /// The chrome is drawn at 85% opacity
    pub const CHROME_ALPHA: f32 = 0.85;
}

/// One dialog composition request. Caller-owned, consumed once.
pub struct DialogRequest<'a> {
    /// Full source sheet; only `[0, 0, body_width, body_height]` is drawn
    pub sheet: &'a RgbaImage,
    pub body_width: u32,
    pub body_height: u32,
    /// Top-left corner of the default face on the body
    pub head_x: i32,
    pub head_y: i32,
    /// Expression cell size; the head slot has the same dimensions
    pub expr_width: u32,
    pub expr_height: u32,
    pub dialog_offset_x: i32,
    pub dialog_offset_y: i32,
    /// 0 = default grid-expression layout; non-zero sheets never swap
    pub special_format: i32,
    pub name: &'a str,
    pub expression: Option<&'a ExpressionCell>,
    pub text: &'a str,
}

/// Compose the final dialog screen.
///
/// Returns the flattened 1024x575 raster and any diagnostics (currently
/// only the dropped-text warning; overflow is truncated, never an error).
/// Fatal failures (size-mismatched expression buffers) abort the request
/// with no partial output.
pub fn compose_dialog(
    request: &DialogRequest<'_>,
    art: &DialogArt,
    text: &impl TextRenderer,
) -> Result<(RgbaImage, Vec<Warning>), DialogError> {
    let mut warnings = Vec::new();
    let mut canvas = RgbaImage::new(metrics::WIDTH, metrics::HEIGHT);

    // Center the body horizontally, then apply the sheet's own offsets.
    let offset_x = request.dialog_offset_x
        + (metrics::WIDTH as i32 - request.body_width as i32).div_euclid(2);
    let offset_y = request.dialog_offset_y;
    raster::copy_region(
        &mut canvas,
        request.sheet,
        0,
        0,
        request.body_width,
        request.body_height,
        offset_x,
        offset_y,
    );

    // Swap in the selected expression. Exact pixel replace, never a
    // blended draw: sheet art is pre-composited, blending would
    // double-apply alpha.
    if request.special_format == 0 {
        if let Some(cell) = request.expression {
            let (cw, ch) = cell.pixels.dimensions();
            if (cw, ch) != (request.expr_width, request.expr_height) {
                return Err(DialogError::ExpressionSizeMismatch {
                    expected_w: request.expr_width,
                    expected_h: request.expr_height,
                    actual_w: cw,
                    actual_h: ch,
                });
            }
            let head_x = request.head_x + offset_x;
            let head_y = request.head_y + offset_y;
            raster::clear_rect(
                &mut canvas,
                head_x,
                head_y,
                request.expr_width,
                request.expr_height,
            );
            raster::copy_region(
                &mut canvas,
                &cell.pixels,
                0,
                0,
                request.expr_width,
                request.expr_height,
                head_x,
                head_y,
            );
        }
    }

    // The chrome gets its own canvas: the nametag uses clear_rect, which
    // must not punch holes into the body layer.
    let mut overlay = RgbaImage::new(metrics::WIDTH, metrics::HEIGHT);
    raster::blit(
        &mut overlay,
        &art.dialog_box,
        metrics::BOX_X,
        metrics::BOX_Y,
        metrics::CHROME_ALPHA,
    );

    // Nametag sized to the name, with a floor for very short names.
    let name_width = text
        .measure(request.name, metrics::TEXT_PX)
        .max(metrics::NAMETAG_WIDTH_MIN);
    let tag_width = name_width.ceil() as i32;
    raster::clear_rect(
        &mut overlay,
        metrics::NAMETAG_X,
        metrics::NAMETAG_Y,
        tag_width as u32 + art.nametag_end.width(),
        art.nametag_mid.height(),
    );
    // Tile the mid segment one pixel column per step, then cap it.
    for i in 0..tag_width {
        raster::blit(
            &mut overlay,
            &art.nametag_mid,
            metrics::NAMETAG_X + i,
            metrics::NAMETAG_Y,
            metrics::CHROME_ALPHA,
        );
    }
    raster::blit(
        &mut overlay,
        &art.nametag_end,
        metrics::NAMETAG_X + tag_width,
        metrics::NAMETAG_Y,
        metrics::CHROME_ALPHA,
    );

    let style = TextStyle {
        px: metrics::TEXT_PX,
        fill: UI_TEXT_FILL,
        stroke: None,
        shadow: Some(Shadow {
            offset: (2, 1),
            blur: 2,
            color: Rgba([0, 0, 0, 255]),
        }),
    };
    text.draw(
        &mut overlay,
        request.name,
        metrics::NAME_X,
        metrics::NAME_Y,
        &style,
    );

    let (lines, dropped) = wrap_dialog_text(request.text, metrics::TEXT_WIDTH, |s| {
        text.measure(s, metrics::TEXT_PX)
    });
    if dropped {
        warnings.push(Warning::new(
            "Dialog text is too long for two lines, dropping the remainder",
        ));
    }
    text.draw(
        &mut overlay,
        &lines[0],
        metrics::BOX_TEXT_X,
        metrics::BOX_TEXT1_Y,
        &style,
    );
    if let Some(line2) = lines.get(1) {
        text.draw(
            &mut overlay,
            line2,
            metrics::BOX_TEXT_X,
            metrics::BOX_TEXT2_Y,
            &style,
        );
    }

    raster::composite_over(&mut canvas, &overlay);
    Ok((canvas, warnings))
}
