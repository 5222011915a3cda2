//! Expression indexing - extracting and numbering the sprites of a sheet's
//! expression grid
//!
//! Produces a dense, ordered catalog of the cells that hold real artwork
//! plus a preview image with display numbers stamped onto it for the
//! caller's selection prompt. Raster cell index and catalog index diverge
//! whenever empty cells are skipped.

use crate::detect::contains_sprite_data;
use crate::error::DialogError;
use crate::geometry::SheetGeometry;
use crate::raster;
use crate::text::{Stroke, TextRenderer, TextStyle, UI_TEXT_FILL};
use image::{Rgba, RgbaImage};

/// Font size of the display numbers stamped onto the preview image
const STAMP_PX: f32 = 60.0;

/// Position and size of a cell within the cropped grid region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// One extracted expression sprite.
#[derive(Debug, Clone)]
pub struct ExpressionCell {
    /// 0-based raster position in the candidate grid
    pub cell_index: u32,
    /// Bounding box within the cropped grid region
    pub bounds: CellRect,
    /// Owned pixel buffer, exactly cell-sized
    pub pixels: RgbaImage,
}

/// The numbered, dense catalog of a sheet's expressions.
#[derive(Debug, Clone)]
pub struct ExpressionCatalog {
    /// Cropped grid region with display numbers stamped on valid cells
    pub preview: RgbaImage,
    /// Ordered cells; display index = position + 1
    pub cells: Vec<ExpressionCell>,
}

impl ExpressionCatalog {
    /// Catalog for a sheet without a grid: no cells, and since the preview
    /// is defined as the cropped grid area, a zero-sized preview.
    fn empty() -> Self {
        Self {
            preview: RgbaImage::new(0, 0),
            cells: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Resolve a caller-picked display index.
    ///
    /// `0` is the explicit "use the default expression" choice and yields
    /// `None`; `1..=len` yields that cell. Anything past the catalog is
    /// rejected before any drawing happens so the caller can re-prompt.
    pub fn select(&self, index: usize) -> Result<Option<&ExpressionCell>, DialogError> {
        if index == 0 {
            return Ok(None);
        }
        match self.cells.get(index - 1) {
            Some(cell) => Ok(Some(cell)),
            None => Err(DialogError::SelectionOutOfRange {
                index,
                len: self.cells.len(),
            }),
        }
    }
}

/// Index the expression grid of a sheet.
///
/// Sheets without a grid produce an empty catalog, not an error; the same
/// holds when the geometry degenerates (zero cells). Catalog order is
/// row-major over the grid and reproducible for identical inputs.
pub fn index_expressions(
    sheet: &RgbaImage,
    geometry: &SheetGeometry,
    text: &impl TextRenderer,
) -> Result<ExpressionCatalog, DialogError> {
    let style = stamp_style();
    index_expressions_with(sheet, geometry, |preview, number, cell_x, cell_y| {
        // offsets tuned so the numeral sits inside the cell's top-left
        let x = cell_x + (STAMP_PX * 0.30) as i32;
        let y = cell_y + (STAMP_PX * 1.25) as i32;
        text.draw(preview, &number.to_string(), x, y, &style);
    })
}

/// Outline stroke plus fill keeps the numerals legible against arbitrary
/// sprite colors.
fn stamp_style() -> TextStyle {
    TextStyle {
        px: STAMP_PX,
        fill: UI_TEXT_FILL,
        stroke: Some(Stroke {
            color: Rgba([0, 0, 0, 255]),
            width: 10.0,
        }),
        shadow: None,
    }
}

/// Indexing core with the number stamping injected, so catalog logic is
/// testable without a font.
///
/// `stamp` receives the preview canvas, the 1-based display number and the
/// cell's top-left corner in preview coordinates. Cells are extracted
/// before their own stamp lands, but stamps of earlier cells are part of
/// the shared preview any later extraction reads from.
pub fn index_expressions_with(
    sheet: &RgbaImage,
    geometry: &SheetGeometry,
    mut stamp: impl FnMut(&mut RgbaImage, usize, i32, i32),
) -> Result<ExpressionCatalog, DialogError> {
    let Some(grid) = geometry.grid else {
        return Ok(ExpressionCatalog::empty());
    };
    let layout = match geometry.layout() {
        Ok(layout) => layout,
        // degenerate geometry means "no expressions", not a failure
        Err(DialogError::InvalidGeometry(_)) => return Ok(ExpressionCatalog::empty()),
        Err(e) => return Err(e),
    };

    // Crop everything below body + padding into a fresh preview canvas.
    let grid_height = geometry.sheet_height - geometry.body_height - layout.padding;
    if grid_height == 0 || geometry.sheet_width == 0 {
        return Ok(ExpressionCatalog::empty());
    }
    let mut preview = RgbaImage::new(geometry.sheet_width, grid_height);
    raster::copy_region(
        &mut preview,
        sheet,
        0,
        geometry.body_height + layout.padding,
        geometry.sheet_width,
        grid_height,
        0,
        0,
    );

    let mut cells = Vec::new();
    for cell_index in 0..layout.rows * layout.cols {
        let x = grid.cell_width * (cell_index % layout.cols);
        let y = grid.cell_height * (cell_index / layout.cols);

        // Cells hanging over the preview edge read as transparent padding,
        // so the buffer is always exactly cell-sized.
        let mut pixels = RgbaImage::new(grid.cell_width, grid.cell_height);
        raster::copy_region(
            &mut pixels,
            &preview,
            x,
            y,
            grid.cell_width,
            grid.cell_height,
            0,
            0,
        );

        if contains_sprite_data(&pixels) {
            cells.push(ExpressionCell {
                cell_index,
                bounds: CellRect {
                    x,
                    y,
                    w: grid.cell_width,
                    h: grid.cell_height,
                },
                pixels,
            });
            stamp(&mut preview, cells.len(), x as i32, y as i32);
        }
    }

    Ok(ExpressionCatalog { preview, cells })
}
