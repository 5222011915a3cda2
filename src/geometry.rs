//! Sheet geometry - reverse-engineering the expression grid from pixel dimensions
//!
//! Sheet authors do not encode an explicit grid layout anywhere; the cell
//! grid below the body pose has to be inferred from raw pixel dimensions.

use crate::error::DialogError;

/// Cell dimensions of a sheet's expression grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressionGrid {
    pub cell_width: u32,
    pub cell_height: u32,
}

/// Pixel dimensions of a character sheet.
///
/// `grid` is `None` for sheets that carry no expression grid at all
/// (single-pose art, special formats). Computed once per sheet, immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetGeometry {
    pub sheet_width: u32,
    pub sheet_height: u32,
    pub body_width: u32,
    pub body_height: u32,
    pub grid: Option<ExpressionGrid>,
}

/// Derived shape of the candidate cell grid.
///
/// `rows * cols` is the candidate-cell count, not the final expression
/// count: empty cells are skipped later by the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Vertical gap between the body region and the first grid row,
    /// always `0 <= padding < cell_height`
    pub padding: u32,
    pub rows: u32,
    pub cols: u32,
}

impl SheetGeometry {
    /// Derive the grid layout for this sheet.
    ///
    /// Fails with [`DialogError::InvalidGeometry`] when the sheet has no
    /// grid, a cell dimension is zero, or the body is taller than the
    /// sheet. Callers downgrade that to "no expressions", never retry.
    pub fn layout(&self) -> Result<GridLayout, DialogError> {
        let grid = self
            .grid
            .ok_or_else(|| DialogError::InvalidGeometry("sheet has no expression grid".into()))?;
        grid_layout(
            self.sheet_width,
            self.sheet_height,
            self.body_height,
            grid.cell_width,
            grid.cell_height,
        )
    }
}

/// Infer the expression grid shape from sheet and body dimensions.
///
/// The padding is whatever vertical space below the body does not divide
/// evenly into cell rows. A partial trailing column only counts when its
/// remainder covers more than half a cell width; anything narrower is
/// treated as edge noise.
pub fn grid_layout(
    sheet_width: u32,
    sheet_height: u32,
    body_height: u32,
    cell_width: u32,
    cell_height: u32,
) -> Result<GridLayout, DialogError> {
    if cell_width == 0 || cell_height == 0 {
        return Err(DialogError::InvalidGeometry(format!(
            "cell dimensions {}x{} contain a zero",
            cell_width, cell_height
        )));
    }
    let free_height = sheet_height.checked_sub(body_height).ok_or_else(|| {
        DialogError::InvalidGeometry(format!(
            "body height {} exceeds sheet height {}",
            body_height, sheet_height
        ))
    })?;

    let padding = free_height % cell_height;
    let rows = (free_height - padding).div_ceil(cell_height);
    // remainder > cell_width * 0.5, in exact integer arithmetic
    let cols = if 2 * (sheet_width % cell_width) > cell_width {
        sheet_width.div_ceil(cell_width)
    } else {
        sheet_width / cell_width
    };

    Ok(GridLayout { padding, rows, cols })
}
