//! Cell validity detection - deciding whether a grid cell holds real artwork

use image::RgbaImage;

/// Alpha threshold separating real artwork from semi-transparent noise
const ALPHA_THRESHOLD: u8 = 127;

/// Returns true if the cell contains any pixel more than 50% opaque.
///
/// Expression sheets carry faint semi-transparent artifacts in empty
/// slots, so an `alpha > 0` test would produce false positives. Scan
/// order is irrelevant; the check short-circuits on the first hit.
pub fn contains_sprite_data(cell: &RgbaImage) -> bool {
    cell.pixels().any(|p| p[3] > ALPHA_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_fully_opaque_cell_is_valid() {
        let cell = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        assert!(contains_sprite_data(&cell));
    }

    #[test]
    fn test_fully_transparent_cell_is_invalid() {
        let cell = RgbaImage::new(4, 4);
        assert!(!contains_sprite_data(&cell));
    }

    #[test]
    fn test_alpha_127_everywhere_is_invalid() {
        // exactly 50% opacity never counts as artwork
        let cell = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 127]));
        assert!(!contains_sprite_data(&cell));
    }

    #[test]
    fn test_single_pixel_at_alpha_128_is_valid() {
        let mut cell = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        cell.put_pixel(3, 2, Rgba([10, 20, 30, 128]));
        assert!(contains_sprite_data(&cell));
    }

    #[test]
    fn test_low_alpha_noise_is_invalid() {
        let mut cell = RgbaImage::new(8, 8);
        cell.put_pixel(0, 0, Rgba([255, 255, 255, 3]));
        cell.put_pixel(5, 5, Rgba([128, 128, 128, 60]));
        assert!(!contains_sprite_data(&cell));
    }

    #[test]
    fn test_empty_image_is_invalid() {
        let cell = RgbaImage::new(0, 0);
        assert!(!contains_sprite_data(&cell));
    }
}
