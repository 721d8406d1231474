use image::GrayImage;

/// Binary per-pixel map marking which template pixels belong to the
/// placeholder region
///
/// Stored as a flat boolean array in row-major order, the same dimensions as
/// the template it was derived from. A mask is never mutated after creation;
/// the optional edge-smoothing pass produces a new mask instead.
#[derive(Clone, Debug)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl Mask {
    /// Create a mask from a flat row-major boolean buffer
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<bool>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// Get the width of the mask
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height of the mask
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at the given coordinates is part of the region
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Number of true pixels
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&set| set).count()
    }

    /// Render the mask as an 8-bit grayscale image (0 or 255 per pixel)
    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            image::Luma([if self.get(x, y) { 255u8 } else { 0u8 }])
        })
    }

    /// Rebuild a mask from a grayscale raster, treating intensity >= 128 as
    /// set. Inverse of [`to_gray`](Self::to_gray) modulo the cutoff.
    pub fn from_gray(gray: &GrayImage) -> Self {
        let data = gray.pixels().map(|p| p.0[0] >= 128).collect();
        Self {
            width: gray.width(),
            height: gray.height(),
            data,
        }
    }

    /// Tightest axis-aligned rectangle containing all true pixels, or `None`
    /// when the mask is empty
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;

        for y in 0..self.height {
            for x in 0..self.width {
                if !self.get(x, y) {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((min_x, min_y, max_x, max_y)) => {
                        (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
                    }
                });
            }
        }

        bounds.map(|(min_x, min_y, max_x, max_y)| BoundingBox {
            left: min_x,
            upper: min_y,
            right: max_x + 1,
            lower: max_y + 1,
        })
    }
}

/// Axis-aligned rectangle in image coordinates
///
/// `right` and `lower` are exclusive: a single true pixel at (10, 10) yields
/// the box (10, 10, 11, 11), so `width()` and `height()` are plain
/// differences. Invariant: `right > left` and `lower > upper`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub upper: u32,
    pub right: u32,
    pub lower: u32,
}

impl BoundingBox {
    /// Width of the box in pixels
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Height of the box in pixels
    pub fn height(&self) -> u32 {
        self.lower - self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_mask(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> Mask {
        let mut data = vec![false; (width * height) as usize];
        for y in y0..=y1 {
            for x in x0..=x1 {
                data[(y * width + x) as usize] = true;
            }
        }
        Mask::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn test_bounding_box_of_rectangle() {
        // True pixels span x 10..=50, y 10..=80; exclusive bounds
        let mask = rect_mask(100, 100, 10, 10, 50, 80);
        let bbox = mask.bounding_box().unwrap();
        assert_eq!(bbox, BoundingBox { left: 10, upper: 10, right: 51, lower: 81 });
        assert_eq!(bbox.width(), 41);
        assert_eq!(bbox.height(), 71);
    }

    #[test]
    fn test_bounding_box_single_pixel() {
        let mask = rect_mask(20, 20, 7, 3, 7, 3);
        let bbox = mask.bounding_box().unwrap();
        assert_eq!(bbox, BoundingBox { left: 7, upper: 3, right: 8, lower: 4 });
        assert!(bbox.right > bbox.left);
        assert!(bbox.lower > bbox.upper);
    }

    #[test]
    fn test_empty_mask_has_no_bounding_box() {
        let mask = Mask::from_raw(10, 10, vec![false; 100]).unwrap();
        assert!(mask.bounding_box().is_none());
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        assert!(Mask::from_raw(10, 10, vec![false; 99]).is_none());
    }

    #[test]
    fn test_gray_roundtrip() {
        let mask = rect_mask(16, 16, 2, 2, 9, 5);
        let roundtripped = Mask::from_gray(&mask.to_gray());
        assert_eq!(roundtripped.count(), mask.count());
        assert_eq!(roundtripped.bounding_box(), mask.bounding_box());
    }
}
