//! Cover-fit, center-crop, and mask compositing primitives.

use image::{imageops, imageops::FilterType, RgbImage};

use crate::detector::{BoundingBox, Mask};

/// Compute the cover-fit dimensions for a source image over a target box.
///
/// The source keeps its aspect ratio and is scaled just enough to cover the
/// box on both axes: the tighter axis matches the box exactly and the other
/// one overhangs, to be trimmed by [`center_crop`]. The returned dimensions
/// are always >= the box dimensions.
pub fn fit_dimensions(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    let src_aspect = f64::from(src_w) / f64::from(src_h);
    let box_aspect = f64::from(box_w) / f64::from(box_h);

    if src_aspect > box_aspect {
        // Source is wider than the box; height is the tight axis
        let new_h = box_h;
        let new_w = (f64::from(new_h) * src_aspect).round() as u32;
        (new_w.max(box_w), new_h)
    } else {
        let new_w = box_w;
        let new_h = (f64::from(new_w) / src_aspect).round() as u32;
        (new_w, new_h.max(box_h))
    }
}

/// Resize the source to cover a box of the given dimensions, preserving
/// aspect ratio. Lanczos resampling, as quality matters more than speed for
/// a single still image.
pub fn fit_to_box(source: &RgbImage, box_w: u32, box_h: u32) -> RgbImage {
    let (new_w, new_h) = fit_dimensions(source.width(), source.height(), box_w, box_h);
    imageops::resize(source, new_w, new_h, FilterType::Lanczos3)
}

/// Crop symmetric margins so exactly `box_w` x `box_h` pixels remain,
/// centered on the input. When an axis already matches the box the offset
/// on that axis is zero.
pub fn center_crop(image: &RgbImage, box_w: u32, box_h: u32) -> RgbImage {
    let crop_left = (image.width() - box_w) / 2;
    let crop_top = (image.height() - box_h) / 2;
    imageops::crop_imm(image, crop_left, crop_top, box_w, box_h).to_image()
}

/// Composite the cropped source into the template through the mask.
///
/// The cropped source is pasted at the bounding box's top-left corner on a
/// template-sized canvas; the output takes the canvas pixel where the mask
/// is set and the template pixel elsewhere. Hard binary select, no edge
/// blending.
pub fn composite(
    template: &RgbImage,
    mask: &Mask,
    bbox: BoundingBox,
    cropped: &RgbImage,
) -> RgbImage {
    let mut canvas = RgbImage::new(template.width(), template.height());
    imageops::replace(&mut canvas, cropped, i64::from(bbox.left), i64::from(bbox.upper));

    RgbImage::from_fn(template.width(), template.height(), |x, y| {
        if mask.get(x, y) {
            *canvas.get_pixel(x, y)
        } else {
            *template.get_pixel(x, y)
        }
    })
}
