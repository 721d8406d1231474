//! # Placeholder Region Detection
//!
//! Finds the solid-color placeholder region in a template image. The
//! dominant color is the most frequent exact RGB triple in the template; the
//! mask marks every pixel whose Euclidean RGB distance to that color is
//! below a tolerance, and the mask's bounding box is the region the source
//! image will be composited into.

pub mod types;

pub use types::{BoundingBox, Mask};

use std::collections::HashMap;

use image::{imageops, Rgb, RgbImage};
use tracing::debug;

use crate::{
    config::DetectorConfig,
    error::{DetectorError, Result},
};

/// Sigma for the optional mask-smoothing blur
const SMOOTHING_SIGMA: f32 = 2.0;

/// Find the most frequent exact RGB triple in the image.
///
/// Ties are broken arbitrarily: whichever maximal-count color the frequency
/// map yields first wins. Callers that need determinism on ties must not
/// rely on which one they get.
pub fn dominant_color(image: &RgbImage) -> Result<Rgb<u8>> {
    if image.width() == 0 || image.height() == 0 {
        return Err(DetectorError::EmptyImage.into());
    }

    let mut counts: HashMap<[u8; 3], u64> = HashMap::new();
    for pixel in image.pixels() {
        *counts.entry(pixel.0).or_insert(0) += 1;
    }

    let (color, count) = counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .ok_or(DetectorError::EmptyImage)?;

    debug!("Dominant color {:?} covers {} pixels", color, count);
    Ok(Rgb(color))
}

/// Euclidean distance between two RGB triples
fn color_distance(a: Rgb<u8>, b: Rgb<u8>) -> f64 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Build the placeholder mask for a template image.
///
/// A pixel is part of the mask iff its distance to `dominant` is strictly
/// below `config.threshold`. With `smooth_mask_edges` enabled the raw mask
/// is blurred and re-thresholded, trading the hard edge for a rounder
/// region; the default leaves the mask untouched.
pub fn build_mask(image: &RgbImage, dominant: Rgb<u8>, config: &DetectorConfig) -> Mask {
    let data = image
        .pixels()
        .map(|&pixel| color_distance(pixel, dominant) < config.threshold)
        .collect();

    // pixels() iterates row-major, so the flat buffer lines up
    let mask = Mask::from_raw(image.width(), image.height(), data)
        .expect("pixel count matches image dimensions");

    if !config.smooth_mask_edges {
        return mask;
    }

    debug!("Smoothing mask edges (sigma {})", SMOOTHING_SIGMA);
    let blurred = imageops::blur(&mask.to_gray(), SMOOTHING_SIGMA);
    Mask::from_gray(&blurred)
}
