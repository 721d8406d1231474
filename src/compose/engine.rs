use std::path::Path;

use image::RgbImage;
use tracing::{debug, info};

use crate::{
    compose::fit,
    config::Config,
    detector::{self, BoundingBox, Mask},
    error::{DetectorError, Result},
    text::TextRenderer,
};

/// Main composition engine that orchestrates the template replacement
///
/// The pipeline is strictly linear:
/// 1. Load - decode template and source images as RGB
/// 2. Detect - find the template's dominant color and build the mask
/// 3. Fit - cover-fit and center-crop the source to the mask's bounding box
/// 4. Composite - hard mask select between fitted source and template
/// 5. Overlay - draw the centered text block
/// 6. Save - write the result, format inferred from the output extension
///
/// Every failure aborts the run at the point of occurrence; nothing is
/// written on a failed run.
pub struct CompositionEngine {
    config: Config,
}

impl CompositionEngine {
    /// Create a new composition engine with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the full pipeline and write the result to `output_path`
    pub fn compose<P: AsRef<Path>>(
        &self,
        template_path: P,
        source_path: P,
        output_path: P,
        text: &str,
    ) -> Result<()> {
        let template_path = template_path.as_ref();
        let source_path = source_path.as_ref();
        let output_path = output_path.as_ref();

        info!("Starting composition");
        info!("   Template: {:?}", template_path);
        info!("   Source: {:?}", source_path);
        info!("   Output: {:?}", output_path);

        // The font is a configuration contract; resolve it before doing any
        // pixel work so a bad environment fails fast.
        let renderer = TextRenderer::from_config(&self.config.text)?;

        // Step 1: Load
        let template = self.load_rgb(template_path)?;
        let source = self.load_rgb(source_path)?;

        // Step 2: Detect the placeholder region
        let (mask, bbox) = self.detect_region(&template)?;

        // Step 3 + 4: Fit the source and composite through the mask
        let composited = self.fit_and_composite(&template, &source, &mask, bbox);

        // Step 5: Overlay the text block
        let result = renderer.overlay(&composited, text);

        // Step 6: Save
        result.save(output_path)?;
        info!("Composition complete! Output saved to: {:?}", output_path);

        Ok(())
    }

    /// Decode an image file into an RGB8 buffer
    fn load_rgb(&self, path: &Path) -> Result<RgbImage> {
        debug!("Loading image from {:?}", path);
        let image = image::open(path)?.to_rgb8();
        debug!("   {}x{} pixels", image.width(), image.height());
        Ok(image)
    }

    /// Find the dominant color and derive the placeholder mask.
    ///
    /// An empty mask means the template has no solid placeholder region;
    /// that halts the pipeline without producing output.
    fn detect_region(&self, template: &RgbImage) -> Result<(Mask, BoundingBox)> {
        info!("Detecting placeholder region...");

        let dominant = detector::dominant_color(template)?;
        info!("   Dominant color: {:?}", dominant.0);

        let mask = detector::build_mask(template, dominant, &self.config.detector);
        let bbox = mask.bounding_box().ok_or(DetectorError::NoMatchRegion {
            dominant: dominant.0,
            threshold: self.config.detector.threshold,
        })?;

        info!(
            "   Region: ({}, {})-({}, {}), {} matching pixels",
            bbox.left,
            bbox.upper,
            bbox.right,
            bbox.lower,
            mask.count()
        );
        Ok((mask, bbox))
    }

    /// Cover-fit the source over the bounding box, center-crop to exact box
    /// dimensions, and composite into the template through the mask
    fn fit_and_composite(
        &self,
        template: &RgbImage,
        source: &RgbImage,
        mask: &Mask,
        bbox: BoundingBox,
    ) -> RgbImage {
        info!("Fitting source over {}x{} region...", bbox.width(), bbox.height());

        let fitted = fit::fit_to_box(source, bbox.width(), bbox.height());
        debug!("   Resized source to {}x{}", fitted.width(), fitted.height());

        let cropped = fit::center_crop(&fitted, bbox.width(), bbox.height());
        fit::composite(template, mask, bbox, &cropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::tempdir;

    /// The reference scenario: a 200x200 red template with a 50x50 green
    /// placeholder square at (75,75)
    fn reference_template() -> RgbImage {
        let mut template = RgbImage::from_pixel(200, 200, Rgb([255, 0, 0]));
        for y in 75..125 {
            for x in 75..125 {
                template.put_pixel(x, y, Rgb([0, 255, 0]));
            }
        }
        template
    }

    #[test]
    fn test_detect_region_reference_scenario() {
        let engine = CompositionEngine::new(Config::default());
        let template = reference_template();

        let (mask, bbox) = engine.detect_region(&template).unwrap();
        // Red dominates; the mask covers everything except the green square
        assert_eq!(mask.count(), 200 * 200 - 50 * 50);
        assert_eq!(bbox, BoundingBox { left: 0, upper: 0, right: 200, lower: 200 });
    }

    #[test]
    fn test_detect_region_solid_template_matches_everywhere() {
        // Every pixel of a solid template matches its own dominant color at
        // distance zero, so the mask spans the whole image
        let engine = CompositionEngine::new(Config::default());

        let template = RgbImage::from_pixel(10, 10, Rgb([5, 5, 5]));
        let (mask, bbox) = engine.detect_region(&template).unwrap();
        assert_eq!(mask.count(), 100);
        assert_eq!(bbox, BoundingBox { left: 0, upper: 0, right: 10, lower: 10 });
    }

    #[test]
    fn test_empty_mask_maps_to_no_match_error() {
        let engine = CompositionEngine::new(Config::default());
        let template = reference_template();

        let mask = detector::build_mask(
            &template,
            Rgb([0, 0, 255]), // nothing in the template is near blue
            &engine.config.detector,
        );
        assert!(mask.bounding_box().is_none());

        let err: crate::error::CompositorError = DetectorError::NoMatchRegion {
            dominant: [0, 0, 255],
            threshold: engine.config.detector.threshold,
        }
        .into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.user_message(), "No dominant color area found.");
    }

    #[test]
    fn test_fit_and_composite_reference_scenario() {
        let engine = CompositionEngine::new(Config::default());
        let template = reference_template();
        let source = RgbImage::from_pixel(300, 100, Rgb([0, 0, 255]));

        // Restrict the region to the green square for this test
        let mut data = vec![false; 200 * 200];
        for y in 75..125 {
            for x in 75..125 {
                data[y * 200 + x] = true;
            }
        }
        let mask = Mask::from_raw(200, 200, data).unwrap();
        let bbox = mask.bounding_box().unwrap();
        assert_eq!(bbox, BoundingBox { left: 75, upper: 75, right: 125, lower: 125 });

        let result = engine.fit_and_composite(&template, &source, &mask, bbox);
        assert_eq!((result.width(), result.height()), (200, 200));

        // Outside the box: untouched template
        assert_eq!(*result.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*result.get_pixel(74, 75), Rgb([255, 0, 0]));
        assert_eq!(*result.get_pixel(125, 125), Rgb([255, 0, 0]));
        // Inside the box: source pixels
        assert_eq!(*result.get_pixel(75, 75), Rgb([0, 0, 255]));
        assert_eq!(*result.get_pixel(100, 100), Rgb([0, 0, 255]));
        assert_eq!(*result.get_pixel(124, 124), Rgb([0, 0, 255]));
    }

    #[test]
    fn test_compose_aborts_on_missing_font_without_output() {
        let dir = tempdir().unwrap();
        let template_path = dir.path().join("template.png");
        let source_path = dir.path().join("source.png");
        let output_path = dir.path().join("out.png");

        reference_template().save(&template_path).unwrap();
        RgbImage::from_pixel(300, 100, Rgb([0, 0, 255]))
            .save(&source_path)
            .unwrap();

        let mut config = Config::default();
        config.text.font_path = dir.path().join("missing.otf");
        let engine = CompositionEngine::new(config);

        let err = engine
            .compose(&template_path, &source_path, &output_path, "A\\nB")
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(!output_path.exists(), "no output may be written on failure");
    }

    #[test]
    fn test_load_rgb_propagates_unreadable_file() {
        let dir = tempdir().unwrap();
        let engine = CompositionEngine::new(Config::default());

        let err = engine.load_rgb(&dir.path().join("nope.png")).unwrap_err();
        assert_eq!(err.exit_code(), 6);
    }
}
