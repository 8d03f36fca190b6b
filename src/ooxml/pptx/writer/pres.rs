/// Presentation writer for PPTX.
use crate::common::unit::pt_to_emu_f64;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::config::AnimationOptions;
use std::fmt::Write as FmtWrite;

use super::slide::MutableSlide;

/// A mutable PowerPoint presentation for writing and modification.
///
/// The slide size is the canvas of the [`AnimationOptions`] every slide is
/// created with.
#[derive(Debug)]
pub struct MutablePresentation {
    /// Slides in the presentation
    pub(crate) slides: Vec<MutableSlide>,
    options: AnimationOptions,
    /// Whether the presentation has been modified
    modified: bool,
}

impl MutablePresentation {
    /// Create a new empty presentation with default dimensions.
    ///
    /// Default size is 10" x 7.5" (standard 4:3 aspect ratio).
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            options: AnimationOptions::default(),
            modified: false,
        }
    }

    /// Create a presentation whose slides use `options`.
    pub fn with_options(options: AnimationOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::new()
        })
    }

    pub fn options(&self) -> &AnimationOptions {
        &self.options
    }

    /// Add a new slide to the presentation.
    pub fn add_slide(&mut self) -> Result<&mut MutableSlide> {
        let index = self.slides.len();
        let slide_id = u32::try_from(index + 256)
            .map_err(|_| OoxmlError::Config(format!("too many slides: {index}")))?;
        self.slides
            .push(MutableSlide::new(slide_id, self.options.clone()));
        self.modified = true;
        Ok(&mut self.slides[index])
    }

    /// Get the number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Get a mutable reference to a slide by index (0-based).
    pub fn slide_mut(&mut self, index: usize) -> Option<&mut MutableSlide> {
        self.slides.get_mut(index)
    }

    /// Get the slide width in EMUs.
    pub fn slide_width(&self) -> i64 {
        pt_to_emu_f64(self.options.canvas_width)
    }

    /// Get the slide height in EMUs.
    pub fn slide_height(&self) -> i64 {
        pt_to_emu_f64(self.options.canvas_height)
    }

    /// Check if the presentation has been modified.
    pub fn is_modified(&self) -> bool {
        self.modified || self.slides.iter().any(|s| s.is_modified())
    }

    /// Generate presentation.xml content.
    ///
    /// The slide master takes `rId1`; slides follow from `rId2` in order.
    pub fn generate_presentation_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(2048);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);

        xml.push_str("<p:sldMasterIdLst>");
        xml.push_str(r#"<p:sldMasterId id="2147483648" r:id="rId1"/>"#);
        xml.push_str("</p:sldMasterIdLst>");

        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (index, slide) in self.slides.iter().enumerate() {
                write!(
                    xml,
                    r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                    slide.slide_id(),
                    index + 2
                )?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/>"#,
            self.slide_width(),
            self.slide_height()
        )?;

        xml.push_str("<p:notesSz cx=\"6858000\" cy=\"9144000\"/>");
        xml.push_str("</p:presentation>");

        Ok(xml)
    }

    /// Generate the XML of every slide in order.
    pub fn generate_slide_xml(&mut self) -> Result<Vec<String>> {
        self.slides.iter_mut().map(MutableSlide::to_xml).collect()
    }
}

impl Default for MutablePresentation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_presentation() {
        let pres = MutablePresentation::new();
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_width(), 9144000);
        assert_eq!(pres.slide_height(), 6858000);
    }

    #[test]
    fn test_add_slide() {
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide().unwrap();
        assert_eq!(slide.slide_id(), 256);
        assert_eq!(pres.slide_count(), 1);
        assert!(pres.is_modified());
    }

    #[test]
    fn test_options_reach_slides() {
        let options = AnimationOptions::new()
            .with_canvas_size(960.0, 540.0)
            .with_default_speed(40.0);
        let mut pres = MutablePresentation::with_options(options).unwrap();
        assert_eq!(pres.slide_width(), 12192000);

        let slide = pres.add_slide().unwrap();
        let id = slide.add_rectangle("").unwrap();
        slide.move_by(id, 96.0, 0.0, "").unwrap();
        assert_eq!(slide.animations()[0].duration(), 2.4);
        assert!(slide.to_xml().unwrap().contains(r#"path="M 0 0 L 0.1 0 E""#));
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let options = AnimationOptions::new().with_default_speed(0.0);
        assert!(matches!(
            MutablePresentation::with_options(options),
            Err(OoxmlError::Config(_))
        ));
    }

    #[test]
    fn test_xml_generation() {
        let mut pres = MutablePresentation::new();
        pres.add_slide().unwrap().set_title("Test");
        pres.add_slide().unwrap();

        let xml = pres.generate_presentation_xml().unwrap();
        assert!(xml.contains("<p:presentation"));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="6858000"/>"#));

        let slides = pres.generate_slide_xml().unwrap();
        assert_eq!(slides.len(), 2);
        assert!(slides[0].contains("<p:sld"));
        assert!(slides[0].contains("Test"));
    }
}
