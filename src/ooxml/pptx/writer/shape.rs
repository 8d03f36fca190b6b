/// Shape types and implementation for PPTX presentations.
use crate::common::unit::{parse_length_pt, pt_to_emu_f64};
use crate::common::xml::escape_xml;
use crate::common::RGBColor;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::animations::Point;
use crate::ooxml::pptx::options::{
    OptionHandler, OptionTable, OptionTarget, apply_options, parse_non_negative,
};
use phf::phf_map;
use std::fmt::Write as FmtWrite;

/// Side of a shape created without `/width:` or `/height:`, in points (one inch).
pub const DEFAULT_SHAPE_SIZE: f64 = 72.0;

/// A shape on a slide.
///
/// Bounds are in points. Shapes are configured with option strings:
///
/// ```text
/// /x:1in /y:72 /width:2in /height:1in /fill:4472C4 /name:"Title box" /speed:150
/// ```
///
/// A missing dimension copies the other one, so `/size:1in` or `/width:1in`
/// both give a square.
#[derive(Debug, Clone)]
pub struct MutableShape {
    /// Shape ID
    pub(crate) shape_id: u32,
    pub(crate) shape_type: ShapeType,
    name: Option<String>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    fill_color: Option<RGBColor>,
    /// Default motion speed for this shape in points per second
    speed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ShapeType {
    TextBox { text: String },
    Rectangle,
    Ellipse,
}

impl MutableShape {
    fn new(shape_id: u32, shape_type: ShapeType, options: &str) -> Result<Self> {
        let mut shape = Self {
            shape_id,
            shape_type,
            name: None,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            fill_color: None,
            speed: None,
        };
        apply_options(&mut shape, options)?;
        Ok(shape)
    }

    /// Create a new text box shape.
    pub(crate) fn new_text_box(shape_id: u32, text: &str, options: &str) -> Result<Self> {
        Self::new(
            shape_id,
            ShapeType::TextBox {
                text: text.to_string(),
            },
            options,
        )
    }

    /// Create a new rectangle shape.
    pub(crate) fn new_rectangle(shape_id: u32, options: &str) -> Result<Self> {
        Self::new(shape_id, ShapeType::Rectangle, options)
    }

    /// Create a new ellipse (circle/oval) shape.
    pub(crate) fn new_ellipse(shape_id: u32, options: &str) -> Result<Self> {
        Self::new(shape_id, ShapeType::Ellipse, options)
    }

    pub fn shape_id(&self) -> u32 {
        self.shape_id
    }

    /// Display name; defaults to the shape kind and id.
    pub fn name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => {
                let kind = match self.shape_type {
                    ShapeType::TextBox { .. } => "Text Box",
                    ShapeType::Rectangle => "Rectangle",
                    ShapeType::Ellipse => "Ellipse",
                };
                format!("{kind} {}", self.shape_id)
            },
        }
    }

    /// Top-left corner in points.
    pub fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height in points.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn fill_color(&self) -> Option<RGBColor> {
        self.fill_color
    }

    /// Motion speed set on this shape, if any.
    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    pub(crate) fn set_speed(&mut self, speed: f64) {
        self.speed = Some(speed);
    }

    /// Generate XML for this shape.
    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        let (geometry, text) = match &self.shape_type {
            ShapeType::TextBox { text } => ("rect", Some(text.as_str())),
            ShapeType::Rectangle => ("rect", None),
            ShapeType::Ellipse => ("ellipse", None),
        };

        xml.push_str("<p:sp>");
        xml.push_str("<p:nvSpPr>");
        write!(
            xml,
            r#"<p:cNvPr id="{}" name="{}"/>"#,
            self.shape_id,
            escape_xml(&self.name())
        )?;
        if text.is_some() {
            xml.push_str("<p:cNvSpPr txBox=\"1\"/>");
        } else {
            xml.push_str("<p:cNvSpPr/>");
        }
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvSpPr>");

        xml.push_str("<p:spPr>");
        xml.push_str("<a:xfrm>");
        write!(
            xml,
            r#"<a:off x="{}" y="{}"/>"#,
            pt_to_emu_f64(self.x),
            pt_to_emu_f64(self.y)
        )?;
        write!(
            xml,
            r#"<a:ext cx="{}" cy="{}"/>"#,
            pt_to_emu_f64(self.width),
            pt_to_emu_f64(self.height)
        )?;
        xml.push_str("</a:xfrm>");
        write!(xml, r#"<a:prstGeom prst="{geometry}"><a:avLst/></a:prstGeom>"#)?;

        if let Some(color) = self.fill_color {
            xml.push_str("<a:solidFill>");
            write!(xml, r#"<a:srgbClr val="{}"/>"#, color.to_hex())?;
            xml.push_str("</a:solidFill>");
        }
        xml.push_str("</p:spPr>");

        if let Some(text) = text {
            xml.push_str("<p:txBody>");
            xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0"><a:spAutoFit/></a:bodyPr>"#);
            xml.push_str("<a:lstStyle/>");
            xml.push_str("<a:p><a:r><a:rPr lang=\"en-US\" dirty=\"0\"/>");
            write!(xml, "<a:t>{}</a:t>", escape_xml(text))?;
            xml.push_str("</a:r></a:p>");
            xml.push_str("</p:txBody>");
        }

        xml.push_str("</p:sp>");
        Ok(())
    }
}

static SHAPE_KEYS: OptionTable<MutableShape> = phf_map! {
    "x" => set_x,
    "y" => set_y,
    "width" => set_width,
    "height" => set_height,
    "size" => set_size,
    "fill" => set_fill,
    "name" => set_name,
    "speed" => set_speed,
};

fn length(key: &str, value: &str) -> Result<f64> {
    parse_length_pt(value).ok_or_else(|| OoxmlError::invalid_value(key, value))
}

fn extent(key: &str, value: &str) -> Result<f64> {
    let len = length(key, value)?;
    if len < 0.0 {
        return Err(OoxmlError::invalid_value(key, value));
    }
    Ok(len)
}

fn set_x(shape: &mut MutableShape, value: &str) -> Result<()> {
    shape.x = length("x", value)?;
    Ok(())
}

fn set_y(shape: &mut MutableShape, value: &str) -> Result<()> {
    shape.y = length("y", value)?;
    Ok(())
}

fn set_width(shape: &mut MutableShape, value: &str) -> Result<()> {
    shape.width = extent("width", value)?;
    Ok(())
}

fn set_height(shape: &mut MutableShape, value: &str) -> Result<()> {
    shape.height = extent("height", value)?;
    Ok(())
}

fn set_size(shape: &mut MutableShape, value: &str) -> Result<()> {
    let side = extent("size", value)?;
    shape.width = side;
    shape.height = side;
    Ok(())
}

fn set_fill(shape: &mut MutableShape, value: &str) -> Result<()> {
    let color = RGBColor::parse(value).ok_or_else(|| OoxmlError::invalid_value("fill", value))?;
    shape.fill_color = Some(color);
    Ok(())
}

fn set_name(shape: &mut MutableShape, value: &str) -> Result<()> {
    shape.name = (!value.is_empty()).then(|| value.to_string());
    Ok(())
}

fn set_speed(shape: &mut MutableShape, value: &str) -> Result<()> {
    let speed = parse_non_negative("speed", value)?;
    if speed == 0.0 {
        return Err(OoxmlError::invalid_value("speed", value));
    }
    shape.speed = Some(speed);
    Ok(())
}

impl OptionTarget for MutableShape {
    fn handler(&self, key: &str) -> Option<OptionHandler<Self>> {
        SHAPE_KEYS.get(key).copied()
    }

    fn post_options(&mut self) -> Result<()> {
        match (self.width > 0.0, self.height > 0.0) {
            (true, true) => {},
            (true, false) => self.height = self.width,
            (false, true) => self.width = self.height,
            (false, false) => {
                self.width = DEFAULT_SHAPE_SIZE;
                self.height = DEFAULT_SHAPE_SIZE;
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_options() {
        let shape = MutableShape::new_rectangle(3, "/x:1in /y:36 /width:2in /height:1in").unwrap();
        assert_eq!(shape.location(), Point::new(72.0, 36.0));
        assert_eq!(shape.size(), (144.0, 72.0));
    }

    #[test]
    fn test_missing_dimension_is_backfilled() {
        let shape = MutableShape::new_ellipse(3, "/width:50").unwrap();
        assert_eq!(shape.size(), (50.0, 50.0));
        let shape = MutableShape::new_ellipse(3, "").unwrap();
        assert_eq!(shape.size(), (DEFAULT_SHAPE_SIZE, DEFAULT_SHAPE_SIZE));
    }

    #[test]
    fn test_invalid_shape_options() {
        assert!(matches!(
            MutableShape::new_rectangle(3, "/width:-4"),
            Err(OoxmlError::InvalidValue { .. })
        ));
        assert!(matches!(
            MutableShape::new_rectangle(3, "/fill:nonsense"),
            Err(OoxmlError::InvalidValue { .. })
        ));
        assert_eq!(
            MutableShape::new_rectangle(3, "/rotation:45").unwrap_err(),
            OoxmlError::UnknownOption("rotation".into())
        );
    }

    #[test]
    fn test_rectangle_xml() {
        let shape = MutableShape::new_rectangle(4, "/x:1in /size:1in /fill:red").unwrap();
        let mut xml = String::new();
        shape.to_xml(&mut xml).unwrap();
        assert!(xml.contains(r#"<p:cNvPr id="4" name="Rectangle 4"/>"#));
        assert!(xml.contains(r#"<a:off x="914400" y="0"/>"#));
        assert!(xml.contains(r#"<a:ext cx="914400" cy="914400"/>"#));
        assert!(xml.contains(r#"<a:srgbClr val="FF0000"/>"#));
        assert!(!xml.contains("txBody"));
    }

    #[test]
    fn test_text_box_escapes_text_and_name() {
        let shape = MutableShape::new_text_box(5, "a < b & c", r#"/name:"Q&A""#).unwrap();
        let mut xml = String::new();
        shape.to_xml(&mut xml).unwrap();
        assert!(xml.contains(r#"name="Q&amp;A""#));
        assert!(xml.contains("<a:t>a &lt; b &amp; c</a:t>"));
        assert!(xml.contains(r#"txBox="1""#));
    }
}
