//! Time-node behaviours shared by the effect bodies.
//!
//! Each behaviour is a `p:set`, `p:anim`, `p:animEffect`, `p:animScale`,
//! `p:animRot`, `p:animClr` or `p:animMotion` element targeting one shape. Every
//! behaviour owns a `p:cTn` whose id comes from [`TimeNodeIds`].

use crate::common::RGBColor;
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

/// Sequential `p:cTn` id allocator.
///
/// Ids 1 and 2 belong to the timing root and the main sequence.
#[derive(Debug, Clone)]
pub struct TimeNodeIds {
    next: u32,
}

impl Default for TimeNodeIds {
    fn default() -> Self {
        Self { next: 3 }
    }
}

impl TimeNodeIds {
    /// Id of the `tmRoot` time node.
    pub const ROOT: u32 = 1;
    /// Id of the `mainSeq` time node.
    pub const MAIN_SEQUENCE: u32 = 2;

    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Writes behaviours for one target shape into an effect body.
pub(crate) struct BehaviorWriter<'a> {
    out: &'a mut String,
    ids: &'a mut TimeNodeIds,
    spid: u32,
}

impl<'a> BehaviorWriter<'a> {
    pub(crate) fn new(out: &'a mut String, ids: &'a mut TimeNodeIds, spid: u32) -> Self {
        Self { out, ids, spid }
    }

    /// `<p:cBhvr>` opening, time node, target and attribute list.
    fn common_behavior(
        &mut self,
        cbhvr_attrs: &str,
        dur_ms: u64,
        delay_ms: Option<u64>,
        attr_names: &[&str],
    ) -> Result<()> {
        let id = self.ids.next_id();
        write!(self.out, "<p:cBhvr{cbhvr_attrs}>")?;
        match delay_ms {
            Some(delay) => write!(
                self.out,
                r#"<p:cTn id="{id}" dur="{dur_ms}" fill="hold"><p:stCondLst><p:cond delay="{delay}"/></p:stCondLst></p:cTn>"#
            )?,
            None => write!(self.out, r#"<p:cTn id="{id}" dur="{dur_ms}" fill="hold"/>"#)?,
        }
        write!(self.out, r#"<p:tgtEl><p:spTgt spid="{}"/></p:tgtEl>"#, self.spid)?;
        if !attr_names.is_empty() {
            self.out.push_str("<p:attrNameLst>");
            for name in attr_names {
                write!(self.out, "<p:attrName>{name}</p:attrName>")?;
            }
            self.out.push_str("</p:attrNameLst>");
        }
        self.out.push_str("</p:cBhvr>");
        Ok(())
    }

    /// Set `style.visibility` after `delay_ms`.
    pub(crate) fn set_visibility(&mut self, visible: bool, delay_ms: u64) -> Result<()> {
        self.set_string("style.visibility", if visible { "visible" } else { "hidden" }, 1, Some(delay_ms))
    }

    /// Set an arbitrary attribute to a string value.
    pub(crate) fn set_string(
        &mut self,
        attr: &str,
        value: &str,
        dur_ms: u64,
        delay_ms: Option<u64>,
    ) -> Result<()> {
        self.out.push_str("<p:set>");
        self.common_behavior("", dur_ms, delay_ms, &[attr])?;
        write!(self.out, r#"<p:to><p:strVal val="{value}"/></p:to></p:set>"#)?;
        Ok(())
    }

    /// Linear numeric animation of one property between two formulas.
    pub(crate) fn anim_property(&mut self, attr: &str, from: &str, to: &str, dur_ms: u64) -> Result<()> {
        self.out.push_str(r#"<p:anim calcmode="lin" valueType="num">"#);
        self.common_behavior(r#" additive="base""#, dur_ms, None, &[attr])?;
        write!(
            self.out,
            r#"<p:tavLst><p:tav tm="0"><p:val><p:strVal val="{from}"/></p:val></p:tav><p:tav tm="100000"><p:val><p:strVal val="{to}"/></p:val></p:tav></p:tavLst></p:anim>"#
        )?;
        Ok(())
    }

    /// Filter transition such as `fade`, `wipe(up)` or `checkerboard(across)`.
    pub(crate) fn anim_effect(&mut self, entering: bool, filter: &str, dur_ms: u64) -> Result<()> {
        write!(
            self.out,
            r#"<p:animEffect transition="{}" filter="{filter}">"#,
            if entering { "in" } else { "out" }
        )?;
        let id = self.ids.next_id();
        write!(
            self.out,
            r#"<p:cBhvr><p:cTn id="{id}" dur="{dur_ms}"/><p:tgtEl><p:spTgt spid="{}"/></p:tgtEl></p:cBhvr></p:animEffect>"#,
            self.spid
        )?;
        Ok(())
    }

    /// Scale by percentages (100 leaves the size unchanged).
    pub(crate) fn anim_scale(&mut self, percent_x: f64, percent_y: f64, dur_ms: u64) -> Result<()> {
        self.out.push_str("<p:animScale>");
        self.common_behavior("", dur_ms, None, &[])?;
        write!(
            self.out,
            r#"<p:by x="{}" y="{}"/></p:animScale>"#,
            (percent_x * 1000.0).round() as i64,
            (percent_y * 1000.0).round() as i64
        )?;
        Ok(())
    }

    /// Rotate by `degrees`; negative values turn counter-clockwise.
    pub(crate) fn anim_rotate(&mut self, degrees: f64, dur_ms: u64) -> Result<()> {
        write!(self.out, r#"<p:animRot by="{}">"#, (degrees * 60_000.0).round() as i64)?;
        self.common_behavior("", dur_ms, None, &["r"])?;
        self.out.push_str("</p:animRot>");
        Ok(())
    }

    /// Animate the fill colour and switch the fill on.
    pub(crate) fn anim_fill_color(&mut self, color: RGBColor, dur_ms: u64) -> Result<()> {
        self.out.push_str(r#"<p:animClr clrSpc="rgb" dir="cw">"#);
        self.common_behavior(r#" override="childStyle""#, dur_ms, None, &["fillcolor"])?;
        write!(
            self.out,
            r#"<p:to><a:srgbClr val="{}"/></p:to></p:animClr>"#,
            color.to_hex()
        )?;
        self.set_string("fill.type", "solid", dur_ms, None)?;
        self.set_string("fill.on", "true", dur_ms, None)
    }

    /// Motion along a path in normalised slide coordinates.
    pub(crate) fn anim_motion(&mut self, path: &str, dur_ms: u64) -> Result<()> {
        write!(
            self.out,
            r#"<p:animMotion origin="layout" path="{path}" pathEditMode="relative" ptsTypes="">"#
        )?;
        self.common_behavior("", dur_ms, None, &["ppt_x", "ppt_y"])?;
        self.out.push_str("</p:animMotion>");
        Ok(())
    }
}
