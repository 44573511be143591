//! Engraving font metrics
//!
//! Layout only needs two things from a music font: how far a glyph advances
//! the pen and the box it inks. Both come from SMuFL font metadata
//! (`glyphAdvanceWidths` and `glyphBBoxes`), expressed in staff spaces and
//! scaled by a magnification factor at lookup time.

use crate::models::geometry::{PointF, RectF};
use crate::models::symbols::SymId;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font metadata: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse font metadata: {0}")]
    Json(#[from] serde_json::Error),
}

/// Glyph metrics provider used by layout
pub trait EngravingFont {
    fn name(&self) -> &str;

    /// Horizontal advance of `sym` at magnification `mag`
    fn advance(&self, sym: SymId, mag: f64) -> f64;

    /// Ink box of `sym` relative to its origin at magnification `mag`
    fn bbox(&self, sym: SymId, mag: f64) -> RectF;

    /// Box of a run of symbols drawn left to right
    fn bbox_of(&self, symbols: &[SymId], mag: f64) -> RectF {
        let mut rect = RectF::default();
        let mut pos = PointF::default();
        for &sym in symbols {
            rect = rect.united(&self.bbox(sym, mag).translated(pos));
            pos.x += self.advance(sym, mag);
        }
        rect
    }
}

/// Metrics of one glyph in staff spaces
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphMetrics {
    pub advance: f64,
    pub bbox: RectF,
}

impl GlyphMetrics {
    /// Build from SMuFL y-up corner coordinates
    fn from_corners(advance: f64, ne: [f64; 2], sw: [f64; 2]) -> Self {
        Self {
            advance,
            bbox: RectF::new(sw[0], -ne[1], ne[0] - sw[0], ne[1] - sw[1]),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Metadata {
    #[serde(default)]
    font_name: String,
    #[serde(default)]
    glyph_advance_widths: HashMap<String, f64>,
    #[serde(default, rename = "glyphBBoxes")]
    glyph_bboxes: HashMap<String, RawBBox>,
}

#[derive(Deserialize)]
struct RawBBox {
    #[serde(rename = "bBoxNE")]
    ne: [f64; 2],
    #[serde(rename = "bBoxSW")]
    sw: [f64; 2],
}

/// Font metrics read from SMuFL metadata
#[derive(Clone, Debug, Default)]
pub struct SmuflFont {
    name: String,
    glyphs: HashMap<SymId, GlyphMetrics>,
}

// (name, advance, bBoxNE, bBoxSW), Bravura-compatible
const BUILTIN_GLYPHS: &[(SymId, f64, [f64; 2], [f64; 2])] = &[
    (SymId::OrnamentTrill, 1.428, [1.428, 1.472], [0.0, -0.02]),
    (SymId::WiggleTrill, 0.632, [0.632, 0.424], [0.0, 0.0]),
    (SymId::OrnamentUpPrall, 2.116, [2.116, 0.98], [0.0, -0.02]),
    (SymId::OrnamentPrecompMordentUpperPrefix, 2.056, [2.056, 1.24], [0.0, 0.0]),
    (SymId::OrnamentShortTrill, 1.392, [1.392, 0.76], [0.0, 0.0]),
    (SymId::OrnamentBottomLeftConcaveStroke, 0.56, [0.56, 0.644], [0.0, 0.0]),
    (SymId::OrnamentLeftVerticalStroke, 0.16, [0.16, 1.0], [0.0, -0.16]),
    (SymId::OrnamentZigZagLineNoRightEnd, 0.5, [0.5, 0.6], [0.0, 0.08]),
    (SymId::OrnamentZigZagLineWithRightEnd, 0.54, [0.54, 0.6], [0.0, 0.08]),
    (SymId::AccidentalFlat, 0.904, [0.904, 1.756], [0.0, -0.7]),
    (SymId::AccidentalNatural, 0.672, [0.672, 1.364], [0.0, -1.34]),
    (SymId::AccidentalSharp, 0.996, [0.996, 1.4], [0.0, -1.392]),
    (SymId::AccidentalDoubleSharp, 0.988, [0.988, 0.508], [0.0, -0.5]),
    (SymId::AccidentalDoubleFlat, 1.644, [1.644, 1.748], [0.0, -0.7]),
];

static BUILTIN: Lazy<SmuflFont> = Lazy::new(|| SmuflFont {
    name: "Bravura".to_string(),
    glyphs: BUILTIN_GLYPHS
        .iter()
        .map(|&(sym, advance, ne, sw)| (sym, GlyphMetrics::from_corners(advance, ne, sw)))
        .collect(),
});

impl SmuflFont {
    /// Metrics for every glyph trills draw, without loading a file
    pub fn builtin() -> &'static SmuflFont {
        &BUILTIN
    }

    pub fn from_metadata_json(json: &str) -> Result<SmuflFont, FontError> {
        let metadata: Metadata = serde_json::from_str(json)?;
        let mut glyphs = HashMap::new();

        for (name, advance) in &metadata.glyph_advance_widths {
            let Some(sym) = SymId::from_smufl_name(name) else {
                continue;
            };
            let bbox = metadata
                .glyph_bboxes
                .get(name)
                .map(|b| GlyphMetrics::from_corners(*advance, b.ne, b.sw).bbox)
                .unwrap_or_default();
            glyphs.insert(sym, GlyphMetrics { advance: *advance, bbox });
        }

        // Glyphs with a box but no advance still ink something
        for (name, raw) in &metadata.glyph_bboxes {
            if let Some(sym) = SymId::from_smufl_name(name) {
                glyphs
                    .entry(sym)
                    .or_insert_with(|| GlyphMetrics::from_corners(0.0, raw.ne, raw.sw));
            }
        }

        log::debug!("Font '{}': {} usable glyphs", metadata.font_name, glyphs.len());
        Ok(SmuflFont {
            name: metadata.font_name,
            glyphs,
        })
    }

    pub fn load(path: &Path) -> Result<SmuflFont, FontError> {
        let content = fs::read_to_string(path)?;
        SmuflFont::from_metadata_json(&content)
    }

    pub fn glyph(&self, sym: SymId) -> Option<&GlyphMetrics> {
        self.glyphs.get(&sym)
    }

    fn lookup(&self, sym: SymId) -> Option<&GlyphMetrics> {
        let glyph = self.glyphs.get(&sym);
        if glyph.is_none() && sym != SymId::NoSym {
            log::debug!("Font '{}' has no metrics for {}", self.name, sym.smufl_name());
        }
        glyph
    }
}

impl EngravingFont for SmuflFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn advance(&self, sym: SymId, mag: f64) -> f64 {
        self.lookup(sym).map(|g| g.advance * mag).unwrap_or(0.0)
    }

    fn bbox(&self, sym: SymId, mag: f64) -> RectF {
        self.lookup(sym)
            .map(|g| {
                let b = g.bbox;
                RectF::new(b.x * mag, b.y * mag, b.width * mag, b.height * mag)
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METADATA: &str = r#"{
        "fontName": "Test",
        "glyphAdvanceWidths": { "wiggleTrill": 0.5, "ornamentTrill": 1.0, "gClef": 2.6 },
        "glyphBBoxes": {
            "wiggleTrill": { "bBoxNE": [0.5, 0.5], "bBoxSW": [0.0, 0.0] },
            "ornamentTrill": { "bBoxNE": [1.0, 1.5], "bBoxSW": [0.0, -0.5] }
        }
    }"#;

    #[test]
    fn test_metadata_boxes_flip_to_page_coordinates() {
        let font = SmuflFont::from_metadata_json(METADATA).unwrap();
        assert_eq!(font.name(), "Test");
        assert_eq!(font.bbox(SymId::OrnamentTrill, 2.0), RectF::new(0.0, -3.0, 2.0, 4.0));
        assert_eq!(font.advance(SymId::WiggleTrill, 4.0), 2.0);
    }

    #[test]
    fn test_missing_glyph_is_empty() {
        let font = SmuflFont::from_metadata_json(METADATA).unwrap();
        assert_eq!(font.advance(SymId::AccidentalSharp, 1.0), 0.0);
        assert!(font.bbox(SymId::AccidentalSharp, 1.0).is_null());
    }

    #[test]
    fn test_bbox_of_run_advances_pen() {
        let font = SmuflFont::from_metadata_json(METADATA).unwrap();
        let r = font.bbox_of(&[SymId::OrnamentTrill, SymId::WiggleTrill, SymId::WiggleTrill], 1.0);
        assert_eq!(r, RectF::new(0.0, -1.5, 2.0, 2.0));
    }

    #[test]
    fn test_builtin_covers_trill_glyphs() {
        let font = SmuflFont::builtin();
        for sym in SymId::ALL.iter().filter(|s| **s != SymId::NoSym) {
            assert!(font.glyph(*sym).is_some(), "missing {}", sym.smufl_name());
        }
    }
}
