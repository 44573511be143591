//! Trill layout
//!
//! The layout engine decides where a trill starts and ends on each system;
//! this module turns those spans into segments and fills each segment with
//! glyphs from the engraving font.

use super::font_metrics::EngravingFont;
use crate::models::geometry::PointF;
use crate::models::symbols::SymId;
use crate::models::trill::{SegmentType, Trill, TrillSegment, TrillType};
use crate::models::style::Style;
use serde::{Deserialize, Serialize};

/// Accidentals above a trill are drawn smaller than note accidentals
const ACCIDENTAL_MAG: f64 = 0.6;

/// Accidental position relative to the first segment, in staff spaces
const ACCIDENTAL_POS: PointF = PointF::new(1.3, -2.2);

/// Horizontal extent of a trill on one system, provided by the layout engine
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentGeometry {
    pub system: usize,
    /// Start of the segment, raster units
    pub x: f64,
    /// Length of the segment, raster units
    pub length: f64,
}

fn segment_type_at(index: usize, count: usize) -> SegmentType {
    match (index, count) {
        (_, 1) => SegmentType::Single,
        (0, _) => SegmentType::Begin,
        (i, n) if i + 1 == n => SegmentType::End,
        _ => SegmentType::Middle,
    }
}

fn finite_or_zero(value: f64, what: &str) -> f64 {
    if value.is_finite() {
        value
    } else {
        log::warn!("Trill span {} is {}, using 0", what, value);
        0.0
    }
}

/// Fill one segment with the glyphs for `trill_type`
pub fn layout_trill_segment(
    segment: &mut TrillSegment,
    trill_type: TrillType,
    style: &Style,
    font: &dyn EngravingFont,
) {
    let mag = segment.mag_s(style);

    if segment.is_single_type() || segment.is_begin_type() {
        match trill_type {
            TrillType::TrillLine => {
                segment.symbol_line(font, mag, SymId::OrnamentTrill, SymId::WiggleTrill)
            }
            TrillType::PrallprallLine => {
                segment.symbol_line(font, mag, SymId::WiggleTrill, SymId::WiggleTrill)
            }
            TrillType::UpprallLine => segment.symbol_line_with_end(
                font,
                mag,
                SymId::OrnamentBottomLeftConcaveStroke,
                SymId::OrnamentZigZagLineNoRightEnd,
                SymId::OrnamentZigZagLineWithRightEnd,
            ),
            TrillType::DownprallLine => segment.symbol_line_with_end(
                font,
                mag,
                SymId::OrnamentLeftVerticalStroke,
                SymId::OrnamentZigZagLineNoRightEnd,
                SymId::OrnamentZigZagLineWithRightEnd,
            ),
        }
    } else {
        segment.symbol_line(font, mag, SymId::WiggleTrill, SymId::WiggleTrill);
    }

    log::trace!(
        "Trill segment on system {}: {} symbols over {:.2}",
        segment.system,
        segment.symbols().len(),
        segment.pos2.x
    );
}

/// Lay out a whole trill over the given spans, one segment per span
pub fn layout_trill(trill: &mut Trill, spans: &[SegmentGeometry], font: &dyn EngravingFont) {
    let style = trill.style().clone();

    trill.segments_mut().truncate(spans.len());
    while trill.segments().len() < spans.len() {
        let system = spans[trill.segments().len()].system;
        trill.create_line_segment(system);
    }

    let count = spans.len();
    let trill_type = trill.trill_type();
    for (index, (segment, span)) in trill.segments_mut().iter_mut().zip(spans).enumerate() {
        segment.system = span.system;
        segment.segment_type = segment_type_at(index, count);
        let offset = segment.base.offset * style.spatium;
        segment.pos = PointF::new(finite_or_zero(span.x, "x") + offset.x, offset.y);
        segment.pos2 = PointF::new(finite_or_zero(span.length, "length").max(0.0), 0.0);
        layout_trill_segment(segment, trill_type, &style, font);
    }

    if let Some(accidental) = trill.accidental_mut() {
        accidental.mag = ACCIDENTAL_MAG;
        accidental.pos = ACCIDENTAL_POS * style.spatium;
    }

    log::debug!(
        "Laid out {} over {} segment(s)",
        trill.trill_type_user_name(),
        count
    );
    trill.layout_done();
}
