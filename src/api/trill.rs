//! WASM API for trill layout
//!
//! JavaScript hands over a `<Trill>` element and the spans the score layout
//! assigned to it; the result is everything needed to draw the trill:
//! glyph names per segment, positions and boxes.

use crate::converters::trill_xml::{read_trill_from_bytes, ReadError};
use crate::models::geometry::{PointF, RectF};
use crate::models::properties::Placement;
use crate::models::style::{Style, StyleError};
use crate::models::trill::{Accidental, SegmentType, TrillType};
use crate::renderers::font_metrics::{EngravingFont, FontError, SmuflFont};
use crate::renderers::trill_layout::{layout_trill, SegmentGeometry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use wasm_bindgen::prelude::*;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to read trill: {0}")]
    Read(#[from] ReadError),

    #[error("invalid style: {0}")]
    Style(#[from] StyleError),

    #[error("invalid font metadata: {0}")]
    Font(#[from] FontError),
}

/// One laid out segment, ready to draw
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RenderTrillSegment {
    pub segment_type: SegmentType,
    pub system: usize,
    pub pos: PointF,
    pub length: f64,
    /// SMuFL glyph names, left to right
    pub symbols: Vec<String>,
    pub bbox: RectF,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrillLayoutSummary {
    pub trill_type: TrillType,
    pub type_name: String,
    pub accessible_info: String,
    pub placement: Placement,
    pub play: bool,
    pub accidental: Option<Accidental>,
    pub segments: Vec<RenderTrillSegment>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TrillTypeInfo {
    pub value: i32,
    pub xml_name: &'static str,
    pub user_name: &'static str,
}

/// Read a trill from XML and lay it out over `spans`
pub fn layout_trill_from_xml(
    xml: &str,
    spans: &[SegmentGeometry],
    style: Style,
    font: &dyn EngravingFont,
) -> Result<TrillLayoutSummary, ApiError> {
    let mut trill = read_trill_from_bytes(xml.as_bytes(), Arc::new(style))?;
    layout_trill(&mut trill, spans, font);

    let segments = trill
        .segments()
        .iter()
        .map(|segment| RenderTrillSegment {
            segment_type: segment.segment_type,
            system: segment.system,
            pos: segment.pos,
            length: segment.pos2.x,
            symbols: segment
                .symbols()
                .iter()
                .map(|sym| sym.smufl_name().to_string())
                .collect(),
            bbox: segment.bbox(),
        })
        .collect();

    Ok(TrillLayoutSummary {
        trill_type: trill.trill_type(),
        type_name: trill.trill_type_user_name().to_string(),
        accessible_info: trill.accessible_info(),
        placement: trill.placement(),
        play: trill.play_articulation(),
        accidental: trill.accidental().cloned(),
        segments,
    })
}

pub fn trill_type_names() -> Vec<TrillTypeInfo> {
    TrillType::ALL
        .iter()
        .map(|tt| TrillTypeInfo {
            value: *tt as i32,
            xml_name: tt.xml_name(),
            user_name: tt.user_name(),
        })
        .collect()
}

/// Lay out a trill for drawing
///
/// # Parameters
/// - `xml`: a document containing a `<Trill>` element
/// - `spans_js`: array of `{ system, x, length }` from the score layout
/// - `style_yaml`: optional style overrides
/// - `font_metadata`: optional SMuFL metadata JSON; the builtin metrics are used otherwise
#[wasm_bindgen(js_name = layoutTrillXml)]
pub fn layout_trill_xml(
    xml: &str,
    spans_js: JsValue,
    style_yaml: Option<String>,
    font_metadata: Option<String>,
) -> Result<JsValue, JsValue> {
    let spans: Vec<SegmentGeometry> = serde_wasm_bindgen::from_value(spans_js).map_err(|e| {
        log::error!("Invalid trill spans: {}", e);
        JsValue::from_str(&format!("Deserialization error: {}", e))
    })?;

    let style = match style_yaml {
        Some(yaml) => Style::from_yaml_str(&yaml).map_err(|e| to_js(e.into()))?,
        None => Style::default(),
    };

    let loaded;
    let font: &dyn EngravingFont = match font_metadata {
        Some(json) => {
            loaded = SmuflFont::from_metadata_json(&json).map_err(|e| to_js(e.into()))?;
            &loaded
        }
        None => SmuflFont::builtin(),
    };

    let summary = layout_trill_from_xml(xml, &spans, style, font).map_err(to_js)?;
    serde_wasm_bindgen::to_value(&summary)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[wasm_bindgen(js_name = getTrillTypes)]
pub fn get_trill_types() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&trill_type_names())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn to_js(error: ApiError) -> JsValue {
    log::error!("{}", error);
    JsValue::from_str(&error.to_string())
}
