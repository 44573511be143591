//! Score style
//!
//! The style holds score-wide defaults that elements pick up for their
//! styled properties. It loads from YAML so a house style can be kept next
//! to the score files:
//!
//! ```yaml
//! spatium: 24.8
//! trillPlacement: below
//! trillPosBelow: { x: 0.0, y: 1.5 }
//! ```

use super::geometry::PointF;
use super::properties::{Pid, Placement, PropertyValue};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Style identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sid {
    Spatium,
    TrillPlacement,
    TrillPosAbove,
    TrillPosBelow,
    TrillMinDistance,
}

/// Binding of style values to element properties
pub type ElementStyle = &'static [(Sid, Pid)];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum StyleValue {
    Double(f64),
    Point(PointF),
    Placement(Placement),
}

impl From<StyleValue> for PropertyValue {
    fn from(value: StyleValue) -> Self {
        match value {
            StyleValue::Double(v) => PropertyValue::Double(v),
            StyleValue::Point(p) => PropertyValue::Point(p),
            StyleValue::Placement(p) => PropertyValue::Placement(p),
        }
    }
}

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("failed to read style file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse style: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("style value {sid:?} expects {expected}")]
    TypeMismatch { sid: Sid, expected: &'static str },
}

/// Score style values; offsets and distances are in staff spaces
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Style {
    /// Size of one staff space in raster units
    pub spatium: f64,
    pub trill_placement: Placement,
    pub trill_pos_above: PointF,
    pub trill_pos_below: PointF,
    pub trill_min_distance: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            spatium: 24.8,
            trill_placement: Placement::Above,
            trill_pos_above: PointF::new(0.0, -1.0),
            trill_pos_below: PointF::new(0.0, 1.0),
            trill_min_distance: 1.0,
        }
    }
}

impl Style {
    pub fn from_yaml_str(yaml: &str) -> Result<Style, StyleError> {
        let style = serde_yaml::from_str(yaml)?;
        Ok(style)
    }

    pub fn load(path: &Path) -> Result<Style, StyleError> {
        let content = fs::read_to_string(path)?;
        let style = Style::from_yaml_str(&content)?;
        log::debug!("Loaded style from {}", path.display());
        Ok(style)
    }

    pub fn value(&self, sid: Sid) -> StyleValue {
        match sid {
            Sid::Spatium => StyleValue::Double(self.spatium),
            Sid::TrillPlacement => StyleValue::Placement(self.trill_placement),
            Sid::TrillPosAbove => StyleValue::Point(self.trill_pos_above),
            Sid::TrillPosBelow => StyleValue::Point(self.trill_pos_below),
            Sid::TrillMinDistance => StyleValue::Double(self.trill_min_distance),
        }
    }

    pub fn set_value(&mut self, sid: Sid, value: StyleValue) -> Result<(), StyleError> {
        match (sid, value) {
            (Sid::Spatium, StyleValue::Double(v)) => self.spatium = v,
            (Sid::TrillPlacement, StyleValue::Placement(p)) => self.trill_placement = p,
            (Sid::TrillPosAbove, StyleValue::Point(p)) => self.trill_pos_above = p,
            (Sid::TrillPosBelow, StyleValue::Point(p)) => self.trill_pos_below = p,
            (Sid::TrillMinDistance, StyleValue::Double(v)) => self.trill_min_distance = v,
            (Sid::Spatium | Sid::TrillMinDistance, _) => {
                return Err(StyleError::TypeMismatch { sid, expected: "a number" })
            }
            (Sid::TrillPlacement, _) => {
                return Err(StyleError::TypeMismatch { sid, expected: "a placement" })
            }
            (Sid::TrillPosAbove | Sid::TrillPosBelow, _) => {
                return Err(StyleError::TypeMismatch { sid, expected: "a point" })
            }
        }
        Ok(())
    }
}
