//! Element property identifiers and values
//!
//! Elements expose their editable state through a uniform get/set/default
//! interface keyed by [`Pid`]. Values travel as [`PropertyValue`] so the
//! inspector, file reader and style system can move them around without
//! knowing the concrete element type.

use super::geometry::PointF;
use super::trill::TrillType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Property identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Pid {
    TrillType,
    OrnamentStyle,
    Play,
    Placement,
    Offset,
    Color,
    Visible,
    Autoplace,
    MinDistance,
}

impl Pid {
    /// Tag used when the property is written to a score file
    pub fn xml_name(&self) -> &'static str {
        match self {
            Pid::TrillType => "subtype",
            Pid::OrnamentStyle => "ornamentStyle",
            Pid::Play => "play",
            Pid::Placement => "placement",
            Pid::Offset => "offset",
            Pid::Color => "color",
            Pid::Visible => "visible",
            Pid::Autoplace => "autoplace",
            Pid::MinDistance => "minDistance",
        }
    }
}

/// Whether a property follows the score style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyFlags {
    /// Not bound to any style value
    #[default]
    NoStyle,
    /// Tracks its style value
    Styled,
    /// Bound to a style value but overridden by the user
    Unstyled,
}

/// Above or below the staff
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Above,
    Below,
}

impl Placement {
    pub fn xml_name(&self) -> &'static str {
        match self {
            Placement::Above => "above",
            Placement::Below => "below",
        }
    }

    pub fn from_xml_name(name: &str) -> Option<Placement> {
        match name {
            "above" => Some(Placement::Above),
            "below" => Some(Placement::Below),
            _ => None,
        }
    }
}

/// How a trill is realised on playback
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrnamentStyle {
    #[default]
    Default,
    Baroque,
}

impl OrnamentStyle {
    pub fn xml_name(&self) -> &'static str {
        match self {
            OrnamentStyle::Default => "default",
            OrnamentStyle::Baroque => "baroque",
        }
    }

    pub fn from_xml_name(name: &str) -> Option<OrnamentStyle> {
        match name {
            "default" => Some(OrnamentStyle::Default),
            "baroque" => Some(OrnamentStyle::Baroque),
            _ => None,
        }
    }
}

/// RGBA color, 8 bits per channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    #[error("property {pid:?} expects a {expected} value, got {found:?}")]
    TypeMismatch {
        pid: Option<Pid>,
        expected: &'static str,
        found: PropertyValue,
    },

    #[error("property {0:?} is not supported by this element")]
    Unsupported(Pid),

    #[error("invalid trill type {0}")]
    InvalidTrillType(i32),

    #[error("no segment at index {0}")]
    NoSuchSegment(usize),
}

/// A dynamically typed property value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Double(f64),
    Point(PointF),
    Color(Color),
    Placement(Placement),
    OrnamentStyle(OrnamentStyle),
    TrillType(TrillType),
}

impl PropertyValue {
    fn mismatch(&self, expected: &'static str) -> PropertyError {
        PropertyError::TypeMismatch {
            pid: None,
            expected,
            found: self.clone(),
        }
    }

    pub fn to_bool(&self) -> Result<bool, PropertyError> {
        match self {
            PropertyValue::Bool(v) => Ok(*v),
            PropertyValue::Int(v) => Ok(*v != 0),
            _ => Err(self.mismatch("bool")),
        }
    }

    pub fn to_int(&self) -> Result<i32, PropertyError> {
        match self {
            PropertyValue::Int(v) => Ok(*v),
            PropertyValue::Bool(v) => Ok(i32::from(*v)),
            PropertyValue::TrillType(tt) => Ok(*tt as i32),
            _ => Err(self.mismatch("int")),
        }
    }

    pub fn to_double(&self) -> Result<f64, PropertyError> {
        match self {
            PropertyValue::Double(v) => Ok(*v),
            PropertyValue::Int(v) => Ok(f64::from(*v)),
            _ => Err(self.mismatch("double")),
        }
    }

    pub fn to_point(&self) -> Result<PointF, PropertyError> {
        match self {
            PropertyValue::Point(p) => Ok(*p),
            _ => Err(self.mismatch("point")),
        }
    }

    pub fn to_color(&self) -> Result<Color, PropertyError> {
        match self {
            PropertyValue::Color(c) => Ok(*c),
            _ => Err(self.mismatch("color")),
        }
    }

    pub fn to_placement(&self) -> Result<Placement, PropertyError> {
        match self {
            PropertyValue::Placement(p) => Ok(*p),
            _ => Err(self.mismatch("placement")),
        }
    }

    pub fn to_ornament_style(&self) -> Result<OrnamentStyle, PropertyError> {
        match self {
            PropertyValue::OrnamentStyle(s) => Ok(*s),
            _ => Err(self.mismatch("ornament style")),
        }
    }

    pub fn to_trill_type(&self) -> Result<TrillType, PropertyError> {
        match self {
            PropertyValue::TrillType(tt) => Ok(*tt),
            PropertyValue::Int(v) => TrillType::try_from(*v),
            _ => Err(self.mismatch("trill type")),
        }
    }
}

impl PropertyError {
    /// Attach the property id to a conversion failure
    pub(crate) fn for_pid(self, pid: Pid) -> PropertyError {
        match self {
            PropertyError::TypeMismatch { expected, found, .. } => PropertyError::TypeMismatch {
                pid: Some(pid),
                expected,
                found,
            },
            other => other,
        }
    }
}
