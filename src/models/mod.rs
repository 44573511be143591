//! Models module for the notation engraver
//!
//! Geometry, glyph ids, the property and style system, and the trill
//! element built on top of them.

pub mod geometry;
pub mod line;
pub mod properties;
pub mod style;
pub mod symbols;
pub mod trill;

// Re-export commonly used types
pub use geometry::{PointF, RectF};
pub use line::LineBase;
pub use properties::{
    Color, OrnamentStyle, Pid, Placement, PropertyError, PropertyFlags, PropertyValue,
};
pub use style::{ElementStyle, Sid, Style, StyleError, StyleValue};
pub use symbols::SymId;
pub use trill::{
    Accidental, Chord, ElementRef, LinkId, Note, Ornament, PropertyOwner, SegmentType, Trill,
    TrillSegment, TrillType,
};
