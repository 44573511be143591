//! Renderers module for the notation engraver
//!
//! Font metrics and the layout that turns trill spans into glyph runs.

pub mod font_metrics;
pub mod trill_layout;

// Re-export commonly used types
pub use font_metrics::{EngravingFont, FontError, GlyphMetrics, SmuflFont};
pub use trill_layout::{layout_trill, layout_trill_segment, SegmentGeometry};
