//! Notation Engraving WASM Module
//!
//! Trill lines for a music engraver: the trill element and its properties,
//! glyph layout against SMuFL font metrics, reading and writing the score
//! file representation, and the streaming XML reader underneath it.

pub mod api;
pub mod converters;
pub mod models;
pub mod renderers;
pub mod xml;

// Re-export commonly used types
pub use models::trill::{Trill, TrillSegment, TrillType};
pub use renderers::trill_layout::{layout_trill, SegmentGeometry};
pub use xml::{TokenType, XmlError, XmlReader};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    init_panic_hook();
    init_logging();

    log::info!("Notation engraving WASM module initialized");
}

#[cfg(feature = "console_error_panic_hook")]
fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn init_panic_hook() {}

#[cfg(feature = "console_log")]
fn init_logging() {
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        log::debug!("Logger already installed: {}", e);
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logging() {}
