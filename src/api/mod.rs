//! Notation Engraving WASM API
//!
//! JavaScript-facing entry points. Each function has a native counterpart
//! returning a typed error, wrapped by a `#[wasm_bindgen]` export that
//! converts results to `JsValue`.

pub mod trill;

pub use trill::{
    get_trill_types, layout_trill_xml, layout_trill_from_xml, trill_type_names, ApiError,
    RenderTrillSegment, TrillLayoutSummary, TrillTypeInfo,
};
