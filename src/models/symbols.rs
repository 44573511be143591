//! Engraving symbol identifiers
//!
//! Names follow the SMuFL glyph naming used by font metadata files, so a
//! `SymId` can be looked up directly in `glyphAdvanceWidths` / `glyphBBoxes`.

use serde::{Deserialize, Serialize};

/// Glyphs drawn by trill lines, their ornaments and accidentals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymId {
    #[default]
    NoSym,

    OrnamentTrill,
    WiggleTrill,
    OrnamentUpPrall,
    OrnamentPrecompMordentUpperPrefix,
    OrnamentShortTrill,

    /// Left hook of an upprall line
    OrnamentBottomLeftConcaveStroke,
    /// Left stroke of a downprall line
    OrnamentLeftVerticalStroke,
    OrnamentZigZagLineNoRightEnd,
    OrnamentZigZagLineWithRightEnd,

    AccidentalFlat,
    AccidentalNatural,
    AccidentalSharp,
    AccidentalDoubleSharp,
    AccidentalDoubleFlat,
}

impl SymId {
    pub const ALL: [SymId; 15] = [
        SymId::NoSym,
        SymId::OrnamentTrill,
        SymId::WiggleTrill,
        SymId::OrnamentUpPrall,
        SymId::OrnamentPrecompMordentUpperPrefix,
        SymId::OrnamentShortTrill,
        SymId::OrnamentBottomLeftConcaveStroke,
        SymId::OrnamentLeftVerticalStroke,
        SymId::OrnamentZigZagLineNoRightEnd,
        SymId::OrnamentZigZagLineWithRightEnd,
        SymId::AccidentalFlat,
        SymId::AccidentalNatural,
        SymId::AccidentalSharp,
        SymId::AccidentalDoubleSharp,
        SymId::AccidentalDoubleFlat,
    ];

    /// SMuFL canonical glyph name
    pub fn smufl_name(&self) -> &'static str {
        match self {
            SymId::NoSym => "noSym",
            SymId::OrnamentTrill => "ornamentTrill",
            SymId::WiggleTrill => "wiggleTrill",
            SymId::OrnamentUpPrall => "ornamentUpPrall",
            SymId::OrnamentPrecompMordentUpperPrefix => "ornamentPrecompMordentUpperPrefix",
            SymId::OrnamentShortTrill => "ornamentShortTrill",
            SymId::OrnamentBottomLeftConcaveStroke => "ornamentBottomLeftConcaveStroke",
            SymId::OrnamentLeftVerticalStroke => "ornamentLeftVerticalStroke",
            SymId::OrnamentZigZagLineNoRightEnd => "ornamentZigZagLineNoRightEnd",
            SymId::OrnamentZigZagLineWithRightEnd => "ornamentZigZagLineWithRightEnd",
            SymId::AccidentalFlat => "accidentalFlat",
            SymId::AccidentalNatural => "accidentalNatural",
            SymId::AccidentalSharp => "accidentalSharp",
            SymId::AccidentalDoubleSharp => "accidentalDoubleSharp",
            SymId::AccidentalDoubleFlat => "accidentalDoubleFlat",
        }
    }

    pub fn from_smufl_name(name: &str) -> Option<SymId> {
        SymId::ALL.iter().copied().find(|sym| sym.smufl_name() == name)
    }

    pub fn is_accidental(&self) -> bool {
        matches!(
            self,
            SymId::AccidentalFlat
                | SymId::AccidentalNatural
                | SymId::AccidentalSharp
                | SymId::AccidentalDoubleSharp
                | SymId::AccidentalDoubleFlat
        )
    }
}
