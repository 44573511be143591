//! Trill line
//!
//! A trill is a line spanner drawn as a run of wiggle glyphs, optionally led
//! by an ornament sign. The spanner owns one [`TrillSegment`] per system it
//! crosses, an [`Ornament`] describing the played figure, an optional
//! [`Accidental`] for the auxiliary note and an optional cue note chord.
//!
//! Segments delegate the spanner-level properties (type, ornament style,
//! placement and playback) to the trill and keep their own offset and
//! minimum distance.

use super::geometry::{PointF, RectF};
use super::line::LineBase;
use super::properties::{
    Color, OrnamentStyle, Pid, Placement, PropertyError, PropertyFlags, PropertyValue,
};
use super::style::{ElementStyle, Sid, Style, StyleValue};
use super::symbols::SymId;
use crate::renderers::font_metrics::EngravingFont;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::sync::Arc;
use uuid::Uuid;

const TRILL_STYLE: ElementStyle = &[
    (Sid::TrillPlacement, Pid::Placement),
    (Sid::TrillPosAbove, Pid::Offset),
];

const TRILL_SEGMENT_STYLE: ElementStyle = &[
    (Sid::TrillPosAbove, Pid::Offset),
    (Sid::TrillMinDistance, Pid::MinDistance),
];

/// Kind of trill line; the integer value is what the TRILL_TYPE property carries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum TrillType {
    #[default]
    TrillLine = 0,
    UpprallLine = 1,
    DownprallLine = 2,
    PrallprallLine = 3,
}

impl TrillType {
    pub const ALL: [TrillType; 4] = [
        TrillType::TrillLine,
        TrillType::UpprallLine,
        TrillType::DownprallLine,
        TrillType::PrallprallLine,
    ];

    pub fn xml_name(&self) -> &'static str {
        match self {
            TrillType::TrillLine => "trill",
            TrillType::UpprallLine => "upprall",
            TrillType::DownprallLine => "downprall",
            TrillType::PrallprallLine => "prallprall",
        }
    }

    pub fn from_xml_name(name: &str) -> Option<TrillType> {
        TrillType::ALL.iter().copied().find(|tt| tt.xml_name() == name)
    }

    pub fn user_name(&self) -> &'static str {
        match self {
            TrillType::TrillLine => "Trill line",
            TrillType::UpprallLine => "Upprall line",
            TrillType::DownprallLine => "Downprall line",
            TrillType::PrallprallLine => "Prallprall line",
        }
    }
}

impl TryFrom<i32> for TrillType {
    type Error = PropertyError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        TrillType::ALL
            .iter()
            .copied()
            .find(|tt| *tt as i32 == value)
            .ok_or(PropertyError::InvalidTrillType(value))
    }
}

/// Identity shared by elements linked across score and parts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinkId(Uuid);

impl LinkId {
    pub fn new() -> Self {
        LinkId(Uuid::new_v4())
    }
}

impl Default for LinkId {
    fn default() -> Self {
        Self::new()
    }
}

/// Ornament sign carried by a trill
#[derive(Debug, PartialEq)]
pub struct Ornament {
    pub sym: SymId,
    pub track: usize,
    links: Option<LinkId>,
}

impl Clone for Ornament {
    /// Copies are independent; links are not carried over
    fn clone(&self) -> Self {
        Self {
            sym: self.sym,
            track: self.track,
            links: None,
        }
    }
}

impl Ornament {
    pub fn new(sym: SymId) -> Self {
        Self {
            sym,
            track: 0,
            links: None,
        }
    }

    /// Ornament glyph standing for a trill type
    pub fn from_trill_type(tt: TrillType) -> SymId {
        match tt {
            TrillType::TrillLine => SymId::OrnamentTrill,
            TrillType::UpprallLine => SymId::OrnamentUpPrall,
            TrillType::DownprallLine => SymId::OrnamentPrecompMordentUpperPrefix,
            TrillType::PrallprallLine => SymId::OrnamentShortTrill,
        }
    }

    pub fn links(&self) -> Option<LinkId> {
        self.links
    }

    /// Copy that stays linked to this ornament
    pub fn linked_clone(&mut self) -> Ornament {
        let id = *self.links.get_or_insert_with(LinkId::new);
        Ornament {
            links: Some(id),
            ..self.clone()
        }
    }
}

/// Accidental of the trill's auxiliary note
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Accidental {
    pub sym: SymId,
    /// Position relative to the first trill segment, raster units
    pub pos: PointF,
    pub mag: f64,
    pub track: usize,
}

impl Accidental {
    pub fn new(sym: SymId) -> Self {
        Self {
            sym,
            pos: PointF::default(),
            mag: 1.0,
            track: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI pitch
    pub pitch: i32,
    pub track: usize,
}

/// Small chord showing the notes a trill alternates with
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub notes: Vec<Note>,
    pub small: bool,
    pub track: usize,
}

impl Chord {
    pub fn scan_elements<'a>(&'a self, func: &mut dyn FnMut(ElementRef<'a>)) {
        func(ElementRef::Chord(self));
        for note in &self.notes {
            func(ElementRef::Note(note));
        }
    }
}

/// Borrowed view of any element reachable from a trill
#[derive(Clone, Copy, Debug)]
pub enum ElementRef<'a> {
    TrillSegment(&'a TrillSegment),
    Accidental(&'a Accidental),
    Chord(&'a Chord),
    Note(&'a Note),
}

/// Where a segment sits within its spanner
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentType {
    #[default]
    Single,
    Begin,
    Middle,
    End,
}

/// Which element answers for a property asked of a segment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyOwner {
    Spanner,
    Segment,
}

/// Part of a trill laid out on one system
#[derive(Clone, Debug, PartialEq)]
pub struct TrillSegment {
    pub segment_type: SegmentType,
    /// Index of the system this segment is laid out on
    pub system: usize,
    /// Segment origin, raster units
    pub pos: PointF,
    /// End point relative to `pos`
    pub pos2: PointF,
    /// Element magnification
    pub mag: f64,
    pub base: LineBase,
    symbols: Vec<SymId>,
    bbox: RectF,
}

impl TrillSegment {
    fn new(system: usize) -> Self {
        Self {
            segment_type: SegmentType::Single,
            system,
            pos: PointF::default(),
            pos2: PointF::default(),
            mag: 1.0,
            base: LineBase::new(),
            symbols: Vec::new(),
            bbox: RectF::default(),
        }
    }

    pub fn symbols(&self) -> &[SymId] {
        &self.symbols
    }

    pub fn bbox(&self) -> RectF {
        self.bbox
    }

    pub fn is_single_type(&self) -> bool {
        self.segment_type == SegmentType::Single
    }

    pub fn is_begin_type(&self) -> bool {
        self.segment_type == SegmentType::Begin
    }

    /// Scale from staff spaces to raster units for this segment
    pub fn mag_s(&self, style: &Style) -> f64 {
        self.mag * style.spatium
    }

    /// Fill the segment width with `start` followed by repeated `fill` glyphs
    pub fn symbol_line(&mut self, font: &dyn EngravingFont, mag: f64, start: SymId, fill: SymId) {
        let width = self.pos2.x;
        let start_width = font.advance(start, mag);
        let count = fill_count(width - start_width, font.advance(fill, mag), fill);

        self.symbols.clear();
        self.symbols.push(start);
        self.symbols.extend(std::iter::repeat(fill).take(count));
        self.bbox = font.bbox_of(&self.symbols, mag);
    }

    /// Like [`symbol_line`](Self::symbol_line) but closed by an `end` glyph
    pub fn symbol_line_with_end(
        &mut self,
        font: &dyn EngravingFont,
        mag: f64,
        start: SymId,
        fill: SymId,
        end: SymId,
    ) {
        let width = self.pos2.x;
        let start_width = font.advance(start, mag);
        let end_width = font.advance(end, mag);
        let count = fill_count(width - start_width - end_width, font.advance(fill, mag), fill);

        self.symbols.clear();
        self.symbols.push(start);
        self.symbols.extend(std::iter::repeat(fill).take(count));
        self.symbols.push(end);
        self.bbox = font.bbox_of(&self.symbols, mag);
    }

    /// Visit this segment and, on the first segment, the trill's accidental
    /// and cue note chord
    pub fn scan_elements<'a>(&'a self, trill: &'a Trill, func: &mut dyn FnMut(ElementRef<'a>)) {
        func(ElementRef::TrillSegment(self));
        if self.is_single_type() || self.is_begin_type() {
            if let Some(accidental) = trill.accidental() {
                func(ElementRef::Accidental(accidental));
            }
            if let Some(chord) = trill.cue_note_chord() {
                chord.scan_elements(func);
            }
        }
    }

    pub fn property_delegate(pid: Pid) -> PropertyOwner {
        match pid {
            Pid::TrillType | Pid::OrnamentStyle | Pid::Placement | Pid::Play => PropertyOwner::Spanner,
            _ => PropertyOwner::Segment,
        }
    }

    /// Style value a segment property follows, given the spanner placement
    pub fn get_property_style(&self, placement: Placement, pid: Pid) -> Option<Sid> {
        match pid {
            Pid::Offset => Some(offset_sid(placement)),
            _ => self.base.styled_sid(pid),
        }
    }
}

fn offset_sid(placement: Placement) -> Sid {
    match placement {
        Placement::Above => Sid::TrillPosAbove,
        Placement::Below => Sid::TrillPosBelow,
    }
}

/// Upper bound on fill glyphs in one segment
const MAX_FILL_COUNT: usize = 4096;

fn fill_count(space: f64, fill_width: f64, fill: SymId) -> usize {
    if fill_width <= 0.0 {
        log::warn!("Fill glyph {} has no width, trill line left empty", fill.smufl_name());
        return 0;
    }
    let n = (space / fill_width).round_ties_even();
    if n.is_nan() || n <= 0.0 {
        return 0;
    }
    if n > MAX_FILL_COUNT as f64 {
        log::warn!(
            "Trill line needs {} x {}, capped at {}",
            n,
            fill.smufl_name(),
            MAX_FILL_COUNT
        );
        return MAX_FILL_COUNT;
    }
    n as usize
}

/// Trill line spanner
#[derive(Debug)]
pub struct Trill {
    trill_type: TrillType,
    ornament: Option<Ornament>,
    accidental: Option<Accidental>,
    cue_note_chord: Option<Chord>,
    ornament_style: OrnamentStyle,
    play_articulation: bool,
    pub base: LineBase,
    segments: Vec<TrillSegment>,
    links: Option<LinkId>,
    layout_pending: bool,
    style: Arc<Style>,
}

impl Clone for Trill {
    /// Accidental, cue notes and links stay with the copied-from trill
    fn clone(&self) -> Self {
        Self {
            trill_type: self.trill_type,
            ornament: self.ornament.clone(),
            accidental: None,
            cue_note_chord: None,
            ornament_style: self.ornament_style,
            play_articulation: self.play_articulation,
            base: self.base.clone(),
            segments: self.segments.clone(),
            links: None,
            layout_pending: true,
            style: Arc::clone(&self.style),
        }
    }
}

impl Trill {
    pub fn new(style: Arc<Style>) -> Self {
        let mut base = LineBase::new();
        base.init_element_style(TRILL_STYLE, &style);
        let mut trill = Self {
            trill_type: TrillType::TrillLine,
            ornament: None,
            accidental: None,
            cue_note_chord: None,
            ornament_style: OrnamentStyle::Default,
            play_articulation: true,
            base,
            segments: Vec::new(),
            links: None,
            layout_pending: true,
            style,
        };
        // offset style depends on placement
        trill.restyle_offsets();
        trill
    }

    pub fn trill_type(&self) -> TrillType {
        self.trill_type
    }

    /// Change the trill type and keep the ornament glyph in step
    pub fn set_trill_type(&mut self, tt: TrillType) {
        self.trill_type = tt;
        let track = self.base.track;
        // the ornament is attached to its chord during layout
        let ornament = self
            .ornament
            .get_or_insert_with(|| Ornament::new(SymId::NoSym));
        ornament.track = track;
        ornament.sym = Ornament::from_trill_type(tt);
    }

    pub fn ornament(&self) -> Option<&Ornament> {
        self.ornament.as_ref()
    }

    pub fn set_ornament(&mut self, ornament: Option<Ornament>) {
        self.ornament = ornament;
    }

    pub fn accidental(&self) -> Option<&Accidental> {
        self.accidental.as_ref()
    }

    pub fn accidental_mut(&mut self) -> Option<&mut Accidental> {
        self.accidental.as_mut()
    }

    pub fn set_accidental(&mut self, accidental: Option<Accidental>) {
        self.accidental = accidental;
    }

    /// Detach the accidental, from the trill or any of its segments
    pub fn remove_accidental(&mut self) -> Option<Accidental> {
        let removed = self.accidental.take();
        if removed.is_some() {
            log::debug!("Removed accidental from trill");
            self.trigger_layout();
        }
        removed
    }

    pub fn cue_note_chord(&self) -> Option<&Chord> {
        self.cue_note_chord.as_ref()
    }

    pub fn set_cue_note_chord(&mut self, chord: Option<Chord>) {
        self.cue_note_chord = chord;
    }

    pub fn ornament_style(&self) -> OrnamentStyle {
        self.ornament_style
    }

    pub fn set_ornament_style(&mut self, style: OrnamentStyle) {
        self.ornament_style = style;
    }

    pub fn play_articulation(&self) -> bool {
        self.play_articulation
    }

    pub fn set_play_articulation(&mut self, play: bool) {
        self.play_articulation = play;
    }

    pub fn track(&self) -> usize {
        self.base.track
    }

    /// Move the trill, its segments and its ornament to track `n`
    pub fn set_track(&mut self, n: usize) {
        self.base.track = n;
        for segment in &mut self.segments {
            segment.base.track = n;
        }
        if let Some(ornament) = &mut self.ornament {
            ornament.track = n;
        }
    }

    pub fn color(&self) -> Color {
        self.base.color
    }

    pub fn placement(&self) -> Placement {
        self.base.placement
    }

    pub fn place_above(&self) -> bool {
        self.base.placement == Placement::Above
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Switch to another score style and refresh styled properties
    pub fn set_style(&mut self, style: Arc<Style>) {
        self.style = style;
        self.style_changed();
    }

    pub fn segments(&self) -> &[TrillSegment] {
        &self.segments
    }

    pub fn segments_mut(&mut self) -> &mut Vec<TrillSegment> {
        &mut self.segments
    }

    pub fn links(&self) -> Option<LinkId> {
        self.links
    }

    pub fn is_linked_to(&self, other: &Trill) -> bool {
        matches!((self.links, other.links), (Some(a), Some(b)) if a == b)
    }

    pub fn layout_pending(&self) -> bool {
        self.layout_pending
    }

    pub fn trigger_layout(&mut self) {
        self.layout_pending = true;
    }

    pub(crate) fn layout_done(&mut self) {
        self.layout_pending = false;
    }

    /// Clone for a linked part: ornament linked too, autoplace switched on
    pub fn linked_clone(&mut self) -> Trill {
        let mut linked = self.clone();
        linked.ornament = self.ornament.as_mut().map(Ornament::linked_clone);
        linked.base.autoplace = true;
        let id = *self.links.get_or_insert_with(LinkId::new);
        linked.links = Some(id);
        log::debug!("Created linked trill on track {}", linked.track());
        linked
    }

    /// Append a segment for `system`, carrying the trill's track and color
    pub fn create_line_segment(&mut self, system: usize) -> &mut TrillSegment {
        let mut segment = TrillSegment::new(system);
        segment.base.track = self.base.track;
        segment.base.color = self.base.color;
        segment.base.init_element_style(TRILL_SEGMENT_STYLE, &self.style);
        let sid = segment.get_property_style(self.base.placement, Pid::Offset);
        if let Some(sid) = sid {
            segment.base.offset = point_style(&self.style, sid);
        }
        self.segments.push(segment);
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    /// Visit every segment and what hangs off the first one
    pub fn scan_elements<'a>(&'a self, func: &mut dyn FnMut(ElementRef<'a>)) {
        for segment in &self.segments {
            segment.scan_elements(self, func);
        }
    }

    pub fn trill_type_user_name(&self) -> &'static str {
        self.trill_type.user_name()
    }

    pub fn accessible_info(&self) -> String {
        format!("Trill: {}", self.trill_type_user_name())
    }

    pub fn get_property_style(&self, pid: Pid) -> Option<Sid> {
        match pid {
            Pid::Offset => Some(offset_sid(self.base.placement)),
            _ => self.base.styled_sid(pid),
        }
    }

    pub fn property_flags(&self, pid: Pid) -> PropertyFlags {
        self.base.property_flags(pid)
    }

    pub fn get_property(&self, pid: Pid) -> Option<PropertyValue> {
        match pid {
            Pid::TrillType => Some(PropertyValue::Int(self.trill_type as i32)),
            Pid::OrnamentStyle => Some(PropertyValue::OrnamentStyle(self.ornament_style)),
            Pid::Play => Some(PropertyValue::Bool(self.play_articulation)),
            _ => self.base.get_property(pid),
        }
    }

    pub fn set_property(&mut self, pid: Pid, value: &PropertyValue) -> Result<(), PropertyError> {
        match pid {
            Pid::TrillType => {
                let tt = value.to_trill_type().map_err(|e| e.for_pid(pid))?;
                self.set_trill_type(tt);
            }
            Pid::Play => {
                let play = value.to_bool().map_err(|e| e.for_pid(pid))?;
                self.set_play_articulation(play);
            }
            Pid::OrnamentStyle => {
                let style = value.to_ornament_style().map_err(|e| e.for_pid(pid))?;
                self.set_ornament_style(style);
            }
            _ => {
                if !self.base.set_property(pid, value)? {
                    return Err(PropertyError::Unsupported(pid));
                }
                self.propagate(pid);
            }
        }
        self.trigger_layout();
        Ok(())
    }

    pub fn property_default(&self, pid: Pid) -> Option<PropertyValue> {
        match pid {
            Pid::TrillType => Some(PropertyValue::Int(0)),
            Pid::OrnamentStyle => Some(PropertyValue::OrnamentStyle(OrnamentStyle::Default)),
            Pid::Play => Some(PropertyValue::Bool(true)),
            Pid::Placement => Some(self.style.value(Sid::TrillPlacement).into()),
            Pid::Offset => self
                .get_property_style(Pid::Offset)
                .map(|sid| self.style.value(sid).into()),
            _ => self.base.property_default(pid),
        }
    }

    /// Restore a property to its default; style-bound properties follow the style again
    pub fn reset_property(&mut self, pid: Pid) -> Result<(), PropertyError> {
        let value = self
            .property_default(pid)
            .ok_or(PropertyError::Unsupported(pid))?;
        match pid {
            Pid::TrillType | Pid::OrnamentStyle | Pid::Play => self.set_property(pid, &value),
            _ => {
                if !self.base.reset_property(pid, &value)? {
                    return Err(PropertyError::Unsupported(pid));
                }
                self.propagate(pid);
                self.trigger_layout();
                Ok(())
            }
        }
    }

    /// Re-read every property that still follows the score style
    pub fn style_changed(&mut self) {
        self.base.style_changed(&self.style, |_| None);
        for segment in &mut self.segments {
            segment.base.style_changed(&self.style, |_| None);
        }
        self.restyle_offsets();
        self.trigger_layout();
    }

    /// Property of segment `idx`, answered by the segment or the trill
    pub fn segment_property(&self, idx: usize, pid: Pid) -> Option<PropertyValue> {
        let segment = self.segments.get(idx)?;
        match TrillSegment::property_delegate(pid) {
            PropertyOwner::Spanner => self.get_property(pid),
            PropertyOwner::Segment => segment.base.get_property(pid),
        }
    }

    pub fn set_segment_property(
        &mut self,
        idx: usize,
        pid: Pid,
        value: &PropertyValue,
    ) -> Result<(), PropertyError> {
        if idx >= self.segments.len() {
            return Err(PropertyError::NoSuchSegment(idx));
        }
        match TrillSegment::property_delegate(pid) {
            PropertyOwner::Spanner => self.set_property(pid, value),
            PropertyOwner::Segment => {
                if !self.segments[idx].base.set_property(pid, value)? {
                    return Err(PropertyError::Unsupported(pid));
                }
                self.trigger_layout();
                Ok(())
            }
        }
    }

    /// Carry a changed line property over to what depends on it
    fn propagate(&mut self, pid: Pid) {
        match pid {
            Pid::Color => {
                let color = self.base.color;
                for segment in &mut self.segments {
                    segment.base.color = color;
                }
            }
            Pid::Placement => self.restyle_offsets(),
            _ => {}
        }
    }

    /// Offsets still following the style track the placement side
    fn restyle_offsets(&mut self) {
        let sid = offset_sid(self.base.placement);
        let offset = point_style(&self.style, sid);
        if self.base.property_flags(Pid::Offset) == PropertyFlags::Styled {
            self.base.offset = offset;
        }
        for segment in &mut self.segments {
            if segment.base.property_flags(Pid::Offset) == PropertyFlags::Styled {
                segment.base.offset = offset;
            }
        }
    }
}

fn point_style(style: &Style, sid: Sid) -> PointF {
    match style.value(sid) {
        StyleValue::Point(p) => p,
        other => {
            log::warn!("Style {:?} is not a point: {:?}", sid, other);
            PointF::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trill() -> Trill {
        Trill::new(Arc::new(Style::default()))
    }

    #[test]
    fn test_new_trill_defaults() {
        let t = trill();
        assert_eq!(t.trill_type(), TrillType::TrillLine);
        assert!(t.ornament().is_none());
        assert!(t.play_articulation());
        assert_eq!(t.placement(), Placement::Above);
        assert_eq!(t.base.offset, PointF::new(0.0, -1.0));
        assert_eq!(t.property_flags(Pid::Placement), PropertyFlags::Styled);
    }

    #[test]
    fn test_set_trill_type_creates_ornament_on_track() {
        let mut t = trill();
        t.set_track(3);
        t.set_trill_type(TrillType::UpprallLine);
        let ornament = t.ornament().unwrap();
        assert_eq!(ornament.sym, SymId::OrnamentUpPrall);
        assert_eq!(ornament.track, 3);
    }

    #[test]
    fn test_trill_type_from_int() {
        assert_eq!(TrillType::try_from(2), Ok(TrillType::DownprallLine));
        assert_eq!(TrillType::try_from(7), Err(PropertyError::InvalidTrillType(7)));
    }

    #[test]
    fn test_fill_count_rounds_half_to_even() {
        assert_eq!(fill_count(2.5, 1.0, SymId::WiggleTrill), 2);
        assert_eq!(fill_count(3.5, 1.0, SymId::WiggleTrill), 4);
        assert_eq!(fill_count(-1.0, 1.0, SymId::WiggleTrill), 0);
        assert_eq!(fill_count(5.0, 0.0, SymId::WiggleTrill), 0);
    }

    #[test]
    fn test_fill_count_is_bounded() {
        assert_eq!(fill_count(1e300, 1.0, SymId::WiggleTrill), MAX_FILL_COUNT);
        assert_eq!(fill_count(f64::INFINITY, 1.0, SymId::WiggleTrill), MAX_FILL_COUNT);
        assert_eq!(fill_count(f64::NAN, 1.0, SymId::WiggleTrill), 0);
    }

    #[test]
    fn test_segment_delegates_spanner_properties() {
        assert_eq!(TrillSegment::property_delegate(Pid::Play), PropertyOwner::Spanner);
        assert_eq!(TrillSegment::property_delegate(Pid::Placement), PropertyOwner::Spanner);
        assert_eq!(TrillSegment::property_delegate(Pid::Offset), PropertyOwner::Segment);
        assert_eq!(TrillSegment::property_delegate(Pid::MinDistance), PropertyOwner::Segment);
    }
}
