use notation_engraving::models::{
    Accidental, Pid, Placement, PointF, PropertyValue, RectF, SegmentType, Style, SymId, Trill,
    TrillType,
};
use notation_engraving::renderers::{layout_trill, SegmentGeometry, SmuflFont};
use std::sync::Arc;

/// Round-number metrics so glyph counts are easy to check by hand
const METRICS: &str = r#"{
    "fontName": "Grid",
    "glyphAdvanceWidths": {
        "ornamentTrill": 1.0,
        "wiggleTrill": 0.5,
        "ornamentBottomLeftConcaveStroke": 0.5,
        "ornamentLeftVerticalStroke": 0.25,
        "ornamentZigZagLineNoRightEnd": 0.5,
        "ornamentZigZagLineWithRightEnd": 1.0,
        "accidentalSharp": 1.0
    },
    "glyphBBoxes": {
        "ornamentTrill": { "bBoxNE": [1.0, 1.5], "bBoxSW": [0.0, -0.5] },
        "wiggleTrill": { "bBoxNE": [0.5, 0.5], "bBoxSW": [0.0, 0.0] }
    }
}"#;

fn font() -> SmuflFont {
    SmuflFont::from_metadata_json(METRICS).unwrap()
}

fn trill(tt: TrillType) -> Trill {
    let style = Style {
        spatium: 10.0,
        ..Style::default()
    };
    let mut t = Trill::new(Arc::new(style));
    t.set_trill_type(tt);
    t
}

fn span(system: usize, x: f64, length: f64) -> SegmentGeometry {
    SegmentGeometry { system, x, length }
}

#[test]
fn test_trill_line_fills_with_wiggles() {
    let mut t = trill(TrillType::TrillLine);
    layout_trill(&mut t, &[span(0, 100.0, 60.0)], &font());

    assert_eq!(t.segments().len(), 1);
    let segment = &t.segments()[0];
    assert_eq!(segment.segment_type, SegmentType::Single);
    assert_eq!(segment.symbols().len(), 11);
    assert_eq!(segment.symbols()[0], SymId::OrnamentTrill);
    assert!(segment.symbols()[1..].iter().all(|s| *s == SymId::WiggleTrill));
    assert_eq!(segment.bbox(), RectF::new(0.0, -15.0, 60.0, 20.0));
}

#[test]
fn test_segment_position_uses_styled_offset() {
    let mut t = trill(TrillType::TrillLine);
    layout_trill(&mut t, &[span(0, 100.0, 60.0)], &font());
    let segment = &t.segments()[0];
    assert_eq!(segment.pos, PointF::new(100.0, -10.0));
    assert_eq!(segment.pos2, PointF::new(60.0, 0.0));

    t.set_property(Pid::Placement, &PropertyValue::Placement(Placement::Below))
        .unwrap();
    layout_trill(&mut t, &[span(0, 100.0, 60.0)], &font());
    assert_eq!(t.segments()[0].pos, PointF::new(100.0, 10.0));
}

#[test]
fn test_prallprall_starts_with_a_wiggle() {
    let mut t = trill(TrillType::PrallprallLine);
    layout_trill(&mut t, &[span(0, 0.0, 60.0)], &font());
    let symbols = t.segments()[0].symbols();
    assert_eq!(symbols.len(), 12);
    assert!(symbols.iter().all(|s| *s == SymId::WiggleTrill));
}

#[test]
fn test_upprall_closes_with_right_end() {
    let mut t = trill(TrillType::UpprallLine);
    layout_trill(&mut t, &[span(0, 0.0, 60.0)], &font());
    let symbols = t.segments()[0].symbols();
    assert_eq!(symbols.len(), 11);
    assert_eq!(symbols[0], SymId::OrnamentBottomLeftConcaveStroke);
    assert!(symbols[1..10]
        .iter()
        .all(|s| *s == SymId::OrnamentZigZagLineNoRightEnd));
    assert_eq!(symbols[10], SymId::OrnamentZigZagLineWithRightEnd);
}

#[test]
fn test_downprall_fill_rounds_half_to_even() {
    // 60 - 2.5 - 10 leaves room for 9.5 zig-zags, rounded to 10
    let mut t = trill(TrillType::DownprallLine);
    layout_trill(&mut t, &[span(0, 0.0, 60.0)], &font());
    let symbols = t.segments()[0].symbols();
    assert_eq!(symbols.len(), 12);
    assert_eq!(symbols[0], SymId::OrnamentLeftVerticalStroke);
    assert_eq!(symbols[11], SymId::OrnamentZigZagLineWithRightEnd);
}

#[test]
fn test_short_span_keeps_only_the_start_glyph() {
    let mut t = trill(TrillType::TrillLine);
    layout_trill(&mut t, &[span(0, 0.0, 4.0)], &font());
    assert_eq!(t.segments()[0].symbols(), &[SymId::OrnamentTrill]);
}

#[test]
fn test_multi_system_trill() {
    let mut t = trill(TrillType::UpprallLine);
    let spans = [span(0, 200.0, 60.0), span(1, 20.0, 60.0), span(2, 20.0, 30.0)];
    layout_trill(&mut t, &spans, &font());

    let types: Vec<SegmentType> = t.segments().iter().map(|s| s.segment_type).collect();
    assert_eq!(
        types,
        vec![SegmentType::Begin, SegmentType::Middle, SegmentType::End]
    );
    assert_eq!(t.segments()[0].symbols()[0], SymId::OrnamentBottomLeftConcaveStroke);

    let middle = &t.segments()[1];
    assert_eq!(middle.system, 1);
    assert_eq!(middle.symbols().len(), 12);
    assert!(middle.symbols().iter().all(|s| *s == SymId::WiggleTrill));
    assert_eq!(t.segments()[2].symbols().len(), 6);
}

#[test]
fn test_relayout_drops_extra_segments() {
    let mut t = trill(TrillType::TrillLine);
    layout_trill(&mut t, &[span(0, 0.0, 60.0), span(1, 0.0, 60.0)], &font());
    assert_eq!(t.segments().len(), 2);

    layout_trill(&mut t, &[span(3, 0.0, 60.0)], &font());
    assert_eq!(t.segments().len(), 1);
    assert_eq!(t.segments()[0].system, 3);
    assert_eq!(t.segments()[0].segment_type, SegmentType::Single);
    assert_eq!(t.segments()[0].symbols()[0], SymId::OrnamentTrill);
}

#[test]
fn test_accidental_is_placed_above_start() {
    let mut t = trill(TrillType::TrillLine);
    t.set_accidental(Some(Accidental::new(SymId::AccidentalSharp)));
    layout_trill(&mut t, &[span(0, 0.0, 60.0)], &font());

    let accidental = t.accidental().unwrap();
    assert_eq!(accidental.mag, 0.6);
    assert!((accidental.pos.x - 13.0).abs() < 1e-9);
    assert!((accidental.pos.y + 22.0).abs() < 1e-9);
}

#[test]
fn test_layout_clears_pending_flag() {
    let mut t = trill(TrillType::TrillLine);
    assert!(t.layout_pending());
    layout_trill(&mut t, &[span(0, 0.0, 60.0)], &font());
    assert!(!t.layout_pending());
}

#[test]
fn test_builtin_font_lays_out_every_type() {
    for tt in TrillType::ALL {
        let mut t = trill(tt);
        layout_trill(&mut t, &[span(0, 0.0, 200.0)], SmuflFont::builtin());
        let segment = &t.segments()[0];
        assert!(segment.symbols().len() > 1, "{:?}", tt);
        assert!(!segment.bbox().is_null());
    }
}

#[test]
fn test_huge_span_caps_fill_glyphs() {
    let mut t = trill(TrillType::TrillLine);
    layout_trill(&mut t, &[span(0, 0.0, 1e300)], SmuflFont::builtin());
    let symbols = t.segments()[0].symbols();
    assert_eq!(symbols.len(), 4097);
    assert_eq!(symbols[0], SymId::OrnamentTrill);
    assert!(!t.layout_pending());
}

#[test]
fn test_non_finite_or_negative_span_is_empty() {
    let mut t = trill(TrillType::UpprallLine);
    let spans = [
        span(0, f64::NAN, f64::INFINITY),
        span(1, 0.0, -50.0),
    ];
    layout_trill(&mut t, &spans, &font());

    for segment in t.segments() {
        assert_eq!(segment.pos2.x, 0.0);
        assert!(segment.pos.x.is_finite());
    }
    assert_eq!(
        t.segments()[0].symbols(),
        &[
            SymId::OrnamentBottomLeftConcaveStroke,
            SymId::OrnamentZigZagLineWithRightEnd
        ]
    );
}
