use notation_engraving::models::{
    Accidental, Chord, Color, ElementRef, Note, OrnamentStyle, Pid, Placement, PointF,
    PropertyError, PropertyFlags, PropertyOwner, PropertyValue, SegmentType, Sid, Style, SymId,
    Trill, TrillSegment, TrillType,
};
use notation_engraving::renderers::{layout_trill, SmuflFont};
use std::sync::Arc;

fn trill() -> Trill {
    Trill::new(Arc::new(Style::default()))
}

#[test]
fn test_trill_type_property_is_an_int() {
    let mut t = trill();
    assert_eq!(t.get_property(Pid::TrillType), Some(PropertyValue::Int(0)));

    t.set_property(Pid::TrillType, &PropertyValue::Int(3)).unwrap();
    assert_eq!(t.trill_type(), TrillType::PrallprallLine);
    assert_eq!(t.get_property(Pid::TrillType), Some(PropertyValue::Int(3)));
    assert_eq!(t.ornament().unwrap().sym, SymId::OrnamentShortTrill);

    t.set_property(Pid::TrillType, &PropertyValue::TrillType(TrillType::DownprallLine))
        .unwrap();
    assert_eq!(t.ornament().unwrap().sym, SymId::OrnamentPrecompMordentUpperPrefix);

    assert_eq!(
        t.set_property(Pid::TrillType, &PropertyValue::Int(12)),
        Err(PropertyError::InvalidTrillType(12))
    );
}

#[test]
fn test_set_property_triggers_layout() {
    let mut t = trill();
    layout_trill(&mut t, &[], SmuflFont::builtin());
    assert!(!t.layout_pending());

    t.set_property(Pid::Play, &PropertyValue::Bool(false)).unwrap();
    assert!(t.layout_pending());
    assert!(!t.play_articulation());
}

#[test]
fn test_wrong_value_type_is_rejected() {
    let mut t = trill();
    let err = t
        .set_property(Pid::OrnamentStyle, &PropertyValue::Bool(true))
        .unwrap_err();
    assert!(matches!(
        err,
        PropertyError::TypeMismatch {
            pid: Some(Pid::OrnamentStyle),
            ..
        }
    ));
    assert_eq!(t.ornament_style(), OrnamentStyle::Default);
}

#[test]
fn test_property_defaults() {
    let mut style = Style::default();
    style.trill_placement = Placement::Below;
    let t = Trill::new(Arc::new(style));

    assert_eq!(t.property_default(Pid::TrillType), Some(PropertyValue::Int(0)));
    assert_eq!(t.property_default(Pid::Play), Some(PropertyValue::Bool(true)));
    assert_eq!(
        t.property_default(Pid::OrnamentStyle),
        Some(PropertyValue::OrnamentStyle(OrnamentStyle::Default))
    );
    assert_eq!(
        t.property_default(Pid::Placement),
        Some(PropertyValue::Placement(Placement::Below))
    );
    assert_eq!(
        t.property_default(Pid::Color),
        Some(PropertyValue::Color(Color::BLACK))
    );
}

#[test]
fn test_offset_style_follows_placement() {
    let mut t = trill();
    assert_eq!(t.get_property_style(Pid::Offset), Some(Sid::TrillPosAbove));
    assert_eq!(t.base.offset, PointF::new(0.0, -1.0));

    t.set_property(Pid::Placement, &PropertyValue::Placement(Placement::Below))
        .unwrap();
    assert_eq!(t.get_property_style(Pid::Offset), Some(Sid::TrillPosBelow));
    assert_eq!(t.base.offset, PointF::new(0.0, 1.0));
    assert_eq!(t.property_flags(Pid::Placement), PropertyFlags::Unstyled);
    assert_eq!(t.property_flags(Pid::Offset), PropertyFlags::Styled);
}

#[test]
fn test_user_offset_survives_placement_change() {
    let mut t = trill();
    t.set_property(Pid::Offset, &PropertyValue::Point(PointF::new(0.5, -3.0)))
        .unwrap();
    t.set_property(Pid::Placement, &PropertyValue::Placement(Placement::Below))
        .unwrap();
    assert_eq!(t.base.offset, PointF::new(0.5, -3.0));

    t.reset_property(Pid::Offset).unwrap();
    assert_eq!(t.base.offset, PointF::new(0.0, 1.0));
    assert_eq!(t.property_flags(Pid::Offset), PropertyFlags::Styled);
}

#[test]
fn test_style_change_reaches_styled_properties() {
    let mut t = trill();
    t.create_line_segment(0);
    t.set_property(Pid::Color, &PropertyValue::Color(Color::new(255, 0, 0, 255)))
        .unwrap();

    let mut style = Style::default();
    style.trill_pos_above = PointF::new(0.0, -2.5);
    style.trill_min_distance = 0.75;
    t.set_style(Arc::new(style));

    assert_eq!(t.base.offset, PointF::new(0.0, -2.5));
    assert_eq!(t.segments()[0].base.offset, PointF::new(0.0, -2.5));
    assert_eq!(t.segments()[0].base.min_distance, 0.75);
    assert_eq!(t.color(), Color::new(255, 0, 0, 255));
}

#[test]
fn test_color_reaches_segments() {
    let mut t = trill();
    t.create_line_segment(0);
    t.create_line_segment(1);
    let red = Color::new(200, 0, 0, 255);
    t.set_property(Pid::Color, &PropertyValue::Color(red)).unwrap();
    assert!(t.segments().iter().all(|s| s.base.color == red));

    let blue = Color::new(0, 0, 200, 255);
    t.set_property(Pid::Color, &PropertyValue::Color(blue)).unwrap();
    assert_eq!(t.create_line_segment(2).base.color, blue);
}

#[test]
fn test_set_track_moves_segments_and_ornament() {
    let mut t = trill();
    t.set_trill_type(TrillType::TrillLine);
    t.create_line_segment(0);
    t.set_track(5);
    assert_eq!(t.track(), 5);
    assert_eq!(t.segments()[0].base.track, 5);
    assert_eq!(t.ornament().unwrap().track, 5);
    assert_eq!(t.create_line_segment(1).base.track, 5);
}

#[test]
fn test_segment_properties_delegate_to_trill() {
    let mut t = trill();
    t.create_line_segment(0);

    assert_eq!(TrillSegment::property_delegate(Pid::TrillType), PropertyOwner::Spanner);
    assert_eq!(TrillSegment::property_delegate(Pid::OrnamentStyle), PropertyOwner::Spanner);

    t.set_segment_property(0, Pid::Play, &PropertyValue::Bool(false))
        .unwrap();
    assert!(!t.play_articulation());
    assert_eq!(t.segment_property(0, Pid::Play), Some(PropertyValue::Bool(false)));

    t.set_segment_property(0, Pid::MinDistance, &PropertyValue::Double(2.0))
        .unwrap();
    assert_eq!(t.segments()[0].base.min_distance, 2.0);
    assert_eq!(t.base.min_distance, 0.0);

    assert_eq!(
        t.set_segment_property(4, Pid::Play, &PropertyValue::Bool(true)),
        Err(PropertyError::NoSuchSegment(4))
    );
    assert_eq!(t.segment_property(4, Pid::Play), None);
}

#[test]
fn test_scan_visits_accidental_and_cue_notes_on_first_segment_only() {
    let mut t = trill();
    t.set_accidental(Some(Accidental::new(SymId::AccidentalSharp)));
    t.set_cue_note_chord(Some(Chord {
        notes: vec![Note { pitch: 62, track: 0 }, Note { pitch: 64, track: 0 }],
        small: true,
        track: 0,
    }));
    t.create_line_segment(0).segment_type = SegmentType::Begin;
    t.create_line_segment(1).segment_type = SegmentType::End;

    let mut kinds = Vec::new();
    t.scan_elements(&mut |e| {
        kinds.push(match e {
            ElementRef::TrillSegment(_) => "segment",
            ElementRef::Accidental(_) => "accidental",
            ElementRef::Chord(_) => "chord",
            ElementRef::Note(_) => "note",
        })
    });
    assert_eq!(
        kinds,
        vec!["segment", "accidental", "chord", "note", "note", "segment"]
    );
}

#[test]
fn test_remove_accidental() {
    let mut t = trill();
    t.set_accidental(Some(Accidental::new(SymId::AccidentalFlat)));
    let removed = t.remove_accidental().unwrap();
    assert_eq!(removed.sym, SymId::AccidentalFlat);
    assert!(t.accidental().is_none());
    assert!(t.remove_accidental().is_none());
}

#[test]
fn test_clone_leaves_accidental_behind() {
    let mut t = trill();
    t.set_trill_type(TrillType::UpprallLine);
    t.set_ornament_style(OrnamentStyle::Baroque);
    t.set_accidental(Some(Accidental::new(SymId::AccidentalNatural)));

    let copy = t.clone();
    assert_eq!(copy.trill_type(), TrillType::UpprallLine);
    assert_eq!(copy.ornament_style(), OrnamentStyle::Baroque);
    assert_eq!(copy.ornament().unwrap().sym, SymId::OrnamentUpPrall);
    assert!(copy.accidental().is_none());
    assert!(!copy.is_linked_to(&t));
}

#[test]
fn test_linked_clone_shares_links() {
    let mut t = trill();
    t.set_trill_type(TrillType::TrillLine);
    t.base.autoplace = false;

    let linked = t.linked_clone();
    assert!(linked.is_linked_to(&t));
    assert!(linked.base.autoplace);
    let (a, b) = (t.ornament().unwrap(), linked.ornament().unwrap());
    assert!(a.links().is_some());
    assert_eq!(a.links(), b.links());

    let second = t.linked_clone();
    assert!(second.is_linked_to(&linked));
}

#[test]
fn test_linked_clone_without_ornament() {
    let mut t = trill();
    let linked = t.linked_clone();
    assert!(linked.ornament().is_none());
    assert!(linked.is_linked_to(&t));
}

#[test]
fn test_accessible_info_names_type() {
    let mut t = trill();
    assert_eq!(t.accessible_info(), "Trill: Trill line");
    t.set_trill_type(TrillType::DownprallLine);
    assert_eq!(t.trill_type_user_name(), "Downprall line");
    assert_eq!(t.accessible_info(), "Trill: Downprall line");
}

#[test]
fn test_reset_autoplace() {
    let mut t = trill();
    t.set_property(Pid::Autoplace, &PropertyValue::Bool(false)).unwrap();
    assert_eq!(t.get_property(Pid::Autoplace), Some(PropertyValue::Bool(false)));
    assert_eq!(t.reset_property(Pid::Autoplace), Ok(()));
    assert_eq!(t.get_property(Pid::Autoplace), Some(PropertyValue::Bool(true)));
}

#[test]
fn test_below_style_places_new_trill_below() {
    let style = Style {
        trill_placement: Placement::Below,
        ..Style::default()
    };
    let mut t = Trill::new(Arc::new(style));

    assert_eq!(t.placement(), Placement::Below);
    assert_eq!(t.base.offset, PointF::new(0.0, 1.0));
    assert_eq!(t.property_flags(Pid::Offset), PropertyFlags::Styled);
    assert_eq!(
        t.property_default(Pid::Offset),
        Some(PropertyValue::Point(t.base.offset))
    );
    assert_eq!(t.create_line_segment(0).base.offset, PointF::new(0.0, 1.0));
}

#[test]
fn test_reset_color_reaches_segments() {
    let mut t = trill();
    t.create_line_segment(0);
    t.create_line_segment(1);
    t.set_property(Pid::Color, &PropertyValue::Color(Color::new(255, 0, 0, 255)))
        .unwrap();

    t.reset_property(Pid::Color).unwrap();
    assert_eq!(t.color(), Color::BLACK);
    assert!(t.segments().iter().all(|s| s.base.color == Color::BLACK));
}
