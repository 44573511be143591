//! Reading and writing `<Trill>` elements of score files
//!
//! ```xml
//! <Trill>
//!   <subtype>upprall</subtype>
//!   <ornamentStyle>baroque</ornamentStyle>
//!   <play>0</play>
//!   <placement>below</placement>
//!   <offset x="0" y="1.5"/>
//!   <Accidental>
//!     <subtype>accidentalSharp</subtype>
//!   </Accidental>
//! </Trill>
//! ```
//!
//! Only properties that differ from their defaults (or that the user took
//! off the style) are written. Everything read from a file counts as a
//! user setting.

use crate::models::geometry::PointF;
use crate::models::properties::{
    Color, OrnamentStyle, Pid, Placement, PropertyError, PropertyFlags, PropertyValue,
};
use crate::models::style::Style;
use crate::models::symbols::SymId;
use crate::models::trill::{Accidental, Trill, TrillType};
use crate::xml::{TokenType, XmlError, XmlReader};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::BufRead;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error("expected <Trill>, found <{0}>")]
    NotATrill(String),

    #[error("no <Trill> element in document")]
    NoTrill,

    #[error("unknown trill type '{0}'")]
    UnknownTrillType(String),

    #[error("unknown ornament style '{0}'")]
    UnknownOrnamentStyle(String),

    #[error("unknown placement '{0}'")]
    UnknownPlacement(String),

    #[error("unknown accidental '{0}'")]
    UnknownAccidental(String),

    #[error(transparent)]
    Property(#[from] PropertyError),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("written XML is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Read a trill; the reader must be on the `<Trill>` start tag and is left
/// on the matching end tag
pub fn read_trill<B: BufRead>(
    reader: &mut XmlReader<B>,
    style: Arc<Style>,
) -> Result<Trill, ReadError> {
    if reader.token_type() != TokenType::StartElement || reader.tag_name() != "Trill" {
        return Err(ReadError::NotATrill(reader.tag_name().to_string()));
    }

    let mut trill = Trill::new(style);

    while reader.read_next_start_element() {
        let tag = reader.tag_name().to_string();
        match tag.as_str() {
            "subtype" => {
                let text = reader.read_string();
                trill.set_trill_type(parse_trill_type(text.trim())?);
            }
            "ornamentStyle" => {
                let text = reader.read_string();
                let style = OrnamentStyle::from_xml_name(text.trim())
                    .ok_or_else(|| ReadError::UnknownOrnamentStyle(text.clone()))?;
                trill.set_property(Pid::OrnamentStyle, &PropertyValue::OrnamentStyle(style))?;
            }
            "play" => {
                let play = reader.read_int() != 0;
                trill.set_property(Pid::Play, &PropertyValue::Bool(play))?;
            }
            "placement" => {
                let text = reader.read_string();
                let placement = Placement::from_xml_name(text.trim())
                    .ok_or_else(|| ReadError::UnknownPlacement(text.clone()))?;
                trill.set_property(Pid::Placement, &PropertyValue::Placement(placement))?;
            }
            "offset" => {
                let offset = PointF::new(
                    reader.double_attribute("x", 0.0),
                    reader.double_attribute("y", 0.0),
                );
                reader.skip_current_element();
                trill.set_property(Pid::Offset, &PropertyValue::Point(offset))?;
            }
            "color" => {
                let color = Color::new(
                    channel(reader.int_attribute("r", 0)),
                    channel(reader.int_attribute("g", 0)),
                    channel(reader.int_attribute("b", 0)),
                    channel(reader.int_attribute("a", 255)),
                );
                reader.skip_current_element();
                trill.set_property(Pid::Color, &PropertyValue::Color(color))?;
            }
            "visible" => {
                let visible = reader.read_int() != 0;
                trill.set_property(Pid::Visible, &PropertyValue::Bool(visible))?;
            }
            "minDistance" => {
                let distance = reader.read_double();
                trill.set_property(Pid::MinDistance, &PropertyValue::Double(distance))?;
            }
            "Accidental" => {
                let mut accidental = read_accidental(reader)?;
                accidental.track = trill.track();
                trill.set_accidental(Some(accidental));
            }
            _ => {
                log::debug!("Trill: skipping unknown tag <{}>", tag);
                reader.skip_current_element();
            }
        }
    }

    if let Some(e) = reader.error() {
        return Err(e.clone().into());
    }
    Ok(trill)
}

/// Read the first `<Trill>` found anywhere in `bytes`
pub fn read_trill_from_bytes(bytes: &[u8], style: Arc<Style>) -> Result<Trill, ReadError> {
    let mut reader = XmlReader::from_bytes(bytes);
    while !reader.at_end() {
        if reader.read_next() == TokenType::StartElement && reader.tag_name() == "Trill" {
            return read_trill(&mut reader, style);
        }
    }
    match reader.error() {
        Some(e) => Err(e.clone().into()),
        None => Err(ReadError::NoTrill),
    }
}

/// Older files store the type as its integer value
fn parse_trill_type(text: &str) -> Result<TrillType, ReadError> {
    if let Some(tt) = TrillType::from_xml_name(text) {
        return Ok(tt);
    }
    text.parse::<i32>()
        .ok()
        .and_then(|n| TrillType::try_from(n).ok())
        .ok_or_else(|| ReadError::UnknownTrillType(text.to_string()))
}

fn channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

fn read_accidental<B: BufRead>(reader: &mut XmlReader<B>) -> Result<Accidental, ReadError> {
    let mut sym = None;
    while reader.read_next_start_element() {
        if reader.tag_name() == "subtype" {
            let text = reader.read_string();
            let name = text.trim();
            match SymId::from_smufl_name(name) {
                Some(s) if s.is_accidental() => sym = Some(s),
                _ => return Err(ReadError::UnknownAccidental(name.to_string())),
            }
        } else {
            reader.skip_current_element();
        }
    }
    sym.map(Accidental::new)
        .ok_or_else(|| ReadError::UnknownAccidental(String::new()))
}

/// Properties written only when the user changed them
fn is_user_set(trill: &Trill, pid: Pid) -> bool {
    match trill.property_flags(pid) {
        PropertyFlags::Styled => false,
        PropertyFlags::Unstyled => true,
        PropertyFlags::NoStyle => trill.get_property(pid) != trill.property_default(pid),
    }
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), WriteError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

pub fn write_trill(trill: &Trill) -> Result<String, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Start(BytesStart::new("Trill")))?;
    write_text_element(&mut writer, Pid::TrillType.xml_name(), trill.trill_type().xml_name())?;

    if is_user_set(trill, Pid::OrnamentStyle) {
        write_text_element(
            &mut writer,
            Pid::OrnamentStyle.xml_name(),
            trill.ornament_style().xml_name(),
        )?;
    }
    if is_user_set(trill, Pid::Play) {
        let play = if trill.play_articulation() { "1" } else { "0" };
        write_text_element(&mut writer, Pid::Play.xml_name(), play)?;
    }
    if is_user_set(trill, Pid::Placement) {
        write_text_element(&mut writer, Pid::Placement.xml_name(), trill.placement().xml_name())?;
    }
    if is_user_set(trill, Pid::Offset) {
        let offset = trill.base.offset;
        let (x, y) = (offset.x.to_string(), offset.y.to_string());
        let element = BytesStart::new(Pid::Offset.xml_name())
            .with_attributes([("x", x.as_str()), ("y", y.as_str())]);
        writer.write_event(Event::Empty(element))?;
    }
    if is_user_set(trill, Pid::Color) {
        let c = trill.color();
        let (r, g, b, a) = (c.r.to_string(), c.g.to_string(), c.b.to_string(), c.a.to_string());
        let element = BytesStart::new(Pid::Color.xml_name()).with_attributes([
            ("r", r.as_str()),
            ("g", g.as_str()),
            ("b", b.as_str()),
            ("a", a.as_str()),
        ]);
        writer.write_event(Event::Empty(element))?;
    }
    if is_user_set(trill, Pid::Visible) {
        write_text_element(&mut writer, Pid::Visible.xml_name(), "0")?;
    }
    if is_user_set(trill, Pid::MinDistance) {
        let distance = trill.base.min_distance.to_string();
        write_text_element(&mut writer, Pid::MinDistance.xml_name(), &distance)?;
    }
    if let Some(accidental) = trill.accidental() {
        writer.write_event(Event::Start(BytesStart::new("Accidental")))?;
        write_text_element(&mut writer, "subtype", accidental.sym.smufl_name())?;
        writer.write_event(Event::End(BytesEnd::new("Accidental")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Trill")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_subtype_is_accepted() {
        assert_eq!(parse_trill_type("prallprall").unwrap(), TrillType::PrallprallLine);
        assert_eq!(parse_trill_type("1").unwrap(), TrillType::UpprallLine);
        assert!(matches!(parse_trill_type("9"), Err(ReadError::UnknownTrillType(_))));
    }

    #[test]
    fn test_default_trill_writes_only_subtype() {
        let trill = Trill::new(Arc::new(Style::default()));
        let xml = write_trill(&trill).unwrap();
        assert!(xml.contains("<subtype>trill</subtype>"));
        assert!(!xml.contains("placement"));
        assert!(!xml.contains("offset"));
        assert!(!xml.contains("play"));
    }

    #[test]
    fn test_color_channels_clamp() {
        assert_eq!(channel(300), 255);
        assert_eq!(channel(-4), 0);
    }
}
