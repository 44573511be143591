//! Streaming XML reader used for loading score files
//!
//! [`XmlReader`] is a pull parser in the style of a token cursor: callers
//! advance with [`XmlReader::read_next`] and inspect the current token
//! (tag name, attributes, text). Tokenizing is done by [`quick_xml`]; this
//! wrapper adds document-level checks (single root, balanced tags) and the
//! element-text conveniences the score readers rely on.
//!
//! Errors are sticky. Once one occurs the reader stops at an `Unknown`
//! token, [`XmlReader::at_end`] turns true and [`XmlReader::error`] keeps
//! the first failure, so a reader loop can run to completion and check for
//! an error once at the end.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Kind of the token under the cursor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenType {
    /// Nothing read yet, an error, or a token the readers do not use
    /// (doctype, processing instruction)
    #[default]
    Unknown,
    StartDocument,
    EndDocument,
    StartElement,
    EndElement,
    Comment,
    Characters,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum XmlError {
    #[error("cannot open {}: {message}", path.display())]
    Open { path: PathBuf, message: String },

    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("premature end of document")]
    PrematureEnd,

    #[error("extra content at end of document")]
    ExtraContent,

    #[error("text outside the root element")]
    TextOutsideRoot,

    #[error("XML declaration not at start of document")]
    MisplacedDeclaration,

    #[error("expected character data in <{element}>")]
    ExpectedCharacterData { element: String },
}

/// Pull reader over any buffered byte source
pub struct XmlReader<B: BufRead> {
    reader: Reader<B>,
    buffer: Vec<u8>,
    token: TokenType,
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    /// End tag still owed for a `<tag/>` element
    pending_end: Option<String>,
    depth: usize,
    started: bool,
    seen_event: bool,
    seen_root: bool,
    finished: bool,
    error: Option<XmlError>,
}

impl XmlReader<BufReader<File>> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, XmlError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| XmlError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::debug!("Reading XML from {}", path.display());
        Ok(XmlReader::new(BufReader::new(file)))
    }
}

impl<'a> XmlReader<&'a [u8]> {
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        XmlReader::new(bytes)
    }
}

impl<B: BufRead> XmlReader<B> {
    pub fn new(device: B) -> Self {
        let mut reader = Reader::from_reader(device);
        reader.check_end_names(true);
        reader.trim_text(false);

        Self {
            reader,
            buffer: Vec::new(),
            token: TokenType::Unknown,
            name: String::new(),
            attributes: Vec::new(),
            text: String::new(),
            pending_end: None,
            depth: 0,
            started: false,
            seen_event: false,
            seen_root: false,
            finished: false,
            error: None,
        }
    }

    /// Advance to the next token. At the end of the stream the current
    /// token is returned again.
    pub fn read_next(&mut self) -> TokenType {
        if self.finished {
            return self.token;
        }

        self.name.clear();
        self.attributes.clear();
        self.text.clear();

        if !self.started {
            self.started = true;
            self.token = TokenType::StartDocument;
            return self.token;
        }

        match self.pull() {
            Ok(token) => self.token = token,
            Err(e) => self.raise(e),
        }
        self.token
    }

    pub fn token_type(&self) -> TokenType {
        self.token
    }

    /// True after the end of the document or an error
    pub fn at_end(&self) -> bool {
        self.finished
    }

    /// Read up to the next start element inside the current element.
    /// Returns false when the current element ends instead.
    pub fn read_next_start_element(&mut self) -> bool {
        loop {
            match self.read_next() {
                TokenType::StartElement => return true,
                TokenType::EndElement | TokenType::EndDocument => return false,
                _ if self.finished => return false,
                _ => {}
            }
        }
    }

    /// Skip past the end tag of the current element, children included
    pub fn skip_current_element(&mut self) {
        let mut depth = 1usize;
        while depth > 0 && !self.finished {
            match self.read_next() {
                TokenType::StartElement => depth += 1,
                TokenType::EndElement => depth -= 1,
                _ => {}
            }
        }
    }

    /// Local name of the current start or end element, empty otherwise
    pub fn tag_name(&self) -> &str {
        &self.name
    }

    /// Text of the current characters or comment token
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&XmlError> {
        self.error.as_ref()
    }

    /// Description of the error, empty if there is none
    pub fn error_string(&self) -> String {
        self.error.as_ref().map(|e| e.to_string()).unwrap_or_default()
    }

    /// Byte offset reached in the input
    pub fn position(&self) -> usize {
        self.reader.buffer_position()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|(key, _)| key == name)
    }

    /// Attribute of the current start element, empty if absent
    pub fn attribute(&self, name: &str) -> String {
        self.attribute_value(name).unwrap_or_default().to_string()
    }

    pub fn int_attribute(&self, name: &str, default_value: i32) -> i32 {
        self.attribute_value(name).map(parse_int).unwrap_or(default_value)
    }

    pub fn double_attribute(&self, name: &str, default_value: f64) -> f64 {
        self.attribute_value(name).map(parse_double).unwrap_or(default_value)
    }

    /// Character data of the current element, leaving the cursor on its end
    /// tag. Only valid on a start element; child elements are an error.
    pub fn read_element_text(&mut self) -> String {
        if self.token != TokenType::StartElement {
            return String::new();
        }
        let element = self.name.clone();
        let mut result = String::new();
        loop {
            match self.read_next() {
                TokenType::Characters => result.push_str(&self.text),
                TokenType::EndElement => break,
                TokenType::StartElement => {
                    self.raise(XmlError::ExpectedCharacterData { element });
                    break;
                }
                _ if self.finished => break,
                _ => {}
            }
        }
        result
    }

    pub fn read_int(&mut self) -> i32 {
        parse_int(&self.read_element_text())
    }

    pub fn read_double(&mut self) -> f64 {
        parse_double(&self.read_element_text())
    }

    pub fn read_string(&mut self) -> String {
        self.read_element_text()
    }

    fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn raise(&mut self, error: XmlError) {
        log::warn!("XML error: {}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
        self.token = TokenType::Unknown;
        self.finished = true;
    }

    fn pull(&mut self) -> Result<TokenType, XmlError> {
        if let Some(name) = self.pending_end.take() {
            self.depth -= 1;
            self.name = name;
            return Ok(TokenType::EndElement);
        }

        loop {
            self.buffer.clear();
            let event = self.reader.read_event_into(&mut self.buffer);
            let position = self.reader.buffer_position();
            let syntax = |e: quick_xml::Error| XmlError::Syntax {
                position,
                message: e.to_string(),
            };
            let event = event.map_err(syntax)?;

            let first = !self.seen_event;
            self.seen_event = true;

            match event {
                Event::Decl(_) => {
                    if first {
                        continue;
                    }
                    return Err(XmlError::MisplacedDeclaration);
                }
                Event::Start(e) | Event::Empty(e) if self.depth == 0 && self.seen_root => {
                    log::debug!("Second root element <{}>", String::from_utf8_lossy(e.local_name().as_ref()));
                    return Err(XmlError::ExtraContent);
                }
                Event::Start(e) => {
                    let (name, attributes) = element_parts(&e, position)?;
                    self.open_element(name, attributes);
                    return Ok(TokenType::StartElement);
                }
                Event::Empty(e) => {
                    let (name, attributes) = element_parts(&e, position)?;
                    self.pending_end = Some(name.clone());
                    self.open_element(name, attributes);
                    return Ok(TokenType::StartElement);
                }
                Event::End(e) => {
                    if self.depth == 0 {
                        return Err(XmlError::Syntax {
                            position,
                            message: format!(
                                "unexpected end tag </{}>",
                                String::from_utf8_lossy(e.name().as_ref())
                            ),
                        });
                    }
                    self.depth -= 1;
                    self.name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    return Ok(TokenType::EndElement);
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(syntax)?;
                    if self.depth == 0 {
                        if text.trim().is_empty() {
                            continue;
                        }
                        return Err(XmlError::TextOutsideRoot);
                    }
                    self.text = text.into_owned();
                    return Ok(TokenType::Characters);
                }
                Event::CData(e) => {
                    if self.depth == 0 {
                        return Err(XmlError::TextOutsideRoot);
                    }
                    self.text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    return Ok(TokenType::Characters);
                }
                Event::Comment(e) => {
                    self.text = String::from_utf8_lossy(&e).into_owned();
                    return Ok(TokenType::Comment);
                }
                Event::PI(_) | Event::DocType(_) => return Ok(TokenType::Unknown),
                Event::Eof => {
                    if self.depth > 0 || !self.seen_root {
                        return Err(XmlError::PrematureEnd);
                    }
                    self.finished = true;
                    return Ok(TokenType::EndDocument);
                }
            }
        }
    }

    fn open_element(&mut self, name: String, attributes: Vec<(String, String)>) {
        self.seen_root = true;
        self.depth += 1;
        self.name = name;
        self.attributes = attributes;
    }
}

/// Local name and unescaped attributes of a start tag
fn element_parts(
    element: &BytesStart<'_>,
    position: usize,
) -> Result<(String, Vec<(String, String)>), XmlError> {
    let syntax = |message: String| XmlError::Syntax { position, message };

    let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| syntax(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| syntax(e.to_string()))?;
        attributes.push((key, value.into_owned()));
    }
    Ok((name, attributes))
}

fn parse_int(text: &str) -> i32 {
    text.trim().parse().unwrap_or(0)
}

fn parse_double(text: &str) -> f64 {
    text.trim().parse().unwrap_or(0.0)
}
