//! Structural XML check of a fetched document. No schema validation.
//!
//! quick-xml only tokenizes, so attributes, entity references and names are
//! checked here explicitly.

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Why a document is not well-formed XML.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum XmlError {
    #[error("document is empty")]
    Empty,
    #[error("no root element")]
    NoRoot,
    #[error("more than one root element")]
    MultipleRoots,
    #[error("text outside the root element at byte {0}")]
    TextOutsideRoot(u64),
    #[error("{0} unclosed element(s) at end of document")]
    Unclosed(usize),
    #[error("invalid name {name:?} at byte {position}")]
    InvalidName { position: u64, name: String },
    #[error("syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },
}

/// Walk every event of `data`, tracking element depth and checking each
/// element's name and attributes and each text node's references.
pub fn check_well_formed(data: &[u8]) -> Result<(), XmlError> {
    if data.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(XmlError::Empty);
    }

    let mut reader = Reader::from_reader(data);
    let mut buf = Vec::new();
    let mut depth: usize = 0;
    let mut roots: usize = 0;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| syntax(&reader, e))?;
        let position = reader.buffer_position() as u64;
        match event {
            Event::Start(e) => {
                check_element(&e, position)?;
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::Empty(e) => {
                check_element(&e, position)?;
                if depth == 0 {
                    roots += 1;
                }
            }
            // Mismatched and unmatched end tags are reported by the reader itself.
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(t) => {
                check_text(&t, position)?;
                if depth == 0 && !t.iter().all(|b| b.is_ascii_whitespace()) {
                    return Err(XmlError::TextOutsideRoot(position));
                }
            }
            Event::CData(_) if depth == 0 => {
                return Err(XmlError::TextOutsideRoot(position));
            }
            Event::Eof => break,
            _ => {}
        }
        if roots > 1 {
            return Err(XmlError::MultipleRoots);
        }
        buf.clear();
    }

    if depth > 0 {
        return Err(XmlError::Unclosed(depth));
    }
    if roots == 0 {
        return Err(XmlError::NoRoot);
    }
    Ok(())
}

fn syntax<R>(reader: &Reader<R>, e: impl std::fmt::Display) -> XmlError {
    XmlError::Syntax {
        position: reader.buffer_position() as u64,
        message: e.to_string(),
    }
}

/// Element name, then every attribute: quoting, duplicates, names and
/// references in the value.
fn check_element(e: &BytesStart<'_>, position: u64) -> Result<(), XmlError> {
    check_name(e.name().as_ref(), position)?;
    for attr in e.attributes().with_checks(true) {
        let attr = attr.map_err(|err| XmlError::Syntax {
            position,
            message: err.to_string(),
        })?;
        check_name(attr.key.as_ref(), position)?;
        attr.unescape_value().map_err(|err| XmlError::Syntax {
            position,
            message: err.to_string(),
        })?;
    }
    Ok(())
}

/// Bare `&` and entities other than the five predefined ones are errors.
fn check_text(t: &BytesText<'_>, position: u64) -> Result<(), XmlError> {
    t.unescape().map(|_| ()).map_err(|err| XmlError::Syntax {
        position,
        message: err.to_string(),
    })
}

/// XML `Name`: starts with a letter, `_`, `:` or a non-ASCII char; continues
/// with those plus digits, `-` and `.`.
fn check_name(name: &[u8], position: u64) -> Result<(), XmlError> {
    let is_start = |b: u8| b.is_ascii_alphabetic() || b == b'_' || b == b':' || b >= 0x80;
    let valid = match name.split_first() {
        Some((&first, rest)) => {
            is_start(first)
                && rest
                    .iter()
                    .all(|&b| is_start(b) || b.is_ascii_digit() || b == b'-' || b == b'.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(XmlError::InvalidName {
            position,
            name: String::from_utf8_lossy(name).into_owned(),
        })
    }
}
