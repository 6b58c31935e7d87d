//! Converts the XML answered by some Gelbooru sites into the same [`Value`] shape their JSON
//! siblings produce.
//!
//! Elements become objects keyed by child name, attributes become plain string keys, text next
//! to children is stored under [`TEXT_KEY`] and repeated children are collected into an array.
//! An element holding only text becomes that string. All scalars stay strings.
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::error::ApiError;

pub const TEXT_KEY: &str = "#text";

struct Frame {
    name: String,
    map: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, input: &str, offset: usize) -> Result<Self, ApiError> {
        let mut map = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| decode_error(&e, input, offset))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| decode_error(&e, input, offset))?;
            map.insert(key, Value::String(value.into_owned()));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            map,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let Self {
            name,
            mut map,
            text,
        } = self;

        let value = if map.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text)
            }
        } else {
            if !text.is_empty() {
                map.insert(TEXT_KEY.to_string(), Value::String(text));
            }
            Value::Object(map)
        };

        (name, value)
    }
}

fn insert_child(map: &mut Map<String, Value>, name: String, value: Value) {
    match map.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(name, value);
        }
    }
}

/// 1-based line and column of a byte offset.
fn position(input: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(input.len());
    let before = &input.as_bytes()[..offset];
    let line = before.iter().filter(|b| **b == b'\n').count() + 1;
    let column = before
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(offset, |nl| offset - nl - 1)
        + 1;
    (line, column)
}

fn decode_error(error: &impl ToString, input: &str, offset: usize) -> ApiError {
    let (line, column) = position(input, offset);
    ApiError::Decode {
        message: error.to_string(),
        line: Some(line),
        column: Some(column),
    }
}

/// Parses an XML document into a single-key object named after its root element.
///
/// # Errors
/// Returns [`ApiError::Decode`] for malformed documents, text outside of the root element and
/// documents without a root.
pub fn to_value(input: &str) -> Result<Value, ApiError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let offset = usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX);
        let event = reader
            .read_event()
            .map_err(|e| decode_error(&e, input, offset))?;

        let closed = match event {
            Event::Start(start) => {
                stack.push(Frame::open(&start, input, offset)?);
                None
            }
            Event::Empty(start) => Some(Frame::open(&start, input, offset)?.close()),
            Event::End(_) => stack.pop().map(Frame::close),
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| decode_error(&e, input, offset))?;
                let Some(frame) = stack.last_mut() else {
                    return Err(decode_error(
                        &"text outside of the root element",
                        input,
                        offset,
                    ));
                };
                frame.text.push_str(&text);
                None
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
                None
            }
            Event::Eof => break,
            _ => None,
        };

        if let Some((name, value)) = closed {
            match stack.last_mut() {
                Some(parent) => insert_child(&mut parent.map, name, value),
                None if root.is_none() => root = Some((name, value)),
                None => {
                    return Err(decode_error(
                        &"more than one root element",
                        input,
                        offset,
                    ))
                }
            }
        }
    }

    if !stack.is_empty() {
        return Err(decode_error(
            &"unexpected end of document",
            input,
            input.len(),
        ));
    }

    let Some((name, value)) = root else {
        return Err(ApiError::Decode {
            message: "document has no root element".to_string(),
            line: None,
            column: None,
        });
    };

    let mut document = Map::new();
    document.insert(name, value);
    Ok(Value::Object(document))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn attribute_posts_become_objects() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <posts count="2" offset="0">
                <post id="1" tags="cat dog" file_url="https://img.example/1.png"/>
                <post id="2" tags="cat" file_url="https://img.example/2.png"/>
            </posts>"#;

        assert_eq!(
            to_value(xml).unwrap(),
            json!({
                "posts": {
                    "count": "2",
                    "offset": "0",
                    "post": [
                        {"id": "1", "tags": "cat dog", "file_url": "https://img.example/1.png"},
                        {"id": "2", "tags": "cat", "file_url": "https://img.example/2.png"}
                    ]
                }
            })
        );
    }

    #[test]
    fn text_children_and_mixed_content() {
        let xml = "<tag><name>blue &amp; green</name><count>3</count><empty/></tag>";
        assert_eq!(
            to_value(xml).unwrap(),
            json!({"tag": {"name": "blue & green", "count": "3", "empty": null}})
        );

        let xml = r#"<note id="4">hello</note>"#;
        assert_eq!(
            to_value(xml).unwrap(),
            json!({"note": {"id": "4", "#text": "hello"}})
        );
    }

    #[test]
    fn single_child_is_not_wrapped_in_an_array() {
        let xml = r#"<posts count="1"><post id="9"/></posts>"#;
        assert_eq!(
            to_value(xml).unwrap()["posts"]["post"],
            json!({"id": "9"})
        );
    }

    #[test]
    fn malformed_documents_are_decode_errors() {
        for xml in ["<posts><post></posts>", "<posts>", "garbage", "<a/><b/>"] {
            assert!(
                matches!(to_value(xml), Err(ApiError::Decode { .. })),
                "{xml} was accepted"
            );
        }
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(position("ab\ncd", 0), (1, 1));
        assert_eq!(position("ab\ncd", 4), (2, 2));
        assert_eq!(position("ab", 99), (1, 3));
    }
}
