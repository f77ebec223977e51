use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use serde::Deserialize;
use serde_json::{Map, Value, map::Entry};

use crate::error::Error;

/// Key holding an element's text when it also carries attributes or children.
pub(crate) const CONTENT_KEY: &str = "content";

#[derive(Debug, Deserialize)]
struct XmlErrorResponse {
    #[serde(rename = "Errors")]
    errors: Option<XmlErrors>,
    #[serde(rename = "RequestID")]
    request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct XmlErrors {
    #[serde(rename = "Error", default)]
    errors: Vec<XmlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct XmlErrorEntry {
    #[serde(rename = "Code")]
    code: Option<String>,
    #[serde(rename = "Message")]
    message: Option<String>,
}

/// Fields of the `<Response><Errors><Error>` envelope the service returns on failure.
#[derive(Debug, Default)]
pub(crate) struct ServiceError {
    pub(crate) code: Option<String>,
    pub(crate) message: Option<String>,
    pub(crate) request_id: Option<String>,
}

pub(crate) fn parse_error_xml(body: &str) -> Option<ServiceError> {
    if body.trim().is_empty() {
        return None;
    }

    let parsed = quick_xml::de::from_str::<XmlErrorResponse>(body).ok()?;
    let first = parsed.errors.and_then(|e| e.errors.into_iter().next());
    let (code, message) = match first {
        Some(entry) => (entry.code, entry.message),
        None => (None, None),
    };

    if code.is_none() && message.is_none() && parsed.request_id.is_none() {
        return None;
    }

    Some(ServiceError {
        code,
        message,
        request_id: parsed.request_id,
    })
}

struct Frame {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, Error> {
        let mut fields = Map::new();
        for attr in start.attributes() {
            let attr = attr
                .map_err(|e| Error::decode("invalid XML attribute", Some(Box::new(e))))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let value = attr
                .unescape_value()
                .map_err(|e| Error::decode("invalid XML attribute value", Some(Box::new(e))))?;
            fields.insert(key, Value::String(value.into_owned()));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            fields,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim();
        let value = if self.fields.is_empty() {
            if text.is_empty() {
                Value::Object(Map::new())
            } else {
                Value::String(text.to_string())
            }
        } else {
            let mut fields = self.fields;
            if !text.is_empty() {
                fields.insert(CONTENT_KEY.to_string(), Value::String(text.to_string()));
            }
            Value::Object(fields)
        };
        (self.name, value)
    }
}

fn insert_child(fields: &mut Map<String, Value>, name: String, value: Value) {
    match fields.entry(name) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Value::Array(items) => items.push(value),
            existing => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        },
    }
}

/// Converts an XML document into a nested value.
///
/// The root element is dropped. Attributes and child elements become keys of
/// their parent's map, repeated children collapse into arrays, text-only
/// elements become strings and empty elements become empty maps.
pub(crate) fn to_value(body: &str) -> Result<Value, Error> {
    let mut reader = Reader::from_str(body);
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::decode("failed to parse XML response", Some(Box::new(e))))?;

        match event {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let (name, value) = Frame::open(&start)?.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.fields, name, value),
                    None => return Ok(value),
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| Error::decode("invalid XML text", Some(Box::new(e))))?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let Some(frame) = stack.pop() else {
                    return Err(Error::decode("unbalanced XML end tag", None));
                };
                let (name, value) = frame.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.fields, name, value),
                    None => return Ok(value),
                }
            }
            Event::Eof => {
                return Err(Error::decode(
                    "XML response ended before the root element closed",
                    None,
                ));
            }
            _ => {}
        }
    }
}
