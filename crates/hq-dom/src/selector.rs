//! Compound selector parsing and element matching.
//!
//! Supported grammar: comma-separated lists of compound selectors built from
//! an optional tag name (or `*`), `#id`, `.class`, `[name]` and `[name=value]`
//! with bare, single- or double-quoted values. Combinators are not supported.

use crate::ElementData;
use hq_core::PreviewError;
use hq_core::PreviewResult;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Id(String),
    Class(String),
    HasAttribute(String),
    AttributeEquals(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    tag_name: Option<String>,
    conditions: Vec<Condition>,
}

impl Compound {
    fn matches(&self, element: &ElementData) -> bool {
        if let Some(tag_name) = &self.tag_name {
            if !element.tag_name.eq_ignore_ascii_case(tag_name) {
                return false;
            }
        }

        self.conditions.iter().all(|condition| match condition {
            Condition::Id(id) => element.attribute("id") == Some(id.as_str()),
            Condition::Class(class) => element.has_class(class),
            Condition::HasAttribute(name) => element.attribute(name).is_some(),
            Condition::AttributeEquals(name, value) => {
                element.attribute(name) == Some(value.as_str())
            }
        })
    }
}

/// Parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> PreviewResult<Self> {
        let mut alternatives = Vec::new();
        for part in split_list(input) {
            let part = part.trim();
            if part.is_empty() {
                return Err(invalid(input, "empty selector in list"));
            }
            alternatives.push(parse_compound(part).map_err(|reason| invalid(input, reason))?);
        }

        Ok(Self {
            source: input.trim().to_owned(),
            alternatives,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, element: &ElementData) -> bool {
        self.alternatives
            .iter()
            .any(|compound| compound.matches(element))
    }
}

fn invalid(input: &str, reason: &str) -> PreviewError {
    PreviewError::new(
        "dom.selector.invalid",
        format!("failed to parse selector `{input}`: {reason}"),
    )
}

/// Splits at commas outside `[...]` and quoted values.
fn split_list(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0_usize;
    let mut in_brackets = false;
    let mut quote = None;

    for (idx, byte) in bytes.iter().copied().enumerate() {
        match (quote, byte) {
            (Some(open), _) if byte == open => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') if in_brackets => quote = Some(byte),
            (None, b'[') => in_brackets = true,
            (None, b']') => in_brackets = false,
            (None, b',') if !in_brackets => {
                parts.push(&input[start..idx]);
                start = idx.saturating_add(1);
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn parse_compound(input: &str) -> Result<Compound, &'static str> {
    let bytes = input.as_bytes();
    let mut idx = 0_usize;
    let mut tag_name = None;
    let mut conditions = Vec::new();

    if bytes.first().copied() == Some(b'*') {
        idx = 1;
    } else if bytes.first().copied().is_some_and(is_ident_char) {
        let (name, next) = read_ident(input, idx);
        tag_name = Some(name.to_ascii_lowercase());
        idx = next;
    }

    while idx < bytes.len() {
        match bytes[idx] {
            b'#' => {
                let (name, next) = read_ident(input, idx.saturating_add(1));
                if name.is_empty() {
                    return Err("expected identifier after `#`");
                }
                conditions.push(Condition::Id(name.to_owned()));
                idx = next;
            }
            b'.' => {
                let (name, next) = read_ident(input, idx.saturating_add(1));
                if name.is_empty() {
                    return Err("expected identifier after `.`");
                }
                conditions.push(Condition::Class(name.to_owned()));
                idx = next;
            }
            b'[' => {
                let (condition, next) = parse_attribute(input, idx.saturating_add(1))?;
                conditions.push(condition);
                idx = next;
            }
            byte if byte.is_ascii_whitespace() => return Err("combinators are not supported"),
            _ => return Err("unexpected character"),
        }
    }

    if tag_name.is_none() && conditions.is_empty() && idx == 0 {
        return Err("empty compound selector");
    }

    Ok(Compound {
        tag_name,
        conditions,
    })
}

fn parse_attribute(input: &str, start: usize) -> Result<(Condition, usize), &'static str> {
    let bytes = input.as_bytes();
    let mut idx = skip_spaces(bytes, start);
    let (name, next) = read_ident(input, idx);
    if name.is_empty() {
        return Err("expected attribute name");
    }
    let name = name.to_ascii_lowercase();
    idx = skip_spaces(bytes, next);

    match bytes.get(idx).copied() {
        Some(b']') => Ok((Condition::HasAttribute(name), idx.saturating_add(1))),
        Some(b'=') => {
            idx = skip_spaces(bytes, idx.saturating_add(1));
            let (value, next) = match bytes.get(idx).copied() {
                Some(quote @ (b'"' | b'\'')) => {
                    let value_start = idx.saturating_add(1);
                    let Some(end) = find_byte(bytes, value_start, quote) else {
                        return Err("unterminated quoted attribute value");
                    };
                    (&input[value_start..end], end.saturating_add(1))
                }
                _ => read_ident(input, idx),
            };
            idx = skip_spaces(bytes, next);
            if bytes.get(idx).copied() != Some(b']') {
                return Err("expected `]`");
            }
            Ok((
                Condition::AttributeEquals(name, value.to_owned()),
                idx.saturating_add(1),
            ))
        }
        _ => Err("expected `]` or `=`"),
    }
}

fn read_ident(input: &str, start: usize) -> (&str, usize) {
    let bytes = input.as_bytes();
    let mut idx = start;
    while idx < bytes.len() && is_ident_char(bytes[idx]) {
        idx = idx.saturating_add(1);
    }
    (&input[start.min(idx)..idx], idx)
}

fn skip_spaces(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
        idx = idx.saturating_add(1);
    }
    idx
}

fn is_ident_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_')
}

fn find_byte(bytes: &[u8], from: usize, byte: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|candidate| *candidate == byte)
        .map(|offset| from + offset)
}
