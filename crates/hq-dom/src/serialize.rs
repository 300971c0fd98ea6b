//! HTML serialization for arena nodes.

use crate::Document;
use crate::NodeData;
use crate::NodeId;

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link", "wbr"];

pub(crate) fn write_node(document: &Document, node: NodeId, out: &mut String) {
    let Ok(data) = document.data(node) else {
        return;
    };

    match data {
        NodeData::Text(text) => escape_text(text, out),
        NodeData::Markup(markup) => out.push_str(markup),
        NodeData::Element(element) => {
            out.push('<');
            out.push_str(&element.tag_name);
            for (name, value) in &element.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attribute(value, out);
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&element.tag_name.as_str()) {
                return;
            }

            for child in document.children(node) {
                write_node(document, *child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag_name);
            out.push('>');
        }
    }
}

pub fn escape_text(input: &str, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}

pub fn escape_attribute(input: &str, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            other => out.push(other),
        }
    }
}

/// Drops tags from trusted markup, keeping text runs as-is.
pub(crate) fn strip_tags(markup: &str) -> String {
    let bytes = markup.as_bytes();
    let mut out = String::with_capacity(markup.len());
    let mut idx = 0_usize;

    while idx < bytes.len() {
        if bytes[idx] == b'<' {
            idx = skip_to_gt(bytes, idx);
            continue;
        }

        let next = find_byte(bytes, idx, b'<').unwrap_or(bytes.len());
        out.push_str(&markup[idx..next]);
        idx = next;
    }

    out
}

fn skip_to_gt(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() {
        if bytes[idx] == b'>' {
            return idx.saturating_add(1);
        }
        idx = idx.saturating_add(1);
    }

    bytes.len()
}

fn find_byte(bytes: &[u8], from: usize, byte: u8) -> Option<usize> {
    bytes[from..]
        .iter()
        .position(|candidate| *candidate == byte)
        .map(|offset| from + offset)
}
