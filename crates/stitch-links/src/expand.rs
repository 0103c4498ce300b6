//! Reference marker expansion.
//!
//! Markers delimit candidate symbol names inside prose and signature text:
//!
//! - `[[Name]]`: display text is the name itself
//! - `[[Name|Display]]`: explicit display override
//!
//! Resolved markers become anchors; unresolved markers degrade to their plain
//! display text without failing the build, so authors can mention
//! undocumented or external symbols freely.

use crate::registry::{LinkRegistry, Resolution};

const MARKER_OPEN: &str = "[[";
const MARKER_CLOSE: &str = "]]";

/// Expand reference markers in a text span into an HTML fragment.
///
/// Markers are processed left-to-right and never nest: the first `]]` after
/// a `[[` closes the marker. An unterminated `[[` is kept as literal text.
/// Literal segments and substituted values are HTML-escaped, so the result
/// can be embedded into page markup directly.
///
/// Pure function of the text and the registry state at call time.
#[must_use]
pub fn expand(text: &str, registry: &LinkRegistry) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find(MARKER_OPEN) {
        let after_open = open + MARKER_OPEN.len();
        let Some(close) = rest[after_open..].find(MARKER_CLOSE) else {
            break;
        };

        escape_into(&rest[..open], &mut out);
        render_marker(&rest[after_open..after_open + close], registry, &mut out);
        rest = &rest[after_open + close + MARKER_CLOSE.len()..];
    }

    escape_into(rest, &mut out);
    out
}

/// Render one marker body (the text between the delimiters).
fn render_marker(inner: &str, registry: &LinkRegistry, out: &mut String) {
    let (target, display) = match inner.split_once('|') {
        Some((target, display)) => {
            let target = target.trim();
            let display = display.trim();
            (target, if display.is_empty() { target } else { display })
        }
        None => {
            let target = inner.trim();
            (target, target)
        }
    };

    match registry.resolve(target) {
        Resolution::Resolved(url) => {
            out.push_str("<a href=\"");
            escape_into(url, out);
            out.push_str("\">");
            escape_into(display, out);
            out.push_str("</a>");
        }
        Resolution::Unresolved => {
            tracing::debug!(symbol = %target, "Unresolved reference");
            escape_into(display, out);
        }
    }
}

/// Escape HTML special characters, appending to `out`.
fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
}
