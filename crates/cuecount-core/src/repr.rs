//! Python-literal rendering for the diagnostic dialogue dump.
//!
//! The dump reads like a printed list of tuples:
//! `[('Bob', 'Hi there '), ('Alice', 'Hello Bob')]`.

use std::fmt::Write;

use crate::corpus::ScriptCorpus;

/// Render a string the way a Python `repr()` would.
///
/// Single quotes are preferred; double quotes are used when the text has
/// a `'` but no `"`.
pub fn quote(text: &str) -> String {
    let delimiter = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(text.len() + 2);
    out.push(delimiter);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => match c as u32 {
                n @ ..=0xff => {
                    let _ = write!(out, "\\x{n:02x}");
                }
                n @ ..=0xffff => {
                    let _ = write!(out, "\\u{n:04x}");
                }
                n => {
                    let _ = write!(out, "\\U{n:08x}");
                }
            },
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

/// Whether `repr()` would show `ch` as is.
///
/// Controls, format characters, private-use code points and every
/// separator except the ASCII space are escaped.
fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    !(ch.is_control()
        || ch.is_whitespace()
        || matches!(
            ch,
            '\u{ad}'
                | '\u{600}'..='\u{605}'
                | '\u{61c}'
                | '\u{6dd}'
                | '\u{70f}'
                | '\u{180e}'
                | '\u{200b}'..='\u{200f}'
                | '\u{202a}'..='\u{202e}'
                | '\u{2060}'..='\u{2064}'
                | '\u{2066}'..='\u{206f}'
                | '\u{feff}'
                | '\u{fff9}'..='\u{fffb}'
                | '\u{e000}'..='\u{f8ff}'
                | '\u{e0001}'
                | '\u{e0020}'..='\u{e007f}'
                | '\u{f0000}'..='\u{10ffff}'
        ))
}

/// Render the whole corpus as a list of `(speaker, line)` tuples.
pub fn render_corpus(corpus: &ScriptCorpus) -> String {
    let items: Vec<String> = corpus
        .entries()
        .iter()
        .map(|e| format!("({}, {})", quote(&e.speaker), quote(&e.line)))
        .collect();
    format!("[{}]", items.join(", "))
}
