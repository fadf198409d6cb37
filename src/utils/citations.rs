//! Citation markup normalization
//!
//! The writer prompt asks the model for `[n](#citation-n)` links, but models
//! drift: bare `[1]`, lists like `[1, 2]`, stray whitespace before the link
//! target and mixed brackets such as `(#citation-3]`. [`normalize`] rewrites
//! all of those into the canonical form the client renders as citation chips.
//!
//! Streamed answers arrive in arbitrary fragments, so a citation can be split
//! across two increments. [`CitationBuffer`] holds back a short tail that may
//! still grow into a citation and normalizes it once it is complete.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Longest tail (in bytes) held back while waiting for a citation to complete
const HOLD_WINDOW: usize = 64;

const TARGET_PREFIX: &str = "#citation-";

static MIXED_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\[(]#citation-(\d+)[\])]").expect("mixed target pattern is valid")
});

static SPACED_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\[\d+(?:\s*,\s*\d+)*\])\s+(\(#citation-)")
        .expect("spaced target pattern is valid")
});

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d+(?:\s*,\s*\d+)*)\](\()?").expect("marker pattern is valid")
});

static DOUBLED_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d+)\]\(#citation-(\d+)\)\s*\(#citation-(\d+)\)")
        .expect("doubled target pattern is valid")
});

/// Rewrite every citation in `text` into the `[n](#citation-n)` form.
///
/// Pure and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    // Link targets are canonicalized before markers are expanded so that a
    // marker followed by `[#citation-n]` or ` (#citation-n)` is recognised
    // as already linked.
    let text = MIXED_TARGET_RE.replace_all(text, "(#citation-$1)");
    let text = SPACED_TARGET_RE.replace_all(&text, "$1$2");

    let text = MARKER_RE.replace_all(&text, |caps: &Captures| {
        if caps.get(2).is_some() {
            return caps[0].to_string();
        }
        caps[1]
            .split(',')
            .map(str::trim)
            .map(|n| format!("[{n}](#citation-{n})"))
            .collect::<String>()
    });

    DOUBLED_TARGET_RE
        .replace_all(&text, |caps: &Captures| {
            if caps[1] == caps[2] && caps[2] == caps[3] {
                format!("[{0}](#citation-{0})", &caps[1])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Incremental normalizer for streamed text.
///
/// Feed provider increments through [`push`](Self::push) and call
/// [`finish`](Self::finish) once the stream ends; the concatenation of every
/// returned piece equals `normalize` applied to the full text for all inputs
/// whose citations fit in the hold window.
#[derive(Debug, Default)]
pub struct CitationBuffer {
    pending: String,
}

impl CitationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an increment and return the normalized text that is safe to emit.
    pub fn push(&mut self, text: &str) -> Option<String> {
        self.pending.push_str(text);

        let split = held_tail_start(&self.pending);
        if split == 0 {
            return None;
        }

        let tail = self.pending.split_off(split);
        let ready = std::mem::replace(&mut self.pending, tail);
        Some(normalize(&ready))
    }

    /// Flush whatever is still held back.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        Some(normalize(&std::mem::take(&mut self.pending)))
    }

    /// Whether any text is currently held back
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Byte offset where the held-back tail starts, `text.len()` when nothing is held
fn held_tail_start(text: &str) -> usize {
    let window_start = text.len().saturating_sub(HOLD_WINDOW);

    text.char_indices()
        .filter(|(i, c)| *i >= window_start && (*c == '[' || *c == '('))
        .map(|(i, _)| i)
        .find(|&i| is_incomplete_citation(&text[i..]))
        .unwrap_or(text.len())
}

/// True when `tail` is a citation construct that more input could still extend.
fn is_incomplete_citation(tail: &str) -> bool {
    if let Some(target) = tail.strip_prefix('(') {
        return is_open_target(target);
    }
    let Some(rest) = tail.strip_prefix('[') else {
        return false;
    };
    if rest.is_empty() || rest.starts_with('#') {
        return is_open_target(rest);
    }

    let Some(close) = rest.find(']') else {
        return is_marker_body(rest);
    };
    if !is_marker_body(&rest[..close]) {
        return false;
    }

    let after = rest[close + 1..].trim_start();
    match after.chars().next() {
        // complete marker, the link target may still arrive
        None => true,
        Some('(') | Some('[') => is_open_target(&after[1..]),
        Some(_) => false,
    }
}

/// `[1`, `[1, 2`, `[12 ,3` ... digits, commas and whitespace starting with a digit
fn is_marker_body(body: &str) -> bool {
    body.starts_with(|c: char| c.is_ascii_digit())
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c.is_whitespace())
}

/// True while `s` is an unterminated prefix of `#citation-<digits>`
fn is_open_target(s: &str) -> bool {
    if s.len() <= TARGET_PREFIX.len() {
        return TARGET_PREFIX.starts_with(s);
    }
    s.strip_prefix(TARGET_PREFIX)
        .is_some_and(|digits| digits.chars().all(|c| c.is_ascii_digit()))
}
