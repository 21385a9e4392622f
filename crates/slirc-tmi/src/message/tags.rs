//! IRCv3 tag block parsing.
//!
//! A tag block is the `key=value;key=value` run between `@` and the first
//! space of a line. [`TagBlock`] walks it with one generic splitter (`;`, then
//! `=`) so every lookup agrees on what a key and a value are.

use std::borrow::Cow;

/// Unescape a tag value from wire format.
///
/// Unknown escapes drop the backslash; a trailing lone backslash is dropped.
pub fn unescape_tag_value(value: &str) -> Cow<'_, str> {
    if !value.contains('\\') {
        return Cow::Borrowed(value);
    }

    let mut unescaped = String::with_capacity(value.len());
    let mut iter = value.chars();
    while let Some(c) = iter.next() {
        let r = if c == '\\' {
            match iter.next() {
                Some(':') => ';',
                Some('s') => ' ',
                Some('\\') => '\\',
                Some('r') => '\r',
                Some('n') => '\n',
                Some(c) => c,
                None => break,
            }
        } else {
            c
        };
        unescaped.push(r);
    }
    Cow::Owned(unescaped)
}

/// Borrowed view over a raw tag block (without the leading `@`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagBlock<'a> {
    raw: &'a str,
}

impl<'a> TagBlock<'a> {
    /// Wrap a raw tag block. A leading `@` is tolerated and skipped.
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw: raw.strip_prefix('@').unwrap_or(raw),
        }
    }

    /// The raw block as it appeared on the wire.
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Iterate over `(key, raw_value)` pairs in wire order.
    ///
    /// Keys without `=` yield an empty value. Empty segments (`;;`) are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.raw
            .split(';')
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.split_once('=').unwrap_or((segment, "")))
    }

    /// Raw (still escaped) value of the first tag named `key`.
    pub fn raw_value(&self, key: &str) -> Option<&'a str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Unescaped value of the first tag named `key`.
    pub fn value(&self, key: &str) -> Option<Cow<'a, str>> {
        self.raw_value(key).map(unescape_tag_value)
    }

    /// Unescaped value of `key`, or `None` when absent or empty.
    pub fn non_empty(&self, key: &str) -> Option<Cow<'a, str>> {
        self.value(key).filter(|v| !v.is_empty())
    }

    /// Number of tags in the block.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether the block holds no tags.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
