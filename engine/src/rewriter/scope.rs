//! Pattern-based scanning of configuration text.
//!
//! A [`Document`] classifies every byte of a file as code, comment or quoted
//! text and records its brace nesting depth. On top of that it can find
//! blocks by header (`decoration { ... }`, `window#waybar { ... }`), INI
//! sections, and `key <separator> value` assignments that sit directly in a
//! scope. Edits never mutate a document; they return the new text and the
//! caller scans again.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use thiserror::Error;

static INI_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*\[([^\]\r\n]+)\][ \t]*\r?$").expect("section header pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `#` anywhere starts a comment that runs to the end of the line.
    Hash,
    /// `#` starts a comment only as the first non-blank character of a line.
    HashLine,
    /// `#` or `;` as the first non-blank character of a line.
    IniLine,
    /// `/* ... */`
    CBlock,
    /// `/* ... */` and `// ...`
    CBlockAndLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `key = value`
    Equals,
    /// `key: value`
    Colon,
    /// `key value`
    Whitespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    LineEnd,
    Semicolon,
}

/// Lexical conventions of one configuration format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syntax {
    pub comments: CommentStyle,
    pub quotes: &'static [u8],
    pub braces: bool,
    pub separator: Separator,
    pub terminator: Terminator,
    pub indent: &'static str,
    /// `@import "x"` style statements end at the newline instead of `;`.
    pub line_at_rules: bool,
    /// Joins a block path and key into one root-level name, e.g.
    /// `general:col.active_border`.
    pub category: Option<&'static str>,
}

impl Syntax {
    pub const HYPRLAND: Syntax = Syntax {
        comments: CommentStyle::Hash,
        quotes: b"",
        braces: true,
        separator: Separator::Equals,
        terminator: Terminator::LineEnd,
        indent: "    ",
        line_at_rules: false,
        category: Some(":"),
    };

    pub const KITTY: Syntax = Syntax {
        comments: CommentStyle::HashLine,
        quotes: b"",
        braces: false,
        separator: Separator::Whitespace,
        terminator: Terminator::LineEnd,
        indent: "",
        line_at_rules: false,
        category: None,
    };

    pub const INI: Syntax = Syntax {
        comments: CommentStyle::IniLine,
        quotes: b"\"",
        braces: false,
        separator: Separator::Equals,
        terminator: Terminator::LineEnd,
        indent: "    ",
        line_at_rules: false,
        category: None,
    };

    pub const CSS: Syntax = Syntax {
        comments: CommentStyle::CBlock,
        quotes: b"\"'",
        braces: true,
        separator: Separator::Colon,
        terminator: Terminator::Semicolon,
        indent: "    ",
        line_at_rules: false,
        category: None,
    };

    pub const RASI: Syntax = Syntax {
        comments: CommentStyle::CBlockAndLine,
        quotes: b"\"'",
        braces: true,
        separator: Separator::Colon,
        terminator: Terminator::Semicolon,
        indent: "    ",
        line_at_rules: true,
        category: None,
    };

    fn line_terminated(&self) -> bool {
        self.terminator == Terminator::LineEnd
    }

    /// Render `key value` with this format's separator and terminator.
    pub fn statement(&self, key: &str, separator: Separator, value: &str) -> String {
        let mut statement = match separator {
            Separator::Equals => format!("{key} = {value}"),
            Separator::Colon => format!("{key}: {value}"),
            Separator::Whitespace => format!("{key} {value}"),
        };
        if self.terminator == Terminator::Semicolon {
            statement.push(';');
        }
        statement
    }
}

/// Brace structure that could not be matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unexpected '}}' at byte {0}")]
    UnexpectedClose(usize),
    #[error("{0} unclosed '{{'")]
    Unclosed(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Code,
    Comment,
    Quoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Line-oriented region: the whole file or an INI section.
    Lines,
    /// Inside `{ ... }`; `header_start` is where the block's header begins.
    Block { header_start: usize },
}

/// A region of the text and the nesting depth of its direct contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub depth: u32,
    pub kind: SpanKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub header: String,
    pub header_start: usize,
    pub open: usize,
    pub close: usize,
    pub depth: u32,
}

impl Block {
    pub fn body(&self) -> Span {
        Span {
            start: self.open + 1,
            end: self.close,
            depth: self.depth + 1,
            kind: SpanKind::Block {
                header_start: self.header_start,
            },
        }
    }
}

/// One `key <sep> value` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub start: usize,
    pub value: Range<usize>,
}

fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Wrap `value` in the quotes `old` used, unless it already carries some.
pub fn preserve_quotes(old: &str, value: &str) -> String {
    let quoted = |s: &str, q: char| s.len() >= 2 && s.starts_with(q) && s.ends_with(q);
    for q in ['"', '\''] {
        if quoted(old, q) && !quoted(value, '"') && !quoted(value, '\'') {
            return format!("{q}{value}{q}");
        }
    }
    value.to_string()
}

fn key_regex(key: &str) -> Option<Regex> {
    let pattern = key
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[ \t]+");
    if pattern.is_empty() {
        return None;
    }
    Regex::new(&pattern).ok()
}

pub struct Document<'a> {
    text: &'a str,
    syntax: Syntax,
    kinds: Vec<Kind>,
    depths: Vec<u32>,
}

impl<'a> Document<'a> {
    /// Scan `text`, failing when braces do not balance.
    pub fn parse(text: &'a str, syntax: Syntax) -> Result<Self, ScanError> {
        let (document, error) = Self::scan(text, syntax, syntax.braces);
        match error {
            Some(error) => Err(error),
            None => Ok(document),
        }
    }

    /// Scan `text` without brace tracking: every byte sits at depth 0.
    pub fn flat(text: &'a str, syntax: Syntax) -> Self {
        Self::scan(text, syntax, false).0
    }

    fn scan(text: &'a str, syntax: Syntax, track_braces: bool) -> (Self, Option<ScanError>) {
        let bytes = text.as_bytes();
        let n = bytes.len();
        let mut kinds = vec![Kind::Code; n];
        let mut depths = vec![0u32; n];
        let mut depth = 0u32;
        let mut error = None;
        let mut line_blank = true;
        let mut i = 0;

        while i < n {
            let b = bytes[i];

            if let Some(end) = comment_end(bytes, i, syntax.comments, line_blank) {
                for k in i..end {
                    kinds[k] = Kind::Comment;
                    depths[k] = depth;
                }
                i = end;
                line_blank = false;
                continue;
            }

            if syntax.quotes.contains(&b) {
                let end = quote_end(bytes, i, b);
                for k in i..end {
                    kinds[k] = Kind::Quoted;
                    depths[k] = depth;
                }
                i = end;
                line_blank = false;
                continue;
            }

            depths[i] = depth;
            if track_braces {
                if b == b'{' {
                    depth += 1;
                } else if b == b'}' {
                    if depth == 0 {
                        error.get_or_insert(ScanError::UnexpectedClose(i));
                    } else {
                        depth -= 1;
                        depths[i] = depth;
                    }
                }
            }

            if b == b'\n' {
                line_blank = true;
            } else if !is_blank(b) {
                line_blank = false;
            }
            i += 1;
        }

        if depth > 0 {
            error.get_or_insert(ScanError::Unclosed(depth));
        }

        (
            Self {
                text,
                syntax,
                kinds,
                depths,
            },
            error,
        )
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn root(&self) -> Span {
        Span {
            start: 0,
            end: self.text.len(),
            depth: 0,
            kind: SpanKind::Lines,
        }
    }

    fn is_code(&self, i: usize) -> bool {
        self.kinds[i] == Kind::Code
    }

    fn byte(&self, i: usize) -> u8 {
        self.text.as_bytes()[i]
    }

    /// Blocks that sit directly inside `scope`, in order.
    pub fn blocks(&self, scope: Span) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut i = scope.start;

        while i < scope.end {
            if self.is_code(i) && self.byte(i) == b'{' && self.depths[i] == scope.depth {
                let close = (i + 1..scope.end).find(|&j| {
                    self.is_code(j) && self.byte(j) == b'}' && self.depths[j] == scope.depth
                });
                let Some(close) = close else { break };
                let (header_start, header) = self.header_before(i, scope.start);
                blocks.push(Block {
                    header,
                    header_start,
                    open: i,
                    close,
                    depth: scope.depth,
                });
                i = close + 1;
                continue;
            }
            i += 1;
        }

        blocks
    }

    pub fn find_block(&self, scope: Span, name: &str) -> Option<Block> {
        let name = collapse_whitespace(name);
        self.blocks(scope).into_iter().find(|block| block.header == name)
    }

    fn header_before(&self, open: usize, floor: usize) -> (usize, String) {
        let mut boundary = floor;
        let mut p = open;
        while p > floor {
            p -= 1;
            if !self.is_code(p) {
                continue;
            }
            let b = self.byte(p);
            if matches!(b, b'{' | b'}' | b';') || (b == b'\n' && self.syntax.line_terminated()) {
                boundary = p + 1;
                break;
            }
        }
        if self.syntax.line_at_rules {
            boundary = self.after_at_rule_lines(boundary, open);
        }

        let mut header = String::new();
        let mut header_start = None;
        for (offset, ch) in self.text[boundary..open].char_indices() {
            let at = boundary + offset;
            if self.kinds[at] == Kind::Comment {
                header.push(' ');
                continue;
            }
            if header_start.is_none() && !ch.is_whitespace() {
                header_start = Some(at);
            }
            header.push(ch);
        }

        (header_start.unwrap_or(open), collapse_whitespace(&header))
    }

    /// First byte after the last complete `@rule ...` line in `from..open`.
    fn after_at_rule_lines(&self, from: usize, open: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut boundary = from;
        let mut line_start = from;
        while let Some(k) = bytes[line_start..open].iter().position(|&b| b == b'\n') {
            let line_end = line_start + k;
            let first = (line_start..line_end).find(|&i| self.is_code(i) && !is_blank(bytes[i]));
            if first.is_some_and(|i| bytes[i] == b'@') {
                boundary = line_end + 1;
            }
            line_start = line_end + 1;
        }
        boundary
    }

    /// INI section named `name`: from the line after its header up to the next header.
    pub fn section(&self, name: &str) -> Option<Span> {
        let headers = self.section_headers();
        let index = headers.iter().position(|(_, header, _)| header == name.trim())?;
        let start = headers[index].2;
        let end = headers
            .get(index + 1)
            .map_or(self.text.len(), |(line_start, _, _)| *line_start);
        Some(Span {
            start,
            end,
            depth: 0,
            kind: SpanKind::Lines,
        })
    }

    /// `(line start, name, first byte after the header line)` for each section.
    fn section_headers(&self) -> Vec<(usize, String, usize)> {
        INI_HEADER
            .captures_iter(self.text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?;
                if !self.is_code(name.start() - 1) {
                    return None;
                }
                let after = match self.text[whole.end()..].find('\n') {
                    Some(k) => whole.end() + k + 1,
                    None => self.text.len(),
                };
                Some((whole.start(), name.as_str().trim().to_string(), after))
            })
            .collect()
    }

    /// Assignments of `key` that sit directly in `scope`.
    ///
    /// With `anywhere` set, nesting depth is ignored and the whole text up
    /// to `scope.end` is searched.
    pub fn assignments(
        &self,
        scope: Span,
        key: &str,
        separator: Separator,
        anywhere: bool,
    ) -> Vec<Assignment> {
        let Some(regex) = key_regex(key) else {
            return Vec::new();
        };
        let haystack = &self.text[..scope.end];
        let floor = if anywhere { 0 } else { scope.start };
        let mut found = Vec::new();
        let mut pos = floor;

        while let Some(m) = regex.find_at(haystack, pos) {
            pos = m.end().max(m.start() + 1);
            let start = m.start();
            if !self.is_code(start) {
                continue;
            }
            if !anywhere && self.depths[start] != scope.depth {
                continue;
            }
            if !self.at_statement_start(start, floor) {
                continue;
            }
            if let Some(value) = self.value_after(m.end(), scope.end, separator) {
                found.push(Assignment { start, value });
            }
            if pos >= haystack.len() {
                break;
            }
        }

        found
    }

    /// Whether `key` is set in `scope`, either as an assignment or as a block.
    pub fn has_key(&self, scope: Span, key: &str, separator: Separator) -> bool {
        !self.assignments(scope, key, separator, false).is_empty()
            || self.find_block(scope, key).is_some()
    }

    fn at_statement_start(&self, start: usize, floor: usize) -> bool {
        let mut p = start;
        while p > floor {
            p -= 1;
            match self.kinds[p] {
                Kind::Comment => continue,
                Kind::Quoted => return false,
                Kind::Code => {}
            }
            match self.byte(p) {
                b'\n' if self.syntax.line_terminated() => return true,
                b if is_blank(b) => continue,
                b'{' | b'}' | b';' => return true,
                _ => return false,
            }
        }
        true
    }

    fn value_after(&self, key_end: usize, limit: usize, separator: Separator) -> Option<Range<usize>> {
        let bytes = self.text.as_bytes();
        let skip_inline = |mut q: usize| {
            while q < limit && matches!(bytes[q], b' ' | b'\t') {
                q += 1;
            }
            q
        };

        let mut q = key_end;
        match separator {
            Separator::Equals => {
                q = skip_inline(q);
                if q >= limit || bytes[q] != b'=' || !self.is_code(q) {
                    return None;
                }
                q += 1;
            }
            Separator::Colon => {
                while q < limit && is_blank(bytes[q]) {
                    q += 1;
                }
                if q >= limit || bytes[q] != b':' || !self.is_code(q) {
                    return None;
                }
                q += 1;
            }
            Separator::Whitespace => {
                let after = skip_inline(q);
                if after == q || after >= limit || matches!(bytes[after], b'=' | b'\n' | b'\r') {
                    return None;
                }
                q = after;
            }
        }

        let value_start = skip_inline(q);
        let mut end = value_start;
        while end < limit {
            match self.kinds[end] {
                Kind::Comment => break,
                Kind::Quoted => {
                    end += 1;
                    continue;
                }
                Kind::Code => {}
            }
            match bytes[end] {
                b'\n' if self.syntax.line_terminated() => break,
                b'}' => break,
                b'{' => return None,
                b';' if self.syntax.terminator == Terminator::Semicolon => break,
                _ => end += 1,
            }
        }

        while end > value_start && is_blank(bytes[end - 1]) {
            end -= 1;
        }
        Some(value_start..end)
    }

    pub fn value_text(&self, assignment: &Assignment) -> &'a str {
        &self.text[assignment.value.clone()]
    }

    /// Replace the value of every assignment in `found` with `value`.
    pub fn replace_values(&self, found: &[Assignment], value: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + value.len());
        let mut cursor = 0;
        for assignment in found {
            out.push_str(&self.text[cursor..assignment.value.start]);
            out.push_str(&preserve_quotes(self.value_text(assignment), value));
            cursor = assignment.value.end;
        }
        out.push_str(&self.text[cursor..]);
        out
    }

    fn line_indent(&self, at: usize) -> &'a str {
        let line_start = self.text[..at].rfind('\n').map_or(0, |k| k + 1);
        let rest = &self.text[line_start..];
        let width = rest
            .bytes()
            .take_while(|b| matches!(b, b' ' | b'\t'))
            .count();
        &rest[..width]
    }

    /// Leading whitespace of the first content line directly in `scope`.
    pub fn content_indent(&self, scope: Span) -> Option<&'a str> {
        let bytes = self.text.as_bytes();
        (scope.start..scope.end)
            .filter(|&i| i == 0 || bytes[i - 1] == b'\n')
            .find_map(|line_start| {
                let mut j = line_start;
                while j < scope.end && matches!(bytes[j], b' ' | b'\t') {
                    j += 1;
                }
                let usable = j < scope.end
                    && self.is_code(j)
                    && self.depths[j] == scope.depth
                    && !matches!(bytes[j], b'\n' | b'\r' | b'}' | b'[');
                usable.then(|| &self.text[line_start..j])
            })
    }

    /// Insert a statement at the end of `scope`.
    ///
    /// `render` receives the indentation chosen for the new line.
    /// `fallback_indent` is used for line regions that have no content yet.
    pub fn insert<F>(&self, scope: Span, render: F, fallback_indent: &str) -> String
    where
        F: Fn(&str) -> String,
    {
        match scope.kind {
            SpanKind::Lines => self.insert_lines(scope, render, fallback_indent),
            SpanKind::Block { header_start } => self.insert_block(scope, header_start, render),
        }
    }

    fn insert_lines<F>(&self, scope: Span, render: F, fallback_indent: &str) -> String
    where
        F: Fn(&str) -> String,
    {
        let bytes = self.text.as_bytes();
        let indent = self
            .content_indent(scope)
            .unwrap_or(fallback_indent)
            .to_string();
        let last = (scope.start..scope.end).rev().find(|&i| !is_blank(bytes[i]));
        let pos = match last {
            Some(i) => after_newline(bytes, i, scope.end),
            None => scope.start,
        };

        let mut out = String::with_capacity(self.text.len() + 64);
        out.push_str(&self.text[..pos]);
        if pos > 0 && bytes[pos - 1] != b'\n' {
            out.push('\n');
        }
        out.push_str(&indent);
        out.push_str(&render(&indent));
        out.push('\n');
        out.push_str(&self.text[pos..]);
        out
    }

    fn insert_block<F>(&self, scope: Span, header_start: usize, render: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let bytes = self.text.as_bytes();
        let close = scope.end;
        let closing_indent = self.line_indent(header_start);
        let indent = self
            .content_indent(scope)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{closing_indent}{}", self.syntax.indent));

        let last_any = (scope.start..close).rev().find(|&i| !is_blank(bytes[i]));
        let last_code = (scope.start..close)
            .rev()
            .find(|&i| !is_blank(bytes[i]) && self.kinds[i] != Kind::Comment);
        let semicolon_at = last_code
            .filter(|&i| {
                self.syntax.terminator == Terminator::Semicolon
                    && !matches!(bytes[i], b';' | b'{' | b'}')
            })
            .map(|i| i + 1);

        let body = &self.text[scope.start..close];
        let closing_on_own_line = body
            .rfind('\n')
            .is_some_and(|k| body[k + 1..].trim().is_empty());

        let mut out = String::with_capacity(self.text.len() + 64);
        let push_prefix = |out: &mut String, upto: usize| match semicolon_at {
            Some(at) if at <= upto => {
                out.push_str(&self.text[..at]);
                out.push(';');
                out.push_str(&self.text[at..upto]);
            }
            _ => out.push_str(&self.text[..upto]),
        };

        if closing_on_own_line {
            let pos = match last_any {
                Some(i) => after_newline(bytes, i, close),
                None => body.find('\n').map_or(scope.start, |k| scope.start + k + 1),
            };
            push_prefix(&mut out, pos);
            out.push_str(&indent);
            out.push_str(&render(&indent));
            out.push('\n');
            out.push_str(&self.text[pos..]);
        } else {
            let cut = last_any.map_or(scope.start, |i| i + 1);
            push_prefix(&mut out, cut);
            out.push('\n');
            out.push_str(&indent);
            out.push_str(&render(&indent));
            out.push('\n');
            out.push_str(closing_indent);
            out.push_str(&self.text[close..]);
        }
        out
    }

    /// Append an empty `name { }` block at the end of `scope`.
    pub fn insert_block_named(&self, scope: Span, name: &str) -> String {
        let separate = scope.kind == SpanKind::Lines && !self.text.trim().is_empty();
        self.insert(
            scope,
            |indent| {
                let lead = if separate { "\n" } else { "" };
                format!("{lead}{name} {{\n{indent}}}")
            },
            "",
        )
    }

    /// Append an empty `[name]` section at the end of the file.
    pub fn append_section(&self, name: &str) -> String {
        let mut out = self.text.to_string();
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        if !out.trim().is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("[{name}]\n"));
        out
    }
}

/// Position just past the first newline in `from..limit`, or `limit`.
///
/// Works on bytes: `from` may sit inside a multibyte character.
fn after_newline(bytes: &[u8], from: usize, limit: usize) -> usize {
    bytes[from..limit]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(limit, |k| from + k + 1)
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |k| from + k)
}

fn comment_end(bytes: &[u8], i: usize, style: CommentStyle, line_blank: bool) -> Option<usize> {
    let b = bytes[i];
    let next = bytes.get(i + 1).copied();
    match style {
        CommentStyle::Hash if b == b'#' => Some(line_end(bytes, i)),
        CommentStyle::HashLine if b == b'#' && line_blank => Some(line_end(bytes, i)),
        CommentStyle::IniLine if (b == b'#' || b == b';') && line_blank => {
            Some(line_end(bytes, i))
        }
        CommentStyle::CBlock | CommentStyle::CBlockAndLine if b == b'/' && next == Some(b'*') => {
            let end = bytes[i + 2..]
                .windows(2)
                .position(|w| w == b"*/")
                .map_or(bytes.len(), |k| i + 2 + k + 2);
            Some(end)
        }
        CommentStyle::CBlockAndLine if b == b'/' && next == Some(b'/') => Some(line_end(bytes, i)),
        _ => None,
    }
}

fn quote_end(bytes: &[u8], i: usize, quote: u8) -> usize {
    let mut j = i + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return j,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbalanced_braces_fail_to_parse() {
        assert_eq!(
            Document::parse("a {\n", Syntax::HYPRLAND).err(),
            Some(ScanError::Unclosed(1))
        );
        assert!(matches!(
            Document::parse("}\n", Syntax::HYPRLAND),
            Err(ScanError::UnexpectedClose(0))
        ));
        assert!(Document::parse("a { b { } }", Syntax::HYPRLAND).is_ok());
    }

    #[test]
    fn test_braces_in_comments_and_strings_are_ignored() {
        let css = "/* { */ a { content: \"}\"; }\n";
        let doc = Document::parse(css, Syntax::CSS).unwrap();
        let blocks = doc.blocks(doc.root());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].header, "a");

        let hypr = "# decoration {\ngeneral {\n}\n";
        assert!(Document::parse(hypr, Syntax::HYPRLAND).is_ok());
    }

    #[test]
    fn test_nested_block_lookup() {
        let text = "decoration {\n    rounding = 8\n    blur {\n        size = 3\n    }\n}\nblur {\n}\n";
        let doc = Document::parse(text, Syntax::HYPRLAND).unwrap();
        let decoration = doc.find_block(doc.root(), "decoration").unwrap();
        let blur = doc.find_block(decoration.body(), "blur").unwrap();
        assert!(doc.text()[blur.open..blur.close].contains("size = 3"));

        let top_blur = doc.find_block(doc.root(), "blur").unwrap();
        assert!(top_blur.open > decoration.close);
    }

    #[test]
    fn test_css_selector_headers() {
        let text = "@import \"colors.css\";\n/* bar */\nwindow#waybar {\n  color: red;\n}\n#workspaces   button.focused { color: blue; }\n";
        let doc = Document::parse(text, Syntax::CSS).unwrap();
        let headers: Vec<_> = doc.blocks(doc.root()).into_iter().map(|b| b.header).collect();
        assert_eq!(headers, vec!["window#waybar", "#workspaces button.focused"]);
    }

    #[test]
    fn test_assignments_respect_depth_and_boundaries() {
        let text = "enabled = false\ndecoration {\n    enabled = true\n    blur {\n        enabled = yes\n    }\n}\n";
        let doc = Document::parse(text, Syntax::HYPRLAND).unwrap();
        let decoration = doc.find_block(doc.root(), "decoration").unwrap();

        let found = doc.assignments(decoration.body(), "enabled", Separator::Equals, false);
        assert_eq!(found.len(), 1);
        assert_eq!(doc.value_text(&found[0]), "true");

        let top = doc.assignments(doc.root(), "enabled", Separator::Equals, false);
        assert_eq!(top.len(), 1);
        assert_eq!(doc.value_text(&top[0]), "false");

        let all = doc.assignments(doc.root(), "enabled", Separator::Equals, true);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_key_prefixes_do_not_match() {
        let text = "background_opacity 0.9\nselection_background #111111\nbackground #000000\n";
        let doc = Document::parse(text, Syntax::KITTY).unwrap();
        let found = doc.assignments(doc.root(), "background", Separator::Whitespace, false);
        assert_eq!(found.len(), 1);
        assert_eq!(doc.value_text(&found[0]), "#000000");
    }

    #[test]
    fn test_trailing_comment_is_not_part_of_value() {
        let text = "general {\n    col.active_border = rgba(ffffffff) # white\n}\n";
        let doc = Document::parse(text, Syntax::HYPRLAND).unwrap();
        let general = doc.find_block(doc.root(), "general").unwrap();
        let found = doc.assignments(general.body(), "col.active_border", Separator::Equals, false);
        assert_eq!(doc.value_text(&found[0]), "rgba(ffffffff)");
    }

    #[test]
    fn test_single_line_block_value() {
        let text = "decoration { col.active_border = rgba(66, 66, 66, 0.5) }";
        let doc = Document::parse(text, Syntax::HYPRLAND).unwrap();
        let decoration = doc.find_block(doc.root(), "decoration").unwrap();
        let found = doc.assignments(decoration.body(), "col.active_border", Separator::Equals, false);
        assert_eq!(doc.value_text(&found[0]), "rgba(66, 66, 66, 0.5)");
    }

    #[test]
    fn test_css_selector_is_not_an_assignment() {
        let text = "button:hover { color: red; }\n";
        let doc = Document::parse(text, Syntax::CSS).unwrap();
        assert!(doc.assignments(doc.root(), "button", Separator::Colon, true).is_empty());
        assert_eq!(doc.assignments(doc.root(), "color", Separator::Colon, true).len(), 1);
    }

    #[test]
    fn test_define_color_with_whitespace_separator() {
        let text = "@define-color  accent_color #ff0000;\n@define-color accent_bg_color #00ff00;\n";
        let doc = Document::parse(text, Syntax::CSS).unwrap();
        let found = doc.assignments(doc.root(), "@define-color accent_color", Separator::Whitespace, false);
        assert_eq!(found.len(), 1);
        assert_eq!(doc.value_text(&found[0]), "#ff0000");
    }

    #[test]
    fn test_insert_into_multiline_block() {
        let text = "decoration {\n    rounding = 8\n}\n";
        let doc = Document::parse(text, Syntax::HYPRLAND).unwrap();
        let body = doc.find_block(doc.root(), "decoration").unwrap().body();
        let out = doc.insert(body, |_| "col.shadow = rgba(00000055)".to_string(), "");
        assert_eq!(
            out,
            "decoration {\n    rounding = 8\n    col.shadow = rgba(00000055)\n}\n"
        );
    }

    #[test]
    fn test_insert_into_single_line_block() {
        let text = "decoration { rounding = 8 }\n";
        let doc = Document::parse(text, Syntax::HYPRLAND).unwrap();
        let body = doc.find_block(doc.root(), "decoration").unwrap().body();
        let out = doc.insert(body, |_| "blur = true".to_string(), "");
        assert_eq!(out, "decoration { rounding = 8\n    blur = true\n}\n");
    }

    #[test]
    fn test_insert_adds_missing_semicolon() {
        let text = "* {\n    background: #000000\n}\n";
        let doc = Document::parse(text, Syntax::RASI).unwrap();
        let body = doc.find_block(doc.root(), "*").unwrap().body();
        let out = doc.insert(body, |_| "foreground: #ffffff;".to_string(), "");
        assert_eq!(out, "* {\n    background: #000000;\n    foreground: #ffffff;\n}\n");
    }

    #[test]
    fn test_insert_nested_block_and_fill_it() {
        let text = "decoration {\n    rounding = 8\n}\n";
        let doc = Document::parse(text, Syntax::HYPRLAND).unwrap();
        let body = doc.find_block(doc.root(), "decoration").unwrap().body();
        let with_blur = doc.insert_block_named(body, "blur");
        assert_eq!(with_blur, "decoration {\n    rounding = 8\n    blur {\n    }\n}\n");

        let doc = Document::parse(&with_blur, Syntax::HYPRLAND).unwrap();
        let decoration = doc.find_block(doc.root(), "decoration").unwrap();
        let blur = doc.find_block(decoration.body(), "blur").unwrap();
        let out = doc.insert(blur.body(), |_| "enabled = true".to_string(), "");
        assert_eq!(
            out,
            "decoration {\n    rounding = 8\n    blur {\n        enabled = true\n    }\n}\n"
        );
    }

    #[test]
    fn test_ini_sections() {
        let text = "[global]\n    font = Monospace 8\n\n[urgency_low]\n    timeout = 10\n";
        let doc = Document::parse(text, Syntax::INI).unwrap();
        let low = doc.section("urgency_low").unwrap();
        assert_eq!(&text[low.start..low.end], "    timeout = 10\n");
        assert!(doc.section("urgency_critical").is_none());

        let global = doc.section("global").unwrap();
        let out = doc.insert(global, |_| "frame_width = 2".to_string(), "");
        assert_eq!(
            out,
            "[global]\n    font = Monospace 8\n    frame_width = 2\n\n[urgency_low]\n    timeout = 10\n"
        );
    }

    #[test]
    fn test_ini_comment_headers_are_ignored() {
        let text = "# [global]\n[urgency_low]\n";
        let doc = Document::parse(text, Syntax::INI).unwrap();
        assert!(doc.section("global").is_none());
        assert!(doc.section("urgency_low").is_some());
    }

    #[test]
    fn test_append_section_separates_with_blank_line() {
        let doc = Document::parse("[global]\n    a = 1", Syntax::INI).unwrap();
        assert_eq!(doc.append_section("urgency_low"), "[global]\n    a = 1\n\n[urgency_low]\n");
    }

    #[test]
    fn test_insert_after_trailing_multibyte_text() {
        let text = "font_family Fira Code\n# café\n";
        let doc = Document::parse(text, Syntax::KITTY).unwrap();
        let out = doc.insert(doc.root(), |_| "background #F7F2FA".to_string(), "");
        assert_eq!(out, "font_family Fira Code\n# café\nbackground #F7F2FA\n");

        let text = "general {\n    gaps_in = 5 # café\n}\n";
        let doc = Document::parse(text, Syntax::HYPRLAND).unwrap();
        let body = doc.find_block(doc.root(), "general").unwrap().body();
        let out = doc.insert(body, |_| "border_size = 2".to_string(), "");
        assert_eq!(out, "general {\n    gaps_in = 5 # café\n    border_size = 2\n}\n");

        let text = "* {\n    width: 5; // café\n}\n";
        let doc = Document::parse(text, Syntax::RASI).unwrap();
        let body = doc.find_block(doc.root(), "*").unwrap().body();
        let out = doc.insert(body, |_| "height: 6;".to_string(), "");
        assert_eq!(out, "* {\n    width: 5; // café\n    height: 6;\n}\n");
    }

    #[test]
    fn test_rasi_at_rule_lines_are_not_block_headers() {
        let text = "@import \"colors.rasi\"\n@theme \"gruvbox\" // base\n* {\n    background: #000000;\n}\n";
        let doc = Document::parse(text, Syntax::RASI).unwrap();
        let headers: Vec<_> = doc.blocks(doc.root()).into_iter().map(|b| b.header).collect();
        assert_eq!(headers, vec!["*"]);
    }

    #[test]
    fn test_hyprland_category_assignment() {
        let text = "general:col.active_border = rgba(ffffffff)\ncol.active_border = rgba(00000000)\n";
        let doc = Document::parse(text, Syntax::HYPRLAND).unwrap();
        let found = doc.assignments(doc.root(), "general:col.active_border", Separator::Equals, false);
        assert_eq!(found.len(), 1);
        assert_eq!(doc.value_text(&found[0]), "rgba(ffffffff)");
        let plain = doc.assignments(doc.root(), "col.active_border", Separator::Equals, false);
        assert_eq!(plain.len(), 1);
        assert_eq!(doc.value_text(&plain[0]), "rgba(00000000)");
    }

    #[test]
    fn test_preserve_quotes() {
        assert_eq!(preserve_quotes("\"#000000\"", "#ffffff"), "\"#ffffff\"");
        assert_eq!(preserve_quotes("#000000", "#ffffff"), "#ffffff");
        assert_eq!(preserve_quotes("'#000'", "\"#fff\""), "\"#fff\"");
    }
}
