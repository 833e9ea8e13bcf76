//! # Stylesheet Parser
//!
//! Parses the declarative stylesheet format into an ordered list of
//! [StyleRule]s:
//!
//! ```text
//! /* comments are ignored */
//! QPushButton, QToolButton {
//!     background-color: #3c3c3c;
//!     border: 1px solid #555;
//! }
//! QPushButton#btn_ok:hover { background-color: #505050 }
//! QLabel[objectName^="caution_label"] { color: #f0a030; }
//! QComboBox::drop-down:!editable { image: url(/icons/down.svg); }
//! ```
//!
//! Descendant and child combinators are rejected, as is any malformed
//! declaration (for example `color font: bold;`). Every error carries the
//! 1-based line and column it was found at.

use crate::element::StateFlags;
use crate::error::{ThemeError, ThemeResult};
use crate::properties::{PropertyMap, PropertyValue};
use crate::rule::StyleRule;
use crate::selector::{IdentifierMatch, SelectorExpr, TypeMatch};

/// Attribute that selects on the widget's identifier.
const IDENTIFIER_ATTRIBUTE: &str = "objectName";

/// Parse stylesheet text into rules, preserving declaration order.
///
/// `theme` only labels errors.
pub fn parse_stylesheet(theme: &str, source: &str) -> ThemeResult<Vec<StyleRule>> {
    Parser::new(theme, source)?.parse()
}

struct Parser<'a> {
    theme: &'a str,
    /// Original text, used for error locations.
    source: &'a str,
    /// Same byte layout as `source` with comments blanked out.
    text: String,
    line_starts: Vec<usize>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(theme: &'a str, source: &'a str) -> ThemeResult<Self> {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        let mut parser = Self {
            theme,
            source,
            text: String::new(),
            line_starts,
            pos: 0,
        };
        parser.text = parser.blank_comments()?;
        Ok(parser)
    }

    fn location(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = self.source[self.line_starts[line]..offset].chars().count() + 1;
        (line + 1, column)
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> ThemeError {
        let (line, column) = self.location(offset);
        ThemeError::parse(self.theme, line, column, message)
    }

    /// Replace every comment with spaces, keeping newlines and byte offsets intact.
    fn blank_comments(&self) -> ThemeResult<String> {
        let mut out = String::with_capacity(self.source.len());
        let mut chars = self.source.char_indices().peekable();
        let mut quote: Option<char> = None;

        while let Some((i, c)) = chars.next() {
            match quote {
                Some(q) => {
                    if c == q {
                        quote = None;
                    }
                    out.push(c);
                },
                None if c == '"' || c == '\'' => {
                    quote = Some(c);
                    out.push(c);
                },
                None if c == '/' && matches!(chars.peek(), Some((_, '*'))) => {
                    chars.next();
                    out.push_str("  ");
                    let mut closed = false;
                    while let Some((_, c)) = chars.next() {
                        if c == '*' && matches!(chars.peek(), Some((_, '/'))) {
                            chars.next();
                            out.push_str("  ");
                            closed = true;
                            break;
                        }
                        if c == '\n' {
                            out.push('\n');
                        } else {
                            out.extend(std::iter::repeat(' ').take(c.len_utf8()));
                        }
                    }
                    if !closed {
                        return Err(self.error(i, "unterminated comment"));
                    }
                },
                None => out.push(c),
            }
        }

        Ok(out)
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn parse(mut self) -> ThemeResult<Vec<StyleRule>> {
        let mut rules = Vec::new();

        loop {
            self.skip_whitespace();
            if self.pos >= self.text.len() {
                break;
            }
            let selectors = self.parse_selector_list()?;
            let properties = self.parse_block()?;
            for selector in selectors {
                let order = rules.len();
                rules.push(StyleRule::new(selector, properties.clone(), order));
            }
        }

        Ok(rules)
    }

    /// Parse comma-separated selectors up to and including the opening brace.
    fn parse_selector_list(&mut self) -> ThemeResult<Vec<SelectorExpr>> {
        let start = self.pos;
        let open = self.find_unnested(start, |b| b == b'{', |b| b == b'}' || b == b';')?;
        let open = match open {
            Some(open) => open,
            None => return Err(self.error(start, "expected '{' after selector")),
        };
        self.pos = open + 1;

        let mut selectors = Vec::new();
        for (offset, part) in split_unnested(&self.text[start..open], b',') {
            let offset = start + offset;
            let trimmed = part.trim_start();
            let offset = offset + (part.len() - trimmed.len());
            let trimmed = trimmed.trim_end();
            if trimmed.is_empty() {
                return Err(self.error(offset, "empty selector"));
            }
            selectors.push(self.parse_selector(trimmed, offset)?);
        }
        Ok(selectors)
    }

    /// Parse declarations up to and including the closing brace.
    fn parse_block(&mut self) -> ThemeResult<PropertyMap> {
        let start = self.pos;
        let close = self.find_unnested(start, |b| b == b'}', |b| b == b'{')?;
        let close = match close {
            Some(close) => close,
            None => return Err(self.error(start - 1, "unterminated declaration block")),
        };
        self.pos = close + 1;

        let mut properties = PropertyMap::new();
        for (offset, declaration) in split_unnested(&self.text[start..close], b';') {
            let offset = start + offset;
            if declaration.trim().is_empty() {
                continue;
            }
            let (name, value) = self.parse_declaration(declaration, offset)?;
            properties.insert(name, value);
        }
        Ok(properties)
    }

    fn parse_declaration(&self, declaration: &str, offset: usize) -> ThemeResult<(String, PropertyValue)> {
        let leading = declaration.len() - declaration.trim_start().len();
        let offset = offset + leading;
        let declaration = declaration.trim();

        let colon = match declaration.find(':') {
            Some(colon) => colon,
            None => {
                return Err(self.error(offset, format!("expected ':' in declaration '{}'", declaration)));
            },
        };
        let name = declaration[..colon].trim();
        let value = declaration[colon + 1..].trim();

        if !is_property_name(name) {
            return Err(self.error(offset, format!("malformed property name '{}'", name)));
        }
        if value.is_empty() {
            return Err(self.error(offset + colon, format!("missing value for property '{}'", name)));
        }
        Ok((name.to_string(), PropertyValue::new(value)))
    }

    fn parse_selector(&self, text: &str, offset: usize) -> ThemeResult<SelectorExpr> {
        let bytes = text.as_bytes();

        let (element_type, mut i) = match bytes[0] {
            b'*' => (TypeMatch::Any, 1),
            b'.' => {
                let (name, end) = take_name(text, 1);
                if name.is_empty() {
                    return Err(self.error(offset, "expected a widget type after '.'"));
                }
                (TypeMatch::exact(name), end)
            },
            _ => match take_name(text, 0) {
                ("", end) => (TypeMatch::Any, end),
                (name, end) => (TypeMatch::exact(name), end),
            },
        };
        let mut selector = SelectorExpr::new(element_type);
        let mut identifier_set = false;
        let mut sub_control_set = false;

        while i < bytes.len() {
            let at = offset + i;
            match bytes[i] {
                b'#' => {
                    let (name, end) = take_name(text, i + 1);
                    if name.is_empty() {
                        return Err(self.error(at, "expected an identifier after '#'"));
                    }
                    if identifier_set {
                        return Err(self.error(at, "selector has more than one identifier"));
                    }
                    identifier_set = true;
                    selector = selector.with_identifier(IdentifierMatch::Exact(name.to_string()));
                    i = end;
                },
                b'[' => {
                    let close = match text[i..].find(']') {
                        Some(close) => i + close,
                        None => return Err(self.error(at, "unterminated attribute selector")),
                    };
                    if identifier_set {
                        return Err(self.error(at, "selector has more than one identifier"));
                    }
                    identifier_set = true;
                    let identifier = self.parse_attribute(&text[i + 1..close], at)?;
                    selector = selector.with_identifier(identifier);
                    i = close + 1;
                },
                b':' if bytes.get(i + 1) == Some(&b':') => {
                    let (name, end) = take_name(text, i + 2);
                    if name.is_empty() {
                        return Err(self.error(at, "expected a sub-control after '::'"));
                    }
                    if sub_control_set {
                        return Err(self.error(at, "selector has more than one sub-control"));
                    }
                    sub_control_set = true;
                    selector = selector.with_sub_control(name);
                    i = end;
                },
                b':' => {
                    let negated = bytes.get(i + 1) == Some(&b'!');
                    let name_start = if negated { i + 2 } else { i + 1 };
                    let (name, end) = take_name(text, name_start);
                    let (flag, inverted) = match name {
                        "enabled" => (StateFlags::DISABLED, true),
                        "unchecked" => (StateFlags::CHECKED, true),
                        other => match StateFlags::from_pseudo(other) {
                            Some(flag) => (flag, false),
                            None => {
                                return Err(self.error(at, format!("unknown pseudo-state ':{}'", other)));
                            },
                        },
                    };
                    selector = if negated != inverted {
                        selector.excluding(flag)
                    } else {
                        selector.requiring(flag)
                    };
                    i = end;
                },
                b' ' | b'\t' | b'\r' | b'\n' | b'>' | b'+' | b'~' => {
                    return Err(self.error(at, "combinators are not supported"));
                },
                _ => {
                    let c = text[i..].chars().next().unwrap_or_default();
                    return Err(self.error(at, format!("unexpected character '{}' in selector", c)));
                },
            }
        }

        if selector.required_states().intersects(selector.excluded_states()) {
            return Err(self.error(offset, "selector both requires and excludes the same state"));
        }
        Ok(selector)
    }

    fn parse_attribute(&self, attribute: &str, offset: usize) -> ThemeResult<IdentifierMatch> {
        let (name, value, prefix) = if let Some((name, value)) = attribute.split_once("^=") {
            (name, value, true)
        } else if let Some((name, value)) = attribute.split_once('=') {
            (name, value, false)
        } else {
            return Err(self.error(offset, format!("unsupported attribute selector '[{}]'", attribute)));
        };

        let name = name.trim();
        if name != IDENTIFIER_ATTRIBUTE {
            return Err(self.error(offset, format!("unsupported attribute '{}'", name)));
        }
        let value = unquote(value.trim());
        if value.is_empty() {
            return Err(self.error(offset, "empty attribute value"));
        }

        Ok(if prefix {
            IdentifierMatch::Prefix(value.to_string())
        } else {
            IdentifierMatch::Exact(value.to_string())
        })
    }

    /// Find the first byte matching `target` outside quotes, parentheses and brackets,
    /// failing if `forbidden` shows up first. Returns `None` at end of input.
    fn find_unnested(
        &self,
        start: usize,
        target: impl Fn(u8) -> bool,
        forbidden: impl Fn(u8) -> bool,
    ) -> ThemeResult<Option<usize>> {
        let bytes = self.text.as_bytes();
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;

        for (i, &b) in bytes.iter().enumerate().skip(start) {
            if let Some(q) = quote {
                if b == q {
                    quote = None;
                }
                continue;
            }
            match b {
                b'"' | b'\'' => quote = Some(b),
                b'(' | b'[' => depth += 1,
                b')' | b']' => depth = depth.saturating_sub(1),
                b if depth == 0 && target(b) => return Ok(Some(i)),
                b if depth == 0 && forbidden(b) => {
                    return Err(self.error(i, format!("unexpected '{}'", b as char)));
                },
                _ => {},
            }
        }
        Ok(None)
    }
}

/// Split on `separator` outside quotes, parentheses and brackets, yielding each part
/// with its byte offset.
fn split_unnested(text: &str, separator: u8) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut start = 0;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' => quote = Some(b),
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b if b == separator && depth == 0 => {
                parts.push((start, &text[start..i]));
                start = i + 1;
            },
            _ => {},
        }
    }
    parts.push((start, &text[start..]));
    parts
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Take a run of name characters starting at byte `start`.
fn take_name(text: &str, start: usize) -> (&str, usize) {
    let rest = &text[start.min(text.len())..];
    let len = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
    (&rest[..len], start + len)
}

fn is_property_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '-' || c == '_' => chars.all(is_name_char),
        _ => false,
    }
}

fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(q).and_then(|v| v.strip_suffix(q)) {
            return inner;
        }
    }
    value
}
