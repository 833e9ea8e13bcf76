use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use vello::peniko::Color;

/// Ordered property-name to value map, in declaration order.
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// A declared property value.
///
/// Values are kept as the declared text; typed accessors interpret them on demand.
/// Explicit `none` and `transparent` are ordinary values and override like any other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyValue {
    raw: String,
}

impl PropertyValue {
    /// Create a value from its declared text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Get the declared text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether this is the `none` keyword.
    pub fn is_none(&self) -> bool {
        self.raw.eq_ignore_ascii_case("none")
    }

    /// Whether this is the `transparent` keyword.
    pub fn is_transparent(&self) -> bool {
        self.raw.eq_ignore_ascii_case("transparent")
    }

    /// Interpret the whole value as a color.
    pub fn as_color(&self) -> Option<Color> {
        parse_color(&self.raw)
    }

    /// Find the first color in a compound value such as `1px solid #3c3c3c`.
    pub fn first_color(&self) -> Option<Color> {
        self.as_color()
            .or_else(|| split_tokens(&self.raw).into_iter().find_map(parse_color))
    }

    /// Interpret the value as a length in pixels. Unitless numbers count as pixels.
    pub fn as_length(&self) -> Option<f32> {
        let raw = self.raw.trim();
        let number = raw.strip_suffix("px").unwrap_or(raw);
        number.trim().parse::<f32>().ok()
    }

    /// Get the target of a `url(...)` value, without quotes.
    pub fn as_url(&self) -> Option<&str> {
        let inner = self.raw.trim().strip_prefix("url(")?.strip_suffix(')')?.trim();
        Some(inner.trim_matches(|c| c == '"' || c == '\''))
    }

    /// Rewrite root-relative `url(/...)` references to live under `root`.
    ///
    /// Returns `None` if the value holds no root-relative URL.
    pub fn rebase_urls(&self, root: &str) -> Option<Self> {
        let root = root.trim_end_matches('/');
        let mut raw = self.raw.clone();
        for open in ["url(/", "url(\"/", "url('/"] {
            raw = raw.replace(open, &format!("{}{}/", &open[..open.len() - 1], root));
        }
        (raw != self.raw).then(|| Self::new(raw))
    }
}

impl Display for PropertyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// The effective property set of one element against one theme.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedStyle {
    properties: PropertyMap,
}

impl ResolvedStyle {
    /// Create a new empty resolved style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite every property in `properties` onto this style.
    pub fn apply(&mut self, properties: &PropertyMap) {
        for (name, value) in properties {
            self.properties.insert(name.clone(), value.clone());
        }
    }

    /// Set a single property value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Get a property value.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Get the declared text of a property.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).map(PropertyValue::as_str)
    }

    /// Get a color property value.
    pub fn get_color(&self, name: &str) -> Option<Color> {
        self.get(name).and_then(PropertyValue::as_color)
    }

    /// Get a length property value in pixels.
    pub fn get_length(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(PropertyValue::as_length)
    }

    /// Check if a property was set.
    pub fn has(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Number of properties set.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no property was set.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate over the properties in the order they were first set.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Get all properties.
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }
}

/// Split a compound value on whitespace, keeping parenthesised groups together.
fn split_tokens(raw: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    for (i, c) in raw.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    tokens.push(&raw[s..i]);
                }
                continue;
            },
            _ => {},
        }
        if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(&raw[s..]);
    }
    tokens
}

fn parse_color(raw: &str) -> Option<Color> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = raw.to_ascii_lowercase();
    if let Some(args) = lower.strip_prefix("rgba(").and_then(|s| s.strip_suffix(')')) {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return None;
        }
        let [r, g, b] = [channel(parts[0])?, channel(parts[1])?, channel(parts[2])?];
        return Some(Color::from_rgba8(r, g, b, alpha(parts[3])?));
    }
    if let Some(args) = lower.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return None;
        }
        return Some(Color::from_rgb8(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?));
    }
    match lower.as_str() {
        "transparent" => Some(Color::TRANSPARENT),
        "black" => Some(Color::BLACK),
        "white" => Some(Color::WHITE),
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
            Some(Color::from_rgb8(nibble(0)?, nibble(1)?, nibble(2)?))
        },
        6 => Some(Color::from_rgb8(byte(0)?, byte(2)?, byte(4)?)),
        // Qt writes the alpha channel first.
        8 => Some(Color::from_rgba8(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
        _ => None,
    }
}

fn channel(part: &str) -> Option<u8> {
    if let Some(percent) = part.strip_suffix('%') {
        let value = percent.trim().parse::<f32>().ok()?;
        return Some((value.clamp(0.0, 100.0) * 2.55).round() as u8);
    }
    part.parse::<u8>().ok()
}

fn alpha(part: &str) -> Option<u8> {
    if part.contains('.') && !part.ends_with('%') {
        let value = part.parse::<f32>().ok()?;
        return Some((value.clamp(0.0, 1.0) * 255.0).round() as u8);
    }
    channel(part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(color: Color) -> [u8; 4] {
        let c = color.to_rgba8();
        [c.r, c.g, c.b, c.a]
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(rgba(PropertyValue::new("#fff").as_color().unwrap()), [255, 255, 255, 255]);
        assert_eq!(rgba(PropertyValue::new("#3c3c3c").as_color().unwrap()), [60, 60, 60, 255]);
        assert_eq!(rgba(PropertyValue::new("#80ff0000").as_color().unwrap()), [255, 0, 0, 128]);
        assert!(PropertyValue::new("#12345").as_color().is_none());
        assert!(PropertyValue::new("#gggggg").as_color().is_none());
    }

    #[test]
    fn test_functional_colors() {
        assert_eq!(rgba(PropertyValue::new("rgb(10, 20, 30)").as_color().unwrap()), [10, 20, 30, 255]);
        assert_eq!(rgba(PropertyValue::new("rgba(10, 20, 30, 64)").as_color().unwrap()), [10, 20, 30, 64]);
        assert_eq!(rgba(PropertyValue::new("rgba(0, 0, 0, 0.5)").as_color().unwrap())[3], 128);
        assert!(PropertyValue::new("rgb(1, 2)").as_color().is_none());
    }

    #[test]
    fn test_keywords_are_values() {
        let none = PropertyValue::new("none");
        assert!(none.is_none());
        assert!(none.as_color().is_none());

        let transparent = PropertyValue::new("transparent");
        assert!(transparent.is_transparent());
        assert_eq!(rgba(transparent.as_color().unwrap())[3], 0);
    }

    #[test]
    fn test_first_color_in_border() {
        let border = PropertyValue::new("1px solid rgb(60, 60, 60)");
        assert_eq!(rgba(border.first_color().unwrap()), [60, 60, 60, 255]);
        assert!(PropertyValue::new("1px solid").first_color().is_none());
    }

    #[test]
    fn test_lengths_and_urls() {
        assert_eq!(PropertyValue::new("4px").as_length(), Some(4.0));
        assert_eq!(PropertyValue::new("0").as_length(), Some(0.0));
        assert_eq!(PropertyValue::new("solid").as_length(), None);

        let icon = PropertyValue::new("url(\"/icons/down.svg\")");
        assert_eq!(icon.as_url(), Some("/icons/down.svg"));
        assert_eq!(PropertyValue::new("#fff").as_url(), None);
    }

    #[test]
    fn test_rebase_urls() {
        let icon = PropertyValue::new("url(/icons/down.svg)");
        let rebased = icon.rebase_urls("/opt/app/gui/").unwrap();
        assert_eq!(rebased.as_str(), "url(/opt/app/gui/icons/down.svg)");
        assert!(PropertyValue::new("url(icons/down.svg)").rebase_urls("/opt").is_none());
        assert_eq!(
            PropertyValue::new("url(\"/icons/a.svg\")").rebase_urls("/opt").unwrap().as_url(),
            Some("/opt/icons/a.svg")
        );
    }

    #[test]
    fn test_resolved_style_overwrites() {
        let mut first = PropertyMap::new();
        first.insert("color".into(), "#aaa".into());
        first.insert("padding".into(), "2px".into());
        let mut second = PropertyMap::new();
        second.insert("color".into(), "#bbb".into());

        let mut style = ResolvedStyle::new();
        style.apply(&first);
        style.apply(&second);

        assert_eq!(style.get_str("color"), Some("#bbb"));
        assert_eq!(style.get_length("padding"), Some(2.0));
        assert_eq!(style.len(), 2);
        assert!(!style.has("border"));
    }
}
