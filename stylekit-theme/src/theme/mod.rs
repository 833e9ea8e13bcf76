//! # Theme System
//!
//! A [Theme] is a named, ordered list of [StyleRule]s. Themes are pure data:
//! the built-in [dark] and [light] themes are two stylesheets parsed into the
//! same structure, and any number of custom themes can live next to them.
//!
//! ## Usage Examples
//!
//! ### Parsing a Theme
//!
//! ```rust
//! use stylekit_theme::theme::Theme;
//! use stylekit_theme::element::{StateFlags, StyleableElement};
//!
//! let theme = Theme::parse("mine", r#"
//!     QPushButton { background-color: #3c3c3c; }
//!     QPushButton:hover { background-color: #505050; }
//! "#).unwrap();
//!
//! let hovered = StyleableElement::new("QPushButton").with_states(StateFlags::HOVER);
//! assert_eq!(theme.resolve(&hovered).get_str("background-color"), Some("#505050"));
//! ```
//!
//! ### Extending a Theme
//!
//! Appending rules keeps the base theme's order and places the new rules
//! after it, so they win over base rules of equal specificity:
//!
//! ```rust
//! use stylekit_theme::theme::{Theme, dark};
//!
//! let mut theme = dark::theme().unwrap();
//! theme.extend(Theme::parse("extra", "QLineEdit:read-only { color: #888; }").unwrap());
//! ```
//!
//! ### Round Trip
//!
//! [Theme::to_stylesheet] renders the rules back to stylesheet text that
//! parses into an equivalent theme.

use std::fmt::{Display, Formatter};

use crate::cascade;
use crate::element::StyleableElement;
use crate::error::ThemeResult;
use crate::parser::parse_stylesheet;
use crate::properties::ResolvedStyle;
use crate::rule::StyleRule;

/// The built-in dark theme.
pub mod dark;
/// The built-in light theme.
pub mod light;

/// A named, ordered sequence of style rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    name: String,
    rules: Vec<StyleRule>,
}

impl Theme {
    /// Parse stylesheet text into a theme called `name`.
    pub fn parse(name: impl Into<String>, source: &str) -> ThemeResult<Self> {
        let name = name.into();
        let rules = parse_stylesheet(&name, source)?;
        Ok(Self { name, rules })
    }

    /// Build a theme from rules, renumbering them in the given order.
    pub fn from_rules(name: impl Into<String>, rules: impl IntoIterator<Item = StyleRule>) -> Self {
        Self {
            name: name.into(),
            rules: rules
                .into_iter()
                .enumerate()
                .map(|(order, rule)| rule.renumbered(order))
                .collect(),
        }
    }

    /// Returns the theme name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rules in declaration order.
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the theme has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Return a copy of this theme under another name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append the rules of `other` after this theme's rules.
    pub fn extend(&mut self, other: Theme) {
        let base = self.rules.len();
        self.rules.extend(
            other
                .rules
                .into_iter()
                .enumerate()
                .map(|(order, rule)| rule.renumbered(base + order)),
        );
    }

    /// Rewrite root-relative `url(/...)` values to live under `root`.
    ///
    /// Returns the number of values rewritten.
    pub fn rebase_urls(&mut self, root: &str) -> usize {
        let mut rewritten = 0;
        for rule in &mut self.rules {
            for value in rule.properties_mut().values_mut() {
                if let Some(rebased) = value.rebase_urls(root) {
                    *value = rebased;
                    rewritten += 1;
                }
            }
        }
        rewritten
    }

    /// Resolve the effective style of `element` against this theme.
    pub fn resolve(&self, element: &StyleableElement) -> ResolvedStyle {
        cascade::resolve(self, element)
    }

    /// Render the theme back to stylesheet text.
    pub fn to_stylesheet(&self) -> String {
        self.to_string()
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
