//! # Cascade Resolution
//!
//! Collects every rule matching an element and folds their properties into
//! one [ResolvedStyle].
//!
//! Order of application, lowest priority first:
//!
//! 1. [Origin]: theme rules, then overlay rules supplied by the host for a
//!    single widget.
//! 2. [Specificity]: bare type or wildcard, then state-qualified, then
//!    identifier-qualified, then identifier and state qualified.
//! 3. Source order: later declarations win.
//!
//! Each applied rule overwrites any property already set. Properties never
//! set are absent from the result; the host supplies its own defaults.

use crate::element::StyleableElement;
use crate::properties::{PropertyMap, ResolvedStyle};
use crate::rule::StyleRule;
use crate::selector::Specificity;
use crate::theme::Theme;

/// Where a rule came from. Later origins outrank earlier ones regardless of specificity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Origin {
    /// Rules of the theme itself.
    Theme,
    /// Rules layered on top of the theme for one widget.
    Overlay,
}

/// A rule that matched, with the keys that rank it in the cascade.
#[derive(Debug, Clone, Copy)]
pub struct MatchedRule<'a> {
    /// Where the rule came from.
    pub origin: Origin,
    /// The rule's selector specificity.
    pub specificity: Specificity,
    /// Position of the rule within its origin.
    pub source_order: usize,
    /// The properties the rule sets.
    pub properties: &'a PropertyMap,
}

/// Collect the rules of `rules` that match `element`, in declaration order.
pub fn collect_matching_rules<'a>(
    rules: &'a [StyleRule],
    origin: Origin,
    element: &StyleableElement,
) -> Vec<MatchedRule<'a>> {
    rules
        .iter()
        .filter(|rule| rule.selector().matches(element))
        .map(|rule| MatchedRule {
            origin,
            specificity: rule.selector().specificity(),
            source_order: rule.source_order(),
            properties: rule.properties(),
        })
        .collect()
}

/// Fold matched rules into one style, lowest precedence first.
pub fn cascade(mut matched: Vec<MatchedRule<'_>>) -> ResolvedStyle {
    matched.sort_by(|a, b| {
        a.origin
            .cmp(&b.origin)
            .then(a.specificity.cmp(&b.specificity))
            .then(a.source_order.cmp(&b.source_order))
    });

    let mut style = ResolvedStyle::new();
    for rule in matched {
        style.apply(rule.properties);
    }
    style
}

/// Resolve the effective style of `element` against `theme`.
pub fn resolve(theme: &Theme, element: &StyleableElement) -> ResolvedStyle {
    cascade(collect_matching_rules(theme.rules(), Origin::Theme, element))
}

/// Resolve `element` against `theme` with `overlay` rules layered on top.
pub fn resolve_with_overlay(theme: &Theme, overlay: &Theme, element: &StyleableElement) -> ResolvedStyle {
    let mut matched = collect_matching_rules(theme.rules(), Origin::Theme, element);
    matched.extend(collect_matching_rules(overlay.rules(), Origin::Overlay, element));
    cascade(matched)
}
