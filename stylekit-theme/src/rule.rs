use std::fmt::{Display, Formatter};

use crate::properties::PropertyMap;
use crate::selector::SelectorExpr;

/// One selector with the properties it sets.
///
/// A stylesheet block with several comma-separated selectors produces one rule per selector,
/// all sharing the block's properties. Rules are immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    selector: SelectorExpr,
    properties: PropertyMap,
    source_order: usize,
}

impl StyleRule {
    /// Create a rule at the given position in its theme.
    pub fn new(selector: SelectorExpr, properties: PropertyMap, source_order: usize) -> Self {
        Self {
            selector,
            properties,
            source_order,
        }
    }

    /// Returns the selector.
    pub fn selector(&self) -> &SelectorExpr {
        &self.selector
    }

    /// Returns the declared properties, in declaration order.
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Returns the position of this rule in its theme.
    pub fn source_order(&self) -> usize {
        self.source_order
    }

    pub(crate) fn renumbered(mut self, source_order: usize) -> Self {
        self.source_order = source_order;
        self
    }

    pub(crate) fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }
}

impl Display for StyleRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} {{", self.selector)?;
        for (name, value) in &self.properties {
            writeln!(f, "    {}: {};", name, value)?;
        }
        write!(f, "}}")
    }
}
