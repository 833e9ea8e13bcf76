//! # Selectors
//!
//! A [SelectorExpr] is a conjunction of predicates over a
//! [StyleableElement]: widget type, instance identifier, sub-control and
//! interaction states. Selectors never fail to evaluate; one that does not
//! match simply contributes nothing to the cascade.
//!
//! ```rust
//! use stylekit_theme::element::{StateFlags, StyleableElement};
//! use stylekit_theme::selector::{IdentifierMatch, SelectorExpr, TypeMatch};
//!
//! let caution = SelectorExpr::new(TypeMatch::exact("QLabel"))
//!     .with_identifier(IdentifierMatch::Prefix("caution_label".into()));
//!
//! assert!(caution.matches(&StyleableElement::new("QLabel").with_identifier("caution_label_x")));
//! assert!(!caution.matches(&StyleableElement::new("QLabel").with_identifier("plain_label")));
//! ```

use std::fmt::{Display, Formatter};

use crate::element::{StateFlags, StyleableElement};

/// Type placeholder used when a sample element is built for a wildcard selector.
const WILDCARD_SAMPLE_TYPE: &str = "QWidget";

/// Predicate over the widget type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeMatch {
    /// `*`: every widget type.
    Any,
    /// A single, case-sensitive widget type.
    Exact(String),
}

impl TypeMatch {
    /// Match exactly the given widget type.
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    fn matches(&self, element_type: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(name) => name == element_type,
        }
    }
}

/// Predicate over the instance identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentifierMatch {
    /// Any identifier, including none.
    Any,
    /// The identifier must equal this value.
    Exact(String),
    /// The identifier must start with this value.
    Prefix(String),
}

impl IdentifierMatch {
    fn matches(&self, identifier: Option<&str>) -> bool {
        match (self, identifier) {
            (Self::Any, _) => true,
            (Self::Exact(expected), Some(id)) => expected == id,
            (Self::Prefix(prefix), Some(id)) => id.starts_with(prefix.as_str()),
            (_, None) => false,
        }
    }

    fn is_qualified(&self) -> bool {
        !matches!(self, Self::Any)
    }
}

/// Precedence of a selector in the cascade, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Specificity {
    /// Bare type or wildcard.
    Type,
    /// Qualified by required or excluded states.
    State,
    /// Qualified by an identifier.
    Identifier,
    /// Qualified by both an identifier and states.
    IdentifierState,
}

/// A conjunction of predicates identifying which elements a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectorExpr {
    element_type: TypeMatch,
    identifier: IdentifierMatch,
    sub_control: Option<String>,
    required: StateFlags,
    excluded: StateFlags,
}

impl SelectorExpr {
    /// Create a selector that only constrains the widget type.
    pub fn new(element_type: TypeMatch) -> Self {
        Self {
            element_type,
            identifier: IdentifierMatch::Any,
            sub_control: None,
            required: StateFlags::empty(),
            excluded: StateFlags::empty(),
        }
    }

    /// The `*` selector.
    pub fn any() -> Self {
        Self::new(TypeMatch::Any)
    }

    /// Constrain the instance identifier.
    pub fn with_identifier(mut self, identifier: IdentifierMatch) -> Self {
        self.identifier = identifier;
        self
    }

    /// Address a sub-control of the widget.
    pub fn with_sub_control(mut self, sub_control: impl Into<String>) -> Self {
        self.sub_control = Some(sub_control.into());
        self
    }

    /// Require all of `states` to be active.
    pub fn requiring(mut self, states: StateFlags) -> Self {
        self.required.insert(states);
        self
    }

    /// Require all of `states` to be inactive.
    pub fn excluding(mut self, states: StateFlags) -> Self {
        self.excluded.insert(states);
        self
    }

    /// Returns the type predicate.
    pub fn element_type(&self) -> &TypeMatch {
        &self.element_type
    }

    /// Returns the identifier predicate.
    pub fn identifier(&self) -> &IdentifierMatch {
        &self.identifier
    }

    /// Returns the addressed sub-control, if any.
    pub fn sub_control(&self) -> Option<&str> {
        self.sub_control.as_deref()
    }

    /// Returns the states that must be active.
    pub fn required_states(&self) -> StateFlags {
        self.required
    }

    /// Returns the states that must be inactive.
    pub fn excluded_states(&self) -> StateFlags {
        self.excluded
    }

    /// Whether this selector applies to `element`.
    pub fn matches(&self, element: &StyleableElement) -> bool {
        let states = element.states();
        self.element_type.matches(element.element_type())
            && self.identifier.matches(element.identifier())
            && self.sub_control.as_deref() == element.sub_control()
            && states.contains(self.required)
            && !states.intersects(self.excluded)
    }

    /// Precedence of this selector among rules that match the same element.
    pub fn specificity(&self) -> Specificity {
        let stated = !self.required.is_empty() || !self.excluded.is_empty();
        match (self.identifier.is_qualified(), stated) {
            (true, true) => Specificity::IdentifierState,
            (true, false) => Specificity::Identifier,
            (false, true) => Specificity::State,
            (false, false) => Specificity::Type,
        }
    }

    /// Build an element that satisfies exactly this selector: its type, identifier,
    /// sub-control and required states, and nothing else.
    pub fn sample_element(&self) -> StyleableElement {
        let element_type = match &self.element_type {
            TypeMatch::Any => WILDCARD_SAMPLE_TYPE,
            TypeMatch::Exact(name) => name.as_str(),
        };
        let mut element = StyleableElement::new(element_type).with_states(self.required);
        match &self.identifier {
            IdentifierMatch::Any => {},
            IdentifierMatch::Exact(id) | IdentifierMatch::Prefix(id) => {
                element = element.with_identifier(id.clone());
            },
        }
        if let Some(sub) = &self.sub_control {
            element = element.with_sub_control(sub.clone());
        }
        element
    }
}

impl Display for SelectorExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.element_type {
            TypeMatch::Any => f.write_str("*")?,
            TypeMatch::Exact(name) => f.write_str(name)?,
        }
        match &self.identifier {
            IdentifierMatch::Any => {},
            IdentifierMatch::Exact(id) if is_plain_name(id) => write!(f, "#{}", id)?,
            IdentifierMatch::Exact(id) => write!(f, "[objectName=\"{}\"]", id)?,
            IdentifierMatch::Prefix(prefix) => write!(f, "[objectName^=\"{}\"]", prefix)?,
        }
        if let Some(sub) = &self.sub_control {
            write!(f, "::{}", sub)?;
        }
        for state in self.required.pseudo_names() {
            write!(f, ":{}", state)?;
        }
        for state in self.excluded.pseudo_names() {
            write!(f, ":!{}", state)?;
        }
        Ok(())
    }
}

fn is_plain_name(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
