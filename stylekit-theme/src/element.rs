//! # Styleable Elements
//!
//! The host toolkit describes each widget instance it wants styled as a
//! [StyleableElement]: the widget type (`QPushButton`), an optional instance
//! identifier (`btn_browse`), an optional sub-control (`drop-down`) and the
//! set of interaction states that are currently live.
//!
//! ```rust
//! use stylekit_theme::element::{StateFlags, StyleableElement};
//!
//! let button = StyleableElement::new("QPushButton")
//!     .with_identifier("btn_browse")
//!     .with_states(StateFlags::HOVER);
//!
//! assert_eq!(button.element_type(), "QPushButton");
//! assert!(button.states().contains(StateFlags::HOVER));
//! ```
//!
//! Elements are owned by the host and only borrowed by the engine for the
//! duration of a query.

use std::fmt::{Display, Formatter};

use bitflags::bitflags;

bitflags! {
    /// Interaction states a widget instance can be in.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct StateFlags: u16 {
        /// The pointer is over the widget.
        const HOVER = 1 << 0;
        /// The widget is being pressed.
        const PRESSED = 1 << 1;
        /// The widget does not accept input.
        const DISABLED = 1 << 2;
        /// The widget is checked (check boxes, toggle buttons).
        const CHECKED = 1 << 3;
        /// The item is selected (list and table items, menu entries).
        const SELECTED = 1 << 4;
        /// The widget shows but does not accept edits.
        const READ_ONLY = 1 << 5;
        /// The widget has keyboard focus.
        const FOCUS = 1 << 6;
        /// A popup belonging to the widget is open.
        const OPEN = 1 << 7;
        /// The widget is editable (editable combo boxes).
        const EDITABLE = 1 << 8;
        /// Tri-state widgets in their third state.
        const INDETERMINATE = 1 << 9;
    }
}

/// Pseudo-state names as written in stylesheets, in canonical order.
const PSEUDO_STATES: &[(&str, StateFlags)] = &[
    ("hover", StateFlags::HOVER),
    ("pressed", StateFlags::PRESSED),
    ("disabled", StateFlags::DISABLED),
    ("checked", StateFlags::CHECKED),
    ("selected", StateFlags::SELECTED),
    ("read-only", StateFlags::READ_ONLY),
    ("focus", StateFlags::FOCUS),
    ("open", StateFlags::OPEN),
    ("editable", StateFlags::EDITABLE),
    ("indeterminate", StateFlags::INDETERMINATE),
];

impl StateFlags {
    /// Look up the flag for a stylesheet pseudo-state name such as `read-only`.
    pub fn from_pseudo(name: &str) -> Option<Self> {
        PSEUDO_STATES
            .iter()
            .find(|(pseudo, _)| *pseudo == name)
            .map(|(_, flag)| *flag)
    }

    /// Iterate over the stylesheet names of every flag set in `self`.
    pub fn pseudo_names(self) -> impl Iterator<Item = &'static str> {
        PSEUDO_STATES
            .iter()
            .filter(move |(_, flag)| self.contains(*flag))
            .map(|(pseudo, _)| *pseudo)
    }
}

/// Host-supplied description of one widget instance at query time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleableElement {
    element_type: String,
    identifier: Option<String>,
    sub_control: Option<String>,
    states: StateFlags,
}

impl StyleableElement {
    /// Create an element of the given widget type, with no identifier and no active states.
    pub fn new(element_type: impl Into<String>) -> Self {
        Self {
            element_type: element_type.into(),
            identifier: None,
            sub_control: None,
            states: StateFlags::empty(),
        }
    }

    /// Set the instance identifier (the widget's object name).
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Address a sub-control of the widget, such as a combo box `drop-down`.
    pub fn with_sub_control(mut self, sub_control: impl Into<String>) -> Self {
        self.sub_control = Some(sub_control.into());
        self
    }

    /// Replace the active states.
    pub fn with_states(mut self, states: StateFlags) -> Self {
        self.states = states;
        self
    }

    /// Add states to the active set.
    pub fn with_state(mut self, state: StateFlags) -> Self {
        self.states.insert(state);
        self
    }

    /// Returns the widget type.
    pub fn element_type(&self) -> &str {
        &self.element_type
    }

    /// Returns the instance identifier, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Returns the addressed sub-control, if any.
    pub fn sub_control(&self) -> Option<&str> {
        self.sub_control.as_deref()
    }

    /// Returns the active states.
    pub fn states(&self) -> StateFlags {
        self.states
    }

    /// Update the active states in place, e.g. when the pointer enters the widget.
    pub fn set_states(&mut self, states: StateFlags) {
        self.states = states;
    }
}

impl Display for StyleableElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.element_type)?;
        if let Some(id) = &self.identifier {
            write!(f, "#{}", id)?;
        }
        if let Some(sub) = &self.sub_control {
            write!(f, "::{}", sub)?;
        }
        for state in self.states.pseudo_names() {
            write!(f, ":{}", state)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_state_lookup() {
        assert_eq!(StateFlags::from_pseudo("read-only"), Some(StateFlags::READ_ONLY));
        assert_eq!(StateFlags::from_pseudo("hover"), Some(StateFlags::HOVER));
        assert_eq!(StateFlags::from_pseudo("Hover"), None);
        assert_eq!(StateFlags::from_pseudo("unknown"), None);
    }

    #[test]
    fn test_pseudo_names_are_canonical() {
        let states = StateFlags::SELECTED | StateFlags::HOVER;
        let names: Vec<_> = states.pseudo_names().collect();
        assert_eq!(names, vec!["hover", "selected"]);
    }

    #[test]
    fn test_element_display() {
        let element = StyleableElement::new("QComboBox")
            .with_identifier("combo_units")
            .with_sub_control("drop-down")
            .with_states(StateFlags::HOVER | StateFlags::DISABLED);
        assert_eq!(element.to_string(), "QComboBox#combo_units::drop-down:hover:disabled");
    }
}
