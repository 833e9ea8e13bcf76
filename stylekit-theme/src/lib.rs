#![warn(missing_docs)]

//! # Stylekit Theming Engine
//!
//! Parses QSS-style stylesheets into themes, resolves the effective style of
//! a widget through the cascade, and switches themes at runtime.
//!
//! ## Overview
//!
//! - **[StyleableElement](element::StyleableElement)**: what a widget looks like to the cascade
//!   (type, identifier, sub-control and active states)
//! - **[SelectorExpr](selector::SelectorExpr)**: the left-hand side of a rule and its
//!   [Specificity](selector::Specificity)
//! - **[Theme](theme::Theme)**: a named, ordered list of [StyleRule](rule::StyleRule)s parsed from
//!   stylesheet text
//! - **[cascade]**: collects matching rules and folds them into a
//!   [ResolvedStyle](properties::ResolvedStyle)
//! - **[ThemeManager](manager::ThemeManager)**: theme registry, active-theme switch and
//!   resolution cache
//! - **[ThemeConfig](config::ThemeConfig)**: picks themes from environment variables and TOML files
//!
//! ## Quick Start
//!
//! ```rust
//! use stylekit_theme::element::{StateFlags, StyleableElement};
//! use stylekit_theme::manager::ThemeManager;
//!
//! let manager = ThemeManager::with_builtin_themes().unwrap();
//! let button = StyleableElement::new("QPushButton").with_states(StateFlags::HOVER);
//!
//! let dark = manager.resolve(&button);
//! manager.set_active("light").unwrap();
//! let light = manager.resolve(&button);
//! assert_ne!(dark.get_str("background-color"), light.get_str("background-color"));
//! ```
//!
//! ## Stylesheet Syntax
//!
//! ```text
//! QPushButton { background-color: #333333; }
//! QPushButton:hover:!disabled { background-color: #3e3e3e; }
//! QPushButton#btn_browse, .QToolButton { border: none; }
//! QLabel[objectName^="caution_label"] { color: #f0a030; }
//! QComboBox::down-arrow { image: url(/icons/down.svg); }
//! ```
//!
//! Descendant and child combinators are not supported and fail to parse.
//!
//! ## Hot Reload
//!
//! With the `hot-reload` feature (enabled by default), `watcher::ThemeWatcher`
//! re-registers theme files when they change on disk.

/// Cascade resolution.
pub mod cascade;
/// Theme configuration from environment variables and files.
pub mod config;
/// Styleable elements and their state flags.
pub mod element;
/// Error types.
pub mod error;
/// Theme registry and runtime switching.
pub mod manager;
/// Stylesheet parser.
pub mod parser;
/// Property values and resolved styles.
pub mod properties;
/// Style rules.
pub mod rule;
/// Selector expressions and specificity.
pub mod selector;
/// Themes and the built-in stylesheets.
pub mod theme;
/// File watching for theme hot reload.
#[cfg(feature = "hot-reload")]
pub mod watcher;
