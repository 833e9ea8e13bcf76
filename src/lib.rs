#![warn(missing_docs)]

//! Declarative widget stylesheets with runtime theme switching.

pub use stylekit_theme as theme;
pub use vello::peniko as color;

/// A "prelude" for users of stylekit.
///
/// Importing this module brings into scope the types needed to register
/// themes, switch between them and resolve widget styles.
///
/// ```rust
/// use stylekit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::theme::config::{ThemeConfig, ThemeSource};
    pub use crate::theme::element::{StateFlags, StyleableElement};
    pub use crate::theme::error::{ThemeError, ThemeResult};
    pub use crate::theme::manager::{create_shared_theme_manager, SharedThemeManager, ThemeManager};
    pub use crate::theme::properties::{PropertyValue, ResolvedStyle};
    pub use crate::theme::theme::Theme;
    #[cfg(feature = "hot-reload")]
    pub use crate::theme::watcher::ThemeWatcher;

    // Color
    pub use vello::peniko::Color;
}
