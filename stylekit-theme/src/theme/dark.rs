use crate::error::ThemeResult;
use crate::theme::Theme;

/// Registry name of the dark theme.
pub const NAME: &str = "dark";

/// Stylesheet source of the dark theme.
pub const SOURCE: &str = include_str!("../../themes/dark.qss");

/// Parse the dark theme.
pub fn theme() -> ThemeResult<Theme> {
    Theme::parse(NAME, SOURCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{StateFlags, StyleableElement};

    #[test]
    fn test_dark_theme_parses() {
        let theme = theme().unwrap();
        assert_eq!(theme.name(), NAME);
        assert!(!theme.is_empty());
    }

    #[test]
    fn test_dark_button_hover() {
        let theme = theme().unwrap();
        let button = StyleableElement::new("QPushButton");
        let idle = theme.resolve(&button);
        let hovered = theme.resolve(&button.with_state(StateFlags::HOVER));

        assert_eq!(idle.get_str("background-color"), Some("#333333"));
        assert_eq!(hovered.get_str("background-color"), Some("#3e3e3e"));
        assert_eq!(hovered.get_str("padding"), idle.get_str("padding"));
    }
}
