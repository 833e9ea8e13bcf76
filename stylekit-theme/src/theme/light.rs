use crate::error::ThemeResult;
use crate::theme::Theme;

/// Registry name of the light theme.
pub const NAME: &str = "light";

/// Stylesheet source of the light theme.
pub const SOURCE: &str = include_str!("../../themes/light.qss");

/// Parse the light theme.
pub fn theme() -> ThemeResult<Theme> {
    Theme::parse(NAME, SOURCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::StyleableElement;

    #[test]
    fn test_light_theme_parses() {
        let theme = theme().unwrap();
        assert_eq!(theme.name(), NAME);
        assert_eq!(theme.len(), crate::theme::dark::theme().unwrap().len());
    }

    #[test]
    fn test_light_caution_label() {
        let theme = theme().unwrap();
        let label = StyleableElement::new("QLabel").with_identifier("caution_label_pen_width");
        let style = theme.resolve(&label);
        assert_eq!(style.get_str("color"), Some("#af2121"));
        assert_eq!(style.get_str("background-color"), Some("#fff0f0"));
    }
}
