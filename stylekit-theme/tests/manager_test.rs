use std::sync::Arc;
use std::thread;

use stylekit_theme::element::{StateFlags, StyleableElement};
use stylekit_theme::error::ThemeError;
use stylekit_theme::manager::{create_shared_theme_manager, ThemeManager};
use stylekit_theme::theme::Theme;

#[test]
fn test_switching_changes_resolution() {
    let manager = ThemeManager::with_builtin_themes().unwrap();
    let label = StyleableElement::new("QLabel").with_identifier("caution_label_pen_width");

    assert_eq!(manager.active_theme_id().as_deref(), Some("dark"));
    let dark = manager.resolve(&label);

    manager.set_active("light").unwrap();
    let light = manager.resolve(&label);
    assert_ne!(dark, light);
    assert_eq!(light.get_str("color"), Some("#af2121"));

    manager.set_active("dark").unwrap();
    assert_eq!(manager.resolve(&label), dark);
}

#[test]
fn test_unknown_theme_leaves_active_unchanged() {
    let manager = ThemeManager::with_builtin_themes().unwrap();
    manager.set_active("light").unwrap();
    let button = StyleableElement::new("QPushButton");
    let before = manager.resolve(&button);

    let err = manager.set_active("nonexistent").unwrap_err();
    assert!(matches!(err, ThemeError::UnknownTheme { ref name } if name == "nonexistent"));
    assert_eq!(manager.active_theme_id().as_deref(), Some("light"));
    assert_eq!(manager.resolve(&button), before);
}

#[test]
fn test_parse_failure_is_not_registered() {
    let manager = ThemeManager::with_builtin_themes().unwrap();
    let err = manager
        .register_theme("broken", "QPushButton {\n    color font: bold;\n}")
        .unwrap_err();

    assert_eq!(err.location(), Some((2, 5)));
    assert!(!manager.contains("broken"));
    assert_eq!(manager.list_themes(), vec!["dark", "light"]);
}

#[test]
fn test_custom_theme_next_to_builtins() {
    let manager = ThemeManager::with_builtin_themes().unwrap();
    manager
        .register_theme("solarized", "QWidget { background-color: #002b36; color: #839496; }")
        .unwrap();
    manager.set_active("solarized").unwrap();

    let style = manager.resolve(&StyleableElement::new("QWidget"));
    assert_eq!(
        style.get_color("background-color").map(|c| {
            let c = c.to_rgba8();
            [c.r, c.g, c.b, c.a]
        }),
        Some([0x00, 0x2b, 0x36, 0xff])
    );
}

#[test]
fn test_overlay_is_not_cached() {
    let manager = ThemeManager::with_builtin_themes().unwrap();
    let overlay = Theme::parse("overlay", "QLineEdit { color: #123456; }").unwrap();
    let line = StyleableElement::new("QLineEdit");

    let overlaid = manager.resolve_with_overlay(&line, &overlay);
    assert_eq!(overlaid.get_str("color"), Some("#123456"));
    assert_eq!(manager.cached_resolutions(), 0);
    assert_ne!(manager.resolve(&line).get_str("color"), Some("#123456"));
}

#[test]
fn test_concurrent_resolution_sees_one_theme() {
    let manager = create_shared_theme_manager().unwrap();
    manager
        .register_theme("a", "QPushButton { color: #aaaaaa; background-color: #a0a0a0; }")
        .unwrap();
    manager
        .register_theme("b", "QPushButton { color: #bbbbbb; background-color: #b0b0b0; }")
        .unwrap();
    manager.set_active("a").unwrap();

    let switcher = {
        let manager = Arc::clone(&manager);
        thread::spawn(move || {
            for i in 0..500 {
                manager.set_active(if i % 2 == 0 { "b" } else { "a" }).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|n| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                let mut states = StateFlags::empty();
                if n % 2 == 1 {
                    states |= StateFlags::FOCUS;
                }
                let button = StyleableElement::new("QPushButton").with_states(states);
                for _ in 0..500 {
                    let style = manager.resolve(&button);
                    let pair = (style.get_str("color"), style.get_str("background-color"));
                    assert!(
                        pair == (Some("#aaaaaa"), Some("#a0a0a0")) || pair == (Some("#bbbbbb"), Some("#b0b0b0")),
                        "mixed resolution: {:?}",
                        pair
                    );
                }
            })
        })
        .collect();

    switcher.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(manager.active_theme_id().as_deref(), Some("a"));
    let button = StyleableElement::new("QPushButton");
    assert_eq!(manager.resolve(&button).get_str("color"), Some("#aaaaaa"));
}
