use std::fs;

use stylekit_theme::config::{ThemeConfig, ThemeSource};
use stylekit_theme::element::StyleableElement;
use stylekit_theme::error::ThemeError;
use stylekit_theme::manager::ThemeManager;

#[test]
fn test_register_and_reload_theme_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.qss");
    fs::write(&path, "QLabel { color: #111111; }").unwrap();

    let manager = ThemeManager::new();
    manager.register_theme_file("custom", &path).unwrap();
    let label = StyleableElement::new("QLabel");
    assert_eq!(manager.resolve(&label).get_str("color"), Some("#111111"));

    fs::write(&path, "QLabel { color: #222222; }").unwrap();
    manager.reload_theme("custom").unwrap();
    assert_eq!(manager.resolve(&label).get_str("color"), Some("#222222"));

    fs::write(&path, "QLabel { color: #333333 ").unwrap();
    assert!(matches!(manager.reload_theme("custom"), Err(ThemeError::Parse { .. })));
    assert_eq!(manager.resolve(&label).get_str("color"), Some("#222222"));
}

#[test]
fn test_missing_theme_file() {
    let manager = ThemeManager::new();
    let err = manager.register_theme_file("gone", "/nonexistent/gone.qss").unwrap_err();
    assert!(matches!(err, ThemeError::ThemeFileNotFound { .. }));
    assert!(!manager.contains("gone"));
}

#[test]
fn test_config_file_with_relative_theme_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("themes")).unwrap();
    fs::write(
        dir.path().join("themes/solarized.qss"),
        "QComboBox::down-arrow { image: url(/icons/down.svg); }",
    )
    .unwrap();
    let config_path = dir.path().join("theme.toml");
    fs::write(
        &config_path,
        r#"
        [theme]
        default = "solarized"
        fallback = "light"
        asset_root = "/opt/app/gui"

        [theme.files]
        solarized = "themes/solarized.qss"
        "#,
    )
    .unwrap();

    let manager = ThemeConfig::from_file(&config_path).unwrap().build_manager().unwrap();
    assert_eq!(manager.active_theme_id().as_deref(), Some("solarized"));
    assert_eq!(manager.list_themes(), vec!["dark", "light", "solarized"]);

    let arrow = StyleableElement::new("QComboBox").with_sub_control("down-arrow");
    assert_eq!(
        manager.resolve(&arrow).get("image").and_then(|v| v.as_url()),
        Some("/opt/app/gui/icons/down.svg")
    );
}

#[test]
fn test_file_source_is_registered_on_activation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("midnight.qss");
    fs::write(&path, "QWidget { background-color: #000010; }").unwrap();

    let manager = ThemeConfig::new()
        .with_default_theme(ThemeSource::File(path.clone()))
        .build_manager()
        .unwrap();
    assert_eq!(manager.active_theme_id().as_deref(), Some("midnight"));
    assert_eq!(manager.theme_path("midnight"), Some(path));
}

#[cfg(feature = "hot-reload")]
mod hot_reload {
    use super::*;
    use std::time::{Duration, Instant};
    use stylekit_theme::watcher::ThemeWatcher;

    fn poll_until(watcher: &ThemeWatcher, manager: &ThemeManager, done: impl Fn(&ThemeManager) -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            watcher.poll(manager);
            if done(manager) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        false
    }

    #[test]
    fn test_watcher_reloads_changed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live.qss");
        fs::write(&path, "QLabel { color: #111111; }").unwrap();

        let manager = ThemeManager::new();
        manager.register_theme_file("live", &path).unwrap();
        let mut watcher = ThemeWatcher::new().unwrap();
        watcher.watch_theme(&manager, "live").unwrap();
        assert_eq!(watcher.watched_themes(), vec!["live"]);

        let label = StyleableElement::new("QLabel");
        fs::write(&path, "QLabel { color: #222222; }").unwrap();
        assert!(poll_until(&watcher, &manager, |m| {
            m.resolve(&label).get_str("color") == Some("#222222")
        }));

        // A broken edit keeps the last good version.
        fs::write(&path, "QLabel > QFrame { color: #333333; }").unwrap();
        poll_until(&watcher, &manager, |_| false);
        assert_eq!(manager.resolve(&label).get_str("color"), Some("#222222"));

        watcher.unwatch_theme("live").unwrap();
        assert!(watcher.watched_themes().is_empty());
    }

    #[test]
    fn test_watcher_follows_rename_over_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live.qss");
        let scratch = dir.path().join("live.qss.tmp");
        fs::write(&path, "QLabel { color: #111111; }").unwrap();

        let manager = ThemeManager::new();
        manager.register_theme_file("live", &path).unwrap();
        let mut watcher = ThemeWatcher::new().unwrap();
        watcher.watch_theme(&manager, "live").unwrap();

        let label = StyleableElement::new("QLabel");
        for color in ["#222222", "#333333", "#444444"] {
            fs::write(&scratch, format!("QLabel {{ color: {}; }}", color)).unwrap();
            fs::rename(&scratch, &path).unwrap();
            assert!(
                poll_until(&watcher, &manager, |m| m.resolve(&label).get_str("color") == Some(color)),
                "save with {} was not picked up",
                color
            );
        }
    }

    #[test]
    fn test_reload_keeps_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live.qss");
        fs::write(&path, "QLineEdit { color: #111111; }").unwrap();

        let manager = ThemeManager::new();
        manager.register_theme_file("live", &path).unwrap();
        manager.extend_theme("live", "QLineEdit#line_search { color: #888888; }").unwrap();
        let mut watcher = ThemeWatcher::new().unwrap();
        watcher.watch_theme(&manager, "live").unwrap();

        fs::write(&path, "QLineEdit { color: #222222; }").unwrap();
        let line = StyleableElement::new("QLineEdit");
        assert!(poll_until(&watcher, &manager, |m| m.resolve(&line).get_str("color") == Some("#222222")));
        assert_eq!(
            manager
                .resolve(&line.with_identifier("line_search"))
                .get_str("color"),
            Some("#888888")
        );
    }
}
