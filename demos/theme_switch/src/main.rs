use stylekit::prelude::*;

fn widgets() -> Vec<StyleableElement> {
    vec![
        StyleableElement::new("QPushButton"),
        StyleableElement::new("QPushButton").with_states(StateFlags::HOVER),
        StyleableElement::new("QPushButton").with_identifier("btn_plot"),
        StyleableElement::new("QLineEdit").with_states(StateFlags::FOCUS | StateFlags::READ_ONLY),
        StyleableElement::new("QLabel").with_identifier("caution_label_pen_width"),
        StyleableElement::new("QComboBox").with_sub_control("down-arrow"),
    ]
}

fn print_styles(manager: &ThemeManager) {
    println!("== {} ==", manager.active_theme_id().unwrap_or_default());
    for widget in widgets() {
        let style = manager.resolve(&widget);
        println!("{}", widget);
        for (name, value) in style.iter() {
            println!("    {}: {}", name, value);
        }
    }
    println!();
}

fn main() -> ThemeResult<()> {
    env_logger::init();

    let config = ThemeConfig::from_env_or_default();
    let manager = config.build_manager()?;
    print_styles(&manager);

    for id in manager.list_themes() {
        manager.set_active(&id)?;
        print_styles(&manager);
    }

    if let Err(err) = manager.set_active("nonexistent") {
        log::warn!("{}", err);
    }

    let overlay = Theme::parse("overlay", "QLineEdit:read-only { color: #888888; }")?;
    let line = StyleableElement::new("QLineEdit").with_states(StateFlags::READ_ONLY);
    println!(
        "read-only line edit with overlay: {:?}",
        manager.resolve_with_overlay(&line, &overlay).get_color("color")
    );

    // Optional: `theme_switch <file.qss>` watches a stylesheet and reloads it on save.
    #[cfg(feature = "hot-reload")]
    if let Some(path) = std::env::args().nth(1) {
        manager.register_theme_file("custom", &path)?;
        manager.set_active("custom")?;
        print_styles(&manager);

        let mut watcher = ThemeWatcher::new()?;
        watcher.watch_theme(&manager, "custom")?;
        log::info!("Watching {} for 60 seconds", path);
        for _ in 0..120 {
            if !watcher.poll(&manager).is_empty() {
                print_styles(&manager);
            }
            std::thread::sleep(std::time::Duration::from_millis(500));
        }
    }

    Ok(())
}
