//! # Theme Configuration
//!
//! Chooses which themes get registered and which one starts active, from
//! environment variables, a TOML file, or code.
//!
//! ## Environment Variables
//!
//! - `STYLEKIT_THEME`: the theme to activate (`dark`, `light`, any registered id, or `file:<path>`)
//! - `STYLEKIT_THEME_FALLBACK`: the theme to activate if the default is unavailable
//! - `STYLEKIT_THEME_CONFIG`: path to a TOML configuration file
//!
//! Environment variables override values from the configuration file.
//!
//! ## Configuration File Format
//!
//! ```toml
//! [theme]
//! default = "solarized"
//! fallback = "dark"
//! asset_root = "/opt/app/gui"
//!
//! [theme.files]
//! solarized = "themes/solarized.qss"
//! ```
//!
//! Relative paths under `[theme.files]` are resolved against the directory
//! of the configuration file.
//!
//! ## Usage
//!
//! ```rust
//! use stylekit_theme::config::{ThemeConfig, ThemeSource};
//!
//! let manager = ThemeConfig::new()
//!     .with_default_theme(ThemeSource::named("light"))
//!     .with_fallback_theme(ThemeSource::named("dark"))
//!     .build_manager()
//!     .unwrap();
//! assert_eq!(manager.active_theme_id().as_deref(), Some("light"));
//! ```

use std::env;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{ThemeError, ThemeResult};
use crate::manager::ThemeManager;
use crate::theme::dark;

/// Environment variable naming the theme to activate.
pub const THEME_VAR: &str = "STYLEKIT_THEME";
/// Environment variable naming the fallback theme.
pub const FALLBACK_VAR: &str = "STYLEKIT_THEME_FALLBACK";
/// Environment variable pointing at a TOML configuration file.
pub const CONFIG_VAR: &str = "STYLEKIT_THEME_CONFIG";

/// Where a theme to activate comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeSource {
    /// A theme registered under this id, built-in or configured.
    Named(String),
    /// A stylesheet file, registered under its file stem before activation.
    File(PathBuf),
}

impl ThemeSource {
    /// A theme registered under `id`.
    pub fn named(id: impl Into<String>) -> Self {
        Self::Named(id.into())
    }

    /// Parse `name` or `file:<path>`.
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        match source.strip_prefix("file:") {
            Some(path) => Self::File(PathBuf::from(path)),
            None => Self::Named(source.to_string()),
        }
    }

    /// The id the theme is registered under.
    pub fn id(&self) -> String {
        match self {
            Self::Named(id) => id.clone(),
            Self::File(path) => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
        }
    }
}

impl Display for ThemeSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(id) => write!(f, "{}", id),
            Self::File(path) => write!(f, "file:{}", path.display()),
        }
    }
}

/// Theme settings for an application.
///
/// Unset fields fall back to the built-in defaults: the `dark` theme, no
/// fallback, and no asset root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeConfig {
    /// The theme to activate.
    pub default_theme: Option<ThemeSource>,
    /// The theme to activate if the default cannot be.
    pub fallback_theme: Option<ThemeSource>,
    /// Prefix for root-relative `url(/...)` values.
    pub asset_root: Option<String>,
    /// Extra theme stylesheets to register, by id.
    pub files: IndexMap<String, PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    theme: ThemeSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThemeSection {
    default: Option<String>,
    fallback: Option<String>,
    asset_root: Option<String>,
    #[serde(default)]
    files: IndexMap<String, PathBuf>,
}

impl ThemeConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the `STYLEKIT_*` environment variables.
    ///
    /// A configuration file that cannot be loaded is logged and ignored.
    pub fn from_env_or_default() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build a configuration from variables supplied by `lookup`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();

        if let Some(path) = lookup(CONFIG_VAR) {
            match Self::from_file(&path) {
                Ok(file_config) => config = file_config,
                Err(err) => log::warn!("Ignoring theme configuration {}: {}", path, err),
            }
        }

        if let Some(theme) = lookup(THEME_VAR) {
            config.default_theme = Some(ThemeSource::parse(&theme));
        }
        if let Some(fallback) = lookup(FALLBACK_VAR) {
            config.fallback_theme = Some(ThemeSource::parse(&fallback));
        }

        config
    }

    /// Load a configuration from a `.toml` file.
    pub fn from_file(path: impl AsRef<Path>) -> ThemeResult<Self> {
        let path = path.as_ref();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            return Err(ThemeError::config(format!(
                "unsupported configuration file {:?}, use .toml",
                path
            )));
        }
        if !path.exists() {
            return Err(ThemeError::file_not_found(path));
        }

        let mut config = Self::from_toml(&fs::read_to_string(path)?)?;
        if let Some(dir) = path.parent() {
            for file in config.files.values_mut() {
                if file.is_relative() {
                    *file = dir.join(&*file);
                }
            }
        }
        log::debug!("Loaded theme configuration from {:?}", path);
        Ok(config)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(content: &str) -> ThemeResult<Self> {
        let file: ConfigFile = toml::from_str(content).map_err(|err| ThemeError::config(err.to_string()))?;
        let section = file.theme;
        Ok(Self {
            default_theme: section.default.as_deref().map(ThemeSource::parse),
            fallback_theme: section.fallback.as_deref().map(ThemeSource::parse),
            asset_root: section.asset_root,
            files: section.files,
        })
    }

    /// Set the theme to activate.
    pub fn with_default_theme(mut self, theme: ThemeSource) -> Self {
        self.default_theme = Some(theme);
        self
    }

    /// Set the fallback theme.
    pub fn with_fallback_theme(mut self, theme: ThemeSource) -> Self {
        self.fallback_theme = Some(theme);
        self
    }

    /// Set the asset root.
    pub fn with_asset_root(mut self, root: impl Into<String>) -> Self {
        self.asset_root = Some(root.into());
        self
    }

    /// Register an extra theme file under `id`.
    pub fn with_theme_file(mut self, id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.files.insert(id.into(), path.into());
        self
    }

    /// Layer `other` on top of this configuration. Values set in `other` win.
    pub fn merge(mut self, other: ThemeConfig) -> Self {
        if other.default_theme.is_some() {
            self.default_theme = other.default_theme;
        }
        if other.fallback_theme.is_some() {
            self.fallback_theme = other.fallback_theme;
        }
        if other.asset_root.is_some() {
            self.asset_root = other.asset_root;
        }
        self.files.extend(other.files);
        self
    }

    /// Create a theme manager as configured.
    ///
    /// Registers the built-in themes, then every configured file. A file that
    /// fails to load is logged and skipped. The default theme is activated; if
    /// that fails and a fallback is configured, the fallback is activated instead.
    pub fn build_manager(&self) -> ThemeResult<ThemeManager> {
        let mut manager = ThemeManager::new();
        if let Some(root) = &self.asset_root {
            manager = manager.with_asset_root(root.clone());
        }
        manager.register_builtin_themes()?;

        for (id, path) in &self.files {
            if let Err(err) = manager.register_theme_file(id, path) {
                log::warn!("Skipping theme '{}' from {:?}: {}", id, path, err);
            }
        }

        let default = self
            .default_theme
            .clone()
            .unwrap_or_else(|| ThemeSource::named(dark::NAME));

        if let Err(err) = activate(&manager, &default) {
            match &self.fallback_theme {
                Some(fallback) => {
                    log::warn!("Theme '{}' unavailable ({}), falling back to '{}'", default, err, fallback);
                    activate(&manager, fallback)?;
                },
                None => return Err(err),
            }
        }

        Ok(manager)
    }
}

fn activate(manager: &ThemeManager, source: &ThemeSource) -> ThemeResult<()> {
    let id = source.id();
    if let ThemeSource::File(path) = source {
        manager.register_theme_file(&id, path)?;
    }
    manager.set_active(&id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_theme_source_parse() {
        assert_eq!(ThemeSource::parse("light"), ThemeSource::named("light"));
        assert_eq!(
            ThemeSource::parse("file:/tmp/solarized.qss"),
            ThemeSource::File(PathBuf::from("/tmp/solarized.qss"))
        );
        assert_eq!(ThemeSource::parse("file:/tmp/solarized.qss").id(), "solarized");
    }

    #[test]
    fn test_from_toml() {
        let config = ThemeConfig::from_toml(
            r#"
            [theme]
            default = "solarized"
            fallback = "light"
            asset_root = "/opt/app/gui"

            [theme.files]
            solarized = "/etc/app/solarized.qss"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_theme, Some(ThemeSource::named("solarized")));
        assert_eq!(config.fallback_theme, Some(ThemeSource::named("light")));
        assert_eq!(config.asset_root.as_deref(), Some("/opt/app/gui"));
        assert_eq!(config.files["solarized"], PathBuf::from("/etc/app/solarized.qss"));
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        let err = ThemeConfig::from_toml("[theme]\ndefualt = \"dark\"\n").unwrap_err();
        assert!(matches!(err, ThemeError::Config { .. }));
    }

    #[test]
    fn test_from_file_requires_toml_extension() {
        assert!(matches!(ThemeConfig::from_file("theme.json"), Err(ThemeError::Config { .. })));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.toml");
        fs::write(&path, "[theme]\ndefault = \"light\"\nfallback = \"dark\"\n[theme.files]\nmine = \"mine.qss\"\n")
            .unwrap();

        let vars: HashMap<&str, String> = [
            (CONFIG_VAR, path.to_string_lossy().into_owned()),
            (THEME_VAR, "mine".to_string()),
        ]
        .into_iter()
        .collect();
        let config = ThemeConfig::from_vars(|name| vars.get(name).cloned());

        assert_eq!(config.default_theme, Some(ThemeSource::named("mine")));
        assert_eq!(config.fallback_theme, Some(ThemeSource::named("dark")));
        assert_eq!(config.files["mine"], dir.path().join("mine.qss"));
    }

    #[test]
    fn test_merge_later_wins() {
        let base = ThemeConfig::new()
            .with_default_theme(ThemeSource::named("dark"))
            .with_asset_root("/a")
            .with_theme_file("one", "one.qss");
        let top = ThemeConfig::new()
            .with_default_theme(ThemeSource::named("light"))
            .with_theme_file("two", "two.qss");

        let merged = base.merge(top);
        assert_eq!(merged.default_theme, Some(ThemeSource::named("light")));
        assert_eq!(merged.asset_root.as_deref(), Some("/a"));
        assert_eq!(merged.files.len(), 2);
    }

    #[test]
    fn test_build_manager_defaults_to_dark() {
        let manager = ThemeConfig::new().build_manager().unwrap();
        assert_eq!(manager.active_theme_id().as_deref(), Some("dark"));
        assert_eq!(manager.list_themes(), vec!["dark", "light"]);
    }

    #[test]
    fn test_build_manager_falls_back() {
        let manager = ThemeConfig::new()
            .with_default_theme(ThemeSource::named("missing"))
            .with_fallback_theme(ThemeSource::named("light"))
            .build_manager()
            .unwrap();
        assert_eq!(manager.active_theme_id().as_deref(), Some("light"));

        let err = ThemeConfig::new()
            .with_default_theme(ThemeSource::named("missing"))
            .build_manager()
            .unwrap_err();
        assert!(matches!(err, ThemeError::UnknownTheme { .. }));
    }

    #[test]
    fn test_build_manager_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.qss");
        let bad = dir.path().join("bad.qss");
        fs::write(&good, "QLabel { color: #123456; }").unwrap();
        fs::write(&bad, "QLabel > QFrame { color: red; }").unwrap();

        let manager = ThemeConfig::new()
            .with_theme_file("good", &good)
            .with_theme_file("bad", &bad)
            .with_default_theme(ThemeSource::File(good.clone()))
            .build_manager()
            .unwrap();

        assert!(manager.contains("good"));
        assert!(!manager.contains("bad"));
        assert_eq!(manager.active_theme_id().as_deref(), Some("good"));
        assert_eq!(manager.theme_path("good"), Some(good));
    }
}
