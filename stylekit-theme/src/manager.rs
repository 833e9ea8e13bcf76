use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::cascade;
use crate::element::StyleableElement;
use crate::error::{ThemeError, ThemeResult};
use crate::properties::ResolvedStyle;
use crate::theme::{dark, light, Theme};

/// The active theme together with the resolutions computed against it.
///
/// Both live behind one lock so a switch replaces them together.
struct ActiveTheme {
    id: String,
    theme: Arc<Theme>,
    generation: u64,
    cache: HashMap<StyleableElement, ResolvedStyle>,
}

impl ActiveTheme {
    fn new(id: String, theme: Arc<Theme>, generation: u64) -> Self {
        Self {
            id,
            theme,
            generation,
            cache: HashMap::new(),
        }
    }
}

/// Resolutions kept per active theme before the cache is emptied and refilled.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// A theme registry that supports runtime theme switching and caching.
///
/// All methods take `&self`; the manager can be shared between threads behind an [Arc].
/// A resolution always runs against a single theme: [ThemeManager::set_active] cannot
/// interleave with an in-flight [ThemeManager::resolve].
///
/// Resolutions are cached per element, identifier included. Once the cache holds
/// `cache_capacity` entries it is emptied before the next insert, so hosts with many
/// dynamically named widgets keep a bounded cache.
pub struct ThemeManager {
    // Lock order: themes, then active, then extensions.
    themes: RwLock<IndexMap<String, Arc<Theme>>>,
    active: RwLock<Option<ActiveTheme>>,
    extensions: RwLock<HashMap<String, Vec<String>>>,
    sources: RwLock<HashMap<String, PathBuf>>,
    asset_root: Option<String>,
    cache_capacity: usize,
}

impl ThemeManager {
    /// Create an empty theme manager.
    pub fn new() -> Self {
        Self {
            themes: RwLock::new(IndexMap::new()),
            active: RwLock::new(None),
            extensions: RwLock::new(HashMap::new()),
            sources: RwLock::new(HashMap::new()),
            asset_root: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Create a theme manager with the built-in `dark` and `light` themes, `dark` active.
    pub fn with_builtin_themes() -> ThemeResult<Self> {
        let manager = Self::new();
        manager.register_builtin_themes()?;
        Ok(manager)
    }

    /// Rewrite root-relative `url(/...)` values under `root` for every theme registered from now on.
    pub fn with_asset_root(mut self, root: impl Into<String>) -> Self {
        self.asset_root = Some(root.into());
        self
    }

    /// Bound the number of cached resolutions. Zero disables caching.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Returns the asset root, if any.
    pub fn asset_root(&self) -> Option<&str> {
        self.asset_root.as_deref()
    }

    /// Register the built-in `dark` and `light` themes.
    pub fn register_builtin_themes(&self) -> ThemeResult<()> {
        self.register_theme(dark::NAME, dark::SOURCE)?;
        self.register_theme(light::NAME, light::SOURCE)
    }

    /// Parse `source` and register it as theme `id`.
    ///
    /// A theme that fails to parse is not registered. Registering an existing id replaces it;
    /// if that theme is active, the replacement takes effect immediately.
    /// The first theme ever registered becomes active.
    pub fn register_theme(&self, id: &str, source: &str) -> ThemeResult<()> {
        let theme = Theme::parse(id, source)?;
        self.insert_theme(id, theme);
        Ok(())
    }

    /// Read, parse and register a theme stylesheet from disk.
    ///
    /// The path is remembered so the theme can be reloaded later.
    pub fn register_theme_file(&self, id: &str, path: impl AsRef<Path>) -> ThemeResult<()> {
        let path = path.as_ref();
        let source = read_theme_file(path)?;
        self.register_theme(id, &source)?;
        write(&self.sources).insert(id.to_string(), path.to_path_buf());
        Ok(())
    }

    /// Register an already-built theme under `id`.
    ///
    /// Rules previously appended to `id` with [ThemeManager::extend_theme] are discarded.
    pub fn insert_theme(&self, id: &str, theme: Theme) {
        let theme = self.prepare(id, theme);
        let mut themes = write(&self.themes);
        self.store(&mut themes, id, theme);
        write(&self.extensions).remove(id);
    }

    /// Append the rules of `source` to the registered theme `id`.
    ///
    /// The appended rules come after the existing ones and win over them at equal specificity.
    /// They are kept across [ThemeManager::reload_theme].
    pub fn extend_theme(&self, id: &str, source: &str) -> ThemeResult<()> {
        let extra = self.prepare(id, Theme::parse(id, source)?);

        let mut themes = write(&self.themes);
        let mut theme = themes
            .get(id)
            .ok_or_else(|| ThemeError::unknown_theme(id))?
            .as_ref()
            .clone();
        theme.extend(extra);
        self.store(&mut themes, id, theme);
        write(&self.extensions)
            .entry(id.to_string())
            .or_default()
            .push(source.to_string());
        Ok(())
    }

    /// Re-read a theme registered with [ThemeManager::register_theme_file].
    ///
    /// Rules appended with [ThemeManager::extend_theme] are applied again on top of the
    /// new file contents. On failure the previously registered version stays in place.
    pub fn reload_theme(&self, id: &str) -> ThemeResult<()> {
        let path = self
            .theme_path(id)
            .ok_or_else(|| ThemeError::config(format!("theme '{}' was not loaded from a file", id)))?;
        let source = read_theme_file(&path)?;
        let mut theme = Theme::parse(id, &source)?;

        let mut themes = write(&self.themes);
        if let Some(extensions) = read(&self.extensions).get(id) {
            for extension in extensions {
                theme.extend(Theme::parse(id, extension)?);
            }
        }
        let theme = self.prepare(id, theme);
        self.store(&mut themes, id, theme);
        Ok(())
    }

    /// Rebase asset URLs and name the theme after `id`. Runs once per freshly parsed theme.
    fn prepare(&self, id: &str, mut theme: Theme) -> Theme {
        if let Some(root) = &self.asset_root {
            let rewritten = theme.rebase_urls(root);
            log::debug!("Rebased {} asset URLs of theme '{}' onto {}", rewritten, id, root);
        }
        if theme.name() != id {
            theme = theme.renamed(id);
        }
        theme
    }

    fn store(&self, themes: &mut IndexMap<String, Arc<Theme>>, id: &str, theme: Theme) {
        let theme = Arc::new(theme);
        let replaced = themes.insert(id.to_string(), theme.clone()).is_some();
        log::info!(
            "{} theme '{}' ({} rules)",
            if replaced { "Replaced" } else { "Registered" },
            id,
            theme.len()
        );

        let mut active = write(&self.active);
        let generation = match active.as_ref() {
            Some(current) if current.id == id => Some(current.generation + 1),
            Some(_) => None,
            None => Some(0),
        };
        if let Some(generation) = generation {
            *active = Some(ActiveTheme::new(id.to_string(), theme, generation));
            if generation == 0 {
                log::info!("Theme '{}' is now active", id);
            } else {
                log::debug!("Active theme '{}' replaced, resolution cache cleared", id);
            }
        }
    }

    /// Switch to a different theme.
    ///
    /// Fails with [ThemeError::UnknownTheme] if `id` is not registered, leaving the active
    /// theme unchanged.
    pub fn set_active(&self, id: &str) -> ThemeResult<()> {
        let themes = read(&self.themes);
        let theme = match themes.get(id) {
            Some(theme) => theme.clone(),
            None => {
                log::warn!("Cannot switch to unknown theme '{}'", id);
                return Err(ThemeError::unknown_theme(id));
            },
        };

        let mut active = write(&self.active);
        let generation = active.as_ref().map_or(0, |current| current.generation + 1);
        *active = Some(ActiveTheme::new(id.to_string(), theme, generation));
        log::info!("Switched to theme '{}'", id);
        Ok(())
    }

    /// Resolve the effective style of `element` against the active theme.
    ///
    /// Returns an empty style while no theme is registered.
    pub fn resolve(&self, element: &StyleableElement) -> ResolvedStyle {
        let (theme, generation) = {
            let active = read(&self.active);
            let current = match active.as_ref() {
                Some(current) => current,
                None => return ResolvedStyle::new(),
            };
            if let Some(style) = current.cache.get(element) {
                return style.clone();
            }
            (current.theme.clone(), current.generation)
        };

        let style = cascade::resolve(&theme, element);

        let mut active = write(&self.active);
        if let Some(current) = active.as_mut() {
            // Only cache against the theme the style was computed from.
            if current.generation == generation && self.cache_capacity > 0 {
                if current.cache.len() >= self.cache_capacity {
                    log::debug!("Resolution cache of theme '{}' full, emptying it", current.id);
                    current.cache.clear();
                }
                current.cache.insert(element.clone(), style.clone());
            }
        }
        style
    }

    /// Resolve `element` against the active theme with `overlay` rules on top.
    ///
    /// Overlay rules outrank theme rules regardless of specificity. Results are not cached.
    pub fn resolve_with_overlay(&self, element: &StyleableElement, overlay: &Theme) -> ResolvedStyle {
        match self.active_theme() {
            Some(theme) => cascade::resolve_with_overlay(&theme, overlay, element),
            None => cascade::cascade(cascade::collect_matching_rules(
                overlay.rules(),
                cascade::Origin::Overlay,
                element,
            )),
        }
    }

    /// Get the ids of all registered themes, in registration order.
    pub fn list_themes(&self) -> Vec<String> {
        read(&self.themes).keys().cloned().collect()
    }

    /// Check if a theme is registered.
    pub fn contains(&self, id: &str) -> bool {
        read(&self.themes).contains_key(id)
    }

    /// Get a registered theme.
    pub fn theme(&self, id: &str) -> Option<Arc<Theme>> {
        read(&self.themes).get(id).cloned()
    }

    /// Get the file a theme was loaded from, if any.
    pub fn theme_path(&self, id: &str) -> Option<PathBuf> {
        read(&self.sources).get(id).cloned()
    }

    /// Get the id of the active theme.
    pub fn active_theme_id(&self) -> Option<String> {
        read(&self.active).as_ref().map(|current| current.id.clone())
    }

    /// Get the active theme.
    pub fn active_theme(&self) -> Option<Arc<Theme>> {
        read(&self.active).as_ref().map(|current| current.theme.clone())
    }

    /// Number of cached resolutions for the active theme.
    pub fn cached_resolutions(&self) -> usize {
        read(&self.active).as_ref().map_or(0, |current| current.cache.len())
    }

    /// Clear the resolution cache.
    pub fn clear_cache(&self) {
        if let Some(current) = write(&self.active).as_mut() {
            current.cache.clear();
        }
    }
}

impl std::fmt::Debug for ThemeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeManager")
            .field("themes", &self.list_themes())
            .field("active", &self.active_theme_id())
            .field("asset_root", &self.asset_root)
            .field("cached_resolutions", &self.cached_resolutions())
            .finish()
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A theme manager that can be shared across threads.
pub type SharedThemeManager = Arc<ThemeManager>;

/// Create a new shared theme manager with the built-in themes.
pub fn create_shared_theme_manager() -> ThemeResult<SharedThemeManager> {
    Ok(Arc::new(ThemeManager::with_builtin_themes()?))
}

fn read_theme_file(path: &Path) -> ThemeResult<String> {
    if !path.exists() {
        return Err(ThemeError::file_not_found(path));
    }
    log::debug!("Reading theme stylesheet {:?}", path);
    Ok(std::fs::read_to_string(path)?)
}

// Poisoned locks are recovered; writers only ever replace whole values.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
