use std::collections::HashMap;
use std::path::{Path, PathBuf};

const ICON_SUBDIRS: [&str; 7] = [
    "hicolor/48x48/apps",
    "hicolor/scalable/apps",
    "hicolor/32x32/apps",
    "hicolor/64x64/apps",
    "Adwaita/48x48/apps",
    "Adwaita/scalable/apps",
    "",
];

const ICON_EXTENSIONS: [&str; 3] = ["png", "svg", "xpm"];

/// Maps icon names to icon files on disk. Lookups, misses included, are cached.
pub struct IconResolver {
    cache: HashMap<String, Option<PathBuf>>,
    icon_theme_paths: Vec<PathBuf>,
}

impl Default for IconResolver {
    fn default() -> Self {
        let mut paths = Vec::new();
        if let Some(home) = directories::BaseDirs::new() {
            paths.push(home.data_dir().join("icons"));
        }
        paths.push(PathBuf::from("/usr/share/icons"));
        paths.push(PathBuf::from("/usr/share/pixmaps"));
        Self::with_paths(paths)
    }
}

impl IconResolver {
    pub fn with_paths(icon_theme_paths: Vec<PathBuf>) -> Self {
        Self {
            cache: HashMap::new(),
            icon_theme_paths,
        }
    }

    pub fn resolve(&mut self, icon_name: &str) -> Option<PathBuf> {
        if let Some(cached) = self.cache.get(icon_name) {
            return cached.clone();
        }
        let found = self.find(icon_name);
        self.cache.insert(icon_name.to_string(), found.clone());
        found
    }

    fn find(&self, icon_name: &str) -> Option<PathBuf> {
        if icon_name.is_empty() {
            return None;
        }

        let path = Path::new(icon_name);
        if path.is_absolute() {
            return path.exists().then(|| path.to_path_buf());
        }

        for root in &self.icon_theme_paths {
            if !root.exists() { continue; }

            for sub in ICON_SUBDIRS {
                let dir = root.join(sub);
                if !dir.exists() { continue; }

                for ext in ICON_EXTENSIONS {
                    let file_path = dir.join(format!("{}.{}", icon_name, ext));
                    if file_path.exists() {
                        return Some(file_path);
                    }
                }
            }
        }
        None
    }
}
