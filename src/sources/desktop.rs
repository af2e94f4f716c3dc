use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesktopAction {
    pub id: String,
    pub name: String,
    pub exec: String,
}

/// Metadata for one launchable application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesktopEntry {
    pub app_id: String,
    pub name: String,
    pub icon: String,
    pub exec: Option<String>,
    pub actions: Vec<DesktopAction>,
}

impl DesktopEntry {
    /// Entry for an application nobody described: the id doubles as name and icon.
    pub fn fallback(app_id: &str) -> Self {
        Self {
            app_id: app_id.to_string(),
            name: app_id.to_string(),
            icon: app_id.to_string(),
            exec: None,
            actions: Vec::new(),
        }
    }
}

impl From<&AppConfig> for DesktopEntry {
    fn from(app: &AppConfig) -> Self {
        Self {
            app_id: app.id.clone(),
            name: app.name.clone().unwrap_or_else(|| app.id.clone()),
            icon: app.icon.clone().unwrap_or_else(|| app.id.clone()),
            exec: app.exec.clone(),
            actions: app
                .actions
                .iter()
                .map(|a| DesktopAction {
                    id: a.id.clone(),
                    name: a.name.clone(),
                    exec: a.exec.clone(),
                })
                .collect(),
        }
    }
}

pub trait DesktopEntries {
    fn resolve(&mut self, app_id: &str) -> Arc<DesktopEntry>;
}

/// Desktop entries described in the configuration, shared by every launcher
/// that refers to them.
#[derive(Default)]
pub struct DesktopCatalog {
    entries: HashMap<String, Arc<DesktopEntry>>,
}

impl DesktopCatalog {
    pub fn new(apps: &[AppConfig]) -> Self {
        let entries = apps
            .iter()
            .map(|app| (app.id.clone(), Arc::new(DesktopEntry::from(app))))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DesktopEntries for DesktopCatalog {
    fn resolve(&mut self, app_id: &str) -> Arc<DesktopEntry> {
        if let Some(entry) = self.entries.get(app_id) {
            return entry.clone();
        }
        debug!("DesktopCatalog: no entry for {app_id}, using fallback");
        let entry = Arc::new(DesktopEntry::fallback(app_id));
        self.entries.insert(app_id.to_string(), entry.clone());
        entry
    }
}
