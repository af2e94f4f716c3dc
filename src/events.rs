use serde::Deserialize;

use crate::error::{Error, Result};

/// Lifecycle notification from the application manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Added { app_id: String, pid: u32 },
    Removed { app_id: String, pid: u32 },
    Focused { app_id: String },
    Unfocused { app_id: String },
}

pub trait AppEventHandler {
    fn on_application_added(&mut self, app_id: &str, pid: u32);
    fn on_application_removed(&mut self, app_id: &str, pid: u32);
    fn on_application_focused(&mut self, app_id: &str);
    fn on_application_unfocused(&mut self, app_id: &str);
}

impl AppEvent {
    pub fn dispatch<H: AppEventHandler + ?Sized>(&self, handler: &mut H) {
        match self {
            AppEvent::Added { app_id, pid } => handler.on_application_added(app_id, *pid),
            AppEvent::Removed { app_id, pid } => handler.on_application_removed(app_id, *pid),
            AppEvent::Focused { app_id } => handler.on_application_focused(app_id),
            AppEvent::Unfocused { app_id } => handler.on_application_unfocused(app_id),
        }
    }
}

/// One line of the input feed: either a lifecycle event or a request from
/// the presentation side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Input {
    Added { app_id: String, pid: u32 },
    Removed { app_id: String, pid: u32 },
    Focused { app_id: String },
    Unfocused { app_id: String },
    Pin { app_id: String },
    Unpin { app_id: String },
    Dump,
}

impl Input {
    /// Decodes a feed line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        serde_json::from_str(line).map(Some).map_err(|source| Error::Input {
            line: line.to_string(),
            source,
        })
    }

    pub fn into_event(self) -> std::result::Result<AppEvent, Self> {
        match self {
            Input::Added { app_id, pid } => Ok(AppEvent::Added { app_id, pid }),
            Input::Removed { app_id, pid } => Ok(AppEvent::Removed { app_id, pid }),
            Input::Focused { app_id } => Ok(AppEvent::Focused { app_id }),
            Input::Unfocused { app_id } => Ok(AppEvent::Unfocused { app_id }),
            other => Err(other),
        }
    }
}
