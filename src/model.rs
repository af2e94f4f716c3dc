use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::sources::desktop::{DesktopAction, DesktopEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    NotRunning,
    Running,
}

/// One launcher in the dock: a pinned shortcut, a running application, or both.
#[derive(Debug, Clone)]
pub struct LauncherEntry {
    app_id: String,
    desktop_entry: Arc<DesktopEntry>,
    pids: BTreeSet<u32>,
    state: RunState,
    pinned: bool,
    focused: bool,
}

impl LauncherEntry {
    pub fn new(app_id: String, desktop_entry: Arc<DesktopEntry>, pinned: bool) -> Self {
        Self {
            app_id,
            desktop_entry,
            pids: BTreeSet::new(),
            state: RunState::NotRunning,
            pinned,
            focused: false,
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn desktop_entry(&self) -> &Arc<DesktopEntry> {
        &self.desktop_entry
    }

    pub fn actions(&self) -> &[DesktopAction] {
        &self.desktop_entry.actions
    }

    pub fn name(&self) -> &str {
        &self.desktop_entry.name
    }

    pub fn icon(&self) -> &str {
        &self.desktop_entry.icon
    }

    pub fn pids(&self) -> &BTreeSet<u32> {
        &self.pids
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub(crate) fn add_pid(&mut self, pid: u32) {
        self.pids.insert(pid);
        self.state = RunState::Running;
    }

    /// Returns true when this was the last process for the entry.
    pub(crate) fn remove_pid(&mut self, pid: u32) -> bool {
        self.pids.remove(&pid);
        self.pids.is_empty()
    }

    pub(crate) fn stop(&mut self) {
        self.state = RunState::NotRunning;
        self.focused = false;
    }

    pub(crate) fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn field(&self, field: LauncherField) -> FieldValue<'_> {
        match field {
            LauncherField::AppId => FieldValue::Text(&self.app_id),
            LauncherField::DesktopEntry => FieldValue::Entry(&self.desktop_entry),
            LauncherField::Actions => FieldValue::Actions(self.actions()),
            LauncherField::State => FieldValue::State(self.state),
            LauncherField::Running => FieldValue::Flag(self.is_running()),
            LauncherField::Focused => FieldValue::Flag(self.focused),
            LauncherField::Pinned => FieldValue::Flag(self.pinned),
            LauncherField::Display => FieldValue::Text(self.name()),
            LauncherField::Decoration => FieldValue::Text(self.icon()),
        }
    }
}

/// Fields a presentation layer can read off a [`LauncherEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LauncherField {
    AppId,
    DesktopEntry,
    Actions,
    State,
    Running,
    Focused,
    Pinned,
    Display,
    Decoration,
}

impl LauncherField {
    pub const ALL: [LauncherField; 9] = [
        LauncherField::AppId,
        LauncherField::DesktopEntry,
        LauncherField::Actions,
        LauncherField::State,
        LauncherField::Running,
        LauncherField::Focused,
        LauncherField::Pinned,
        LauncherField::Display,
        LauncherField::Decoration,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LauncherField::AppId => "appId",
            LauncherField::DesktopEntry => "desktopFile",
            LauncherField::Actions => "actions",
            LauncherField::State => "state",
            LauncherField::Running => "running",
            LauncherField::Focused => "focused",
            LauncherField::Pinned => "pinned",
            LauncherField::Display => "display",
            LauncherField::Decoration => "decoration",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Flag(bool),
    State(RunState),
    Actions(&'a [DesktopAction]),
    Entry(&'a DesktopEntry),
}
