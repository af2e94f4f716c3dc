use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use serde::Serialize;

use crate::events::{AppEvent, AppEventHandler};
use crate::model::LauncherEntry;
use crate::sources::desktop::DesktopEntries;
use crate::sources::pins::PinStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ListChange {
    Inserted { row: usize },
    Removed { row: usize, app_id: String },
    Changed { row: usize },
}

impl ListChange {
    pub fn row(&self) -> usize {
        match self {
            ListChange::Inserted { row }
            | ListChange::Removed { row, .. }
            | ListChange::Changed { row } => *row,
        }
    }
}

/// Notified after every change to a [`LauncherList`]. `entry` is the row as it
/// now reads, or `None` when the row was removed.
pub trait ListObserver {
    fn list_changed(&mut self, change: &ListChange, entry: Option<&LauncherEntry>);
}

impl<T: ListObserver> ListObserver for Rc<RefCell<T>> {
    fn list_changed(&mut self, change: &ListChange, entry: Option<&LauncherEntry>) {
        self.borrow_mut().list_changed(change, entry);
    }
}

/// Launchers shown in the dock: pinned shortcuts first, then running
/// applications in the order they were first seen.
///
/// An entry exists only while it is pinned or has at least one process.
pub struct LauncherList<D, P> {
    entries: Vec<LauncherEntry>,
    catalog: D,
    pin_store: P,
    observers: Vec<Box<dyn ListObserver>>,
}

impl<D: DesktopEntries, P: PinStore> LauncherList<D, P> {
    pub fn new(seed: &[String], mut catalog: D, pin_store: P) -> Self {
        let mut entries: Vec<LauncherEntry> = Vec::with_capacity(seed.len());
        for app_id in seed {
            if entries.iter().any(|e| e.app_id() == app_id) {
                continue;
            }
            let desktop = catalog.resolve(app_id);
            entries.push(LauncherEntry::new(app_id.clone(), desktop, true));
        }

        Self {
            entries,
            catalog,
            pin_store,
            observers: Vec::new(),
        }
    }

    pub fn subscribe<O: ListObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LauncherEntry> {
        self.entries.iter()
    }

    pub fn get(&self, row: usize) -> Option<&LauncherEntry> {
        self.entries.get(row)
    }

    pub fn index_of(&self, app_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.app_id() == app_id)
    }

    pub fn pinned_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter(|e| e.is_pinned()).map(|e| e.app_id())
    }

    pub fn pin_store(&self) -> &P {
        &self.pin_store
    }

    pub fn apply(&mut self, event: &AppEvent) -> Option<ListChange> {
        match event {
            AppEvent::Added { app_id, pid } => self.added(app_id, *pid),
            AppEvent::Removed { app_id, pid } => self.removed(app_id, *pid),
            AppEvent::Focused { app_id } => self.focus(app_id, true),
            AppEvent::Unfocused { app_id } => self.focus(app_id, false),
        }
    }

    pub fn pin(&mut self, app_id: &str) -> Option<ListChange> {
        let row = self.index_of(app_id)?;
        self.entries[row].set_pinned(true);
        let change = self.notify(ListChange::Changed { row });
        self.pin_store.persist_pinned(app_id, true);
        change
    }

    pub fn unpin(&mut self, app_id: &str) -> Option<ListChange> {
        let row = self.index_of(app_id)?;
        let change = if self.entries[row].is_running() {
            self.entries[row].set_pinned(false);
            self.notify(ListChange::Changed { row })
        } else {
            self.remove_row(row)
        };
        self.pin_store.persist_pinned(app_id, false);
        change
    }

    fn added(&mut self, app_id: &str, pid: u32) -> Option<ListChange> {
        if let Some(row) = self.index_of(app_id) {
            self.entries[row].add_pid(pid);
            return self.notify(ListChange::Changed { row });
        }

        let desktop = self.catalog.resolve(app_id);
        let mut entry = LauncherEntry::new(app_id.to_string(), desktop, false);
        entry.add_pid(pid);
        self.entries.push(entry);
        let row = self.entries.len() - 1;
        self.notify(ListChange::Inserted { row })
    }

    fn removed(&mut self, app_id: &str, pid: u32) -> Option<ListChange> {
        let row = self.index_of(app_id)?;
        let entry = &mut self.entries[row];
        if !entry.remove_pid(pid) {
            return None;
        }

        if entry.is_pinned() {
            entry.stop();
            self.notify(ListChange::Changed { row })
        } else {
            self.remove_row(row)
        }
    }

    fn focus(&mut self, app_id: &str, focused: bool) -> Option<ListChange> {
        let row = self.index_of(app_id)?;
        self.entries[row].set_focused(focused);
        self.notify(ListChange::Changed { row })
    }

    fn remove_row(&mut self, row: usize) -> Option<ListChange> {
        let entry = self.entries.remove(row);
        self.notify(ListChange::Removed {
            row,
            app_id: entry.app_id().to_string(),
        })
    }

    fn notify(&mut self, change: ListChange) -> Option<ListChange> {
        debug!("LauncherList: {change:?}, {} entries", self.entries.len());
        let entry = match &change {
            ListChange::Removed { .. } => None,
            _ => self.entries.get(change.row()),
        };
        for observer in self.observers.iter_mut() {
            observer.list_changed(&change, entry);
        }
        Some(change)
    }
}

impl<D: DesktopEntries, P: PinStore> AppEventHandler for LauncherList<D, P> {
    fn on_application_added(&mut self, app_id: &str, pid: u32) {
        self.added(app_id, pid);
    }

    fn on_application_removed(&mut self, app_id: &str, pid: u32) {
        self.removed(app_id, pid);
    }

    fn on_application_focused(&mut self, app_id: &str) {
        self.focus(app_id, true);
    }

    fn on_application_unfocused(&mut self, app_id: &str) {
        self.focus(app_id, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::desktop::DesktopCatalog;
    use crate::sources::pins::MemoryPinStore;
    use std::collections::{HashMap, HashSet};

    type List = LauncherList<DesktopCatalog, MemoryPinStore>;

    fn seed() -> Vec<String> {
        vec!["papyros-files".to_string(), "gnome-dictionary".to_string()]
    }

    fn list_with(seed: &[String]) -> List {
        LauncherList::new(seed, DesktopCatalog::default(), MemoryPinStore::new(seed))
    }

    #[derive(Default)]
    struct Recorder {
        changes: Vec<(ListChange, Option<String>)>,
    }

    impl ListObserver for Recorder {
        fn list_changed(&mut self, change: &ListChange, entry: Option<&LauncherEntry>) {
            self.changes
                .push((change.clone(), entry.map(|e| e.app_id().to_string())));
        }
    }

    fn recorded(list: &mut List) -> Rc<RefCell<Recorder>> {
        let rec = Rc::new(RefCell::new(Recorder::default()));
        list.subscribe(rec.clone());
        rec
    }

    fn added(app_id: &str, pid: u32) -> AppEvent {
        AppEvent::Added { app_id: app_id.to_string(), pid }
    }

    fn removed(app_id: &str, pid: u32) -> AppEvent {
        AppEvent::Removed { app_id: app_id.to_string(), pid }
    }

    fn ids(list: &List) -> Vec<&str> {
        list.iter().map(|e| e.app_id()).collect()
    }

    #[test]
    fn seeded_session_scenario() {
        let mut list = list_with(&seed());
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|e| e.is_pinned() && !e.is_running()));

        list.apply(&added("papyros-files", 100));
        assert_eq!(list.len(), 2);
        assert!(list.get(0).unwrap().is_running());

        list.apply(&removed("papyros-files", 100));
        assert_eq!(list.len(), 2);
        let files = list.get(0).unwrap();
        assert!(!files.is_running());
        assert!(files.is_pinned());

        assert_eq!(list.apply(&added("editor", 200)), Some(ListChange::Inserted { row: 2 }));
        assert_eq!(ids(&list), vec!["papyros-files", "gnome-dictionary", "editor"]);
        assert_eq!(
            list.apply(&removed("editor", 200)),
            Some(ListChange::Removed { row: 2, app_id: "editor".to_string() })
        );
        assert_eq!(ids(&list), vec!["papyros-files", "gnome-dictionary"]);
    }

    #[test]
    fn seed_skips_duplicates() {
        let seed = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let list = list_with(&seed);
        assert_eq!(ids(&list), vec!["a", "b"]);
    }

    #[test]
    fn second_process_does_not_duplicate() {
        let mut list = list_with(&[]);
        list.apply(&added("editor", 1));
        assert_eq!(list.apply(&added("editor", 2)), Some(ListChange::Changed { row: 0 }));
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(0).unwrap().pids().len(), 2);

        assert_eq!(list.apply(&removed("editor", 1)), None);
        assert!(list.get(0).unwrap().is_running());
        list.apply(&removed("editor", 2));
        assert!(list.is_empty());
    }

    #[test]
    fn pinned_entry_stops_and_loses_focus() {
        let mut list = list_with(&seed());
        list.apply(&added("gnome-dictionary", 7));
        list.apply(&AppEvent::Focused { app_id: "gnome-dictionary".to_string() });
        assert!(list.get(1).unwrap().is_focused());

        assert_eq!(
            list.apply(&removed("gnome-dictionary", 7)),
            Some(ListChange::Changed { row: 1 })
        );
        let entry = list.get(1).unwrap();
        assert!(!entry.is_running());
        assert!(!entry.is_focused());
        assert!(entry.is_pinned());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut list = list_with(&seed());
        let rec = recorded(&mut list);
        assert_eq!(list.apply(&removed("nobody", 1)), None);
        assert_eq!(list.apply(&AppEvent::Focused { app_id: "nobody".to_string() }), None);
        assert_eq!(list.pin("nobody"), None);
        assert_eq!(list.unpin("nobody"), None);
        assert!(rec.borrow().changes.is_empty());
        assert_eq!(list.pin_store().pinned().len(), 2);
    }

    #[test]
    fn unknown_pid_on_known_id_keeps_running_entry() {
        let mut list = list_with(&[]);
        list.apply(&added("editor", 1));
        assert_eq!(list.apply(&removed("editor", 99)), None);
        assert!(list.get(0).unwrap().is_running());
    }

    #[test]
    fn get_and_index_of() {
        let mut list = list_with(&seed());
        list.apply(&added("editor", 5));
        assert_eq!(list.index_of("papyros-files"), Some(0));
        assert_eq!(list.index_of("gnome-dictionary"), Some(1));
        assert_eq!(list.index_of("editor"), Some(2));
        assert_eq!(list.index_of("missing"), None);
        assert_eq!(list.get(2).unwrap().app_id(), "editor");
        assert!(list.get(3).is_none());
    }

    #[test]
    fn pin_then_unpin_never_running_removes() {
        let mut list = list_with(&["dict".to_string()]);
        let rec = recorded(&mut list);

        assert_eq!(list.pin("dict"), Some(ListChange::Changed { row: 0 }));
        assert_eq!(
            list.unpin("dict"),
            Some(ListChange::Removed { row: 0, app_id: "dict".to_string() })
        );
        assert!(list.is_empty());
        assert!(list.pin_store().pinned().is_empty());
        assert_eq!(
            rec.borrow().changes,
            vec![
                (ListChange::Changed { row: 0 }, Some("dict".to_string())),
                (ListChange::Removed { row: 0, app_id: "dict".to_string() }, None),
            ]
        );
    }

    #[test]
    fn pin_then_unpin_running_keeps_entry() {
        let mut list = list_with(&[]);
        list.apply(&added("editor", 3));

        list.pin("editor");
        assert!(list.get(0).unwrap().is_pinned());
        assert_eq!(list.pin_store().pinned(), ["editor".to_string()].as_slice());
        assert_eq!(list.pinned_ids().collect::<Vec<_>>(), vec!["editor"]);

        assert_eq!(list.unpin("editor"), Some(ListChange::Changed { row: 0 }));
        let entry = list.get(0).unwrap();
        assert!(entry.is_running());
        assert!(!entry.is_pinned());
        assert!(list.pin_store().pinned().is_empty());

        list.apply(&removed("editor", 3));
        assert!(list.is_empty());
    }

    #[test]
    fn pinned_running_entry_survives_last_process() {
        let mut list = list_with(&[]);
        list.apply(&added("editor", 3));
        list.pin("editor");
        list.apply(&removed("editor", 3));
        assert_eq!(list.len(), 1);
        assert!(!list.get(0).unwrap().is_running());
    }

    #[test]
    fn removal_shifts_later_rows() {
        let mut list = list_with(&[]);
        list.apply(&added("a", 1));
        list.apply(&added("b", 2));
        list.apply(&added("c", 3));
        list.apply(&removed("a", 1));
        assert_eq!(ids(&list), vec!["b", "c"]);
        assert_eq!(list.index_of("c"), Some(1));
    }

    #[test]
    fn observers_see_each_change_once_in_order() {
        let mut list = list_with(&seed());
        let first = recorded(&mut list);
        let second = recorded(&mut list);

        list.apply(&added("editor", 1));
        list.apply(&AppEvent::Focused { app_id: "editor".to_string() });
        list.apply(&AppEvent::Unfocused { app_id: "editor".to_string() });
        list.apply(&removed("editor", 1));

        let expected = vec![
            (ListChange::Inserted { row: 2 }, Some("editor".to_string())),
            (ListChange::Changed { row: 2 }, Some("editor".to_string())),
            (ListChange::Changed { row: 2 }, Some("editor".to_string())),
            (ListChange::Removed { row: 2, app_id: "editor".to_string() }, None),
        ];
        assert_eq!(first.borrow().changes, expected);
        assert_eq!(second.borrow().changes, expected);
    }

    #[test]
    fn handler_trait_drives_the_list() {
        let mut list = list_with(&seed());
        let events = [added("papyros-files", 1), added("editor", 2)];
        for event in &events {
            event.dispatch(&mut list);
        }
        assert_eq!(list.len(), 3);
        assert!(list.get(0).unwrap().is_running());
    }

    #[test]
    fn running_count_matches_live_process_sets() {
        // Deterministic pseudo-random walk over a handful of ids and pids.
        let app_ids = ["a", "b", "c", "papyros-files"];
        let mut list = list_with(&["papyros-files".to_string(), "b".to_string()]);
        let mut live: HashMap<&str, HashSet<u32>> = HashMap::new();
        let mut x: u32 = 12345;

        for _ in 0..500 {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12345);
            let app_id = app_ids[(x >> 16) as usize % app_ids.len()];
            let pid = (x >> 8) % 4;
            if (x >> 24) % 2 == 0 {
                list.apply(&added(app_id, pid));
                live.entry(app_id).or_default().insert(pid);
            } else {
                list.apply(&removed(app_id, pid));
                if let Some(pids) = live.get_mut(app_id) {
                    pids.remove(&pid);
                }
            }

            let expected = live.values().filter(|p| !p.is_empty()).count();
            assert_eq!(list.iter().filter(|e| e.is_running()).count(), expected);

            let mut seen = HashSet::new();
            for entry in list.iter() {
                assert!(seen.insert(entry.app_id()));
                assert!(entry.is_pinned() || entry.is_running());
                assert_eq!(entry.is_running(), !entry.pids().is_empty());
            }
        }
    }
}
