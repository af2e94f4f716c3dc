use log::debug;

/// Receives every change to the set of pinned launchers.
pub trait PinStore {
    fn persist_pinned(&mut self, app_id: &str, pinned: bool);
}

/// Pinned launchers kept in memory, in pin order. Nothing reaches disk.
#[derive(Debug, Default)]
pub struct MemoryPinStore {
    pinned: Vec<String>,
}

impl MemoryPinStore {
    pub fn new(seed: &[String]) -> Self {
        let mut store = Self::default();
        for id in seed {
            if !store.pinned.contains(id) {
                store.pinned.push(id.clone());
            }
        }
        store
    }

    pub fn pinned(&self) -> &[String] {
        &self.pinned
    }
}

impl PinStore for MemoryPinStore {
    fn persist_pinned(&mut self, app_id: &str, pinned: bool) {
        if pinned {
            if !self.pinned.iter().any(|id| id == app_id) {
                self.pinned.push(app_id.to_string());
            }
        } else {
            self.pinned.retain(|id| id != app_id);
        }
        debug!("MemoryPinStore: pinned launchers now {:?}", self.pinned);
    }
}
