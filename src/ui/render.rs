use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use log::warn;
use serde::Serialize;

use crate::model::{FieldValue, LauncherEntry, LauncherField};
use crate::state::{ListChange, ListObserver};
use crate::ui::icons::IconResolver;

/// Every presentable field of one launcher, plus its resolved icon file.
#[derive(Serialize, Debug)]
pub struct RowSnapshot<'a> {
    #[serde(flatten)]
    pub fields: BTreeMap<&'static str, FieldValue<'a>>,
    #[serde(rename = "iconPath")]
    pub icon_path: Option<PathBuf>,
}

impl<'a> RowSnapshot<'a> {
    pub fn new(entry: &'a LauncherEntry, icons: &mut IconResolver) -> Self {
        let fields = LauncherField::ALL
            .iter()
            .map(|&field| (field.name(), entry.field(field)))
            .collect();
        Self {
            fields,
            icon_path: icons.resolve(entry.icon()),
        }
    }
}

#[derive(Serialize)]
struct ChangeLine<'a> {
    #[serde(flatten)]
    change: &'a ListChange,
    entry: Option<RowSnapshot<'a>>,
}

#[derive(Serialize)]
struct DumpLine<'a> {
    count: usize,
    rows: Vec<RowSnapshot<'a>>,
}

/// Writes list changes as JSON lines for whatever renders the dock.
pub struct JsonPrinter<W: Write> {
    out: W,
    icons: IconResolver,
}

impl JsonPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), IconResolver::default())
    }
}

impl<W: Write> JsonPrinter<W> {
    pub fn new(out: W, icons: IconResolver) -> Self {
        Self { out, icons }
    }

    pub fn dump<'a>(&mut self, entries: impl Iterator<Item = &'a LauncherEntry>) {
        let rows: Vec<_> = entries
            .map(|entry| RowSnapshot::new(entry, &mut self.icons))
            .collect();
        let line = DumpLine {
            count: rows.len(),
            rows,
        };
        if let Err(err) = write_line(&mut self.out, &line) {
            warn!("JsonPrinter: failed to write dump: {err}");
        }
    }

    #[cfg(test)]
    pub(crate) fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> ListObserver for JsonPrinter<W> {
    fn list_changed(&mut self, change: &ListChange, entry: Option<&LauncherEntry>) {
        let line = ChangeLine {
            change,
            entry: entry.map(|e| RowSnapshot::new(e, &mut self.icons)),
        };
        if let Err(err) = write_line(&mut self.out, &line) {
            warn!("JsonPrinter: failed to write change: {err}");
        }
    }
}

fn write_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    out.flush()
}
